use routine_tool::{Planner, Task};

#[test]
fn new_task_starts_uncompleted() {
    let task = Task::new(1, "Shower", 15);
    assert_eq!(task.id, 1);
    assert_eq!(task.title, "Shower");
    assert_eq!(task.duration_minutes, 15);
    assert!(!task.completed);
}

#[test]
fn task_roundtrips_through_planner_dataframe() {
    let mut planner = Planner::new();
    planner.add_task("Pack documents", 10).unwrap();
    planner.toggle_task(1).unwrap();

    let row = Task::from_dataframe_row(planner.dataframe(), 0).unwrap();
    assert_eq!(row.id, 1);
    assert_eq!(row.title, "Pack documents");
    assert_eq!(row.duration_minutes, 10);
    assert!(row.completed);

    let direct = row.to_dataframe_row().unwrap();
    let back = Task::from_dataframe_row(&direct, 0).unwrap();
    assert_eq!(back, row);
}

#[test]
fn task_serializes_through_json() {
    let mut task = Task::new(3, "Check bag", 5);
    task.completed = true;

    let json = serde_json::to_string(&task).unwrap();
    let parsed: Task = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, task);

    // `completed` defaults to false when absent in the payload.
    let parsed: Task =
        serde_json::from_str(r#"{"id":7,"title":"Shower","duration_minutes":15}"#).unwrap();
    assert!(!parsed.completed);
}
