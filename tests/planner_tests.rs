use chrono::{NaiveDate, NaiveTime};
use routine_tool::{
    HISTORY_LIMIT, PlanError, Planner, TransportOption, TransportTable, TransportTableConfig,
};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn with_default_checklist_seeds_starter_tasks() {
    let planner = Planner::with_default_checklist().unwrap();
    let tasks = planner.tasks().unwrap();
    assert_eq!(tasks.len(), 4);
    assert_eq!(tasks[0].title, "Shower");
    assert_eq!(planner.total_preparation_minutes().unwrap(), 50);
    assert!(tasks.iter().all(|task| !task.completed));
}

#[test]
fn add_task_rejects_empty_title_without_consuming_an_id() {
    let mut planner = Planner::new();
    assert!(planner.add_task("", 10).is_err());
    assert!(planner.add_task("   ", 10).is_err());
    assert_eq!(planner.dataframe().height(), 0);

    // First valid task still gets id 1.
    let id = planner.add_task("Shower", 15).unwrap();
    assert_eq!(id, 1);
}

#[test]
fn add_task_rejects_non_positive_duration() {
    let mut planner = Planner::new();
    let err = planner.add_task("Stretch", 0).unwrap_err();
    assert!(err.to_string().contains("non-positive duration"));
    assert!(planner.add_task("Stretch", -5).is_err());
    assert_eq!(planner.dataframe().height(), 0);
}

#[test]
fn edit_task_validates_and_noops_on_unknown_id() {
    let mut planner = Planner::new();
    planner.add_task("Shower", 15).unwrap();

    assert!(planner.edit_task(1, "", 15).is_err());
    assert!(planner.edit_task(1, "Shower", 0).is_err());
    let unchanged = planner.find_task(1).unwrap().unwrap();
    assert_eq!(unchanged.title, "Shower");
    assert_eq!(unchanged.duration_minutes, 15);

    assert!(!planner.edit_task(99, "Ghost", 10).unwrap());
    assert_eq!(planner.dataframe().height(), 1);
}

#[test]
fn toggle_task_flips_completed_flag() {
    let mut planner = Planner::new();
    planner.add_task("Breakfast", 20).unwrap();

    assert!(planner.toggle_task(1).unwrap());
    assert!(planner.find_task(1).unwrap().unwrap().completed);
    assert!(planner.toggle_task(1).unwrap());
    assert!(!planner.find_task(1).unwrap().unwrap().completed);
    assert!(!planner.toggle_task(5).unwrap());
}

#[test]
fn delete_task_removes_only_the_matching_row() {
    let mut planner = Planner::with_default_checklist().unwrap();
    assert!(planner.delete_task(2).unwrap());
    assert!(!planner.delete_task(2).unwrap());

    let ids: Vec<i32> = planner.tasks().unwrap().iter().map(|task| task.id).collect();
    assert_eq!(ids, vec![1, 3, 4]);
    assert_eq!(planner.total_preparation_minutes().unwrap(), 30);
}

#[test]
fn add_after_delete_reuses_max_rule() {
    let mut planner = Planner::new();
    planner.add_task("A", 5).unwrap();
    planner.add_task("B", 5).unwrap();
    planner.add_task("C", 5).unwrap();

    // Deleting a middle id leaves the max untouched.
    planner.delete_task(2).unwrap();
    assert_eq!(planner.add_task("D", 5).unwrap(), 4);

    // Deleting the highest id makes it assignable again.
    planner.delete_task(4).unwrap();
    assert_eq!(planner.add_task("E", 5).unwrap(), 4);
}

#[test]
fn total_preparation_minutes_ignores_completion() {
    let mut planner = Planner::with_default_checklist().unwrap();
    assert_eq!(planner.total_preparation_minutes().unwrap(), 50);

    planner.toggle_task(1).unwrap();
    planner.toggle_task(2).unwrap();
    assert_eq!(planner.total_preparation_minutes().unwrap(), 50);
}

#[test]
fn history_is_capped_at_ten_newest_first() {
    let mut planner = Planner::new();
    planner.add_task("Shower", 15).unwrap();
    planner.set_destination("Office");
    planner.set_transport("taxi").unwrap();

    for minute in 0..=(HISTORY_LIMIT as u32) {
        planner.set_arrival_time(t(9, minute));
        planner.calculate(d(2025, 6, 2)).unwrap();
    }

    let history = planner.history();
    assert_eq!(history.len(), HISTORY_LIMIT);
    assert_eq!(history[0].arrival_time, t(9, HISTORY_LIMIT as u32));
    // The very first calculation has been evicted.
    assert!(history.iter().all(|entry| entry.arrival_time != t(9, 0)));
}

#[test]
fn history_round_trip_reproduces_the_recorded_plan() {
    let mut planner = Planner::with_default_checklist().unwrap();
    planner.set_destination("Office");
    planner.set_arrival_time(t(9, 0));
    planner.set_transport("car").unwrap();
    planner.set_consider_traffic(true);

    let original = planner.calculate(d(2025, 6, 2)).unwrap();
    let entry_id = planner.history()[0].id;

    // Drift the selection, then restore it from history.
    planner.set_destination("Gym");
    planner.set_arrival_time(t(18, 30));
    planner.set_transport("walk").unwrap();

    assert!(planner.apply_history_entry(entry_id));
    assert_eq!(planner.destination(), Some("Office"));
    assert_eq!(planner.arrival_time(), Some(t(9, 0)));
    assert_eq!(planner.transport_key(), Some("car"));

    let replayed = planner.calculate(d(2025, 6, 2)).unwrap();
    assert_eq!(replayed.departure, original.departure);
    assert_eq!(replayed.wake_up, original.wake_up);
}

#[test]
fn apply_history_entry_does_not_mutate_history() {
    let mut planner = Planner::with_default_checklist().unwrap();
    planner.set_destination("Office");
    planner.set_arrival_time(t(9, 0));
    planner.set_transport("car").unwrap();
    planner.calculate(d(2025, 6, 2)).unwrap();

    let before = planner.history().to_vec();
    assert!(planner.apply_history_entry(before[0].id));
    assert_eq!(planner.history(), &before[..]);
    assert!(!planner.apply_history_entry(999));
}

#[test]
fn apply_history_with_stale_label_leaves_transport_unset() {
    let mut planner = Planner::with_default_checklist().unwrap();
    planner.set_destination("Office");
    planner.set_arrival_time(t(9, 0));
    planner.set_transport("car").unwrap();
    planner.calculate(d(2025, 6, 2)).unwrap();
    let entry_id = planner.history()[0].id;

    // A custom table without the recorded "Car" label breaks the
    // label-based restore on purpose.
    let config = TransportTableConfig::new(vec![TransportOption::new("bike", "Bicycle", 30)]);
    planner.set_transport_table_from_config(&config).unwrap();

    assert!(planner.apply_history_entry(entry_id));
    assert_eq!(planner.transport_key(), None);
    let err = planner.calculate(d(2025, 6, 2)).unwrap_err();
    assert!(matches!(err, PlanError::MissingTransport));
}

#[test]
fn set_transport_rejects_unknown_key() {
    let mut planner = Planner::new();
    let err = planner.set_transport("teleport").unwrap_err();
    assert!(matches!(err, PlanError::UnknownTransport { .. }));
    assert_eq!(planner.transport_key(), None);
}

#[test]
fn set_transport_table_from_config_sets_custom_flag() {
    let mut planner = Planner::new();
    assert!(!planner.transports_is_custom());

    let table = TransportTable::default();
    let config = table.to_config();
    planner.set_transport_table_from_config(&config).unwrap();
    assert!(planner.transports_is_custom());
    assert_eq!(planner.transport_table_config(), config);

    planner.reset_transport_table_to_default();
    assert!(!planner.transports_is_custom());
}

#[test]
fn with_transport_table_starts_custom() {
    let config = TransportTableConfig::new(vec![TransportOption::new("bike", "Bicycle", 30)]);
    let table = TransportTable::from_config(&config).unwrap();
    let mut planner = Planner::with_transport_table(table);

    assert!(planner.transports_is_custom());
    planner.set_transport("bike").unwrap();
    assert!(planner.set_transport("car").is_err());
}

#[test]
fn replacing_the_table_clears_a_selection_it_no_longer_contains() {
    let mut planner = Planner::new();
    planner.set_transport("car").unwrap();

    let config = TransportTableConfig::new(vec![TransportOption::new("bike", "Bicycle", 30)]);
    planner.set_transport_table_from_config(&config).unwrap();
    assert_eq!(planner.transport_key(), None);

    planner.set_transport("bike").unwrap();
    planner.reset_transport_table_to_default();
    assert_eq!(planner.transport_key(), None);
}
