use routine_tool::{CAR_KEY, TransportOption, TransportTable, TransportTableConfig};

#[test]
fn default_table_lists_builtin_modes() {
    let table = TransportTable::default();
    let keys: Vec<&str> = table
        .options()
        .iter()
        .map(|option| option.key.as_str())
        .collect();
    assert_eq!(keys, vec!["car", "public", "walk", "taxi"]);

    assert_eq!(table.get(CAR_KEY).unwrap().base_travel_minutes, 25);
    assert_eq!(table.get("public").unwrap().base_travel_minutes, 45);
    assert_eq!(table.get("walk").unwrap().base_travel_minutes, 60);
    assert_eq!(table.get("taxi").unwrap().base_travel_minutes, 20);
}

#[test]
fn traffic_multiplier_applies_only_to_car() {
    let table = TransportTable::default();

    assert_eq!(table.travel_minutes("car", false), Some(25));
    assert_eq!(table.travel_minutes("car", true), Some(33));

    assert_eq!(table.travel_minutes("public", true), Some(45));
    assert_eq!(table.travel_minutes("walk", true), Some(60));
    assert_eq!(table.travel_minutes("taxi", true), Some(20));
}

#[test]
fn traffic_rounds_half_up() {
    let config = TransportTableConfig::new(vec![
        TransportOption::new("car", "Car", 5),
        TransportOption::new("car2", "Backup car", 35),
    ]);
    let table = TransportTable::from_config(&config).unwrap();

    // 5 * 1.3 = 6.5 rounds up to 7; only the car key is adjusted.
    assert_eq!(table.travel_minutes("car", true), Some(7));
    assert_eq!(table.travel_minutes("car2", true), Some(35));
}

#[test]
fn unknown_key_yields_none() {
    let table = TransportTable::default();
    assert!(table.get("teleport").is_none());
    assert!(table.travel_minutes("teleport", false).is_none());
}

#[test]
fn find_by_label_matches_display_labels() {
    let table = TransportTable::default();
    assert_eq!(table.find_by_label("Public transit").unwrap().key, "public");
    assert!(table.find_by_label("public").is_none());
}

#[test]
fn config_round_trips() {
    let table = TransportTable::default();
    let config = table.to_config();
    assert_eq!(config.options().len(), 4);

    let recreated = TransportTable::from_config(&config).unwrap();
    assert_eq!(recreated, table);
    assert_eq!(recreated.to_config(), config);
}

#[test]
fn config_serializes_through_json() {
    let config = TransportTableConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let parsed: TransportTableConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn from_config_rejects_invalid_tables() {
    let empty = TransportTableConfig::new(Vec::new());
    let err = TransportTable::from_config(&empty).unwrap_err();
    assert!(err.to_string().contains("at least one option"));

    let duplicated = TransportTableConfig::new(vec![
        TransportOption::new("car", "Car", 25),
        TransportOption::new("car", "Second car", 30),
    ]);
    let err = TransportTable::from_config(&duplicated).unwrap_err();
    assert!(err.to_string().contains("duplicate transport key 'car'"));

    let zeroed = TransportTableConfig::new(vec![TransportOption::new("walk", "Walk", 0)]);
    let err = TransportTable::from_config(&zeroed).unwrap_err();
    assert!(err.to_string().contains("non-positive base_travel_minutes"));
}
