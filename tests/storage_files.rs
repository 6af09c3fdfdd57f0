use chrono::NaiveDate;
use outage_calplot::grid::build_grid;
use outage_calplot::models::FacetFilter;
use outage_calplot::source::is_data_consistency;
use outage_calplot::storage::{load_observations, save_grid_csv};
use std::fs;
use tempfile::tempdir;

#[test]
fn json_and_csv_load_the_same_rows() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("obs.csv");
    let json_path = dir.path().join("obs.json");
    fs::write(
        &csv_path,
        "date,facet,quantity\n2024-03-01,VPS,5\n2024-03-01T08:30:00,VPS,3\n2024-03-02,ESPBI,\n",
    )
    .unwrap();
    fs::write(
        &json_path,
        r#"[
            {"date": "2024-03-01", "facet": "VPS", "quantity": 5},
            {"date": "2024-03-01T08:30:00", "facet": "VPS", "quantity": "3"},
            {"date": "2024-03-02", "facet": "ESPBI", "quantity": null}
        ]"#,
    )
    .unwrap();

    let from_csv = load_observations(&csv_path).unwrap();
    let from_json = load_observations(&json_path).unwrap();
    assert_eq!(from_csv, from_json);
    assert_eq!(from_csv.len(), 2);
    assert_eq!(
        from_csv[1].date,
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    );
}

#[test]
fn bad_cells_are_data_consistency_errors() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(&path, "date,facet,quantity\n2024-03-01,VPS,many\n").unwrap();
    assert!(is_data_consistency(&load_observations(&path).unwrap_err()));

    fs::write(&path, "date,facet,quantity\n01/03/2024,VPS,1\n").unwrap();
    assert!(is_data_consistency(&load_observations(&path).unwrap_err()));
}

#[test]
fn exported_grid_has_one_row_per_day() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("obs.csv");
    fs::write(&input, "date,facet,quantity\n2023-12-31,VPS,4\n").unwrap();
    let obs = load_observations(&input).unwrap();
    let grid = build_grid(&obs, &FacetFilter::All, 2023).unwrap();

    let out = dir.path().join("grid.csv");
    save_grid_csv(&grid, &out).unwrap();
    let text = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "date,week,weekday,value");
    assert_eq!(lines.len(), 1 + 365);
    // 2023-12-31 is a Sunday in week 52.
    assert!(lines.contains(&"2023-12-31,52,6,4.0"));
}
