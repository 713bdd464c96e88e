mod common;

use safety_scope::{
    analysis::analyze,
    config::AnalysisConfig,
    data::{self, RawRating},
    output::{JsonFileSink, ReportSink},
};

#[test]
fn json_source_reads_joined_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("locations.json");
    std::fs::write(
        &path,
        r#"[
            {"id": 1, "location_name": "Park", "description": "well lit", "surrounding": null,
             "rating": 4, "latitude": 12.9, "longitude": 77.6, "created_by": 2,
             "created_at": "2024-01-05 10:00:00", "reporter_name": "Meera"},
            {"id": 2, "location_name": "Underpass", "rating": "1"}
        ]"#,
    )
    .unwrap();

    let source = data::open_source(&path);
    let rows = data::fetch_locations(source.as_ref());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].reporter_name.as_deref(), Some("Meera"));
    assert_eq!(rows[1].reporter_name, None);
    assert_eq!(rows[1].rating, Some(RawRating::Text("1".into())));
}

#[test]
fn json_source_keeps_rows_with_string_coordinates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("locations.json");
    std::fs::write(
        &path,
        r#"[
            {"id": 1, "location_name": "Bus Stand", "rating": 4, "latitude": "12.97", "longitude": "77.59"},
            {"id": 2, "location_name": "Flyover", "rating": 2, "latitude": 12.9, "longitude": 77.6},
            {"id": "three", "location_name": "Subway", "rating": 5}
        ]"#,
    )
    .unwrap();

    let rows = data::fetch_locations(data::open_source(&path).as_ref());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].latitude, Some(12.97));
    assert_eq!(rows[0].longitude, Some(77.59));

    let report = analyze(rows, &AnalysisConfig::default()).unwrap();
    assert!(report.is_success());
    assert_eq!(report.total_locations, 2);
}

#[test]
fn unsupported_extension_reads_as_empty_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("locations.xlsx");
    std::fs::write(&path, "not a table").unwrap();

    let rows = data::fetch_locations(data::open_source(&path).as_ref());
    assert!(rows.is_empty());
    let report = analyze(rows, &AnalysisConfig::default()).unwrap();
    assert_eq!(report.message.as_deref(), Some("No location data available"));
}

#[test]
fn csv_source_treats_empty_cells_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("locations.csv");
    std::fs::write(
        &path,
        "id,location_name,description,surrounding,rating,latitude,longitude,created_by,created_at,reporter_name\n\
         1,Park,well lit,,4,12.9,77.6,2,2024-01-05,Meera\n\
         2,Underpass,,,bad,,,,,\n",
    )
    .unwrap();

    let source = data::open_source(&path);
    let rows = data::fetch_locations(source.as_ref());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].surrounding, None);
    assert_eq!(rows[0].latitude, Some(12.9));
    assert_eq!(rows[0].rating.as_ref().and_then(RawRating::parse), Some(4.0));
    assert_eq!(rows[1].rating.as_ref().and_then(RawRating::parse), None);
    assert_eq!(rows[1].latitude, None);
}

#[test]
fn malformed_json_degrades_to_empty_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("locations.json");
    std::fs::write(&path, "{ not json").unwrap();
    let source = data::open_source(&path);
    assert!(data::fetch_locations(source.as_ref()).is_empty());
}

#[test]
fn sink_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("public").join("nested").join("report.json");
    let report = analyze(common::ten_locations(), &AnalysisConfig::default()).unwrap();

    JsonFileSink::new(&path).write(&report).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["status"], "success");
    assert_eq!(written["total_locations"], 10);
    assert_eq!(written["predictions"].as_array().map(Vec::len), Some(10));
    let first = &written["predictions"][0];
    for key in [
        "id",
        "location_name",
        "description",
        "surrounding",
        "actual_rating",
        "safety_score",
        "predicted_label",
        "latitude",
        "longitude",
        "reporter_name",
        "created_at",
    ] {
        assert!(first.get(key).is_some(), "missing {key}");
    }
}
