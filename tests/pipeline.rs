mod common;

use common::{location, ten_locations};
use safety_scope::{
    analysis::{analyze, fallback::FALLBACK_NOTE, ReportStatus, SafetyLabel},
    config::AnalysisConfig,
    data::{LocationRecord, RawRating},
    error::{AnalysisError, ClassifierError, FeatureError},
};

#[test]
fn empty_dataset_reports_error_without_predictions() {
    let report = analyze(Vec::new(), &AnalysisConfig::default()).unwrap();
    assert_eq!(report.status, ReportStatus::Error);
    assert!(report.predictions.is_empty());
    assert_eq!(report.message.as_deref(), Some("No location data available"));
}

#[test]
fn two_rows_use_rating_rule() {
    let records = vec![
        location(1, "Night Market", "dark lanes", 5.0),
        location(2, "Bus Stop", "isolated at night", 2.0),
    ];
    let report = analyze(records, &AnalysisConfig::default()).unwrap();

    assert_eq!(report.status, ReportStatus::Success);
    let scores: Vec<f64> = report.predictions.iter().map(|p| p.safety_score).collect();
    let labels: Vec<SafetyLabel> = report.predictions.iter().map(|p| p.predicted_label).collect();
    assert_eq!(scores, vec![0.4, 1.0]);
    assert_eq!(labels, vec![SafetyLabel::Unsafe, SafetyLabel::Safe]);
    assert!(report.risk_factors.is_empty());
    assert_eq!(report.note.as_deref(), Some(FALLBACK_NOTE));
    assert_eq!(report.overall_rating, Some(3.5));
}

#[test]
fn unparsable_ratings_are_dropped_everywhere() {
    let mut missing = location(4, "Depot", "no rating given", 1.0);
    missing.rating = None;
    let records = vec![
        location(1, "Square", "busy", 4.0),
        location(2, "Alley", "dark", "not a number"),
        location(3, "Gate", "guarded", "3"),
        missing,
    ];
    let report = analyze(records, &AnalysisConfig::default()).unwrap();

    assert_eq!(report.total_locations, 2);
    assert_eq!(report.safe_locations + report.unsafe_locations, 2);
    assert_eq!(report.overall_rating, Some(3.5));
    let ids: Vec<Option<i64>> = report.predictions.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![Some(3), Some(1)]);
}

#[test]
fn non_empty_input_with_no_valid_rating_is_still_a_success() {
    let records = vec![location(1, "Square", "busy", "n/a")];
    let report = analyze(records, &AnalysisConfig::default()).unwrap();
    assert_eq!(report.status, ReportStatus::Success);
    assert_eq!(report.total_locations, 0);
    assert_eq!(report.overall_rating, None);
    assert_eq!(report.note.as_deref(), Some(FALLBACK_NOTE));
}

#[test]
fn trained_path_scores_labels_and_ranks() {
    let report = analyze(ten_locations(), &AnalysisConfig::default()).unwrap();

    assert_eq!(report.status, ReportStatus::Success);
    assert_eq!(report.total_locations, 10);
    assert_eq!(report.safe_locations + report.unsafe_locations, 10);
    assert!(report.note.is_none());
    assert_eq!(report.risk_factors.len(), 5);

    for pair in report.predictions.windows(2) {
        assert!(pair[0].safety_score <= pair[1].safety_score);
    }
    for prediction in &report.predictions {
        assert!((0.0..=1.0).contains(&prediction.safety_score));
        assert_eq!(
            prediction.predicted_label,
            SafetyLabel::at_or_above(prediction.safety_score, 0.5)
        );
    }

    let mean = (4.0 + 1.0 + 5.0 + 2.0 + 4.0 + 1.0 + 5.0 + 2.0 + 3.0 + 1.0) / 10.0;
    assert!((report.overall_rating.unwrap() - mean).abs() < 1e-12);
}

#[test]
fn trained_path_is_deterministic() {
    let config = AnalysisConfig::default();
    let first = analyze(ten_locations(), &config).unwrap();
    let second = analyze(ten_locations(), &config).unwrap();
    assert_eq!(first.predictions, second.predictions);
    assert_eq!(first.risk_factors, second.risk_factors);
}

#[test]
fn display_fields_pass_through_unchanged() {
    let records = ten_locations();
    let report = analyze(records.clone(), &AnalysisConfig::default()).unwrap();
    for prediction in &report.predictions {
        let source: &LocationRecord = records
            .iter()
            .find(|r| r.id == prediction.id)
            .expect("prediction maps back to a record");
        assert_eq!(prediction.location_name, source.location_name);
        assert_eq!(prediction.latitude, source.latitude);
        assert_eq!(prediction.reporter_name, source.reporter_name);
        assert_eq!(prediction.created_at, source.created_at);
        assert_eq!(
            Some(prediction.actual_rating),
            source.rating.as_ref().and_then(RawRating::parse)
        );
    }
}

#[test]
fn single_class_training_set_is_fatal() {
    let records = vec![
        location(1, "Park", "families", 4.0),
        location(2, "Mall", "guards", 5.0),
        location(3, "Campus", "patrol", 3.0),
    ];
    let err = analyze(records, &AnalysisConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Classifier(ClassifierError::SingleClass { class: 1 })
    ));
}

#[test]
fn stop_word_only_corpus_is_fatal() {
    let records = vec![
        location(1, "the", "and of", 1.0),
        location(2, "it", "is", 4.0),
        location(3, "a", "an", 5.0),
    ];
    let err = analyze(records, &AnalysisConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Features(FeatureError::EmptyVocabulary)
    ));
}

#[test]
fn empty_text_rows_still_train_on_the_sentinel() {
    let mut records = ten_locations();
    records.push(LocationRecord {
        id: Some(11),
        rating: Some(RawRating::Number(2.0)),
        ..LocationRecord::default()
    });
    let report = analyze(records, &AnalysisConfig::default()).unwrap();
    assert_eq!(report.total_locations, 11);
    assert!(report.predictions.iter().any(|p| p.id == Some(11)));
}
