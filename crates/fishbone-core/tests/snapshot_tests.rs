//! Export/import through the document handle

use fishbone_core::{Command, Document, FishboneConfig, FishboneError};
use fishbone_model::{FormatError, InvariantViolation, TargetRef};
use fishbone_test_utils::{assert_valid, cause, evidence, initialized_document, six_m_document};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[test]
fn export_then_import_is_lossless() {
    let source = six_m_document();
    source.apply_batch(&[
        cause("cat-0", "Fatigue"),
        evidence("cat-0", "fatigue", "Overtime report"),
        Command::connect("cat-0", "cat-1", Some("feeds".to_string())),
    ]);
    let json = source.export_json().unwrap();

    let target = Document::empty(FishboneConfig::default()).unwrap();
    let metadata = target.import_json(&json).unwrap().unwrap();

    assert_eq!(target.snapshot(), source.snapshot());
    assert_eq!(metadata.app_name, "Fishbone Analyzer");
    assert_eq!(metadata.version, "1.0");
    assert_valid(&target.read());
}

#[test]
fn export_carries_configured_header() {
    let mut config = FishboneConfig::default();
    config.snapshot.app_name = "Line 4 RCA".to_string();
    let doc = Document::with_config("Problem", config).unwrap();

    let value: Value = serde_json::from_str(&doc.export_json().unwrap()).unwrap();

    assert_eq!(value["metadata"]["appName"], "Line 4 RCA");
    assert!(value["metadata"]["timestamp"].is_string());
    assert_eq!(value["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(value["edges"].as_array().unwrap().len(), 2);
}

#[test]
fn rejected_import_leaves_document_untouched() {
    let doc = six_m_document();
    let before = doc.snapshot();

    for payload in [
        "not json",
        r#"{"nodes": []}"#,
        r#"{"nodes": [], "edges": {}}"#,
        r#"{"nodes": [], "edges": [{"id": "e", "source": "x", "target": "y", "style": "rib"}]}"#,
    ] {
        let err = doc.import_json(payload).unwrap_err();
        assert!(matches!(err, FishboneError::Format(_)), "{payload}: {err}");
        assert!(err.is_input_error());
    }

    assert_eq!(doc.snapshot(), before);
}

#[test]
fn missing_field_names_the_field() {
    let doc = initialized_document();
    let err = doc.import_json(r#"{"edges": []}"#).unwrap_err();
    assert!(matches!(err, FishboneError::Format(FormatError::MissingField("nodes"))));
}

#[test]
fn deleters_follow_imported_content() {
    let source = six_m_document();
    let json = source.export_json().unwrap();

    let doc = initialized_document();
    doc.import_json(&json).unwrap();

    let deleter = doc.deleter("cat-3").unwrap();
    assert!(deleter.delete());
    assert!(doc.read().node("cat-3").is_none());
}

#[test]
fn imported_document_accepts_further_edits() {
    let source = six_m_document();
    let doc = Document::empty(FishboneConfig::default()).unwrap();
    doc.import_json(&source.export_json().unwrap()).unwrap();

    let report = doc.apply_batch(&[
        Command::add_node_with_id("Money", "money"),
        Command::add_cause(&TargetRef::node("money"), "Budget cut"),
    ]);

    assert_eq!(report.applied(), 2);
    assert_valid(&doc.read());
}

#[test]
fn colliding_causes_import_but_are_reported() {
    let mut value: Value = serde_json::from_str(&six_m_document().export_json().unwrap()).unwrap();
    let node = value["nodes"]
        .as_array_mut()
        .unwrap()
        .iter_mut()
        .find(|n| n["id"] == "cat-0")
        .unwrap();
    node["causes"] = json!([
        { "id": "x", "name": "Fatigue", "evidence": [] },
        { "id": "x", "name": "fatigue", "evidence": [] }
    ]);

    let doc = Document::empty(FishboneConfig::default()).unwrap();
    doc.import_json(&value.to_string()).unwrap();

    assert_eq!(doc.read().causes(&TargetRef::node("cat-0")).unwrap().len(), 2);
    assert_eq!(
        doc.validate(),
        vec![
            InvariantViolation::DuplicateCauseId {
                target: TargetRef::node("cat-0"),
                cause: "x".to_string(),
            },
            InvariantViolation::DuplicateCauseName {
                target: TargetRef::node("cat-0"),
                name: "fatigue".to_string(),
            },
        ]
    );
}
