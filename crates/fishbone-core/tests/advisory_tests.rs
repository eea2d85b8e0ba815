//! Advisory turns against a scripted advisor

use fishbone_core::{AdvisorReply, AdvisoryError, Command, Document, FishboneConfig, TurnOutcome};
use fishbone_test_utils::{commands_json, initialized_document, ScriptedAdvisor};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn reply_commands_are_applied_as_one_batch() {
    let doc = initialized_document();
    let advisor = ScriptedAdvisor::replying(
        AdvisorReply::message("Consider staffing.").with_commands(commands_json(&[
            Command::add_node_with_id("People", "people"),
            Command::add_cause(&fishbone_model::TargetRef::node("people"), "Understaffed"),
        ])),
    );

    let outcome = doc.consult(&advisor, "Why are deliveries late?").await;

    let TurnOutcome::Applied { message, report } = outcome else {
        panic!("expected applied turn");
    };
    assert_eq!(message, "Consider staffing.");
    assert!(report.committed);
    assert_eq!(report.applied(), 2);
    assert!(doc.read().node("people").is_some());
}

#[tokio::test]
async fn advisor_sees_current_context() {
    let doc = initialized_document();
    doc.apply_batch(&[Command::add_node_with_id("People", "people")]);
    let advisor = ScriptedAdvisor::replying(AdvisorReply::message("ok"));

    doc.consult(&advisor, "hello").await;

    let requests = advisor.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].message, "hello");
    assert!(requests[0].context.nodes.iter().any(|n| n.id == "people" && n.title == "People"));
}

#[tokio::test]
async fn prose_only_reply_changes_nothing() {
    let doc = initialized_document();
    let before = doc.snapshot();
    let advisor = ScriptedAdvisor::replying(AdvisorReply::message("Looks complete."));

    let outcome = doc.consult(&advisor, "review").await;

    assert!(!outcome.is_degraded());
    assert_eq!(doc.snapshot(), before);
}

#[tokio::test]
async fn advisor_error_degrades() {
    let doc = initialized_document();
    let before = doc.snapshot();
    let advisor = ScriptedAdvisor::new([Err(AdvisoryError::Unavailable("quota".to_string()))]);

    let outcome = doc.consult(&advisor, "help").await;

    assert_eq!(
        outcome,
        TurnOutcome::Degraded {
            reason: AdvisoryError::Unavailable("quota".to_string())
        }
    );
    assert_eq!(doc.snapshot(), before);
}

#[tokio::test]
async fn empty_reply_degrades() {
    let doc = initialized_document();
    let advisor = ScriptedAdvisor::replying(AdvisorReply::default());

    let outcome = doc.consult(&advisor, "help").await;

    assert_eq!(outcome, TurnOutcome::Degraded { reason: AdvisoryError::EmptyReply });
}

#[tokio::test]
async fn non_batch_commands_degrade() {
    let doc = initialized_document();
    let before = doc.snapshot();
    let advisor = ScriptedAdvisor::replying(
        AdvisorReply::message("here you go").with_commands(json!("add a node please")),
    );

    let outcome = doc.consult(&advisor, "help").await;

    assert!(matches!(
        outcome,
        TurnOutcome::Degraded { reason: AdvisoryError::UnusableReply(_) }
    ));
    assert_eq!(doc.snapshot(), before);
}

#[tokio::test]
async fn slow_advisor_times_out() {
    let mut config = FishboneConfig::default();
    config.advisory.timeout_secs = 1;
    let doc = Document::with_config("Problem", config).unwrap();
    let advisor = ScriptedAdvisor::replying(
        AdvisorReply::message("late").with_commands(commands_json(&[Command::add_node("People")])),
    )
    .with_delay(Duration::from_secs(5));

    let outcome = doc.consult(&advisor, "help").await;

    assert_eq!(outcome, TurnOutcome::Degraded { reason: AdvisoryError::Timeout { secs: 1 } });
    assert_eq!(doc.read().node_count(), 3);
}

#[tokio::test]
async fn unknown_reply_commands_are_reported() {
    let doc = initialized_document();
    let advisor = ScriptedAdvisor::replying(AdvisorReply::message("mixed").with_commands(json!([
        { "kind": "add_node", "title": "Process" },
        { "kind": "rewrite_history" }
    ])));

    let TurnOutcome::Applied { report, .. } = doc.consult(&advisor, "help").await else {
        panic!("expected applied turn");
    };

    assert_eq!(report.applied(), 1);
    assert_eq!(report.ignored.len(), 1);
}
