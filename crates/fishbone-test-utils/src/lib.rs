//! Testing utilities for the fishbone workspace
//!
//! Shared fixtures, command builders, a scripted advisor and invariant
//! assertions.

#![allow(missing_docs)]

use fishbone_core::{Advisor, AdvisorReply, AdvisoryError, AdvisoryRequest, Command, Document};
use fishbone_layout::{CategoryRequest, LayoutEngine, ProblemSeed};
use fishbone_model::{GraphStore, NodeKind, TargetRef};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;

pub const PROBLEM_TITLE: &str = "Problem: late deliveries";

pub const SIX_MS: [&str; 6] = ["People", "Process", "Machines", "Materials", "Measurement", "Environment"];

pub fn initialized_document() -> Document {
    Document::new(PROBLEM_TITLE).unwrap()
}

/// Document holding the six classic categories with ids `cat-0` .. `cat-5`
pub fn six_m_document() -> Document {
    let doc = initialized_document();
    let commands: Vec<Command> = SIX_MS
        .iter()
        .enumerate()
        .map(|(i, title)| Command::add_node_with_id(*title, format!("cat-{i}")))
        .collect();
    doc.apply_batch(&commands);
    doc
}

pub fn initialized_store() -> GraphStore {
    let engine = LayoutEngine::default();
    let mut store = GraphStore::new();
    store
        .apply_all(engine.plan_backbone(&store, ProblemSeed::new(PROBLEM_TITLE)).mutations)
        .unwrap();
    store
}

pub fn store_with_categories(count: usize) -> GraphStore {
    let engine = LayoutEngine::default();
    let mut store = initialized_store();
    for i in 0..count {
        let placement = engine
            .place_category(&store, CategoryRequest::new(format!("Category {i}")).with_id(format!("cat-{i}")))
            .unwrap();
        store.apply_all(placement.mutations).unwrap();
    }
    store
}

pub fn cause(node_id: &str, name: &str) -> Command {
    Command::add_cause(&TargetRef::node(node_id), name)
}

pub fn evidence(node_id: &str, cause_name: &str, name: &str) -> Command {
    Command::add_evidence(&TargetRef::node(node_id), cause_name, name)
}

pub fn update_title(node_id: &str, title: &str) -> Command {
    Command::UpdateNode {
        id: node_id.to_string(),
        title: Some(title.to_string()),
        description: None,
    }
}

pub fn category_ids(store: &GraphStore) -> Vec<String> {
    store.nodes_of_kind(NodeKind::Category).map(|n| n.id.clone()).collect()
}

#[track_caller]
pub fn assert_valid(store: &GraphStore) {
    let violations = LayoutEngine::default().validate(store);
    assert!(violations.is_empty(), "invariant violations: {violations:#?}");
}

/// Advisor that answers from a queue of canned replies
pub struct ScriptedAdvisor {
    replies: Mutex<VecDeque<Result<AdvisorReply, AdvisoryError>>>,
    requests: Mutex<Vec<AdvisoryRequest>>,
    delay: Option<Duration>,
}

impl ScriptedAdvisor {
    pub fn new(replies: impl IntoIterator<Item = Result<AdvisorReply, AdvisoryError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub fn replying(reply: AdvisorReply) -> Self {
        Self::new([Ok(reply)])
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<AdvisoryRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait::async_trait]
impl Advisor for ScriptedAdvisor {
    async fn advise(&self, request: AdvisoryRequest) -> Result<AdvisorReply, AdvisoryError> {
        self.requests.lock().push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(AdvisoryError::Unavailable("script exhausted".to_string())))
    }
}

pub fn commands_json(commands: &[Command]) -> serde_json::Value {
    serde_json::to_value(commands).unwrap()
}
