//! Advisory collaborator boundary
//!
//! An [`Advisor`] receives the user's message plus a content-only
//! [`GraphContext`] and answers with prose and an optional command batch.
//! How it reaches its answer (prompting, transport) is its own business.

use crate::error::AdvisoryError;
use crate::interpreter::CommandReport;
use crate::{ChangeLog, IgnoredCommand};
use fishbone_model::GraphContext;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the advisor is asked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryRequest {
    /// User message
    pub message: String,
    /// Current document content
    pub context: GraphContext,
}

/// What the advisor answers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvisorReply {
    /// Prose shown to the user
    #[serde(default)]
    pub message: String,
    /// Raw command batch; `null` when the advisor proposes no edits
    #[serde(default)]
    pub commands: Value,
}

impl AdvisorReply {
    /// Reply with prose only
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            commands: Value::Null,
        }
    }

    /// With commands
    #[inline]
    #[must_use]
    pub fn with_commands(mut self, commands: Value) -> Self {
        self.commands = commands;
        self
    }
}

/// External advisory process
#[async_trait::async_trait]
pub trait Advisor: Send + Sync {
    /// Answer one turn
    async fn advise(&self, request: AdvisoryRequest) -> Result<AdvisorReply, AdvisoryError>;
}

/// Batch result as the caller sees it
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    /// One report per decoded command
    pub reports: Vec<CommandReport>,
    /// One line per applied command
    pub log: ChangeLog,
    /// Entries that never became commands
    pub ignored: Vec<IgnoredCommand>,
    /// Whether the working copy replaced the document
    pub committed: bool,
}

impl BatchReport {
    /// Number of applied commands
    #[must_use]
    pub fn applied(&self) -> usize {
        self.reports.iter().filter(|r| r.is_applied()).count()
    }
}

/// Result of one advisory turn
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Reply received; its commands (possibly none) were applied as one batch
    Applied {
        /// Advisor prose
        message: String,
        /// Batch result
        report: BatchReport,
    },
    /// Nothing usable came back; the document is untouched
    Degraded {
        /// What went wrong
        reason: AdvisoryError,
    },
}

impl TurnOutcome {
    /// Whether the turn degraded
    #[inline]
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}
