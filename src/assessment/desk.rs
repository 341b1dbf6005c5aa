//! Submission state for the single form instance
//!
//! Holds at most one transaction and one verdict. A new submission
//! replaces both before its request starts; an error holds no verdict.
//! Only one request may be outstanding.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use super::render::ResultPanel;
use crate::models::{FraudVerdict, TransactionInput};

/// What to do with a reply that answers a superseded submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalenessPolicy {
    /// Drop replies whose ticket is not the latest one issued
    #[default]
    Discard,
    /// Apply every reply as it arrives; last one wins
    Apply,
}

impl fmt::Display for StalenessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StalenessPolicy::Discard => f.write_str("discard"),
            StalenessPolicy::Apply => f.write_str("apply"),
        }
    }
}

impl FromStr for StalenessPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discard" => Ok(StalenessPolicy::Discard),
            "apply" => Ok(StalenessPolicy::Apply),
            other => Err(format!("unknown staleness policy: {}", other)),
        }
    }
}

/// Handle for one outstanding request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub sequence: u64,
    pub submission_id: Uuid,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeskState {
    Idle,
    Loading {
        ticket: Ticket,
        transaction: TransactionInput,
    },
    Failed {
        message: String,
    },
    Assessed {
        submission_id: Uuid,
        transaction: TransactionInput,
        verdict: FraudVerdict,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("An assessment is already in progress.")]
pub struct SubmissionInProgress;

/// Outcome of handing a reply to the desk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Discarded,
}

pub struct AssessmentDesk {
    state: DeskState,
    /// Sequence of the most recently issued ticket, bumped on clear too
    latest: u64,
    policy: StalenessPolicy,
}

impl AssessmentDesk {
    pub fn new(policy: StalenessPolicy) -> Self {
        Self {
            state: DeskState::Idle,
            latest: 0,
            policy,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, DeskState::Loading { .. })
    }

    /// Start a submission. Clears any previous verdict or error.
    pub fn begin(&mut self, transaction: TransactionInput) -> Result<Ticket, SubmissionInProgress> {
        if self.is_loading() {
            return Err(SubmissionInProgress);
        }

        self.latest += 1;
        let ticket = Ticket {
            sequence: self.latest,
            submission_id: Uuid::new_v4(),
        };
        self.state = DeskState::Loading { ticket, transaction };
        Ok(ticket)
    }

    /// Apply the reply for `ticket`
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<FraudVerdict, String>) -> Completion {
        if ticket.sequence != self.latest && self.policy == StalenessPolicy::Discard {
            tracing::warn!(
                "Discarding reply for superseded submission {} (#{}, latest #{})",
                ticket.submission_id,
                ticket.sequence,
                self.latest
            );
            return Completion::Discarded;
        }

        let transaction = match std::mem::replace(&mut self.state, DeskState::Idle) {
            DeskState::Loading { transaction, .. } | DeskState::Assessed { transaction, .. } => {
                Some(transaction)
            }
            DeskState::Idle | DeskState::Failed { .. } => None,
        };

        self.state = match (outcome, transaction) {
            (Ok(verdict), Some(transaction)) => DeskState::Assessed {
                submission_id: ticket.submission_id,
                transaction,
                verdict,
            },
            (Ok(_), None) => {
                tracing::warn!("Reply for submission {} arrived after the form was cleared", ticket.submission_id);
                DeskState::Idle
            }
            (Err(message), _) => DeskState::Failed { message },
        };
        Completion::Applied
    }

    /// Record an error raised before any request was issued
    pub fn reject(&mut self, message: impl Into<String>) {
        self.state = DeskState::Failed { message: message.into() };
    }

    /// Forget the transaction, verdict and error; supersedes any outstanding ticket
    pub fn clear(&mut self) {
        self.latest += 1;
        self.state = DeskState::Idle;
    }

    pub fn panel(&self) -> ResultPanel {
        ResultPanel::from_state(&self.state)
    }
}
