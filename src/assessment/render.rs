//! Result panel view model
//!
//! What the page shows under the form. Exactly one of idle, loading,
//! error or result at any time.

use serde::Serialize;
use uuid::Uuid;

use super::desk::DeskState;
use crate::models::{yes_no, FraudVerdict, TransactionInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Fraudulent,
    Legitimate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerdictView {
    pub tone: Tone,
    pub headline: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_percent: Option<String>,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ResultPanel {
    Idle,
    #[serde(rename_all = "camelCase")]
    Loading { submission_id: Uuid },
    Error { message: String },
    #[serde(rename_all = "camelCase")]
    Result {
        submission_id: Uuid,
        verdict: VerdictView,
        transaction: Vec<DetailRow>,
    },
}

impl ResultPanel {
    pub fn from_state(state: &DeskState) -> Self {
        match state {
            DeskState::Idle => ResultPanel::Idle,
            DeskState::Loading { ticket, .. } => ResultPanel::Loading {
                submission_id: ticket.submission_id,
            },
            DeskState::Failed { message } => ResultPanel::Error {
                message: message.clone(),
            },
            DeskState::Assessed {
                submission_id,
                transaction,
                verdict,
            } => ResultPanel::Result {
                submission_id: *submission_id,
                verdict: VerdictView::from(verdict),
                transaction: detail_rows(transaction),
            },
        }
    }
}

impl From<&FraudVerdict> for VerdictView {
    fn from(verdict: &FraudVerdict) -> Self {
        let (tone, headline) = if verdict.is_fraudulent {
            (Tone::Fraudulent, "Potentially Fraudulent")
        } else {
            (Tone::Legitimate, "Likely Not Fraudulent")
        };

        Self {
            tone,
            headline,
            confidence_percent: verdict.confidence_percent(),
            explanation: verdict.summary.clone(),
        }
    }
}

/// Echo of the submitted fields, in form order
pub fn detail_rows(transaction: &TransactionInput) -> Vec<DetailRow> {
    let mut rows = vec![
        row("Amount", format!("${:.2}", transaction.amount)),
        row("Merchant Category", transaction.merchant_category.clone()),
        row("Hour of Day", format!("{:02}:00", transaction.hour_of_day)),
    ];

    if let Some(international) = transaction.is_international {
        rows.push(row("International", yes_no(international).to_string()));
    }
    if let Some(present) = transaction.card_present {
        rows.push(row("Card Present", yes_no(present).to_string()));
    }
    if let Some(score) = transaction.user_history_score {
        rows.push(row("User History Score", score.to_string()));
    }
    rows
}

fn row(label: &'static str, value: String) -> DetailRow {
    DetailRow { label, value }
}
