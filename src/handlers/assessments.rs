//! Assessment handlers
//!
//! One form instance per server: a submission is rejected while another
//! is still waiting on the model.

use axum::{extract::State, Json};

use crate::assessment::desk::Completion;
use crate::assessment::render::ResultPanel;
use crate::assessment::AssessError;
use crate::models::TransactionForm;
use crate::error::AppError;
use crate::{AppResult, AppState};

/// Submit the form for assessment
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<TransactionForm>,
) -> AppResult<Json<ResultPanel>> {
    let transaction = form.collect(state.config.form_variant)?;

    if !state.assessor.is_configured() {
        let err = AssessError::Configuration;
        state.desk.lock().reject(err.user_message());
        tracing::warn!("Submission rejected: model API key is not configured");
        return Err(err.into());
    }

    let ticket = state.desk.lock().begin(transaction.clone())?;
    tracing::info!(
        "Assessing submission {} (${:.2}, {}, {:02}:00)",
        ticket.submission_id,
        transaction.amount,
        transaction.merchant_category,
        transaction.hour_of_day
    );

    // Detached so the ticket is completed even if the client goes away
    let worker = state.clone();
    let task = tokio::spawn(async move {
        let outcome = worker.assessor.assess(&transaction).await;

        let mut desk = worker.desk.lock();
        let completion = desk.complete(ticket, outcome.clone().map_err(|e| e.user_message()));
        (completion, outcome, desk.panel())
    });

    let (completion, outcome, panel) = match task.await {
        Ok(finished) => finished,
        Err(err) => {
            let message = format!("assessment task failed: {}", err);
            state.desk.lock().complete(ticket, Err(message.clone()));
            return Err(AppError::InternalError(message));
        }
    };

    match (completion, outcome) {
        (Completion::Discarded, _) => Ok(Json(panel)),
        (Completion::Applied, Ok(verdict)) => {
            tracing::info!(
                "Submission {} assessed: fraudulent={}",
                ticket.submission_id,
                verdict.is_fraudulent
            );
            Ok(Json(panel))
        }
        (Completion::Applied, Err(err)) => Err(err.into()),
    }
}

/// Current result panel
pub async fn current(State(state): State<AppState>) -> Json<ResultPanel> {
    Json(state.desk.lock().panel())
}

/// Clear the form: drops the transaction, verdict and error
pub async fn clear(State(state): State<AppState>) -> Json<ResultPanel> {
    let mut desk = state.desk.lock();
    desk.clear();
    tracing::debug!("Form cleared");
    Json(desk.panel())
}
