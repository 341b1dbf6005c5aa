//! Single-page UI and the form metadata it loads on startup

use axum::{extract::State, response::Html, Json};
use serde::Serialize;

use crate::assessment::Convention;
use crate::models::{FormVariant, TransactionForm, MERCHANT_CATEGORIES};
use crate::AppState;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

const MISSING_KEY_NOTICE: &str = "The Gemini API key is not configured. Set the API_KEY environment variable and restart the server to enable assessments.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefaults {
    merchant_category: String,
    hour_of_day: String,
    is_international: bool,
    card_present: bool,
    user_history_score: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormMetadata {
    variant: FormVariant,
    convention: Convention,
    model: String,
    categories: &'static [&'static str],
    defaults: FormDefaults,
    credential_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<&'static str>,
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn form(State(state): State<AppState>) -> Json<FormMetadata> {
    let defaults = TransactionForm::default();
    let credential_configured = state.assessor.is_configured();

    Json(FormMetadata {
        variant: state.config.form_variant,
        convention: state.assessor.convention(),
        model: state.config.model.clone(),
        categories: MERCHANT_CATEGORIES,
        defaults: FormDefaults {
            merchant_category: defaults.merchant_category,
            hour_of_day: defaults.hour_of_day,
            is_international: defaults.is_international,
            card_present: defaults.card_present,
            user_history_score: defaults.user_history_score,
        },
        credential_configured,
        notice: (!credential_configured).then_some(MISSING_KEY_NOTICE),
    })
}
