//! Illustrative analytics handler

use axum::Json;

use crate::models::AnalyticsReport;

pub async fn report() -> Json<AnalyticsReport> {
    Json(AnalyticsReport::illustrative())
}
