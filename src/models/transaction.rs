//! Transaction model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// Merchant categories offered by the form
pub const MERCHANT_CATEGORIES: &[&str] = &[
    "Groceries",
    "Electronics",
    "Clothing",
    "Restaurants",
    "Travel",
    "Utilities",
    "Healthcare",
    "Entertainment",
    "Online Subscription",
    "Financial Services",
    "Automotive",
    "Home Improvement",
    "Other",
];

const AMOUNT_MESSAGE: &str = "Please enter a valid positive amount.";
const CATEGORY_MESSAGE: &str = "Please select a merchant category.";
const HOUR_MESSAGE: &str = "Please enter a valid hour (0-23).";
const HISTORY_SCORE_MESSAGE: &str = "Please enter a valid user history score (0-100).";

/// Validation order, paired with the field names the page uses
const FIELD_ORDER: &[(&str, &str)] = &[
    ("amount", "amount"),
    ("merchant_category", "merchantCategory"),
    ("hour_of_day", "hourOfDay"),
    ("user_history_score", "userHistoryScore"),
];

/// Which transaction fields the form collects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormVariant {
    /// Amount, merchant category and hour of day
    Basic,
    /// Basic fields plus international, card-present and history score
    #[default]
    Extended,
}

impl FormVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormVariant::Basic => "basic",
            FormVariant::Extended => "extended",
        }
    }
}

impl fmt::Display for FormVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(FormVariant::Basic),
            "extended" => Ok(FormVariant::Extended),
            other => Err(format!("unknown form variant: {}", other)),
        }
    }
}

/// Field-level rejection of a submitted form
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

/// Form state exactly as the user typed it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionForm {
    pub amount: String,
    pub merchant_category: String,
    pub hour_of_day: String,
    pub is_international: bool,
    pub card_present: bool,
    pub user_history_score: String,
}

impl Default for TransactionForm {
    fn default() -> Self {
        Self {
            amount: String::new(),
            merchant_category: MERCHANT_CATEGORIES[0].to_string(),
            hour_of_day: "14".to_string(),
            is_international: false,
            card_present: true,
            user_history_score: "75".to_string(),
        }
    }
}

/// A validated transaction, ready to be assessed
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    #[validate(custom(function = "validate_amount"))]
    pub amount: f64,

    #[validate(custom(function = "validate_merchant_category"))]
    pub merchant_category: String,

    #[validate(range(max = 23, message = "Please enter a valid hour (0-23)."))]
    pub hour_of_day: u8,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_international: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_present: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(max = 100, message = "Please enter a valid user history score (0-100)."))]
    pub user_history_score: Option<u8>,
}

impl TransactionForm {
    /// Validate the raw form and build the transaction it describes.
    ///
    /// Returns the first offending field in form order. Unparseable
    /// numbers map to values the range checks reject (NaN, `u8::MAX`).
    pub fn collect(&self, variant: FormVariant) -> Result<TransactionInput, FieldError> {
        let amount = self.amount.trim().parse::<f64>().unwrap_or(f64::NAN);
        let hour_of_day = parse_small_int(&self.hour_of_day);

        let input = match variant {
            FormVariant::Basic => TransactionInput {
                amount,
                merchant_category: self.merchant_category.trim().to_string(),
                hour_of_day,
                is_international: None,
                card_present: None,
                user_history_score: None,
            },
            FormVariant::Extended => TransactionInput {
                amount,
                merchant_category: self.merchant_category.trim().to_string(),
                hour_of_day,
                is_international: Some(self.is_international),
                card_present: Some(self.card_present),
                user_history_score: Some(parse_small_int(&self.user_history_score)),
            },
        };

        input.validate().map_err(|errors| first_field_error(&errors))?;
        Ok(input)
    }
}

/// How boolean transaction flags are shown to the model and the user
pub fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

fn parse_small_int(raw: &str) -> u8 {
    raw.trim().parse::<u8>().unwrap_or(u8::MAX)
}

fn validate_amount(amount: f64) -> Result<(), ValidationError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new("amount").with_message(AMOUNT_MESSAGE.into()))
    }
}

fn validate_merchant_category(category: &str) -> Result<(), ValidationError> {
    if MERCHANT_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(ValidationError::new("merchant_category").with_message(CATEGORY_MESSAGE.into()))
    }
}

fn first_field_error(errors: &ValidationErrors) -> FieldError {
    let fields = errors.field_errors();

    FIELD_ORDER
        .iter()
        .find_map(|(key, field)| {
            let error = fields.get(*key)?.first()?;
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| fallback_message(field).to_string());
            Some(FieldError::new(field, message))
        })
        .unwrap_or_else(|| FieldError::new("form", "Please check the transaction details."))
}

fn fallback_message(field: &str) -> &'static str {
    match field {
        "amount" => AMOUNT_MESSAGE,
        "merchantCategory" => CATEGORY_MESSAGE,
        "hourOfDay" => HOUR_MESSAGE,
        _ => HISTORY_SCORE_MESSAGE,
    }
}
