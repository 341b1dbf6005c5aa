//! Prompt rendering

use std::fmt::Write;

use super::Convention;
use crate::models::{yes_no, TransactionInput};

const JSON_INSTRUCTIONS: &str = r#"Respond ONLY with a JSON object of this shape:
{
  "isFraudulent": boolean,       // true if the transaction looks fraudulent
  "confidenceScore": number,     // 0.0 (low) to 1.0 (high) confidence that the classification is correct
  "assessmentSummary": string    // at most 50 words explaining the classification
}
Do not add any other text, explanation or markdown code fences around the JSON object.
The confidenceScore must reflect how sure you are about isFraudulent given these details.
For example, a large Electronics purchase at 3 AM may be suspicious, while a small Groceries purchase at 2 PM is less so."#;

const LABELED_INSTRUCTIONS: &str = "Assess the transaction as \"Fraudulent\" or \"Legitimate\" and give a brief one-sentence reason.
If you can estimate it, also give a confidence score between 0.0 and 1.0.
Format your response STRICTLY as:
Assessment: [Fraudulent/Legitimate]
Reason: [Your one-sentence reason]
(Optional) Confidence: [Your confidence score, e.g. 0.XX]";

/// Render the instruction sent to the model for one transaction
pub fn build_prompt(input: &TransactionInput, convention: Convention) -> String {
    let mut prompt = String::from("Analyze the following credit card transaction for potential fraud.\n\n");
    prompt.push_str("Transaction Details:\n");
    prompt.push_str(&transaction_details(input));
    prompt.push('\n');

    match convention {
        Convention::Json => prompt.push_str(JSON_INSTRUCTIONS),
        Convention::Labeled => prompt.push_str(LABELED_INSTRUCTIONS),
    }
    prompt.push('\n');
    prompt
}

fn transaction_details(input: &TransactionInput) -> String {
    let mut details = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(details, "- Amount: {:.2} USD", input.amount);
    let _ = writeln!(details, "- Merchant Category: {}", input.merchant_category);
    let _ = writeln!(details, "- Hour of Day (0-23, 0 being midnight): {}", input.hour_of_day);

    if let Some(international) = input.is_international {
        let _ = writeln!(details, "- International Transaction: {}", yes_no(international));
    }
    if let Some(present) = input.card_present {
        let _ = writeln!(details, "- Card Physically Present: {}", yes_no(present));
    }
    if let Some(score) = input.user_history_score {
        let _ = writeln!(
            details,
            "- User Historical Behavior Score (0-100, lower is riskier): {}",
            score
        );
    }
    details
}
