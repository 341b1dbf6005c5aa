//! Best-effort labeled-line reply parser
//!
//! Looks for `Assessment:`, `Reason:` and `Confidence:` lines. When the
//! reply has no `Assessment:` line at all, the whole text is searched for
//! "fraudulent" / "legitimate" and becomes the explanation verbatim, which
//! can make for long or messy explanations.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ResponseParser;
use crate::assessment::AssessError;
use crate::models::FraudVerdict;

pub const DEFAULT_REASON: &str = "Could not determine reason.";

static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?").expect("number pattern is valid")
});

#[derive(Debug, Clone, Copy, Default)]
pub struct LabeledLineParser;

impl ResponseParser for LabeledLineParser {
    fn parse(&self, reply: &str) -> Result<FraudVerdict, AssessError> {
        let assessment = find_labeled(reply, "assessment:");

        let mut is_fraudulent = assessment
            .map(|value| value.eq_ignore_ascii_case("fraudulent"))
            .unwrap_or(false);

        let mut summary = find_labeled(reply, "reason:")
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_REASON.to_string());

        let confidence_score = find_labeled(reply, "confidence:")
            .and_then(leading_number)
            .filter(|score| (0.0..=1.0).contains(score));

        if assessment.is_none() {
            let lowered = reply.to_lowercase();
            if lowered.contains("fraudulent") {
                is_fraudulent = true;
                summary = reply.to_string();
            } else if lowered.contains("legitimate") {
                is_fraudulent = false;
                summary = reply.to_string();
            }
        }

        Ok(FraudVerdict {
            is_fraudulent,
            confidence_score,
            summary,
        })
    }
}

/// Trimmed value of the first line starting with `label` (ASCII, any case)
fn find_labeled<'a>(reply: &'a str, label: &str) -> Option<&'a str> {
    reply.lines().map(str::trim).find_map(|line| {
        let prefix = line.get(..label.len())?;
        if prefix.eq_ignore_ascii_case(label) {
            line.get(label.len()..).map(str::trim)
        } else {
            None
        }
    })
}

/// Lenient float parse: the longest numeric prefix, trailing text ignored
fn leading_number(value: &str) -> Option<f64> {
    LEADING_NUMBER
        .find(value)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}
