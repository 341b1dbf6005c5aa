//! Strict JSON reply parser

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::ResponseParser;
use crate::assessment::AssessError;
use crate::models::FraudVerdict;

/// Fenced code block: opening fence, optional language tag, body, closing fence
static FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```(\w*)?\s*\n?(.*?)\n?\s*```$").expect("fence pattern is valid")
});

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl ResponseParser for JsonParser {
    fn parse(&self, reply: &str) -> Result<FraudVerdict, AssessError> {
        let body = strip_fence(reply.trim());

        let value: Value = serde_json::from_str(body)
            .map_err(|e| AssessError::MalformedResponse(format!("invalid JSON: {}", e)))?;

        let is_fraudulent = value
            .get("isFraudulent")
            .and_then(Value::as_bool)
            .ok_or_else(|| malformed("isFraudulent must be a boolean"))?;

        let confidence_score = value
            .get("confidenceScore")
            .and_then(Value::as_f64)
            .filter(|score| (0.0..=1.0).contains(score))
            .ok_or_else(|| malformed("confidenceScore must be a number between 0 and 1"))?;

        let summary = value
            .get("assessmentSummary")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("assessmentSummary must be a string"))?;

        Ok(FraudVerdict {
            is_fraudulent,
            confidence_score: Some(confidence_score),
            summary: summary.to_string(),
        })
    }
}

fn strip_fence(text: &str) -> &str {
    FENCE
        .captures(text)
        .and_then(|caps| caps.get(2))
        .map(|inner| inner.as_str())
        .filter(|inner| !inner.is_empty())
        .map(str::trim)
        .unwrap_or(text)
}

fn malformed(reason: &str) -> AssessError {
    AssessError::MalformedResponse(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str =
        r#"{"isFraudulent":true,"confidenceScore":0.92,"assessmentSummary":"High amount at unusual hour."}"#;

    fn expected() -> FraudVerdict {
        FraudVerdict {
            is_fraudulent: true,
            confidence_score: Some(0.92),
            summary: "High amount at unusual hour.".to_string(),
        }
    }

    #[test]
    fn test_plain_payload() {
        assert_eq!(JsonParser.parse(PAYLOAD).unwrap(), expected());
    }

    #[test]
    fn test_fenced_payload() {
        let fenced = format!("```json\n{}\n```", PAYLOAD);
        assert_eq!(JsonParser.parse(&fenced).unwrap(), expected());

        let untagged = format!("  ```\n{}\n```  \n", PAYLOAD);
        assert_eq!(JsonParser.parse(&untagged).unwrap(), expected());

        let inline = format!("```json {}```", PAYLOAD);
        assert_eq!(JsonParser.parse(&inline).unwrap(), expected());
    }

    #[test]
    fn test_missing_summary() {
        let reply = r#"{"isFraudulent":true,"confidenceScore":0.92}"#;
        let err = JsonParser.parse(reply).unwrap_err();
        assert!(matches!(err, AssessError::MalformedResponse(_)));
    }

    #[test]
    fn test_rejects_wrong_types_and_ranges() {
        let replies = [
            r#"{"isFraudulent":"yes","confidenceScore":0.5,"assessmentSummary":"x"}"#,
            r#"{"isFraudulent":false,"confidenceScore":1.5,"assessmentSummary":"x"}"#,
            r#"{"isFraudulent":false,"confidenceScore":-0.1,"assessmentSummary":"x"}"#,
            r#"{"isFraudulent":false,"confidenceScore":"0.5","assessmentSummary":"x"}"#,
            r#"{"isFraudulent":false,"confidenceScore":0.5,"assessmentSummary":42}"#,
            "Assessment: Fraudulent",
            "",
            "[]",
        ];
        for reply in replies {
            assert!(
                matches!(JsonParser.parse(reply), Err(AssessError::MalformedResponse(_))),
                "reply {:?} should be rejected",
                reply
            );
        }
    }

    #[test]
    fn test_confidence_bounds_inclusive() {
        let reply = r#"{"isFraudulent":false,"confidenceScore":0,"assessmentSummary":"Routine."}"#;
        let verdict = JsonParser.parse(reply).unwrap();
        assert_eq!(verdict.confidence_score, Some(0.0));
        assert!(!verdict.is_fraudulent);

        let reply = r#"{"isFraudulent":true,"confidenceScore":1,"assessmentSummary":"Certain."}"#;
        assert_eq!(JsonParser.parse(reply).unwrap().confidence_score, Some(1.0));
    }
}
