//! Verdict model

use serde::Serialize;

/// Fraud / not-fraud outcome parsed from a model reply
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudVerdict {
    pub is_fraudulent: bool,
    /// 0.0 to 1.0, absent when the reply carried none
    pub confidence_score: Option<f64>,
    /// Assessment summary or one-sentence reason
    pub summary: String,
}

impl FraudVerdict {
    /// Confidence as a percentage with one decimal place, e.g. `92.0%`
    pub fn confidence_percent(&self) -> Option<String> {
        self.confidence_score.map(|score| format!("{:.1}%", score * 100.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_percent() {
        let verdict = FraudVerdict {
            is_fraudulent: true,
            confidence_score: Some(0.92),
            summary: String::new(),
        };
        assert_eq!(verdict.confidence_percent().as_deref(), Some("92.0%"));

        let verdict = FraudVerdict { confidence_score: Some(0.8126), ..verdict };
        assert_eq!(verdict.confidence_percent().as_deref(), Some("81.3%"));

        let verdict = FraudVerdict { confidence_score: None, ..verdict };
        assert!(verdict.confidence_percent().is_none());
    }
}
