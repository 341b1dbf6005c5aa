//! Illustrative model-performance figures
//!
//! Fixed numbers shown next to every assessment. They are not derived
//! from any evaluation of the language model.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RocPoint {
    /// False positive rate
    pub fpr: f64,
    /// True positive rate
    pub tpr: f64,
}

const fn point(fpr: f64, tpr: f64) -> RocPoint {
    RocPoint { fpr, tpr }
}

pub const ROC_CURVE: [RocPoint; 9] = [
    point(0.0, 0.0),
    point(0.05, 0.2),
    point(0.1, 0.45),
    point(0.2, 0.70),
    point(0.3, 0.85),
    point(0.4, 0.92),
    point(0.5, 0.96),
    point(0.7, 0.99),
    point(1.0, 1.0),
];

pub const RANDOM_GUESS: [RocPoint; 2] = [point(0.0, 0.0), point(1.0, 1.0)];

pub const MOCK_AUC: f64 = 0.88;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub tn: u32,
    pub fp: u32,
    #[serde(rename = "fn")]
    pub fn_: u32,
    pub tp: u32,
}

impl ConfusionMatrix {
    pub fn total(&self) -> u32 {
        self.tn + self.fp + self.fn_ + self.tp
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.tp + self.tn, self.total())
    }

    pub fn precision(&self) -> f64 {
        ratio(self.tp, self.tp + self.fp)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.tp, self.tp + self.fn_)
    }
}

fn ratio(num: u32, den: u32) -> f64 {
    if den == 0 {
        return 0.0;
    }
    num as f64 / den as f64
}

pub const CONFUSION_MATRIX: ConfusionMatrix = ConfusionMatrix {
    tn: 18502,
    fp: 105,
    fn_: 38,
    tp: 355,
};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PipelineStep {
    pub title: &'static str,
    pub description: &'static str,
}

pub const PIPELINE_STEPS: [PipelineStep; 3] = [
    PipelineStep {
        title: "Data Preprocessing",
        description: "Cleaning data, handling missing values, encoding categorical features such as merchant type, and scaling numeric features such as the amount.",
    },
    PipelineStep {
        title: "Handling Imbalanced Data",
        description: "Fraudulent transactions are rare. Oversampling (SMOTE) or undersampling balances the dataset before training.",
    },
    PipelineStep {
        title: "Model Training",
        description: "Anomaly detectors (Isolation Forest, Local Outlier Factor) or classifiers such as XGBoost learn to separate fraudulent patterns.",
    },
];

/// Everything the analytics panel displays
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub roc_curve: &'static [RocPoint],
    pub random_guess: &'static [RocPoint],
    pub auc: f64,
    pub confusion_matrix: ConfusionMatrix,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub pipeline: &'static [PipelineStep],
    pub disclaimer: &'static str,
}

impl AnalyticsReport {
    pub fn illustrative() -> Self {
        Self {
            roc_curve: &ROC_CURVE,
            random_guess: &RANDOM_GUESS,
            auc: MOCK_AUC,
            confusion_matrix: CONFUSION_MATRIX,
            accuracy: CONFUSION_MATRIX.accuracy(),
            precision: CONFUSION_MATRIX.precision(),
            recall: CONFUSION_MATRIX.recall(),
            pipeline: &PIPELINE_STEPS,
            disclaimer: "Illustrative figures only. This demo asks a generative AI model for its opinion and does not run the pipeline above.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roc_curve_is_monotonic() {
        for pair in ROC_CURVE.windows(2) {
            assert!(pair[1].fpr > pair[0].fpr);
            assert!(pair[1].tpr >= pair[0].tpr);
        }
        assert_eq!(ROC_CURVE.first(), Some(&point(0.0, 0.0)));
        assert_eq!(ROC_CURVE.last(), Some(&point(1.0, 1.0)));
    }

    #[test]
    fn test_confusion_matrix_metrics() {
        assert_eq!(CONFUSION_MATRIX.total(), 19000);
        assert!((CONFUSION_MATRIX.recall() - 355.0 / 393.0).abs() < 1e-9);
        assert!((CONFUSION_MATRIX.precision() - 355.0 / 460.0).abs() < 1e-9);
        assert!(CONFUSION_MATRIX.accuracy() > 0.99);
    }

    #[test]
    fn test_report_serializes_fn_field() {
        let value = serde_json::to_value(AnalyticsReport::illustrative()).unwrap();
        assert_eq!(value["confusionMatrix"]["fn"], 38);
        assert_eq!(value["auc"], 0.88);
        assert_eq!(value["rocCurve"].as_array().map(|a| a.len()), Some(9));
    }
}
