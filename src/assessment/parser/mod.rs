//! Reply parsing strategies
//!
//! One strategy per [`Convention`](super::Convention): [`JsonParser`]
//! rejects anything that is not the agreed object, [`LabeledLineParser`]
//! always produces a best-effort verdict.

mod json;
mod labeled;

pub use json::JsonParser;
pub use labeled::LabeledLineParser;

use super::AssessError;
use crate::models::FraudVerdict;

pub trait ResponseParser: Send + Sync {
    /// Extract a verdict from the raw reply text
    fn parse(&self, reply: &str) -> Result<FraudVerdict, AssessError>;
}
