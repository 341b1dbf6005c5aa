//! Assessment service: prompt, call, parse

use std::sync::Arc;

use super::gateway::ModelGateway;
use super::prompt::build_prompt;
use super::{AssessError, Convention};
use crate::models::{FraudVerdict, TransactionInput};

#[derive(Clone)]
pub struct Assessor {
    gateway: Arc<dyn ModelGateway>,
    convention: Convention,
}

impl Assessor {
    pub fn new(gateway: Arc<dyn ModelGateway>, convention: Convention) -> Self {
        Self { gateway, convention }
    }

    pub fn convention(&self) -> Convention {
        self.convention
    }

    pub fn is_configured(&self) -> bool {
        self.gateway.is_configured()
    }

    /// Run one transaction through the model and parse its reply
    pub async fn assess(&self, transaction: &TransactionInput) -> Result<FraudVerdict, AssessError> {
        if !self.gateway.is_configured() {
            return Err(AssessError::Configuration);
        }

        let prompt = build_prompt(transaction, self.convention);
        tracing::debug!("Prompt ({} convention):\n{}", self.convention, prompt);

        let reply = self.gateway.complete(&self.convention.request(prompt)).await?;
        tracing::debug!("Model reply: {}", reply);

        self.convention.parser().parse(&reply)
    }
}
