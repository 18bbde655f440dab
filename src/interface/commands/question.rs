//! # Question Handler
//!
//! Default handler for free-form text: anything that is not a `/command` is sent to the LLM as
//! a question.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::application::sanitize::sanitize_input;
use crate::domain::traits::{Handler, LlmProvider};
use crate::domain::types::RequestContext;
use crate::strings::prompts;

pub struct QuestionHandler {
    llm: Arc<dyn LlmProvider>,
}

impl QuestionHandler {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Handler for QuestionHandler {
    async fn handle(&self, ctx: RequestContext, input: String) -> Result<String> {
        let question = sanitize_input(&input);
        let answer = self
            .llm
            .completion(
                &ctx,
                prompts::QUESTION_SYSTEM,
                &prompts::question_prompt(&question),
            )
            .await?;
        Ok(answer.trim().to_string())
    }
}
