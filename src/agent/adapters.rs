use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::client::{AIClient, ChatCompletionRequest, ChatMessage, DynLlmClient, ResponseFormat};
use crate::config::{Config, ModelSettings};
use crate::contract::{self, CodeOutput, CodingPlan, OutputContract};
use crate::error::PipelineError;
use crate::tokens::completion_budget;

use super::stages::{CODER, PLANNER, REVIEWER, StageAgent};

#[async_trait]
pub trait PlanningAdapter: Send + Sync {
    async fn plan(&self, problem: &str) -> Result<CodingPlan, PipelineError>;
}

#[async_trait]
pub trait CodingAdapter: Send + Sync {
    async fn code(&self, input: &str) -> Result<CodeOutput, PipelineError>;
}

#[async_trait]
pub trait ReviewAdapter: Send + Sync {
    async fn review(&self, code: &str) -> Result<String, PipelineError>;
}

/// What a stage agent produced, typed by its contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentOutput {
    Plan(CodingPlan),
    Code(CodeOutput),
    Text(String),
}

/// Runs stage agents against one configured model endpoint.
///
/// Every invocation is exactly one chat-completions round trip. The adapter
/// holds no per-session state and can be shared between sessions.
#[derive(Clone)]
pub struct ModelAdapter {
    client: Arc<DynLlmClient>,
    settings: ModelSettings,
}

impl ModelAdapter {
    pub fn new(client: Arc<DynLlmClient>, settings: ModelSettings) -> Self {
        Self { client, settings }
    }

    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        let client = AIClient::new(&config.llm)?;
        Ok(Self::new(Arc::new(client), config.models.clone()))
    }

    pub fn build_request(&self, agent: &StageAgent, input: &str) -> ChatCompletionRequest {
        let messages = vec![
            ChatMessage::system(agent.instructions),
            ChatMessage::user(input),
        ];
        let max_tokens = completion_budget(self.settings.max_tokens, &messages);

        let response_format = agent
            .contract
            .filter(|_| self.settings.structured_output)
            .map(|contract| ResponseFormat::json_schema(contract.name(), contract.json_schema()));

        ChatCompletionRequest {
            model: self.settings.model.clone(),
            messages,
            max_tokens: Some(max_tokens),
            temperature: Some(self.settings.temperature),
            response_format,
        }
    }

    pub async fn invoke(&self, agent: &StageAgent, input: &str) -> Result<AgentOutput, PipelineError> {
        let request = self.build_request(agent, input);
        let budget = request.max_tokens;
        debug!(agent = agent.name, input_len = input.len(), "invoking stage agent");

        let response = self.client.chat_completion(request).await?;
        let Some(choice) = response.choices.first() else {
            return Err(PipelineError::transport(format!(
                "{} returned no choices",
                agent.name
            )));
        };

        if choice.was_truncated() {
            let limit = budget.map_or_else(|| "completion".to_string(), |n| format!("{n}-token"));
            if agent.contract.is_some() {
                return Err(PipelineError::transport(format!(
                    "{} response was cut off at the {limit} limit before the JSON was complete",
                    agent.name
                )));
            }
            warn!(agent = agent.name, "response was cut off at the {limit} limit");
        }

        let text = response.first_text().ok_or_else(|| {
            PipelineError::transport(format!("{} returned an empty response", agent.name))
        })?;

        match agent.contract {
            Some(OutputContract::CodingPlan) => contract::parse_coding_plan(text).map(AgentOutput::Plan),
            Some(OutputContract::CodeOutput) => contract::parse_code_output(text).map(AgentOutput::Code),
            None => Ok(AgentOutput::Text(text.to_string())),
        }
    }
}

fn unexpected(contract: OutputContract, output: &AgentOutput) -> PipelineError {
    PipelineError::schema(
        contract.name(),
        format!("stage produced an unexpected output shape: {output:?}"),
    )
}

#[async_trait]
impl PlanningAdapter for ModelAdapter {
    async fn plan(&self, problem: &str) -> Result<CodingPlan, PipelineError> {
        match self.invoke(&PLANNER, problem).await? {
            AgentOutput::Plan(plan) => Ok(plan),
            other => Err(unexpected(OutputContract::CodingPlan, &other)),
        }
    }
}

#[async_trait]
impl CodingAdapter for ModelAdapter {
    async fn code(&self, input: &str) -> Result<CodeOutput, PipelineError> {
        match self.invoke(&CODER, input).await? {
            AgentOutput::Code(output) => Ok(output),
            other => Err(unexpected(OutputContract::CodeOutput, &other)),
        }
    }
}

#[async_trait]
impl ReviewAdapter for ModelAdapter {
    async fn review(&self, code: &str) -> Result<String, PipelineError> {
        match self.invoke(&REVIEWER, code).await? {
            AgentOutput::Text(review) => Ok(review),
            other => Err(PipelineError::transport(format!(
                "reviewer produced structured output: {other:?}"
            ))),
        }
    }
}
