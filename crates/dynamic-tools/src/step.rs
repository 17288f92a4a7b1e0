use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_stream::StreamExt;

use crate::message::Message;
use crate::stream::{LlmStream, LlmStreamEvent};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallRecord {
    pub tool_call_id: String,
    pub tool_name: String,
    #[serde(default)]
    pub input: Value,
}

impl ToolCallRecord {
    pub fn new(tool_call_id: impl Into<String>, tool_name: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            input: Value::Null,
        }
    }
}

/// What a just-completed generation step did, as seen by step-completion hooks.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StepResult {
    pub tool_calls: Vec<ToolCallRecord>,
}

impl StepResult {
    pub fn new(tool_calls: Vec<ToolCallRecord>) -> Self {
        Self { tool_calls }
    }

    /// Builds a step result from the tool calls seen in a step's stream events.
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a LlmStreamEvent>) -> Self {
        let tool_calls = events
            .into_iter()
            .filter_map(|event| match event {
                LlmStreamEvent::ToolCall {
                    tool_call_id,
                    tool_name,
                    input,
                } => Some(ToolCallRecord {
                    tool_call_id: tool_call_id.clone(),
                    tool_name: tool_name.clone(),
                    input: input.clone(),
                }),
                _ => None,
            })
            .collect();
        Self { tool_calls }
    }

    /// Drains a step stream, returning every event alongside the step result.
    pub async fn collect(mut stream: LlmStream) -> (Vec<LlmStreamEvent>, Self) {
        let mut events = Vec::new();
        while let Some(event) = stream.next().await {
            events.push(event);
        }
        let step = Self::from_events(&events);
        (events, step)
    }

    pub fn tool_names(&self) -> impl Iterator<Item = &str> {
        self.tool_calls.iter().map(|call| call.tool_name.as_str())
    }

    pub fn called(&self, tool_name: &str) -> bool {
        self.tool_names().any(|name| name == tool_name)
    }
}

/// Context handed to the step-preparation hook before the next step.
#[derive(Debug, Clone, Default)]
pub struct StepPrepareContext {
    pub messages: Vec<Message>,
}

impl StepPrepareContext {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

/// Replacement context for a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOverride {
    pub messages: Vec<Message>,
}
