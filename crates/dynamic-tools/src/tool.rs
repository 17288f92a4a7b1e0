use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::BoxError;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct ToolExecuteOutput {
    pub title: String,
    pub metadata: Value,
    pub output: Value,
}

impl ToolExecuteOutput {
    pub fn with_output(title: impl Into<String>, output: Value) -> Self {
        Self {
            title: title.into(),
            metadata: Value::Object(serde_json::Map::new()),
            output,
        }
    }
}

pub type LlmToolExecute = Arc<
    dyn Fn(Value) -> Pin<Box<dyn Future<Output = Result<ToolExecuteOutput, Value>> + Send>>
        + Send
        + Sync,
>;

/// A callable tool as handed to the generation loop. Never inspected here.
#[derive(Clone)]
pub struct LlmTool {
    pub description: Option<String>,
    pub input_schema: Value,
    pub execute: Option<LlmToolExecute>,
}

impl LlmTool {
    pub fn function(input_schema: Value) -> Self {
        Self {
            description: None,
            input_schema,
            execute: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_execute(mut self, execute: LlmToolExecute) -> Self {
        self.execute = Some(execute);
        self
    }
}

impl std::fmt::Debug for LlmTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmTool")
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .field("execute", &self.execute.is_some())
            .finish()
    }
}

/// Tool name to definition, in insertion order.
pub type LlmToolSet = IndexMap<String, LlmTool>;

/// Produces a full replacement tool set on demand.
///
/// Implemented for any `Fn() -> impl Future<Output = Result<LlmToolSet, BoxError>>`,
/// so plain async closures work as sources.
#[async_trait]
pub trait ToolSource: Send + Sync {
    async fn fetch(&self) -> Result<LlmToolSet, BoxError>;
}

#[async_trait]
impl<F, Fut> ToolSource for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<LlmToolSet, BoxError>> + Send + 'static,
{
    async fn fetch(&self) -> Result<LlmToolSet, BoxError> {
        (self)().await
    }
}
