//! Mid-run tool discovery for multi-step LLM generation loops.
//!
//! [`setup`] returns a [`ToolRegistry`] handle for the loop to read each step,
//! a [`StepCompleteHook`] that swaps in fresh tools in place when its predicate
//! fires, and, when a [`RefreshMessage`] is configured, a [`StepPrepareHook`]
//! that announces the change to the model exactly once.

pub mod compose;
pub mod error;
pub mod message;
pub mod notification;
pub mod refresh;
pub mod registry;
pub mod step;
pub mod stream;
pub mod tool;

pub use compose::{compose_handlers, step_handler, StepHandler};
pub use error::{BoxError, ToolRefreshError, ToolRefreshResult};
pub use message::{Message, MessageInfo, MessagePart, PartBase, TextPart};
pub use notification::{
    system_notice, NotificationGate, RefreshMessage, RefreshMessageFn, StepPrepareHook,
};
pub use refresh::{
    setup, DynamicTools, DynamicToolsOptions, OnRefresh, RefreshTrigger, ShouldRefresh,
    StepCompleteHook,
};
pub use registry::ToolRegistry;
pub use step::{StepOverride, StepPrepareContext, StepResult, ToolCallRecord};
pub use stream::{LlmStream, LlmStreamEvent};
pub use tool::{LlmTool, LlmToolExecute, LlmToolSet, ToolExecuteOutput, ToolSource};
