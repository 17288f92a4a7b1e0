use std::sync::Arc;

use parking_lot::Mutex;

use crate::message::Message;
use crate::step::{StepOverride, StepPrepareContext};

pub type RefreshMessageFn = Arc<dyn Fn(&[String]) -> String + Send + Sync>;

/// Text announced to the model after a refresh.
#[derive(Clone)]
pub enum RefreshMessage {
    Fixed(String),
    Dynamic(RefreshMessageFn),
}

impl RefreshMessage {
    pub fn fixed(text: impl Into<String>) -> Self {
        RefreshMessage::Fixed(text.into())
    }

    pub fn dynamic(render: impl Fn(&[String]) -> String + Send + Sync + 'static) -> Self {
        RefreshMessage::Dynamic(Arc::new(render))
    }

    /// `Tools refreshed. Now available: a, b`
    pub fn tool_list() -> Self {
        Self::dynamic(|names| format!("Tools refreshed. Now available: {}", names.join(", ")))
    }

    pub fn render(&self, names: &[String]) -> String {
        match self {
            RefreshMessage::Fixed(text) => text.clone(),
            RefreshMessage::Dynamic(render) => render(names),
        }
    }
}

impl std::fmt::Debug for RefreshMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefreshMessage::Fixed(text) => f.debug_tuple("Fixed").field(text).finish(),
            RefreshMessage::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

#[derive(Debug, Default)]
enum GateState {
    #[default]
    Empty,
    Armed(String),
}

/// One-shot notification slot: armed by a refresh, drained by the next step preparation.
#[derive(Debug, Default, Clone)]
pub struct NotificationGate {
    state: Arc<Mutex<GateState>>,
}

impl NotificationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites any notification that has not been delivered yet.
    pub fn arm(&self, text: String) {
        *self.state.lock() = GateState::Armed(text);
    }

    /// Reads and clears the pending notification in one step.
    pub fn drain(&self) -> Option<String> {
        match std::mem::take(&mut *self.state.lock()) {
            GateState::Armed(text) => Some(text),
            GateState::Empty => None,
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(*self.state.lock(), GateState::Armed(_))
    }
}

pub fn system_notice(text: &str) -> String {
    format!("[system: {text}]")
}

/// Step-preparation hook; only exists when a refresh message is configured.
#[derive(Debug, Clone)]
pub struct StepPrepareHook {
    gate: NotificationGate,
}

impl StepPrepareHook {
    pub(crate) fn new(gate: NotificationGate) -> Self {
        Self { gate }
    }

    /// Returns `None` to keep the loop's default context, or the input messages
    /// with the pending notification appended as a user message.
    pub fn call(&self, context: &StepPrepareContext) -> Option<StepOverride> {
        let text = self.gate.drain()?;
        tracing::debug!(notification = %text, "delivering tool refresh notification");
        let mut messages = context.messages.clone();
        messages.push(Message::user(&system_notice(&text)));
        Some(StepOverride { messages })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_is_exactly_once() {
        let gate = NotificationGate::new();
        assert_eq!(gate.drain(), None);

        gate.arm("first".to_string());
        assert!(gate.is_armed());
        assert_eq!(gate.drain().as_deref(), Some("first"));
        assert_eq!(gate.drain(), None);
        assert!(!gate.is_armed());
    }

    #[test]
    fn last_arm_wins() {
        let gate = NotificationGate::new();
        gate.arm("first".to_string());
        gate.arm("second".to_string());
        assert_eq!(gate.drain().as_deref(), Some("second"));
        assert_eq!(gate.drain(), None);
    }

    #[test]
    fn tool_list_message_joins_names() {
        let names = vec!["alpha".to_string(), "beta".to_string()];
        let text = RefreshMessage::tool_list().render(&names);
        assert_eq!(text, "Tools refreshed. Now available: alpha, beta");
        assert_eq!(
            system_notice(&text),
            "[system: Tools refreshed. Now available: alpha, beta]"
        );
    }

    #[test]
    fn prepare_hook_appends_one_message_without_touching_input() {
        let gate = NotificationGate::new();
        let hook = StepPrepareHook::new(gate.clone());
        let context = StepPrepareContext::new(vec![Message::user("hello")]);

        assert_eq!(hook.call(&context), None);

        gate.arm("Updated!".to_string());
        let result = hook.call(&context).expect("override");

        assert_eq!(context.messages.len(), 1);
        assert_eq!(result.messages.len(), 2);
        assert_eq!(result.messages[0], context.messages[0]);
        assert_eq!(result.messages[1].role(), "user");
        assert_eq!(result.messages[1].text(), "[system: Updated!]");
        assert_eq!(hook.call(&context), None);
    }
}
