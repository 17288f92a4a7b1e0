use std::sync::Arc;

use parking_lot::RwLock;

use crate::tool::{LlmTool, LlmToolSet};

/// Live tool set shared with the generation loop.
///
/// Cloning the handle shares the same underlying set; the set itself is only
/// ever mutated in place, so every holder observes a refresh without
/// re-binding. Hand the loop a clone of this handle, never a copy of
/// [`ToolRegistry::snapshot`].
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Arc<RwLock<LlmToolSet>>,
}

impl ToolRegistry {
    /// Copies `tools` into a new registry; the caller's set is left untouched.
    pub fn new(tools: &LlmToolSet) -> Self {
        Self {
            tools: Arc::new(RwLock::new(tools.clone())),
        }
    }

    /// Owned copy of the current tools, for one step of the generation loop.
    pub fn snapshot(&self) -> LlmToolSet {
        self.tools.read().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.read().keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Option<LlmTool> {
        self.tools.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.read().is_empty()
    }

    /// True when both handles refer to the same registry.
    pub fn ptr_eq(&self, other: &ToolRegistry) -> bool {
        Arc::ptr_eq(&self.tools, &other.tools)
    }

    /// Replaces the whole contents in place and returns the new names in
    /// insertion order. Readers see either the old or the new set.
    pub(crate) fn replace_all(&self, replacement: LlmToolSet) -> Vec<String> {
        let mut tools = self.tools.write();
        tools.clear();
        tools.extend(replacement);
        tools.keys().cloned().collect()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;

    use serde_json::{json, Value};

    use super::*;
    use crate::tool::{LlmToolExecute, ToolExecuteOutput};

    fn echo(
        input: Value,
    ) -> Pin<Box<dyn Future<Output = Result<ToolExecuteOutput, Value>> + Send>> {
        Box::pin(async move { Ok(ToolExecuteOutput::with_output("echo", input)) })
    }

    fn tool_set(names: &[&str]) -> LlmToolSet {
        names
            .iter()
            .map(|name| (name.to_string(), LlmTool::function(json!({"type": "object"}))))
            .collect()
    }

    #[test]
    fn registry_is_a_copy_of_the_initial_set() {
        let initial = tool_set(&["a", "b"]);
        let registry = ToolRegistry::new(&initial);

        registry.replace_all(tool_set(&["x"]));

        assert_eq!(initial.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(registry.names(), vec!["x"]);
    }

    #[test]
    fn replace_all_is_visible_through_every_handle() {
        let registry = ToolRegistry::new(&tool_set(&["a"]));
        let loop_handle = registry.clone();

        let names = registry.replace_all(tool_set(&["gamma", "alpha", "beta"]));

        assert!(loop_handle.ptr_eq(&registry));
        assert_eq!(names, vec!["gamma", "alpha", "beta"]);
        assert_eq!(loop_handle.names(), names);
        assert!(!loop_handle.contains("a"));
    }

    #[test]
    fn replace_all_with_empty_set_empties_registry() {
        let registry = ToolRegistry::new(&tool_set(&["a", "b"]));
        assert!(registry.replace_all(LlmToolSet::new()).is_empty());
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn separate_registries_do_not_share_identity() {
        let tools = tool_set(&["a"]);
        assert!(!ToolRegistry::new(&tools).ptr_eq(&ToolRegistry::new(&tools)));
    }

    #[test]
    fn snapshot_is_detached_from_later_refreshes() {
        let registry = ToolRegistry::new(&tool_set(&["a", "b"]));

        let step_tools = registry.snapshot();
        registry.replace_all(tool_set(&["x"]));

        assert_eq!(step_tools.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(registry.snapshot().keys().collect::<Vec<_>>(), vec!["x"]);
    }

    #[tokio::test]
    async fn get_shares_the_tool_execute_closure() {
        let execute: LlmToolExecute = Arc::new(echo);
        let mut tools = tool_set(&["a"]);
        tools.insert(
            "echo".to_string(),
            LlmTool::function(json!({"type": "object"}))
                .with_description("Echo the input")
                .with_execute(execute.clone()),
        );
        let registry = ToolRegistry::new(&tools);

        let tool = registry.get("echo").expect("echo tool");
        assert_eq!(tool.description.as_deref(), Some("Echo the input"));
        let tool_execute = tool.execute.expect("execute");
        assert!(Arc::ptr_eq(&tool_execute, &execute));

        let output = tool_execute(json!({"value": 1})).await.expect("output");
        assert_eq!(output.title, "echo");
        assert_eq!(output.output, json!({"value": 1}));
        assert!(registry.get("missing").is_none());
    }
}
