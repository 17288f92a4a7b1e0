use std::sync::Arc;

use futures_util::FutureExt;

use crate::compose::{step_handler, StepHandler};
use crate::error::{BoxError, ToolRefreshError, ToolRefreshResult};
use crate::notification::{NotificationGate, RefreshMessage, StepPrepareHook};
use crate::registry::ToolRegistry;
use crate::step::StepResult;
use crate::tool::{LlmToolSet, ToolSource};

pub type ShouldRefresh = Arc<dyn Fn(&StepResult) -> Result<bool, BoxError> + Send + Sync>;
pub type OnRefresh = Arc<dyn Fn(&[String]) -> Result<(), BoxError> + Send + Sync>;

/// Ready-made refresh predicates.
pub struct RefreshTrigger;

impl RefreshTrigger {
    pub fn always() -> ShouldRefresh {
        Arc::new(|_| Ok(true))
    }

    pub fn never() -> ShouldRefresh {
        Arc::new(|_| Ok(false))
    }

    /// Refresh after any step that called `tool_name`.
    pub fn tool_called(tool_name: impl Into<String>) -> ShouldRefresh {
        let tool_name = tool_name.into();
        Arc::new(move |step| Ok(step.called(&tool_name)))
    }

    pub fn any_tool_called<I, S>(tool_names: I) -> ShouldRefresh
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tool_names: Vec<String> = tool_names.into_iter().map(Into::into).collect();
        Arc::new(move |step| Ok(step.tool_names().any(|name| tool_names.iter().any(|t| t == name))))
    }
}

pub struct DynamicToolsOptions {
    pub tools: LlmToolSet,
    pub refresh_tools: Arc<dyn ToolSource>,
    pub should_refresh: ShouldRefresh,
    pub on_refresh: Option<OnRefresh>,
    pub refresh_message: Option<RefreshMessage>,
}

impl DynamicToolsOptions {
    pub fn new(
        tools: LlmToolSet,
        refresh_tools: impl ToolSource + 'static,
        should_refresh: ShouldRefresh,
    ) -> Self {
        Self {
            tools,
            refresh_tools: Arc::new(refresh_tools),
            should_refresh,
            on_refresh: None,
            refresh_message: None,
        }
    }

    /// Replaces the predicate given to [`DynamicToolsOptions::new`].
    pub fn should_refresh(
        mut self,
        predicate: impl Fn(&StepResult) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.should_refresh = Arc::new(move |step| Ok(predicate(step)));
        self
    }

    pub fn try_should_refresh(
        mut self,
        predicate: impl Fn(&StepResult) -> Result<bool, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.should_refresh = Arc::new(predicate);
        self
    }

    pub fn refresh_trigger(mut self, trigger: ShouldRefresh) -> Self {
        self.should_refresh = trigger;
        self
    }

    pub fn on_refresh(mut self, observer: impl Fn(&[String]) + Send + Sync + 'static) -> Self {
        self.on_refresh = Some(Arc::new(move |names| {
            observer(names);
            Ok(())
        }));
        self
    }

    pub fn try_on_refresh(
        mut self,
        observer: impl Fn(&[String]) -> Result<(), BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.on_refresh = Some(Arc::new(observer));
        self
    }

    pub fn refresh_message(mut self, message: RefreshMessage) -> Self {
        self.refresh_message = Some(message);
        self
    }
}

/// Handles returned by [`setup`].
pub struct DynamicTools {
    /// Pass a clone of this to the generation loop as its tools.
    pub registry: ToolRegistry,
    pub on_step_complete: StepCompleteHook,
    /// Present only when a refresh message was configured.
    pub on_step_prepare: Option<StepPrepareHook>,
}

pub fn setup(options: DynamicToolsOptions) -> DynamicTools {
    let registry = ToolRegistry::new(&options.tools);
    let gate = options
        .refresh_message
        .as_ref()
        .map(|_| NotificationGate::new());
    let on_step_prepare = gate.clone().map(StepPrepareHook::new);
    let on_step_complete = StepCompleteHook {
        inner: Arc::new(RefreshController {
            registry: registry.clone(),
            refresh_tools: options.refresh_tools,
            should_refresh: options.should_refresh,
            on_refresh: options.on_refresh,
            notification: options.refresh_message.zip(gate),
        }),
    };
    DynamicTools {
        registry,
        on_step_complete,
        on_step_prepare,
    }
}

struct RefreshController {
    registry: ToolRegistry,
    refresh_tools: Arc<dyn ToolSource>,
    should_refresh: ShouldRefresh,
    on_refresh: Option<OnRefresh>,
    notification: Option<(RefreshMessage, NotificationGate)>,
}

/// Step-completion hook that swaps in fresh tools when the predicate fires.
#[derive(Clone)]
pub struct StepCompleteHook {
    inner: Arc<RefreshController>,
}

impl StepCompleteHook {
    pub async fn call(&self, step: &StepResult) -> ToolRefreshResult<()> {
        let controller = &self.inner;
        if !(controller.should_refresh)(step).map_err(ToolRefreshError::Predicate)? {
            tracing::debug!(tool_calls = step.tool_calls.len(), "skipping tool refresh");
            return Ok(());
        }

        tracing::debug!("refreshing tools");
        let replacement = controller.refresh_tools.fetch().await.map_err(|error| {
            tracing::warn!("tool refresh fetch failed: {error}");
            ToolRefreshError::Fetch(error)
        })?;

        let names = controller.registry.replace_all(replacement);
        tracing::info!(tool_count = names.len(), "tools refreshed");

        if let Some(on_refresh) = &controller.on_refresh {
            on_refresh(&names).map_err(|error| {
                tracing::warn!("tool refresh observer failed: {error}");
                ToolRefreshError::Observer(error)
            })?;
        }

        if let Some((message, gate)) = &controller.notification {
            gate.arm(message.render(&names));
            tracing::debug!("tool refresh notification armed");
        }
        Ok(())
    }

    /// The hook as a composable step handler.
    pub fn into_handler(self) -> StepHandler {
        step_handler(move |step| {
            let hook = self.clone();
            async move { hook.call(step).await }.boxed()
        })
    }
}
