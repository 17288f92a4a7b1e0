use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::error::ToolRefreshResult;
use crate::step::StepResult;

pub type StepHandler =
    Arc<dyn for<'a> Fn(&'a StepResult) -> BoxFuture<'a, ToolRefreshResult<()>> + Send + Sync>;

pub fn step_handler<F>(handler: F) -> StepHandler
where
    F: for<'a> Fn(&'a StepResult) -> BoxFuture<'a, ToolRefreshResult<()>> + Send + Sync + 'static,
{
    Arc::new(handler)
}

/// Runs `handlers` one after another on the same step, stopping at the first error.
pub fn compose_handlers(handlers: Vec<StepHandler>) -> StepHandler {
    let handlers: Arc<[StepHandler]> = handlers.into();
    step_handler(move |step| {
        let handlers = handlers.clone();
        async move {
            for handler in handlers.iter() {
                handler(step).await?;
            }
            Ok(())
        }
        .boxed()
    })
}
