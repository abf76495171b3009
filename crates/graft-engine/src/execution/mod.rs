//! Runs an [`ExecutionPlan`] against a [`DataSource`].

use crate::config::ExecutionConfig;
use crate::data_source::DataSource;
use crate::loader::Loader;
use crate::plan::ExecutionPlan;
use crate::response::Response;
use futures::future::AbortRegistration;
use futures::future::Abortable;
use futures::future::Aborted;
use std::sync::Arc;
use tracing::Instrument as _;

mod engine;
mod result_coercion;

/// One execution of a plan.
///
/// ```no_run
/// # async fn run(
/// #     plan: &graft_engine::ExecutionPlan<'_>,
/// #     source: std::sync::Arc<dyn graft_engine::DataSource>,
/// # ) {
/// use graft_engine::{AbortHandle, Execution, ExecutionConfig};
///
/// let (handle, registration) = AbortHandle::new_pair();
/// let execution = Execution::new(plan, source)
///     .config(ExecutionConfig { cache_loads: false })
///     .execute_abortable(registration);
/// handle.abort();
/// assert!(execution.await.is_err());
/// # }
/// ```
///
/// The engine never spawns tasks: every data source call is owned by the
/// future returned from [`Execution::execute`], and dropping that future
/// cancels all of them.
pub struct Execution<'a, 's> {
    plan: &'a ExecutionPlan<'s>,
    source: Arc<dyn DataSource>,
    config: ExecutionConfig,
}

impl<'a, 's> Execution<'a, 's> {
    pub fn new(plan: &'a ExecutionPlan<'s>, source: Arc<dyn DataSource>) -> Self {
        Self {
            plan,
            source,
            config: ExecutionConfig::default(),
        }
    }

    pub fn config(mut self, config: ExecutionConfig) -> Self {
        self.config = config;
        self
    }

    /// Execute the plan. Field errors are recorded in the response, next to
    /// whatever data could be resolved.
    pub async fn execute(self) -> Response {
        let span = tracing::info_span!(
            "graft.execute",
            operation.kind = %self.plan.operation_type(),
            operation.name = self.plan.operation_name().unwrap_or_default(),
        );
        async move {
            // One loader per execution: nothing is shared between requests
            let loader = Loader::new(self.source, self.config.cache_loads);
            engine::execute_operation(self.plan, &loader).await
        }
        .instrument(span)
        .await
    }

    /// Execute the plan until it completes or `registration` is aborted.
    ///
    /// Once `Err(Aborted)` is returned every data source call of this
    /// execution has been dropped.
    pub async fn execute_abortable(
        self,
        registration: AbortRegistration,
    ) -> Result<Response, Aborted> {
        Abortable::new(self.execute(), registration).await
    }
}

/// Execute a plan with the default [`ExecutionConfig`].
pub async fn execute(plan: &ExecutionPlan<'_>, source: Arc<dyn DataSource>) -> Response {
    Execution::new(plan, source).execute().await
}
