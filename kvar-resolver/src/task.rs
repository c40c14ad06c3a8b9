use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use kvar_core::{constants::Constants, errors::Error, metric, types};
use tracing::Instrument;

use crate::resolver::VariableResolver;

/// A named unit of work, scheduled by a [`TaskRunner`].
#[async_trait]
pub trait Task: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self) -> types::Result<()>;
}

/// Deferred bulk resolution of a set of registered variables.
///
/// Every call to [`ResolveTask::resolve`] re-reads all keys from the store.
#[derive(Clone)]
pub struct ResolveTask {
    name: String,
    resolver: VariableResolver,
    variables: Vec<(String, String)>,
}

impl ResolveTask {
    pub(crate) fn new(resolver: VariableResolver, variables: Vec<(String, String)>) -> Self {
        Self {
            name: Constants::DefaultResolveTaskName.to_string(),
            resolver,
            variables,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn variables(&self) -> &[(String, String)] {
        &self.variables
    }

    /// Fetches every registered variable concurrently and returns the values
    /// by local name. Fails with the first error observed.
    pub async fn resolve(&self) -> types::Result<HashMap<String, Option<types::Value>>> {
        let span = tracing::info_span!("resolve_task", task = %self.name);

        async {
            let _timer = metric::resolve_duration_seconds_metric()
                .with_label_values(&[self.name.as_str()])
                .start_timer();

            tracing::debug!("resolving {} variables", self.variables.len());

            let result = self.resolver.resolve(&self.variables).await;

            match &result {
                Ok(values) => tracing::debug!("resolved {} variables", values.len()),
                Err(e) => tracing::debug!("resolution failed, {}", e),
            }

            result
        }
        .instrument(span)
        .await
    }

    /// Resolves and hands the outcome to `handler`.
    pub async fn resolve_with<F>(&self, handler: F)
    where
        F: FnOnce(types::Result<HashMap<String, Option<types::Value>>>) + Send,
    {
        handler(self.resolve().await)
    }
}

#[async_trait]
impl Task for ResolveTask {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self) -> types::Result<()> {
        self.resolve().await.map(|_| ())
    }
}

/// Runs tasks in registration order, stopping at the first failure.
#[derive(Default, Clone)]
pub struct TaskRunner {
    tasks: Vec<Arc<dyn Task>>,
}

impl TaskRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_task<T>(mut self, task: T) -> Self
    where
        T: 'static + Task,
    {
        self.add_task(Arc::new(task));
        self
    }

    pub fn add_task(&mut self, task: Arc<dyn Task>) {
        self.tasks.push(task);
    }

    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(|task| task.name()).collect()
    }

    pub async fn run_all(&self) -> types::Result<()> {
        for task in self.tasks.iter() {
            tracing::info!("running task: '{}'", task.name());

            if let Err(e) = task.run().await {
                tracing::error!("task '{}' failed, {}", task.name(), e);

                return Err(Error::TaskFailed {
                    name: task.name().to_string(),
                    source: Box::new(e),
                });
            }

            tracing::info!("completed task: '{}'", task.name());
        }

        Ok(())
    }
}
