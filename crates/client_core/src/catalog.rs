use std::sync::{PoisonError, RwLock};

use shared::protocol::{ExampleTask, ModelInfo};
use tracing::{info, warn};

use crate::backend::TaskBackend;

/// Example tasks and available models, read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub examples: Vec<ExampleTask>,
    pub models: Vec<ModelInfo>,
}

impl Catalog {
    pub fn example(&self, index: usize) -> Option<&ExampleTask> {
        self.examples.get(index)
    }

    pub fn model_name(&self, id: &str) -> Option<&str> {
        self.models
            .iter()
            .find(|model| model.id == id)
            .map(|model| model.name.as_str())
    }
}

/// Fetches both lists independently. A failed fetch is logged and leaves its
/// list empty; it is never retried and never affects the other list.
pub async fn load_catalog(backend: &dyn TaskBackend, catalog: &RwLock<Catalog>) {
    let examples = async {
        match backend.list_examples().await {
            Ok(examples) => {
                info!(count = examples.len(), "catalog: examples loaded");
                catalog
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .examples = examples;
            }
            Err(err) => warn!(error = %err, "catalog: failed to load examples"),
        }
    };

    let models = async {
        match backend.list_models().await {
            Ok(models) => {
                info!(count = models.len(), "catalog: models loaded");
                catalog
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .models = models;
            }
            Err(err) => warn!(error = %err, "catalog: failed to load models"),
        }
    };

    tokio::join!(examples, models);
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
