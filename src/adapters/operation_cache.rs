use crate::adapters::compiler::compile_operation;
use crate::domain::{Document, FillResult, Operation};
use apollo_compiler::validation::Valid;
use apollo_compiler::Schema;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Compiled operations keyed by operation name.
///
/// Unnamed requests are compiled every time: without a name there is no
/// stable identity to cache them under.
#[derive(Default)]
pub struct OperationCache {
    operations: RwLock<HashMap<String, Arc<Operation>>>,
}

impl OperationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compile_or_get(
        &self,
        schema: &Valid<Schema>,
        document: &Document,
        operation_name: Option<&str>,
    ) -> FillResult<Arc<Operation>> {
        if let Some(name) = operation_name {
            if let Some(operation) = self.get(name) {
                debug!(operation = name, "operation cache hit");
                return Ok(operation);
            }
        }

        let operation = Arc::new(compile_operation(schema, document, operation_name)?);

        if let Some(name) = operation_name {
            // Concurrent misses for one name compile the same thing; last write wins.
            self.operations
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(name.to_string(), operation.clone());
        }

        Ok(operation)
    }

    pub fn get(&self, operation_name: &str) -> Option<Arc<Operation>> {
        self.operations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(operation_name)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.operations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.operations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
