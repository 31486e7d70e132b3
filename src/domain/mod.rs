use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod document;
pub mod error;
pub mod operation;

pub use document::{Definition, Document, Location, NameNode, Source};
pub use error::{FillError, FillResult};
pub use operation::{FieldDetails, InlineFragment, Operation, VariableDetails};

/// A request the filler answers.
///
/// `variables` must be present when the operation declares at least one
/// required variable, may be present when all of them are nullable, and
/// should be absent when the operation declares none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLRequest {
    pub query: Document,
    #[serde(default, rename = "operationName", skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Map<String, Value>>,
}

impl GraphQLRequest {
    pub fn new(query: Document) -> Self {
        Self {
            query,
            operation_name: None,
            variables: None,
        }
    }

    pub fn with_operation_name(mut self, operation_name: impl Into<String>) -> Self {
        self.operation_name = Some(operation_name.into());
        self
    }

    pub fn with_variables(mut self, variables: Map<String, Value>) -> Self {
        self.variables = Some(variables);
        self
    }
}
