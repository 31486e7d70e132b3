use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A GraphQL document as produced by source loaders: a list of definitions,
/// each optionally carrying the span of source text it was parsed from.
///
/// Documents built by other tools frequently carry a location only on the
/// document itself; see [`crate::adapters::document::normalize_document`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub definitions: Vec<Definition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<NameNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<Location>,
    /// Remaining AST payload, kept untouched
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameNode {
    pub value: String,
}

/// Byte span into a source body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Document {
    /// Wrap raw query text; the whole text is the document's location.
    pub fn from_source(body: impl Into<String>, name: Option<&str>) -> Self {
        let body = body.into();
        Self {
            definitions: Vec::new(),
            loc: Some(Location {
                start: 0,
                end: body.len(),
                source: Some(Source {
                    body,
                    name: name.map(str::to_string),
                }),
            }),
        }
    }

    pub fn source_name(&self) -> Option<&str> {
        self.loc
            .as_ref()
            .and_then(|loc| loc.source.as_ref())
            .and_then(|source| source.name.as_deref())
    }
}

impl Definition {
    /// Name used in diagnostics, e.g. `OperationDefinition ShopQuery`
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => format!("{} {}", self.kind, name.value),
            None => self.kind.clone(),
        }
    }
}
