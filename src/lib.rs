//! # graphql-fixtures
//!
//! Schema-driven GraphQL response fixtures for tests. Given a schema, an
//! operation and an optional partial response, the filler synthesizes a
//! complete response of the right shape. Values are seeded from their
//! position in the response, so the same inputs always give the same output.
//!
//! ## Layers
//!
//! Every response node is decided by, in order of precedence:
//!
//! - **Overrides**: the partial response passed to [`Filler::fill`]
//! - **Resolvers**: per-type providers registered in [`FillerOptions`]
//! - **Defaults**: built-in generators for `String`, `Int`, `Float`,
//!   `Boolean` and `ID`, random enum values, random words for custom scalars
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use apollo_compiler::Schema;
//! use graphql_fixtures::{create_filler, Document, FillerOptions, GraphQLRequest};
//! use serde_json::json;
//!
//! fn main() -> anyhow::Result<()> {
//!     let schema = Schema::parse_and_validate(
//!         "type Query { shop: Shop } type Shop { id: ID! name: String }",
//!         "schema.graphql",
//!     )
//!     .map_err(|e| anyhow::anyhow!("{}", e.errors))?;
//!
//!     let filler = create_filler(schema, FillerOptions::default());
//!     let document = Document::from_source("query Shop { shop { id name } }", None);
//!     let fill = filler.fill(document.clone(), json!({ "shop": { "name": "Acme" } }));
//!
//!     let response = fill.call(&GraphQLRequest::new(document))?;
//!     assert_eq!(response["shop"]["name"], "Acme");
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;

pub use adapters::filler::{create_filler, Fill, Filler, FillerOptions, DEFAULT_NULL_PROBABILITY};
pub use adapters::list::{list, ListSize};
pub use adapters::resolvers::ResolverRegistry;
pub use adapters::thunk::{resolver, ResolveDetails, Resolver, Thunk};
pub use domain::{Document, FillError, FillResult, GraphQLRequest};
