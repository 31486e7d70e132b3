use std::collections::HashSet;
use thiserror::Error;

use crate::config::{FillerSettings, ResolverConfig, Settings};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_filler(&settings.filler) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_resolvers(&settings.resolvers) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_filler(filler: &FillerSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if !(0.0..=1.0).contains(&filler.null_probability) {
            errors.push(ValidationError::InvalidValue {
                field: "filler.null_probability".to_string(),
                reason: format!(
                    "Must be between 0 and 1, got {}",
                    filler.null_probability
                ),
            });
        }

        if filler.resolvers_dir.is_empty() {
            errors.push(ValidationError::MissingField(
                "filler.resolvers_dir".to_string(),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_resolvers(resolvers: &[ResolverConfig]) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for (idx, resolver) in resolvers.iter().enumerate() {
            if resolver.type_name.is_empty() {
                errors.push(ValidationError::MissingField(format!(
                    "resolvers[{}].type_name",
                    idx
                )));
                continue;
            }

            if !is_graphql_name(&resolver.type_name) {
                errors.push(ValidationError::InvalidValue {
                    field: format!("resolvers[{}].type_name", idx),
                    reason: format!("'{}' is not a valid GraphQL name", resolver.type_name),
                });
            }

            if !seen.insert(resolver.type_name.as_str()) {
                errors.push(ValidationError::Duplicate(format!(
                    "Resolver for type '{}' is defined more than once",
                    resolver.type_name
                )));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// `/[_A-Za-z][_0-9A-Za-z]*/`
fn is_graphql_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}
