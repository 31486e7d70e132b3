use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub mod validator;

use crate::adapters::filler::{FillerOptions, DEFAULT_NULL_PROBABILITY};
use crate::adapters::resolvers::ResolverRegistry;
use crate::cli::Cli;

const DEFAULT_RESOLVERS_DIR: &str = "config/resolvers";

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    pub filler: FillerSettings,
    /// Static resolvers loaded from the resolvers directory
    #[serde(default)]
    pub resolvers: Vec<ResolverConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FillerSettings {
    /// Chance that a nullable value without an override is `null`
    pub null_probability: f64,
    /// Schema used when none is given on the command line
    #[serde(default)]
    pub schema: Option<PathBuf>,
    /// Directory of `*.json` / `*.yaml` resolver files, relative to the config root
    pub resolvers_dir: String,
}

/// A resolver that answers every node of `type_name` with `value`.
///
/// `value` mirrors the response shape of the type, e.g. for an object type
/// `{ "name": "Acme" }`, for a scalar a plain JSON value.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ResolverConfig {
    pub type_name: String,
    pub value: Value,
}

impl Settings {
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::from_root(".")
    }

    /// Create settings from CLI arguments (config file, then environment, then CLI)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let config_path = &cli.config;
        let root = config_path
            .parent()
            .map(|p| p.to_str().unwrap_or("."))
            .filter(|p| !p.is_empty())
            .unwrap_or(".");

        let mut settings = Self::load(File::from(config_path.clone()).required(false))?;

        settings.apply_cli_overrides(cli);

        settings.load_external_configs(root)?;

        settings.validate()?;

        Ok(settings)
    }

    pub fn from_root(root: &str) -> Result<Self, anyhow::Error> {
        let config_path = Path::new(root).join("fixtures");
        let mut settings = Self::load(File::from(config_path).required(false))?;

        settings.load_external_configs(root)?;

        settings.validate()?;

        Ok(settings)
    }

    fn load(file: File<config::FileSourceFile, config::FileFormat>) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("FIXTURES").separator("__"))
            .set_default("filler.null_probability", DEFAULT_NULL_PROBABILITY)?
            .set_default("filler.resolvers_dir", DEFAULT_RESOLVERS_DIR)?
            .build()?;

        Ok(s.try_deserialize()?)
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(schema) = &cli.schema {
            self.filler.schema = Some(schema.clone());
        }
        if let Some(null_probability) = cli.null_probability {
            self.filler.null_probability = null_probability;
        }
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::ConfigValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })
    }

    fn load_external_configs(&mut self, root: &str) -> Result<(), anyhow::Error> {
        let dir = Path::new(root).join(&self.filler.resolvers_dir);
        self.load_resolvers_from_dir(&dir.to_string_lossy())
    }

    fn load_resolvers_from_dir(&mut self, path: &str) -> Result<(), anyhow::Error> {
        let pattern = format!("{}/*", path);
        for entry in glob::glob(&pattern)? {
            match entry {
                Ok(path) => {
                    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                        if matches!(ext, "json" | "yaml" | "yml") {
                            let content = std::fs::read_to_string(&path)?;
                            let resolver: ResolverConfig = if ext == "json" {
                                serde_json::from_str(&content)?
                            } else {
                                serde_yaml::from_str(&content)?
                            };
                            tracing::debug!(
                                type_name = %resolver.type_name,
                                path = %path.display(),
                                "loaded resolver"
                            );
                            self.resolvers.push(resolver);
                        }
                    }
                }
                Err(e) => tracing::warn!("Failed to read glob entry: {}", e),
            }
        }
        Ok(())
    }

    /// Filler options carrying the configured probability and static resolvers
    pub fn filler_options(&self) -> FillerOptions {
        let resolvers: HashMap<_, _> = self
            .resolvers
            .iter()
            .map(|config| {
                (
                    config.type_name.clone(),
                    ResolverRegistry::literal(config.value.clone()),
                )
            })
            .collect();

        FillerOptions {
            resolvers,
            null_probability: self.filler.null_probability,
        }
    }
}
