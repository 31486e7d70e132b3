use clap::Parser;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// GraphQL Fixtures - Generate schema-conformant GraphQL responses for tests
#[derive(Parser, Debug, Clone)]
#[command(name = "graphql-fixtures", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "FIXTURES_CONFIG", default_value = "fixtures.toml")]
    pub config: PathBuf,

    /// GraphQL schema (SDL); overrides `filler.schema` from the config file
    #[arg(short, long, env = "FIXTURES_SCHEMA")]
    pub schema: Option<PathBuf>,

    /// Document holding the operation to fill
    #[arg(short, long)]
    pub query: PathBuf,

    /// Operation to fill when the document holds several
    #[arg(short, long)]
    pub operation: Option<String>,

    /// Partial response (JSON or YAML) merged into the generated one
    #[arg(long)]
    pub overrides: Option<PathBuf>,

    /// Request variables (JSON or YAML object)
    #[arg(long)]
    pub variables: Option<PathBuf>,

    /// Chance that a nullable value without an override is null
    #[arg(long, env = "FIXTURES_NULL_PROBABILITY")]
    pub null_probability: Option<f64>,

    /// Pretty-print the response
    #[arg(long)]
    pub pretty: bool,
}

impl Cli {
    pub fn load_overrides(&self) -> anyhow::Result<Option<Value>> {
        self.overrides.as_deref().map(read_structured_file).transpose()
    }

    pub fn load_variables(&self) -> anyhow::Result<Option<Map<String, Value>>> {
        match self.variables.as_deref().map(read_structured_file).transpose()? {
            Some(Value::Object(variables)) => Ok(Some(variables)),
            Some(Value::Null) | None => Ok(None),
            Some(other) => Err(anyhow::anyhow!(
                "Variables must be an object, got {}",
                other
            )),
        }
    }
}

/// Parse a JSON or YAML file, chosen by extension
pub fn read_structured_file(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
        _ => Ok(serde_json::from_str(&content)?),
    }
}
