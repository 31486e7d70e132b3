use apollo_compiler::Schema;
use clap::Parser;
use graphql_fixtures::cli::Cli;
use graphql_fixtures::config::Settings;
use graphql_fixtures::{create_filler, Document, GraphQLRequest, Thunk};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Responses go to stdout, logs to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::new_with_cli(&cli)?;

    let schema_path = settings
        .filler
        .schema
        .clone()
        .ok_or_else(|| anyhow::anyhow!("No schema given; pass --schema or set filler.schema"))?;
    let schema_source = std::fs::read_to_string(&schema_path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", schema_path.display(), e))?;
    let schema = Schema::parse_and_validate(schema_source, &schema_path)
        .map_err(|e| anyhow::anyhow!("Invalid schema {}:\n{}", schema_path.display(), e.errors))?;

    let query_source = std::fs::read_to_string(&cli.query)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", cli.query.display(), e))?;
    let document = Document::from_source(query_source, cli.query.to_str());

    let overrides = cli.load_overrides()?.map(Thunk::from).unwrap_or_default();

    let filler = create_filler(schema, settings.filler_options());
    let fill = filler.fill(document.clone(), overrides);

    let mut request = GraphQLRequest::new(document);
    if let Some(operation) = &cli.operation {
        request = request.with_operation_name(operation.clone());
    }
    if let Some(variables) = cli.load_variables()? {
        request = request.with_variables(variables);
    }

    info!(
        schema = %schema_path.display(),
        query = %cli.query.display(),
        resolvers = settings.resolvers.len(),
        "Filling response"
    );
    let response = fill.call(&request)?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", output);

    Ok(())
}
