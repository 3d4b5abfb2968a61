//! curl-style GraphQL query runner.
//!
//! Loads the query through the import resolver (so `#import` directives
//! work), merges variables and headers from inline pairs or json/yaml files,
//! executes against the endpoint, and writes the response data as json.

use std::collections::HashMap;

use clap::Parser;
use serde_json::Value;
use tracing::{debug, error};

use gqlio::cli::{
    OperationKind, combine, init_tracing, is_stdin, operation_kind, read_query_arg, read_value_arg,
};
use gqlio::client::GraphQlClient;
use gqlio::codec::{Payload, default_registry};
use gqlio::error::BoxError;
use gqlio::import::ImportResolver;
use gqlio::locator::Locator;

#[derive(Debug, Parser)]
#[command(
    name = "gqlio",
    version,
    about = "Run GraphQL queries and mutations from the command line"
)]
struct Cli {
    /// graphql endpoint
    #[arg(short, long)]
    endpoint: String,

    /// output only selected key from response data
    #[arg(short, long)]
    key: Option<String>,

    /// write response data to json file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// graphql query (or mutation), may use #import
    #[arg(short, long, value_name = "query|@file|-")]
    query: String,

    /// query variables, file may be json or yaml
    #[arg(short, long, value_name = "variable:value|@file|-")]
    data: Vec<String>,

    /// custom headers, file may be json or yaml
    #[arg(short = 'H', long, value_name = "header:value|@file|-")]
    header: Vec<String>,

    /// output more details
    #[arg(short, long)]
    verbose: bool,

    /// output debug data
    #[arg(short = 'D', long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.debug);

    let stdin_args = std::iter::once(cli.query.as_str())
        .chain(cli.data.iter().map(String::as_str))
        .chain(cli.header.iter().map(String::as_str))
        .filter(|arg| is_stdin(arg))
        .count();
    if stdin_args > 1 {
        error!("Invalid usage (try --help): at most one of --query, --data, --header may read from <stdin>");
        std::process::exit(2);
    }

    if let Err(e) = run(&cli) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), BoxError> {
    let mut resolver = ImportResolver::new();
    resolver.register_graphql(std::sync::Arc::new(|text| text));

    let registry = default_registry();

    let query = read_query_arg(&resolver, &cli.query)?;
    let variables = combine(
        cli.data
            .iter()
            .map(|arg| read_value_arg(&registry, arg))
            .collect::<Result<Vec<_>, _>>()?,
    );
    let headers: HashMap<String, String> = combine(
        cli.header
            .iter()
            .map(|arg| read_value_arg(&registry, arg))
            .collect::<Result<Vec<_>, _>>()?,
    )
    .into_iter()
    .map(|(name, value)| {
        let rendered = match value {
            Value::String(s) => s,
            other => other.to_string(),
        };
        (name, rendered)
    })
    .collect();

    debug!("Query {query}");

    match operation_kind(&query) {
        OperationKind::Query | OperationKind::Mutation => {}
        OperationKind::Subscription => {
            return Err("invalid operation type 'subscription'".into());
        }
    }

    let client = GraphQlClient::new(&cli.endpoint)?.with_headers(headers);
    let response = client.execute(&query, &Value::Object(variables))?;

    let data = match &cli.key {
        Some(key) => response.get(key).cloned().unwrap_or(Value::Null),
        None => response,
    };

    let output = match cli.output.as_deref() {
        Some(path) if path != "-" => Locator::path(path),
        _ => Locator::Stdout,
    };
    let writer = registry.writer(Some("json"), None);
    let mut sink = output.open_write()?;
    writer.write(&Payload::Json(data), &mut *sink)?;

    Ok(())
}
