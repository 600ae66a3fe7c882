use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use cypher_builder::{BuilderConfig, Parameters, QueryBuilder, SortDirection};

/// cypher-builder - render Cypher queries from clause fragments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML configuration file (falls back to CYPHER_BUILDER_* environment variables)
    #[arg(long, global = true)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a single-scope query
    Render(RenderArgs),
    /// Escape text for a Lucene index lookup
    Escape {
        /// Raw text to escape
        text: String,
    },
}

#[derive(clap::Args)]
struct RenderArgs {
    /// START binding as binding=expression (repeatable)
    #[arg(long = "start", value_name = "BINDING=EXPR")]
    start: Vec<String>,

    /// MATCH pattern (repeatable)
    #[arg(long = "match", value_name = "PATTERN")]
    patterns: Vec<String>,

    /// WHERE predicate (repeatable, joined with AND)
    #[arg(long = "where", value_name = "EXPR")]
    predicates: Vec<String>,

    /// DELETE target (repeatable)
    #[arg(long = "delete", value_name = "EXPR")]
    delete: Vec<String>,

    /// RETURN projection
    #[arg(long = "return", value_name = "EXPR")]
    projection: Option<String>,

    /// ORDER BY as "field ASC" or "field DESC"
    #[arg(long, value_name = "FIELD DIR")]
    order_by: Option<String>,

    /// SKIP and LIMIT
    #[arg(long, num_args = 2, value_names = ["SKIP", "LIMIT"])]
    page: Option<Vec<u64>>,

    /// Render the count form instead of the row query
    #[arg(long)]
    count: bool,

    /// Inline a parameter as name=<json value> (repeatable)
    #[arg(long = "param", value_name = "NAME=JSON")]
    params: Vec<String>,
}

fn split_pair<'a>(raw: &'a str, what: &str) -> anyhow::Result<(&'a str, &'a str)> {
    raw.split_once('=')
        .ok_or_else(|| anyhow!("{} '{}' must look like name=value", what, raw))
}

fn render(args: RenderArgs, config: BuilderConfig) -> anyhow::Result<String> {
    let mut query = QueryBuilder::detached().with_config(config);

    for raw in &args.start {
        let (binding, expression) = split_pair(raw, "START binding")?;
        query.start_at([(binding, expression)]);
    }
    for pattern in args.patterns {
        query.match_(pattern);
    }
    for predicate in args.predicates {
        query.where_(predicate);
    }
    for target in args.delete {
        query.delete(target);
    }
    if let Some(projection) = args.projection {
        query.returns(projection);
    }
    if let Some(order_by) = args.order_by {
        let (field, dir) = order_by
            .rsplit_once(' ')
            .ok_or_else(|| anyhow!("ORDER BY '{}' must be \"field ASC|DESC\"", order_by))?;
        query.order_by(field.trim(), dir.parse::<SortDirection>()?);
    }
    if let Some(page) = args.page {
        query.limit(page[0], page[1]);
    }

    if args.count {
        return Ok(query.build_count_query());
    }
    if args.params.is_empty() {
        return Ok(query.build_query());
    }

    let mut params = Parameters::new();
    for raw in &args.params {
        let (name, value) = split_pair(raw, "Parameter")?;
        let value = serde_json::from_str(value)
            .with_context(|| format!("Parameter '{}' is not valid JSON", name))?;
        params.insert(name.to_string(), value);
    }
    Ok(query.build_inline_query(params)?)
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logger - defaults to WARN level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => BuilderConfig::from_yaml_file(path),
        None => BuilderConfig::from_env(),
    }
    .context("Configuration error")?;
    log::debug!("Using configuration: {:?}", config);

    match cli.command {
        Command::Render(args) => println!("{}", render(args, config)?),
        Command::Escape { text } => println!("{}", QueryBuilder::escape(&text)),
    }
    Ok(())
}
