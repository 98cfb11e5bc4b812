//! Querywise CLI - Translate natural-language requests to SQL
//!
//! Usage:
//!   querywise parse --catalog <catalog.json> [--config <file.toml>] [--min-rows <n>] [--output <format>] [--check] <request>...
//!   querywise suggest --catalog <catalog.json> <table>
//!   querywise tables --catalog <catalog.json>
//!
//! Examples:
//!   querywise parse --catalog catalog.json top 5 customers
//!   querywise parse --catalog catalog.json --output json "find users where age > 30"
//!   querywise suggest --catalog catalog.json dbo.Users

use clap::{Parser, Subcommand, ValueEnum};
use querywise::catalog::{Catalog, CatalogProvider};
use querywise::config::EngineConfig;
use querywise::engine::QueryEngine;
use querywise::sql::validate_sql;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "querywise")]
#[command(about = "Querywise - Translate natural-language requests into SQL")]
#[command(version)]
struct Cli {
    /// Path to an engine config file (defaults to $QUERYWISE_CONFIG or ./querywise.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ignore catalog tables with fewer rows than this
    #[arg(long, global = true, default_value_t = 0)]
    min_rows: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a request to SQL
    Parse {
        /// Path to the catalog snapshot (JSON)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "sql")]
        output: OutputFormat,

        /// Validate the generated SQL with a SQL parser
        #[arg(long)]
        check: bool,

        /// The request text
        #[arg(required = true)]
        request: Vec<String>,
    },

    /// Suggest requests for a table
    Suggest {
        /// Path to the catalog snapshot (JSON)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Table name as stored in the catalog
        table: String,
    },

    /// List the tables of a catalog snapshot
    Tables {
        /// Path to the catalog snapshot (JSON)
        #[arg(short, long)]
        catalog: PathBuf,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Output SQL only
    Sql,
    /// Output the full parse result as JSON
    Json,
    /// Output SQL with intent and warnings as comments
    Verbose,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            catalog,
            output,
            check,
            request,
        } => cmd_parse(
            cli.config.as_deref(),
            &catalog,
            cli.min_rows,
            output,
            check,
            &request.join(" "),
        ),
        Commands::Suggest { catalog, table } => {
            cmd_suggest(cli.config.as_deref(), &catalog, cli.min_rows, &table)
        }
        Commands::Tables { catalog } => cmd_tables(&catalog, cli.min_rows),
    }
}

fn load_catalog(path: &Path, min_rows: u64) -> Result<Catalog, ExitCode> {
    let source = fs::read_to_string(path).map_err(|e| {
        eprintln!("Error reading catalog '{}': {}", path.display(), e);
        ExitCode::FAILURE
    })?;
    let catalog: Catalog = serde_json::from_str(&source).map_err(|e| {
        eprintln!("Error parsing catalog '{}': {}", path.display(), e);
        ExitCode::FAILURE
    })?;
    Ok(catalog.with_min_rows(min_rows))
}

fn load_engine(config: Option<&Path>) -> Result<QueryEngine, ExitCode> {
    let config = match config {
        Some(path) => EngineConfig::from_file(path),
        None => EngineConfig::load(),
    };
    config.map(QueryEngine::new).map_err(|e| {
        eprintln!("Error loading config: {}", e);
        ExitCode::FAILURE
    })
}

fn cmd_parse(
    config: Option<&Path>,
    catalog: &Path,
    min_rows: u64,
    output: OutputFormat,
    check: bool,
    request: &str,
) -> ExitCode {
    let (engine, catalog) = match (load_engine(config), load_catalog(catalog, min_rows)) {
        (Ok(engine), Ok(catalog)) => (engine, catalog),
        (Err(code), _) | (_, Err(code)) => return code,
    };

    let result = match engine.parse(request, &catalog) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if check {
        if let Err(e) = validate_sql(&result.sql) {
            eprintln!("Generated SQL failed validation: {}", e);
            return ExitCode::FAILURE;
        }
    }

    match output {
        OutputFormat::Sql => {
            println!("{}", result.sql);
            for warning in &result.warnings {
                eprintln!("warning: {}", warning);
            }
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing result: {}", e);
                return ExitCode::FAILURE;
            }
        },
        OutputFormat::Verbose => {
            println!("-- Request: {}", request);
            println!(
                "-- Intent: {:?} / {:?} / {:?}",
                result.intent.query_type, result.intent.label, result.intent.complexity
            );
            for warning in &result.warnings {
                println!("-- Warning: {}", warning);
            }
            println!();
            println!("{}", result.sql);
        }
    }

    ExitCode::SUCCESS
}

fn cmd_suggest(config: Option<&Path>, catalog: &Path, min_rows: u64, table: &str) -> ExitCode {
    let (engine, catalog) = match (load_engine(config), load_catalog(catalog, min_rows)) {
        (Ok(engine), Ok(catalog)) => (engine, catalog),
        (Err(code), _) | (_, Err(code)) => return code,
    };

    let Some(table) = catalog.find_table(table) else {
        eprintln!("Error: table '{}' not found in catalog", table);
        return ExitCode::FAILURE;
    };

    for suggestion in engine.suggest(table) {
        println!("{}", suggestion.hint);
        println!("  {}", suggestion.sql);
    }

    ExitCode::SUCCESS
}

fn cmd_tables(catalog: &Path, min_rows: u64) -> ExitCode {
    let catalog = match load_catalog(catalog, min_rows) {
        Ok(catalog) => catalog,
        Err(code) => return code,
    };

    if catalog.is_empty() {
        println!("No tables found");
        return ExitCode::SUCCESS;
    }

    println!("Tables:");
    for table in catalog.get_tables() {
        println!(
            "  - {} ({} columns, {} rows)",
            table.name,
            table.columns.len(),
            table.row_count
        );
    }

    ExitCode::SUCCESS
}
