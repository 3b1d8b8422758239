//! grnbind CLI - build select commands, dump schemas, inspect responses
//!
//! Usage:
//!   grnbind select <table> [-o key=value]... [--drilldown <keys>]
//!   grnbind dump <schema.toml> [--syntax builder|command]
//!   grnbind parse <response.json> [--drilldown <keys>]
//!
//! Examples:
//!   grnbind select Entries -o query=fulltext -o sort-by=-_score --drilldown tag
//!   grnbind dump schema.toml --syntax command
//!   grnbind parse response.json --drilldown "category, tag"

use clap::{Parser, Subcommand};
use grnbind::config::Settings;
use grnbind::logging;
use grnbind::schema::{SchemaDefinition, Syntax};
use grnbind::select::{split_drilldown_keys, Record, SelectCommand, SelectResult};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "grnbind")]
#[command(about = "grnbind - bindings for a full-text search engine's command protocol")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a select command
    Select {
        /// Table to search
        table: String,

        /// Option as key=value (repeatable)
        #[arg(short = 'o', long = "option", value_parser = parse_key_value)]
        options: Vec<(String, String)>,

        /// Drill-down keys, space or comma separated
        #[arg(long)]
        drilldown: Option<String>,
    },

    /// Dump a schema file
    Dump {
        /// Path to a TOML schema
        file: PathBuf,

        /// Output syntax (defaults to the configured syntax)
        #[arg(short, long)]
        syntax: Option<Syntax>,
    },

    /// Parse a select response
    Parse {
        /// Path to a JSON response payload
        file: PathBuf,

        /// Drill-down keys the command was sent with
        #[arg(long)]
        drilldown: Option<String>,
    },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", s))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Keep the handle alive so the log files stay open.
    let _logger = match logging::init(&settings.logger) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Logging error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Select {
            table,
            options,
            drilldown,
        } => cmd_select(table, options, drilldown),
        Commands::Dump { file, syntax } => {
            cmd_dump(file, syntax.unwrap_or(settings.schema.syntax))
        }
        Commands::Parse { file, drilldown } => cmd_parse(file, drilldown),
    }
}

fn cmd_select(table: String, options: Vec<(String, String)>, drilldown: Option<String>) -> ExitCode {
    let mut command = SelectCommand::new(table).options(options);
    if let Some(keys) = drilldown {
        command = command.option("drilldown", keys);
    }

    println!("{}", command.to_command_string());
    ExitCode::SUCCESS
}

fn cmd_dump(file: PathBuf, syntax: Syntax) -> ExitCode {
    let source = match fs::read_to_string(&file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let schema: SchemaDefinition = match toml::from_str(&source) {
        Ok(schema) => schema,
        Err(e) => {
            eprintln!("Schema parse error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = schema.validate() {
        eprintln!("Invalid schema: {}", e);
        return ExitCode::FAILURE;
    }

    print!("{}", schema.dump(syntax));
    ExitCode::SUCCESS
}

fn cmd_parse(file: PathBuf, drilldown: Option<String>) -> ExitCode {
    let raw = match fs::read_to_string(&file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let keys = drilldown
        .as_deref()
        .map(split_drilldown_keys)
        .unwrap_or_default();

    let result = match SelectResult::parse(&raw, &keys) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Response error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Hits: {}", result.n_hits);
    print_records(result.records(), "  ");

    for (key, drill_down) in &result.drill_down {
        println!();
        println!("Drill-down {} (hits: {}):", key, drill_down.n_hits);
        print_records(drill_down.records(), "  ");
    }

    ExitCode::SUCCESS
}

fn print_records(records: &[Record], indent: &str) {
    for record in records {
        let fields: Vec<String> = record
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        println!("{}{}", indent, fields.join(" "));
    }
}
