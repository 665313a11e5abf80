//! owlq - OWL schema introspection and SPARQL queries from the command line

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

use owlq_core::{DatasetProperties, OntologyService, ParamValue};

#[derive(Parser)]
#[command(name = "owlq")]
#[command(version)]
#[command(about = "OWL ontology schema introspection and SPARQL queries", long_about = None)]
struct Cli {
    /// Dataset configuration (YAML)
    #[arg(long, short = 'c', default_value = "dataset.yaml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the schema of a class as JSON
    Schema {
        /// Class local name (e.g., Word)
        class: String,
    },
    /// List the named classes of the ontology
    Classes,
    /// Ask whether a triple is stated in the dataset
    Ask {
        /// Subject IRI (prefixed or absolute)
        subject: String,
        /// Predicate IRI (prefixed or absolute)
        predicate: String,
        /// Object IRI, or a literal with --literal
        object: String,
        /// Treat the object as a string literal
        #[arg(long)]
        literal: bool,
    },
    /// Print every predicate/object pair of a subject
    Triples {
        /// Subject IRI (prefixed or absolute)
        subject: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let props = DatasetProperties::load(&cli.config)
        .with_context(|| format!("Failed to read dataset config {}", cli.config.display()))?;
    let service = OntologyService::from_config(props).context("Failed to set up ontology service")?;

    match cli.command {
        Commands::Schema { class } => {
            let schema = service
                .class_schema(&class)
                .with_context(|| format!("Failed to read schema of {}", class))?;
            println!("{}", schema.to_json()?);
        }

        Commands::Classes => {
            for iri in service.library().class_iris()? {
                println!("{}", iri);
            }
        }

        Commands::Ask { subject, predicate, object, literal } => {
            let object = if literal {
                ParamValue::string(object)
            } else {
                ParamValue::iri(object)
            };
            let answer = service.ask_triple(&subject, &predicate, object)?;
            println!("{}", answer);
        }

        Commands::Triples { subject } => {
            let rows = service.select_triple(&subject, None, None)?;
            for row in &rows {
                let predicate = row.get("p").map(String::as_str).unwrap_or("");
                let object = row.get("o").map(String::as_str).unwrap_or("");
                println!("{}\t{}", predicate, object);
            }
            eprintln!("{} triples", rows.len());
        }
    }

    Ok(())
}
