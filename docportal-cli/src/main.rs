//! # docportal CLI
//!
//! Compare two documents from the command line.
//!
//! Usage:
//!   docportal <reference> <candidate>
//!   docportal --model gpt-4o --json old.txt new.txt
//!
//! Provider selection and credentials come from the environment (see
//! `docportal-llm`'s loader); a `.env` file next to the binary is honored.

use clap::Parser;
use docportal_compare::DocumentComparer;
use docportal_error::{PortalError, TracedError};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docportal")]
#[command(author, version, about = "Compare two documents with an LLM")]
struct Cli {
    /// Reference document path
    reference: PathBuf,

    /// Candidate document path
    candidate: PathBuf,

    /// Model to use instead of the provider's default
    #[arg(short, long)]
    model: Option<String>,

    /// Sampling temperature
    #[arg(short, long, default_value = "0.0")]
    temperature: f32,

    /// Print the comparison as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// On failure, print the full traceback instead of the compact form
    #[arg(short, long)]
    verbose: bool,
}

fn read_document(path: &PathBuf) -> Result<String, PortalError> {
    std::fs::read_to_string(path).map_err(|e| {
        PortalError::wrap(
            format!("error reading document '{}'", path.display()),
            TracedError::wrap("read_document", e),
        )
    })
}

async fn run(cli: &Cli) -> Result<(), PortalError> {
    let reference = read_document(&cli.reference)?;
    let candidate = read_document(&cli.candidate)?;

    let mut comparer = DocumentComparer::from_env()?.with_temperature(cli.temperature);
    if let Some(model) = &cli.model {
        comparer = comparer.with_model(model.as_str());
    }

    let combined = docportal_compare::combine(&reference, &candidate);
    let table = comparer.compare_documents(&combined).await?;

    if cli.json {
        let json = table
            .to_json()
            .map_err(|e| PortalError::wrap("error rendering comparison", e))?;
        println!("{}", json);
    } else {
        println!("{}", table);
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(&cli).await {
        if cli.verbose {
            eprintln!("{}", err.verbose());
        } else {
            eprintln!("{}", err);
        }
        std::process::exit(1);
    }
}
