//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cli::args::{AskmeArgs, OutputFormat};
use crate::error::Result;
use crate::query_expansion::{History, Snapshot};
use crate::util::highlight;

/// Result structure for the formula command.
#[derive(Debug, Serialize, Deserialize)]
pub struct FormulaResult {
    pub formula: String,
    pub specifications: usize,
    pub document_inclusions: Vec<String>,
    pub document_exclusions: Vec<String>,
}

/// Result structure for a query object written to disk.
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedQueryResult {
    pub path: String,
    pub formula: String,
}

/// Print the formula of a build.
pub fn output_formula(result: &FormulaResult, args: &AskmeArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Json => output_json(result, args),
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                println!("Specifications: {}", result.specifications);
                println!("Included documents: [{}]", result.document_inclusions.join(", "));
                println!("Excluded documents: [{}]", result.document_exclusions.join(", "));
                println!();
            }
            println!("{}", result.formula);
            Ok(())
        }
    }
}

/// Print a query object. Human output is always pretty-printed.
pub fn output_query(query: &Value, args: &AskmeArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Json => output_json(query, args),
        OutputFormat::Human => {
            println!("{}", serde_json::to_string_pretty(query)?);
            Ok(())
        }
    }
}

/// Report where a query object was saved.
pub fn output_saved_query(result: &SavedQueryResult, args: &AskmeArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Json => output_json(result, args),
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                println!("Query {} saved to {}", result.formula, result.path);
            }
            Ok(())
        }
    }
}

/// Print a history, highlighting `terms` in the titles of attached results.
pub fn output_history(history: &History, terms: &[&str], args: &AskmeArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Json => output_json(history, args),
        OutputFormat::Human => {
            println!("History:");
            println!("════════");
            for snapshot in history {
                output_snapshot_human(snapshot, terms, args);
            }
            Ok(())
        }
    }
}

fn output_snapshot_human(snapshot: &Snapshot, terms: &[&str], args: &AskmeArgs) {
    println!();
    println!("{snapshot}");

    if args.verbosity() > 1 {
        for specification in snapshot.specifications() {
            println!("    {specification}");
        }
    }

    if let Some(result) = snapshot.result() {
        println!("─────────────");
        for (i, document) in result.iter().enumerate() {
            println!(
                "{:3}  {}  {:7.4}  {}",
                i + 1,
                document.id,
                document.score,
                highlight(&document.title, terms)
            );
        }
    }
}

/// Output in JSON format.
fn output_json<T: Serialize + ?Sized>(result: &T, args: &AskmeArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}
