//! Command implementations for the AskMe CLI.

use std::fs;
use std::path::Path;

use log::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::AskmeConfig;
use crate::error::{AskmeError, Result};
use crate::query_expansion::{QueryBuilder, ScriptedEdit};
use crate::search::SearchResponse;

/// Execute a CLI command.
pub fn execute_command(args: AskmeArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    match &args.command {
        Command::Formula(build_args) => show_formula(build_args, config, &args),
        Command::Query(query_args) => show_query(query_args, config, &args),
        Command::History(history_args) => show_history(history_args, config, &args),
    }
}

/// Load the configuration file, or fall back to defaults.
fn load_config(path: Option<&Path>) -> Result<AskmeConfig> {
    match path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            AskmeConfig::load_from_file(path)
        }
        None => Ok(AskmeConfig::default()),
    }
}

/// Build the query described by the seed term and optional edit script.
pub fn build_query(args: &BuildArgs, config: AskmeConfig) -> Result<QueryBuilder> {
    let edits = match &args.script {
        Some(script) => load_script(script)?,
        None => Vec::new(),
    };
    info!(
        "Replaying {} edits on seed term {:?}",
        edits.len(),
        args.seed
    );
    Ok(QueryBuilder::replay(args.seed.clone(), &edits, config))
}

fn load_script(path: &Path) -> Result<Vec<ScriptedEdit>> {
    let content = fs::read_to_string(path).map_err(|e| {
        AskmeError::invalid_argument(format!(
            "Failed to read edit script '{}': {}",
            path.display(),
            e
        ))
    })?;
    Ok(ScriptedEdit::parse_script(&content)?)
}

/// Print the formula.
fn show_formula(args: &BuildArgs, config: AskmeConfig, cli_args: &AskmeArgs) -> Result<()> {
    let builder = build_query(args, config)?;
    output_formula(
        &FormulaResult {
            formula: builder.formula(),
            specifications: builder.len(),
            document_inclusions: builder.document_inclusions().to_vec(),
            document_exclusions: builder.document_exclusions().to_vec(),
        },
        cli_args,
    )
}

/// Print or save the query object.
fn show_query(args: &QueryArgs, config: AskmeConfig, cli_args: &AskmeArgs) -> Result<()> {
    let builder = build_query(&args.build, config)?;

    match &args.output {
        Some(path) => {
            builder.save_query(path)?;
            output_saved_query(
                &SavedQueryResult {
                    path: path.to_string_lossy().to_string(),
                    formula: builder.formula(),
                },
                cli_args,
            )
        }
        None => output_query(&builder.to_query_object(), cli_args),
    }
}

/// Print the history, after attaching a saved engine response if given.
fn show_history(args: &HistoryArgs, config: AskmeConfig, cli_args: &AskmeArgs) -> Result<()> {
    let mut builder = build_query(&args.build, config)?;

    if let Some(path) = &args.response {
        let response: SearchResponse = fs::read_to_string(path)?.parse()?;
        info!("Attaching {} from {}", response, path.display());
        builder.attach_result(response.summary());
    }

    output_history(builder.history(), &builder.query().positive_terms(), cli_args)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_build_query_from_script() {
        let mut script = tempfile::NamedTempFile::new().unwrap();
        write!(
            script,
            r#"[
                {{"op": "exclude_documents", "ids": ["d1", "d2"]}},
                {{"op": "include_terms", "terms": ["tectonic activity"]}},
                {{"op": "exclude_terms", "terms": ["shock"]}}
            ]"#
        )
        .unwrap();

        let args = BuildArgs {
            seed: "earthquake".to_string(),
            script: Some(script.path().to_path_buf()),
        };
        let builder = build_query(&args, AskmeConfig::default()).unwrap();

        assert_eq!(
            builder.formula(),
            "((\"earthquake\" AND \"tectonic activity\") AND (NOT \"shock\"))"
        );
        assert_eq!(builder.history().len(), 4);
    }

    #[test]
    fn test_build_query_without_script() {
        let args = BuildArgs {
            seed: "earthquake".to_string(),
            script: None,
        };
        let builder = build_query(&args, AskmeConfig::default()).unwrap();
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_build_query_with_malformed_script() {
        let mut script = tempfile::NamedTempFile::new().unwrap();
        write!(script, r#"{{"op": "include_terms"}}"#).unwrap();

        let args = BuildArgs {
            seed: "earthquake".to_string(),
            script: Some(script.path().to_path_buf()),
        };
        assert!(matches!(
            build_query(&args, AskmeConfig::default()),
            Err(AskmeError::Json(_))
        ));
    }

    #[test]
    fn test_missing_script_is_reported() {
        let args = BuildArgs {
            seed: "earthquake".to_string(),
            script: Some("/nonexistent/edits.json".into()),
        };
        let err = build_query(&args, AskmeConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Failed to read edit script"));
    }
}
