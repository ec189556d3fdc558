//! Converts a saved workspace into editable manual input and reports on it.
//!
//! Reads a JSON or YAML workspace, migrates it into input grids, derives
//! distributions from the effects, and prints the effects-table metadata
//! together with a validity summary as JSON on stdout.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mcda_input::adapters::{FileWorkspaceReader, SequentialIdGenerator, UuidIdGenerator};
use mcda_input::config::{AppConfig, LoggingConfig};
use mcda_input::domain::effects_table::{
    build_effects_table, create_effects_table_info, is_study_data_available, rekey_effects_table_info,
    EffectsTableInfo, EffectsTableRow,
};
use mcda_input::domain::foundation::DataSourceId;
use mcda_input::domain::manual_input::ManualInputService;
use mcda_input::domain::workspace::Problem;
use mcda_input::ports::{IdGenerator, WorkspaceReader};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Workspace file (.json, .yaml or .yml).
    #[arg(value_name = "WORKSPACE")]
    workspace: PathBuf,

    /// Configuration file layered under MCDA_INPUT__* environment variables.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Hand out uuid1, uuid2, ... instead of random ids.
    #[arg(long)]
    sequential_ids: bool,

    /// Include the rebuilt problem in the report when the input is valid.
    #[arg(long)]
    emit_problem: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    title: String,
    is_input_data_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_invalid_cell: Option<InvalidCell>,
    duplicate_rows: Vec<DataSourceId>,
    study_data_available: bool,
    rows: Vec<EffectsTableRow>,
    effects_table_info: BTreeMap<String, EffectsTableInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    problem: Option<Problem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InvalidCell {
    data_source: String,
    alternative: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::load(),
    }
    .context("loading configuration")?;
    config.validate().context("validating configuration")?;
    init_tracing(&config.logging);

    let ids: Arc<dyn IdGenerator> = if args.sequential_ids {
        Arc::new(SequentialIdGenerator::new())
    } else {
        Arc::new(UuidIdGenerator)
    };
    let service = ManualInputService::new(config.problem_settings(), ids);

    let workspace = FileWorkspaceReader::new()
        .read(&args.workspace)
        .with_context(|| format!("reading {}", args.workspace.display()))?;
    let title = workspace.problem.title.clone();

    let mut state = service.create_state_from_old_workspace(&workspace);
    state.input_data.distribution = ManualInputService::generate_distributions(&state.input_data)
        .context("deriving distributions")?;
    state.is_input_data_valid = ManualInputService::is_input_data_valid(&state.input_data);
    info!(
        criteria = state.criteria.len(),
        alternatives = state.alternatives.len(),
        valid = state.is_input_data_valid,
        "Migrated workspace"
    );

    let first_invalid_cell = ManualInputService::find_invalid_cell(&state.input_data.effect)
        .or_else(|| ManualInputService::find_invalid_cell(&state.input_data.distribution))
        .map(|(data_source, alternative)| InvalidCell {
            data_source: data_source.to_string(),
            alternative: alternative.to_string(),
        });

    let problem = if state.is_input_data_valid {
        Some(
            service
                .create_problem(
                    &state.criteria,
                    &state.alternatives,
                    &title,
                    state.description.as_deref().unwrap_or_default(),
                    &state.input_data,
                    state.use_favorability,
                )
                .context("rebuilding problem")?,
        )
    } else {
        None
    };

    let effects_table_info = match &problem {
        Some(problem) => create_effects_table_info(&problem.performance_table),
        None => rekey_effects_table_info(
            create_effects_table_info(&workspace.problem.performance_table),
            &state.criteria,
            &state.alternatives,
        ),
    };
    let value_tree = problem.as_ref().and_then(|p| p.value_tree.as_ref());

    let report = Report {
        title,
        is_input_data_valid: state.is_input_data_valid,
        first_invalid_cell,
        duplicate_rows: ManualInputService::duplicate_rows(&state.input_data.effect),
        study_data_available: is_study_data_available(&effects_table_info),
        rows: build_effects_table(value_tree, &state.criteria),
        effects_table_info,
        problem: problem.filter(|_| args.emit_problem),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.filter_directive()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.is_json() {
        builder.json().init();
    } else {
        builder.init();
    }
}
