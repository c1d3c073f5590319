use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod acquire;
mod catalog;
mod cli;
mod config;
mod error;
mod install;
mod pipeline;
mod report;
mod selection;
mod workspace;

use crate::acquire::NetworkAcquirer;
use crate::catalog::Catalog;
use crate::cli::{Mode, RootArgs, GITHUB_API_ENV};
use crate::config::ConfigSource;
use crate::install::SystemInstaller;
use crate::pipeline::Pipeline;
use crate::selection::{Selection, SelectionRequest};
use crate::workspace::{Teardown, Workspace};

fn main() -> Result<()> {
    init_tracing();
    let args = RootArgs::parse();

    let source = ConfigSource::from_args(args.config.clone(), args.config_path.clone());
    let catalog = config::load_config(&source).context("failed to load config")?;
    let request = args
        .optional_select
        .as_deref()
        .map(SelectionRequest::parse)
        .unwrap_or_default();
    if let Some(raw) = args.optional_select.as_deref().filter(|_| !request.is_empty()) {
        tracing::info!(selection = raw, "applying selection");
    }
    let selection = selection::resolve(&catalog, &request);

    match args.mode() {
        Mode::Info => print!("{}", report::render_info(&catalog, &selection)),
        Mode::ObjectDump => {
            println!("{}", report::render_object(&catalog.with_selection(&selection)));
        }
        Mode::JsonDump => {
            println!("{}", report::render_json(&catalog.with_selection(&selection))?);
        }
        Mode::Install => run_install(&catalog, &selection, args.strict)?,
    }
    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rebloat=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_install(catalog: &Catalog, selection: &Selection, strict: bool) -> Result<()> {
    let mut acquirer = NetworkAcquirer::new();
    if let Ok(api_base) = std::env::var(GITHUB_API_ENV) {
        if !api_base.trim().is_empty() {
            acquirer = acquirer.with_api_base(api_base.trim());
        }
    }
    let workspace = Workspace::new(Workspace::default_root());
    tracing::info!(
        defaults = catalog.defaults.len(),
        selected = selection.selected_count(),
        workspace = %workspace.root().display(),
        "starting installation"
    );
    let pipeline = Pipeline::new(acquirer, SystemInstaller, workspace.clone());
    let report = pipeline.run(catalog, selection);

    if let Some(Teardown::Failed(err)) = &report.teardown {
        tracing::warn!(
            error = %err,
            "remove {} manually once installers have exited",
            workspace.root().display()
        );
    }
    for record in report.failures() {
        tracing::warn!(
            phase = record.phase.as_str(),
            category = %record.category,
            app = %record.app,
            reason = record.outcome.reason().unwrap_or_default(),
            "not installed"
        );
    }
    let failed = report.failures().count();
    if strict && failed > 0 {
        return Err(anyhow!("{failed} of {} app(s) were not installed", report.records.len()));
    }
    Ok(())
}
