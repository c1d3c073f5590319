//! Acquire-and-install orchestration.
//!
//! Runs strictly in order: default categories, then selected apps from the
//! selectable categories, then workspace teardown. Each app is downloaded and
//! installed before the next one starts. Per-app failures are logged and
//! recorded in the [`RunReport`]; they never stop the run.
use crate::acquire::Acquire;
use crate::catalog::{AppSource, AppSpec, Catalog, Category};
use crate::error::AcquireError;
use crate::install::{Install, InstallerKind};
use crate::selection::Selection;
use crate::workspace::{Teardown, Workspace};

/// Stage of a pipeline run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ProcessDefaults,
    ProcessSelectable,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::ProcessDefaults => "defaults",
            Phase::ProcessSelectable => "selectable",
        }
    }
}

/// How one attempted app ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppOutcome {
    Installed,
    AcquireFailed(String),
    InstallFailed(String),
    Unsupported(String),
}

impl AppOutcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self, AppOutcome::Installed)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            AppOutcome::Installed => None,
            AppOutcome::AcquireFailed(reason)
            | AppOutcome::InstallFailed(reason)
            | AppOutcome::Unsupported(reason) => Some(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRecord {
    pub phase: Phase,
    pub category: String,
    pub app: String,
    pub outcome: AppOutcome,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub records: Vec<AppRecord>,
    pub teardown: Option<Teardown>,
}

impl RunReport {
    pub fn failures(&self) -> impl Iterator<Item = &AppRecord> {
        self.records.iter().filter(|record| record.outcome.is_failure())
    }

    pub fn installed_count(&self) -> usize {
        self.records.len() - self.failures().count()
    }
}

pub struct Pipeline<A, I> {
    acquirer: A,
    installer: I,
    workspace: Workspace,
}

impl<A: Acquire, I: Install> Pipeline<A, I> {
    pub fn new(acquirer: A, installer: I, workspace: Workspace) -> Self {
        Self {
            acquirer,
            installer,
            workspace,
        }
    }

    /// Process every default app and every selected app, then tear down.
    pub fn run(&self, catalog: &Catalog, selection: &Selection) -> RunReport {
        let mut report = RunReport::default();
        if let Err(err) = self.workspace.ensure() {
            tracing::error!(error = %format!("{err:#}"), "workspace unavailable; downloads will fail");
        }

        self.process_phase(Phase::ProcessDefaults, &catalog.defaults, &mut report, |_, _| {
            true
        });
        self.process_phase(
            Phase::ProcessSelectable,
            &catalog.selectable,
            &mut report,
            |category_index, app_index| selection.is_selected(category_index, app_index),
        );

        report.teardown = Some(self.workspace.teardown());
        tracing::info!(
            attempted = report.records.len(),
            installed = report.installed_count(),
            failed = report.failures().count(),
            "run complete"
        );
        report
    }

    fn process_phase(
        &self,
        phase: Phase,
        categories: &[Category],
        report: &mut RunReport,
        is_active: impl Fn(usize, usize) -> bool,
    ) {
        let _span = tracing::info_span!("phase", phase = phase.as_str()).entered();
        for (category_index, category) in categories.iter().enumerate() {
            if category.apps.is_empty() {
                tracing::info!(category = %category.name, "no applications available for category");
                continue;
            }
            for (app_index, app) in category.apps.iter().enumerate() {
                if !is_active(category_index, app_index) {
                    tracing::debug!(category = %category.name, app = %app.name, "not selected");
                    continue;
                }
                let outcome = self.process_app(app);
                report.records.push(AppRecord {
                    phase,
                    category: category.name.clone(),
                    app: app.name.clone(),
                    outcome,
                });
            }
        }
    }

    fn process_app(&self, app: &AppSpec) -> AppOutcome {
        if let AppSource::Unsupported { kind } = &app.source {
            tracing::error!(app = %app.name, kind = %kind, "unknown app type");
            return AppOutcome::Unsupported(format!("app type {kind:?}"));
        }

        let prefix = self.workspace.artifact_prefix(&app.name);
        let path = match self.acquirer.fetch(app, &prefix) {
            Ok(path) if path.is_file() => path,
            Ok(path) => {
                let err = AcquireError::ArtifactMissing { path };
                tracing::error!(app = %app.name, error = %err, "failed to download file");
                return AppOutcome::AcquireFailed(err.to_string());
            }
            Err(err) => {
                tracing::error!(app = %app.name, error = %err, "failed to download file");
                return AppOutcome::AcquireFailed(err.to_string());
            }
        };

        let kind = InstallerKind::from_path(&path);
        if let InstallerKind::Unsupported(extension) = &kind {
            tracing::error!(app = %app.name, extension = %extension, "unknown install file type");
            return AppOutcome::Unsupported(format!("install file type {extension:?}"));
        }

        tracing::info!(app = %app.name, path = %path.display(), "installing");
        match self.installer.install(&kind, &path, app) {
            Ok(()) => {
                tracing::info!(app = %app.name, "installed");
                AppOutcome::Installed
            }
            Err(err) => {
                tracing::error!(app = %app.name, error = %err, "install failed");
                AppOutcome::InstallFailed(err.to_string())
            }
        }
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
