//! Silent installation of downloaded artifacts.
//!
//! The installer is chosen by the artifact's extension. Installers run to
//! completion one at a time; there is no timeout.
use crate::catalog::AppSpec;
use crate::error::InstallError;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::process::{Command, Stdio};

/// Installer family, keyed by lowercase file extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallerKind {
    Msi,
    Exe,
    MsixBundle,
    Unsupported(String),
}

impl InstallerKind {
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "msi" => InstallerKind::Msi,
            "exe" => InstallerKind::Exe,
            "msixbundle" => InstallerKind::MsixBundle,
            _ => InstallerKind::Unsupported(extension),
        }
    }
}

/// Runs the installer for one artifact.
pub trait Install {
    fn install(&self, kind: &InstallerKind, path: &Path, app: &AppSpec) -> Result<(), InstallError>;
}

/// Spawns the platform installers and waits for them.
#[derive(Debug, Default)]
pub struct SystemInstaller;

impl Install for SystemInstaller {
    fn install(&self, kind: &InstallerKind, path: &Path, app: &AppSpec) -> Result<(), InstallError> {
        let command = install_command(kind, path, app)?;
        let program = command.program.to_string_lossy().into_owned();
        tracing::info!(app = %app.name, command = %command, "running installer");
        let status = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .status()
            .map_err(|source| InstallError::Spawn {
                program: program.clone(),
                source,
            })?;
        if !status.success() {
            return Err(InstallError::Failed { program, status });
        }
        Ok(())
    }
}

/// Program and arguments for one installer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCommand {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl fmt::Display for InstallCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let argv = std::iter::once(&self.program).chain(&self.args);
        f.write_str(&shell_words::join(argv.map(|arg| arg.to_string_lossy())))
    }
}

/// Command line for installing `path` with the installer for `kind`.
pub fn install_command(
    kind: &InstallerKind,
    path: &Path,
    app: &AppSpec,
) -> Result<InstallCommand, InstallError> {
    let command = match kind {
        InstallerKind::Msi => InstallCommand {
            program: OsString::from("msiexec.exe"),
            args: vec![
                OsString::from("/i"),
                path.as_os_str().to_owned(),
                OsString::from("/qn"),
            ],
        },
        InstallerKind::Exe => InstallCommand {
            program: path.as_os_str().to_owned(),
            args: app
                .install_args
                .to_argv()
                .into_iter()
                .map(OsString::from)
                .collect(),
        },
        InstallerKind::MsixBundle => InstallCommand {
            program: OsString::from("powershell"),
            args: vec![
                OsString::from("-Command"),
                OsString::from(format!(
                    "Add-AppxProvisionedPackage -Online -PackagePath \"{}\" -SkipLicense",
                    path.display()
                )),
            ],
        },
        InstallerKind::Unsupported(extension) => {
            return Err(InstallError::UnsupportedType {
                extension: extension.clone(),
            })
        }
    };
    Ok(command)
}
