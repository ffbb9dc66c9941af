//! External decompiler invocation.
//!
//! The converter only needs "run the decompiler on this file and hand back
//! what it printed", which is the [`Decompiler`] trait. [`UnluacDecompiler`]
//! is the production implementation: it spawns
//! `<runtime> -jar <archive> --rawstring <source>` from the tool directory
//! and collects both output streams.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{Error, Result};

/// Default Java runtime used to run the decompiler archive.
pub const DEFAULT_RUNTIME: &str = "java";

/// Default decompiler archive, resolved against the tool directory.
pub const DEFAULT_ARCHIVE: &str = "unluac.jar";

/// Everything a decompiler run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecompilerOutput {
    /// Decompiled source text, exactly as written by the tool
    pub stdout: Vec<u8>,
    /// Diagnostics
    pub stderr: Vec<u8>,
    /// Exit code, or `None` if the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl DecompilerOutput {
    /// Returns true if the process exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Something that turns a compiled artifact into source text.
///
/// Implementations report a failed run through [`DecompilerOutput::exit_code`]
/// and reserve `Err` for failures to run at all.
pub trait Decompiler: Send + Sync {
    /// Decompiles the artifact at `source`.
    fn decompile(&self, source: &Path) -> Result<DecompilerOutput>;
}

impl<D: Decompiler + ?Sized> Decompiler for &D {
    fn decompile(&self, source: &Path) -> Result<DecompilerOutput> {
        (**self).decompile(source)
    }
}

/// Where to find the decompiler and how to run it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecompilerConfig {
    /// Java runtime executable
    pub runtime: PathBuf,
    /// Decompiler archive passed to `-jar`
    pub archive: PathBuf,
    /// Working directory of the child process
    pub working_dir: PathBuf,
}

impl DecompilerConfig {
    /// Creates a config with the default runtime and archive in `working_dir`.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            runtime: PathBuf::from(DEFAULT_RUNTIME),
            archive: PathBuf::from(DEFAULT_ARCHIVE),
            working_dir: working_dir.into(),
        }
    }

    /// Creates a config that runs from the directory holding the current
    /// executable, where a bundled `unluac.jar` is expected.
    pub fn from_current_exe() -> Result<Self> {
        let exe = std::env::current_exe().map_err(Error::CurrentExe)?;
        let dir = exe.parent().ok_or_else(|| {
            Error::CurrentExe(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("'{}' has no parent directory", exe.display()),
            ))
        })?;
        Ok(Self::new(dir))
    }

    /// Sets the runtime executable.
    pub fn with_runtime(mut self, runtime: impl Into<PathBuf>) -> Self {
        self.runtime = runtime.into();
        self
    }

    /// Sets the decompiler archive.
    pub fn with_archive(mut self, archive: impl Into<PathBuf>) -> Self {
        self.archive = archive.into();
        self
    }
}

/// Runs unluac through a Java runtime.
#[derive(Debug, Clone)]
pub struct UnluacDecompiler {
    config: DecompilerConfig,
}

impl UnluacDecompiler {
    /// Creates a decompiler from its configuration.
    pub fn new(config: DecompilerConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DecompilerConfig {
        &self.config
    }

    fn command(&self, source: &Path) -> Command {
        let mut cmd = Command::new(&self.config.runtime);
        cmd.arg("-jar")
            .arg(&self.config.archive)
            .arg("--rawstring")
            .arg(source)
            .current_dir(&self.config.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl Decompiler for UnluacDecompiler {
    fn decompile(&self, source: &Path) -> Result<DecompilerOutput> {
        // The child runs from the tool directory, so a relative path would
        // resolve against the wrong place.
        let source = std::path::absolute(source).map_err(|e| Error::file_open(source, e))?;

        debug!(
            "Running {} -jar {} --rawstring {}",
            self.config.runtime.display(),
            self.config.archive.display(),
            source.display()
        );

        let child = self
            .command(&source)
            .spawn()
            .map_err(|e| Error::DecompilerSpawn {
                program: self.config.runtime.clone(),
                source: e,
            })?;

        // Drains stdout and stderr together before reaping the child
        let output = child.wait_with_output().map_err(|e| Error::DecompilerIo {
            path: source.clone(),
            source: e,
        })?;

        Ok(DecompilerOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code: output.status.code(),
        })
    }
}
