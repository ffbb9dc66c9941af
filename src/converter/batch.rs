//! The conversion driver: classify, then decompile or copy each work item.

use tracing::{debug, info};

use crate::classify::is_compiled_artifact;
use crate::decompiler::Decompiler;
use crate::error::{Error, Result};
use crate::resolve::WorkItem;

use super::{copy_verbatim, ensure_parent, write_atomic, BatchReport, ItemReport, Outcome};

/// Options for a conversion batch.
#[derive(Debug, Clone)]
pub struct ConverterOptions {
    /// Number of items processed at once (1 = sequential)
    pub jobs: usize,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self { jobs: 1 }
    }
}

/// Converts work items using a [`Decompiler`] for compiled artifacts.
#[derive(Debug)]
pub struct Converter<D> {
    decompiler: D,
    options: ConverterOptions,
}

impl<D: Decompiler> Converter<D> {
    /// Creates a converter with default options.
    pub fn new(decompiler: D) -> Self {
        Self::with_options(decompiler, ConverterOptions::default())
    }

    /// Creates a converter with custom options.
    pub fn with_options(decompiler: D, options: ConverterOptions) -> Self {
        Self {
            decompiler,
            options,
        }
    }

    /// Returns the options.
    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }

    /// Processes a single work item.
    ///
    /// The destination directory is created first. Compiled artifacts are
    /// decompiled and the tool's stdout is written to the destination; a
    /// non-zero exit leaves the destination untouched. Other files are
    /// copied byte for byte.
    pub fn convert_item(&self, item: &WorkItem) -> Result<Outcome> {
        ensure_parent(&item.destination)?;

        if !is_compiled_artifact(&item.source)? {
            debug!("Copying {}", item.source.display());
            copy_verbatim(&item.source, &item.destination)?;
            return Ok(Outcome::Copied);
        }

        debug!("Decompiling {}", item.source.display());
        let output = self.decompiler.decompile(&item.source)?;
        if !output.success() {
            return Err(Error::DecompilerFailed {
                path: item.source.clone(),
                exit_code: output.exit_code,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        write_atomic(&item.destination, &output.stdout)?;
        Ok(Outcome::Converted)
    }

    /// Processes every item and collects a report per item.
    pub fn run(&self, items: &[WorkItem]) -> BatchReport {
        self.run_with(items, |_| {})
    }

    /// Processes every item, calling `on_report` as each one finishes.
    ///
    /// A failing item never stops the batch. Reports are returned in the
    /// order of `items` even when several jobs run at once.
    pub fn run_with<F>(&self, items: &[WorkItem], on_report: F) -> BatchReport
    where
        F: Fn(&ItemReport) + Sync,
    {
        let process = |item: &WorkItem| {
            let report = ItemReport {
                item: item.clone(),
                result: self.convert_item(item),
            };
            on_report(&report);
            report
        };

        if self.options.jobs <= 1 || items.len() <= 1 {
            return items.iter().map(process).collect();
        }

        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.jobs)
            .build()
        {
            Ok(pool) => {
                use rayon::prelude::*;
                info!("Converting {} files with {} jobs", items.len(), self.options.jobs);
                pool.install(|| items.par_iter().map(process).collect::<Vec<_>>())
                    .into_iter()
                    .collect()
            }
            Err(e) => {
                debug!("Falling back to sequential conversion: {}", e);
                items.iter().map(process).collect()
            }
        }
    }
}
