//! Input resolution and output path mirroring.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Suffix appended to a directory input to name the output directory.
pub const DIR_SUFFIX: &str = ".src";

/// Extension given to the output of a single-file input.
pub const FILE_EXTENSION: &str = "src.lua";

/// One source file and where its converted form goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// File to classify and convert
    pub source: PathBuf,
    /// Mirrored output path
    pub destination: PathBuf,
}

impl WorkItem {
    /// Creates a new work item.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// How the input path was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// A single file
    File,
    /// A directory tree
    Directory,
}

/// The resolved batch: where output goes and every file to process.
#[derive(Debug, Clone)]
pub struct Plan {
    /// Kind of input that produced this plan
    pub kind: InputKind,
    /// Output directory (directory input) or output file (file input)
    pub output_root: PathBuf,
    /// Work items in processing order
    pub items: Vec<WorkItem>,
}

impl Plan {
    /// Number of work items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there is nothing to process.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Resolves an input path into a plan of work items.
///
/// Returns [`Error::InvalidInput`] when the path is neither a file nor a
/// directory.
pub fn resolve(input: &Path) -> Result<Plan> {
    if input.is_dir() {
        let output_root = directory_output(input)?;
        let items = enumerate(input, &output_root);
        Ok(Plan {
            kind: InputKind::Directory,
            output_root,
            items,
        })
    } else if input.is_file() {
        let destination = file_output(input);
        Ok(Plan {
            kind: InputKind::File,
            output_root: destination.clone(),
            items: vec![WorkItem::new(input, destination)],
        })
    } else {
        Err(Error::InvalidInput {
            path: input.to_path_buf(),
        })
    }
}

/// Output path for a single file: the extension is replaced by `.src.lua`.
pub fn file_output(input: &Path) -> PathBuf {
    input.with_extension(FILE_EXTENSION)
}

/// Output directory for a directory input: `<input>.src` as a sibling.
///
/// Inputs such as `.` or `dir/..` have no final name to extend, so they are
/// canonicalized first.
pub fn directory_output(input: &Path) -> Result<PathBuf> {
    // Collecting components drops trailing separators and `.` segments
    let normalized: PathBuf = input.components().collect();
    let base = match normalized.file_name() {
        Some(_) => normalized,
        None => fs::canonicalize(input).map_err(|e| Error::file_open(input, e))?,
    };

    let mut name = base.file_name().map(OsString::from).unwrap_or_default();
    name.push(DIR_SUFFIX);
    Ok(base.with_file_name(name))
}

/// Walks `root` and mirrors every file under `output_root`.
///
/// Unreadable entries are logged and skipped so that one bad subdirectory
/// does not hide the rest of the tree.
fn enumerate(root: &Path, output_root: &Path) -> Vec<WorkItem> {
    let skip_root = fs::canonicalize(output_root).ok();
    let mut items = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| match &skip_root {
            Some(skip) if entry.file_type().is_dir() => {
                fs::canonicalize(entry.path()).map_or(true, |p| &p != skip)
            }
            _ => true,
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                let path = source.path().unwrap_or(root).to_path_buf();
                warn!("{}", Error::Walk { path, source });
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        // Every walked path lives under `root`
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        items.push(WorkItem::new(entry.path(), output_root.join(relative)));
    }

    debug!("Found {} files under {}", items.len(), root.display());
    items
}
