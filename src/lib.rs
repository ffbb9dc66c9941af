//! delua - Batch driver for decompiling Lua bytecode with unluac.
//!
//! This library walks a file or directory, detects compiled Lua chunks by
//! their header, runs each one through an external decompiler, and mirrors
//! the input tree into an output tree. Plain files are copied unchanged, so
//! the output is a complete, readable copy of the input.
//!
//! # Features
//!
//! - Magic-byte classification (`LuaQ` at offset 1)
//! - Mirrored output: `dir` → `dir.src/`, `file.luac` → `file.src.lua`
//! - Subprocess output captured byte for byte, written atomically
//! - Per-file failure isolation
//! - Optional bounded parallelism
//!
//! # Example
//!
//! ```no_run
//! use delua::{convert_path, ConverterOptions, DecompilerConfig, UnluacDecompiler};
//!
//! fn main() -> delua::Result<()> {
//!     let decompiler = UnluacDecompiler::new(DecompilerConfig::from_current_exe()?);
//!     let report = convert_path("game/scripts", decompiler, ConverterOptions::default())?;
//!
//!     for failure in report.failures() {
//!         eprintln!("{}: {:?}", failure.item.source.display(), failure.error());
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classify;
pub mod converter;
pub mod decompiler;
pub mod error;
pub mod resolve;

// Re-export main types
pub use classify::{is_compiled_artifact, LUA_MAGIC};
pub use converter::{BatchReport, Converter, ConverterOptions, ItemReport, Outcome};
pub use decompiler::{Decompiler, DecompilerConfig, DecompilerOutput, UnluacDecompiler};
pub use error::{Error, Result};
pub use resolve::{resolve, InputKind, Plan, WorkItem};

use std::path::Path;

/// Resolves `input` and converts every file it names.
///
/// Only an invalid input path is returned as an error; per-file failures are
/// recorded in the returned report.
pub fn convert_path<P: AsRef<Path>, D: Decompiler>(
    input: P,
    decompiler: D,
    options: ConverterOptions,
) -> Result<BatchReport> {
    let plan = resolve(input.as_ref())?;
    Ok(Converter::with_options(decompiler, options).run(&plan.items))
}
