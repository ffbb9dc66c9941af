//! Conversion of resolved work items into the output tree.
//!
//! Each item goes through the same steps:
//!
//! 1. **Prepare** - Create the destination's parent directories
//! 2. **Classify** - Sniff the header for the compiled-chunk marker
//! 3. **Decompile or copy** - Artifacts go through the [`Decompiler`](crate::Decompiler)
//!    and its stdout is written atomically; everything else is copied verbatim
//!
//! Failures are captured in the item's [`ItemReport`] and never stop the batch.

mod batch;
mod report;
mod writer;

pub use batch::*;
pub use report::*;
pub use writer::*;
