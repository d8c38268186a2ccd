//! tabzero - Pure-Rust tabular data converter between Excel, CSV and JSON Lines
//!
//! This crate converts tabular data files between CSV, Excel (.xlsx) and
//! line-delimited JSON, with optional column projection, string transforms,
//! file fragmentation, multi-file merging and sequential batch execution.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tabzero::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a converter with default settings
//!     let converter = ConverterBuilder::new().build()?;
//!
//!     // Formats are selected by file extension
//!     converter.convert("input.xlsx", "output.csv")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! For a one-off conversion with column projection, use the free function:
//!
//! ```rust,no_run
//! # fn main() -> Result<(), tabzero::ConvertError> {
//! tabzero::convert("data.jsonl", "out.csv", &["b".to_string()])?;
//! # Ok(())
//! # }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use tabzero::{ColumnTransform, ConverterBuilder, LinePolicy, SheetSelector, StringOp};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new()
//!         .with_delimiter(b';')                            // Semicolon-separated CSV
//!         .with_sheet_selector(SheetSelector::Index(0))    // First sheet only
//!         .with_line_policy(LinePolicy::Strict)            // Fail on malformed JSON lines
//!         .with_transform(ColumnTransform::new("name", StringOp::Trim))
//!         .build()?;
//!
//!     converter.convert("input.csv", "output.xlsx")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Fragmentation and Merging
//!
//! ```rust,no_run
//! use tabzero::MergeMode;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Split a large CSV into parts of roughly 10 MB each
//!     let parts = tabzero::fragment("big.csv", 10.0)?;
//!
//!     // Merge them back into a single file
//!     tabzero::merge(&parts, "merged.csv", MergeMode::SingleSheet)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Background Batch Conversion
//!
//! ```rust,no_run
//! use tabzero::{ConversionJob, ConverterBuilder, run_batch};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new().build()?;
//!     let jobs = vec![
//!         ConversionJob::new("a.csv", "a.xlsx"),
//!         ConversionJob::new("b.jsonl", "b.csv"),
//!     ];
//!
//!     // Jobs run strictly one at a time on a background thread
//!     let handle = run_batch(converter, jobs);
//!     let summary = handle.wait();
//!     println!("{} jobs done", summary.done_count());
//!
//!     Ok(())
//! }
//! ```

mod api;
mod batch;
mod builder;
mod error;
mod fragment;
mod merge;
mod reader;
mod report;
mod transform;
mod types;
mod writer;

// 公開API
pub use api::{Format, LinePolicy, MergeMode, SheetSelector};
pub use batch::{
    run_batch, BatchEvent, BatchHandle, BatchSummary, ConversionJob, JobStatus,
};
pub use builder::{convert, Converter, ConverterBuilder};
pub use error::ConvertError;
pub use fragment::{fragment, fragment_with_reporter};
pub use merge::{merge, merge_with_reporter, MergeReport};
pub use report::{
    CollectingReporter, NullReporter, Reporter, SharedReporter, TracingReporter,
};
pub use transform::{ColumnTransform, StringOp};
pub use types::{Dataset, Value, Workbook};
