//! Output generation for JSON and Markdown reports.
//!
//! # Submodules
//!
//! - [`json`]: writes the `CompanyReport` to a JSON file for API consumption
//! - [`markdown`]: converts the `CompanyReport` to a Markdown document for reading
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2026-10-19/
//!     └── tesla.json
//!
//! markdown_output_dir/
//! └── 2026-10-19_tesla.md
//!
//! audio_dir/
//! └── tesla.mp3
//! ```

pub mod json;
pub mod markdown;
