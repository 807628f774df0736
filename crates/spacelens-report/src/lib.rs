//! Console and HTML renderers for spacelens.
//!
//! - [`text`] writes the console tables for each subcommand to any
//!   [`std::io::Write`].
//! - [`HtmlReport`] renders the combined application and cache analysis as
//!   one self-contained HTML document with inline CSS.

mod error;
mod format;
mod html;
pub mod text;

pub use error::ReportError;
pub use format::{
    format_count, format_date, format_date_or, format_size, format_size_or_dash, format_timestamp,
    size_class, truncate,
};
pub use html::{DEFAULT_REPORT_FILE, HtmlReport, escape_html};
