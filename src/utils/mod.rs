//! Shared utility functions.
//!
//! - [`content_length`] - advertised size extraction and percentage math
//! - [`filename`] - display name derivation from a URL

pub mod content_length;
pub mod filename;

pub use content_length::{advertised_length, parse_content_length, percent_of};
pub use filename::filename_from_url;
