//! Option sources for selection controls.
//!
//! Options are either embedded in a field definition or fetched as JSON from
//! the field's `dataSource` URL.

mod client;
mod error;
mod resolver;

pub use client::{parse_options_payload, OptionClient, DEFAULT_TIMEOUT_SECS};
pub use error::{Result, SourceError};
pub use resolver::{FetchRequest, OptionSource, OptionSourceConfig};
