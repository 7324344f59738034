//! Grouped log viewing and annotation: chunked file loading, ZIP extraction,
//! file groups, search, and a curated document of formatted lines that is
//! saved as HTML.

shadow_rs::shadow!(build);

pub mod archive;
pub mod chunked_loader;
pub mod color;
pub mod config;
pub mod document;
pub mod error;
pub mod formatter;
pub mod group;
pub mod html;
pub mod rich_line;
pub mod search;
pub mod session;
pub mod sorter;
pub mod temp_store;
pub mod timestamp;
pub mod utils;
pub mod version;

pub use error::{LogNoteError, Result};
pub use session::Session;
