//! # idml-filter
//!
//! Extract translatable text from InDesign IDML packages and merge
//! translations back without losing formatting.
//!
//! ## Features
//!
//! - Stories in reading order, following spread geometry and story direction
//! - Hidden layers, hidden items and master spreads handled by configuration
//! - Formatting, hyperlinks, special characters and anchored objects kept as
//!   inline codes
//! - Footnotes, notes and table cells extracted as referenced groups
//! - Unmodified parts copied byte for byte on output
//!
//! ## Quick Start
//!
//! ```no_run
//! use idml_filter::{FilterConfig, extract, roundtrip};
//!
//! for event in extract("brochure.idml", &FilterConfig::default())? {
//!     if let Some(unit) = event.as_text_unit() {
//!         println!("{}: {}", unit.id, unit.source);
//!     }
//! }
//!
//! roundtrip("brochure.idml", "copy.idml", &FilterConfig::default())?;
//! # Ok::<(), idml_filter::Error>(())
//! ```
//!
//! ## Editing text
//!
//! Collected events can be edited before they are merged: set a target on
//! a [`TextUnit`] (reusing the source's code ids) and feed the events to
//! [`merge`].

pub mod config;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod markup;
pub mod merge;
pub mod package;
pub mod spread;
pub mod story;
pub mod style;

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

pub use config::{FilterConfig, WriterConfig};
pub use error::{Error, Result};
pub use extract::{
    Code, CodeType, FilterEvent, IdmlFilter, Span, TagType, TextFragment, TextUnit,
};
pub use merge::IdmlWriter;
pub use package::Package;

/// Read a package and collect every extraction event.
pub fn extract(path: impl AsRef<Path>, config: &FilterConfig) -> Result<Vec<FilterEvent>> {
    let package = Package::open(path)?;
    IdmlFilter::open(package, config.clone())?.collect()
}

/// Write a package from extraction events, typically after translating
/// their text units.
pub fn merge<W: Write + Seek>(
    events: impl IntoIterator<Item = FilterEvent>,
    writer: W,
    config: WriterConfig,
) -> Result<W> {
    let mut merger = IdmlWriter::new(writer, config);
    for event in events {
        merger.handle_event(event)?;
    }
    merger.finish()
}

/// Extract `input` and merge it straight back into `output`.
pub fn roundtrip(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &FilterConfig,
) -> Result<()> {
    let package = Package::open(input)?;
    let mut writer = IdmlWriter::new(File::create(output)?, WriterConfig::default());
    for event in IdmlFilter::open(package, config.clone())? {
        writer.handle_event(event?)?;
    }
    writer.finish()?;
    Ok(())
}
