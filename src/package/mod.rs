//! The IDML package: the zip container, its design map, and the document
//! preferences that drive reading order.

mod archive;
mod design_map;
mod parts;
mod preferences;
mod source;

pub use archive::{IDML_MIME_TYPE, Package};
pub use design_map::{DesignMap, Layer};
pub use parts::{
    DESIGN_MAP, MIMETYPE, order_entries, story_id_from_part_name, story_part_name,
};
pub(crate) use parts::package_part_names;
pub use preferences::Preferences;
pub use source::{ArchiveSource, FileSource, MemorySource, SourceReader};
