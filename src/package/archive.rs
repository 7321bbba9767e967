use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use zip::{CompressionMethod, ZipArchive};

use super::parts::MIMETYPE;
use super::source::{ArchiveSource, FileSource, MemorySource, SourceReader};
use crate::error::{Error, Result};

pub const IDML_MIME_TYPE: &str = "application/vnd.adobe.indesign-idml-package";

/// An opened IDML package.
///
/// The zip central directory is read once; parts are then read directly from
/// their recorded offsets, so the package can be shared between readers.
pub struct Package {
    source: Arc<dyn ArchiveSource>,
    entries: Vec<EntryLocation>,
    index: HashMap<String, usize>,
}

#[derive(Debug, Clone)]
struct EntryLocation {
    name: String,
    data_offset: u64,
    compressed_size: u64,
    compression: EntryCompression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryCompression {
    Stored,
    Deflated,
    Unsupported,
}

impl Package {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_source(Arc::new(FileSource::new(file)?))
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_source(Arc::new(MemorySource::new(data)))
    }

    /// Index the archive and check its media type.
    pub fn from_source(source: Arc<dyn ArchiveSource>) -> Result<Self> {
        let mut archive = ZipArchive::new(SourceReader::new(source.clone()))?;

        let mut entries = Vec::with_capacity(archive.len());
        let mut index = HashMap::new();
        for i in 0..archive.len() {
            let file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let compression = match file.compression() {
                CompressionMethod::Stored => EntryCompression::Stored,
                CompressionMethod::Deflated => EntryCompression::Deflated,
                _ => EntryCompression::Unsupported,
            };
            let name = file.name().to_string();
            let data_offset = file
                .data_start()
                .ok_or_else(|| Error::InvalidPackage(format!("no data offset for {name}")))?;
            index.insert(name.clone(), entries.len());
            entries.push(EntryLocation {
                name,
                data_offset,
                compressed_size: file.compressed_size(),
                compression,
            });
        }

        let package = Self {
            source,
            entries,
            index,
        };
        package.check_mime_type()?;
        log::debug!("opened IDML package with {} entries", package.entries.len());
        Ok(package)
    }

    /// The `mimetype` entry must come first and name the IDML media type.
    fn check_mime_type(&self) -> Result<()> {
        if !self.contains(MIMETYPE) {
            return Err(Error::InvalidPackage("missing mimetype entry".to_string()));
        }
        if let Some(first) = self.entry_names().next()
            && first != MIMETYPE
        {
            return Err(Error::InvalidPackage(format!(
                "mimetype must be the first entry, found {first}"
            )));
        }
        let data = self.read_part(MIMETYPE)?;
        let mime = std::str::from_utf8(&data)?.trim_end();
        if mime != IDML_MIME_TYPE {
            return Err(Error::InvalidPackage(format!(
                "unexpected mime type {mime:?}"
            )));
        }
        Ok(())
    }

    /// Entry names in archive order.
    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Read and decompress one part.
    pub fn read_part(&self, name: &str) -> Result<Vec<u8>> {
        let entry = self
            .index
            .get(name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| Error::InvalidPackage(format!("part not found: {name}")))?;

        let compressed = self
            .source
            .read_at(entry.data_offset, entry.compressed_size as usize)?;
        match entry.compression {
            EntryCompression::Stored => Ok(compressed),
            EntryCompression::Deflated => {
                let mut decoder = flate2::read::DeflateDecoder::new(&compressed[..]);
                let mut out = Vec::new();
                decoder.read_to_end(&mut out)?;
                Ok(out)
            }
            EntryCompression::Unsupported => Err(Error::InvalidPackage(format!(
                "unsupported compression method for {name}"
            ))),
        }
    }
}

impl fmt::Debug for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Package")
            .field("entries", &self.entries.len())
            .finish()
    }
}
