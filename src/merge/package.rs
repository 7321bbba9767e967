use std::io::{Seek, Write};
use std::sync::Arc;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::story::StoryWriter;
use crate::config::WriterConfig;
use crate::error::{Error, Result};
use crate::extract::{FilterEvent, PartSkeleton};
use crate::package::{MIMETYPE, Package};

/// Assembles the output package from a filter's events.
///
/// Entries are written in the order their events arrive. Copied parts are
/// read from the source package named by the start-of-document event; story
/// sub-documents are merged and serialized when they end.
///
/// ```no_run
/// use std::fs::File;
/// use idml_filter::{FilterConfig, IdmlFilter, IdmlWriter, Package, WriterConfig};
///
/// let package = Package::open("in.idml")?;
/// let mut writer = IdmlWriter::new(File::create("out.idml")?, WriterConfig::default());
/// for event in IdmlFilter::open(package, FilterConfig::default())? {
///     writer.handle_event(event?)?;
/// }
/// writer.finish()?;
/// # Ok::<(), idml_filter::Error>(())
/// ```
pub struct IdmlWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    stored: SimpleFileOptions,
    deflated: SimpleFileOptions,
    package: Option<Arc<Package>>,
    story: Option<StoryWriter>,
}

impl<W: Write + Seek> IdmlWriter<W> {
    pub fn new(writer: W, config: WriterConfig) -> Self {
        let compression_level = config.compression_level.unwrap_or(6);
        Self {
            zip: ZipWriter::new(writer),
            stored: SimpleFileOptions::default().compression_method(CompressionMethod::Stored),
            deflated: SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(compression_level as i64)),
            package: None,
            story: None,
        }
    }

    pub fn handle_event(&mut self, event: FilterEvent) -> Result<()> {
        match event {
            FilterEvent::StartDocument(start) => {
                log::debug!("writing package ({})", start.mime_type);
                self.package = Some(start.package);
            }
            FilterEvent::StartSubDocument(start) => {
                if self.story.is_some() {
                    return Err(Error::unexpected(format!(
                        "sub-document {} starts inside another",
                        start.id
                    )));
                }
                self.story = Some(StoryWriter::new(start.part_name));
            }
            FilterEvent::EndSubDocument { id } => {
                let story = self.story.take().ok_or_else(|| {
                    Error::unexpected(format!("sub-document {id} ends without starting"))
                })?;
                let name = story.part_name().to_string();
                let data = story.finish()?;
                log::debug!("writing merged story {name} ({} bytes)", data.len());
                self.write_entry(&name, &data)?;
            }
            FilterEvent::DocumentPart(part) if self.story.is_none() => {
                let PartSkeleton::ZipEntry(name) = &part.skeleton else {
                    return Err(Error::unexpected(format!(
                        "document part {} outside any story",
                        part.id
                    )));
                };
                self.copy_entry(name)?;
            }
            FilterEvent::EndDocument { .. } => {}
            other => match &mut self.story {
                Some(story) => story.push(other)?,
                None => {
                    return Err(Error::unexpected(format!(
                        "event {} outside any story",
                        other.id()
                    )));
                }
            },
        }
        Ok(())
    }

    /// Write the central directory and hand back the underlying writer.
    pub fn finish(self) -> Result<W> {
        if let Some(story) = &self.story {
            return Err(Error::unexpected(format!(
                "story {} is never closed",
                story.part_name()
            )));
        }
        Ok(self.zip.finish()?)
    }

    fn copy_entry(&mut self, name: &str) -> Result<()> {
        let package = self
            .package
            .as_ref()
            .ok_or_else(|| Error::unexpected("package entry before the start of the document"))?;
        let data = package.read_part(name)?;
        self.write_entry(name, &data)
    }

    fn write_entry(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let options = if name == MIMETYPE {
            self.stored
        } else {
            self.deflated
        };
        self.zip.start_file(name, options)?;
        self.zip.write_all(data)?;
        Ok(())
    }
}
