//! Filter options.

/// Default upper bound for a single attribute value, in bytes.
pub const DEFAULT_MAX_ATTRIBUTE_SIZE: usize = 4 * 1024 * 1024;

/// Options recognized by the filter and the merge writer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(default))]
pub struct FilterConfig {
    /// Largest attribute value accepted while reading any part.
    pub max_attribute_size: usize,
    /// Unwrap `XMLElement` tagging inside stories and drop XML attributes,
    /// comments and instructions attached to it.
    pub untag_xml_structures: bool,
    /// Extract `Note` contents as referents instead of keeping them opaque.
    pub extract_notes: bool,
    /// Treat stories placed on master spreads as translatable.
    pub extract_master_spreads: bool,
    /// Treat stories on hidden layers as translatable.
    pub extract_hidden_layers: bool,
    /// Drop discretionary hyphens (U+00AD) from extracted text.
    pub skip_discretionary_hyphens: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_attribute_size: DEFAULT_MAX_ATTRIBUTE_SIZE,
            untag_xml_structures: true,
            extract_notes: false,
            extract_master_spreads: true,
            extract_hidden_layers: false,
            skip_discretionary_hyphens: false,
        }
    }
}

impl FilterConfig {
    pub fn with_max_attribute_size(mut self, size: usize) -> Self {
        self.max_attribute_size = size;
        self
    }

    pub fn with_untag_xml_structures(mut self, untag: bool) -> Self {
        self.untag_xml_structures = untag;
        self
    }

    pub fn with_extract_notes(mut self, extract: bool) -> Self {
        self.extract_notes = extract;
        self
    }

    pub fn with_extract_master_spreads(mut self, extract: bool) -> Self {
        self.extract_master_spreads = extract;
        self
    }

    pub fn with_extract_hidden_layers(mut self, extract: bool) -> Self {
        self.extract_hidden_layers = extract;
        self
    }

    pub fn with_skip_discretionary_hyphens(mut self, skip: bool) -> Self {
        self.skip_discretionary_hyphens = skip;
        self
    }

    /// Load options from a JSON file. Missing keys keep their defaults.
    #[cfg(feature = "cli")]
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        serde_json::from_slice(&data).map_err(|e| {
            crate::Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }
}

/// Options for assembling the output package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterConfig {
    /// Deflate level for regenerated and copied parts (default 6).
    pub compression_level: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FilterConfig::default();
        assert_eq!(config.max_attribute_size, 4 * 1024 * 1024);
        assert!(config.untag_xml_structures);
        assert!(!config.extract_notes);
        assert!(config.extract_master_spreads);
        assert!(!config.extract_hidden_layers);
        assert!(!config.skip_discretionary_hyphens);
    }

    #[test]
    fn test_builders() {
        let config = FilterConfig::default()
            .with_extract_notes(true)
            .with_extract_hidden_layers(true)
            .with_max_attribute_size(16);
        assert!(config.extract_notes);
        assert!(config.extract_hidden_layers);
        assert_eq!(config.max_attribute_size, 16);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_from_json_file_keeps_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("filter.json");
        std::fs::write(&path, r#"{"extract_notes": true}"#).unwrap();

        let config = FilterConfig::from_json_file(&path).unwrap();
        assert!(config.extract_notes);
        assert!(config.untag_xml_structures);
        assert_eq!(config.max_attribute_size, DEFAULT_MAX_ATTRIBUTE_SIZE);
    }
}
