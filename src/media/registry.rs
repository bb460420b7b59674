use std::collections::HashMap;

use crate::media::family::{MediaFamily, MediaType};

/// Content-type strings and extension hints recognised out of the box.
const STANDARD_TYPES: &[(&str, MediaType)] = &[
    ("text/plain", MediaType::new(MediaFamily::PLAIN_TEXT)),
    (".txt", MediaType::new(MediaFamily::PLAIN_TEXT)),
    ("text/html", MediaType::new(MediaFamily::HTML)),
    (".html", MediaType::new(MediaFamily::HTML)),
    ("application/xhtml+xml", MediaType::new(MediaFamily::XHTML)),
    (".xhtml", MediaType::new(MediaFamily::XHTML)),
    ("application/json", MediaType::new(MediaFamily::JSON)),
    (".json", MediaType::new(MediaFamily::JSON)),
];

/// Read-only table from literal content-type strings to families.
///
/// Built once at startup and shared behind an `Arc`; there is no way to
/// mutate it after [`MediaRegistryBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct MediaRegistry {
    types: HashMap<String, MediaType>,
}

impl MediaRegistry {
    pub fn builder() -> MediaRegistryBuilder {
        MediaRegistryBuilder::default()
    }

    /// The standard plain text, HTML, XHTML and JSON families.
    pub fn standard() -> Self {
        Self::builder().standard().build()
    }

    /// Exact-match lookup.
    pub fn lookup(&self, content_type: &str) -> Option<&MediaType> {
        self.types.get(content_type)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct MediaRegistryBuilder {
    types: HashMap<String, MediaType>,
}

impl MediaRegistryBuilder {
    /// Maps `content_type` to `media`, replacing any earlier entry.
    pub fn register(mut self, content_type: impl Into<String>, media: MediaType) -> Self {
        self.types.insert(content_type.into(), media);
        self
    }

    pub fn standard(mut self) -> Self {
        for (content_type, media) in STANDARD_TYPES {
            self.types.insert(content_type.to_string(), *media);
        }
        self
    }

    pub fn build(self) -> MediaRegistry {
        MediaRegistry { types: self.types }
    }
}
