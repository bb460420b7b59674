use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::warn;

use crate::media::representation::{BoxRepresentation, Representation};

/// A named family of representations sharing one content type.
///
/// Families are plain values; equality is by name. Applications add their own
/// with [`MediaFamily::new`].
#[derive(Debug, Clone, Copy)]
pub struct MediaFamily {
    name: &'static str,
    content_type: &'static str,
}

impl MediaFamily {
    pub const PLAIN_TEXT: MediaFamily = MediaFamily::new("plain-text", "text/plain");
    pub const HTML: MediaFamily = MediaFamily::new("html", "text/html");
    pub const XHTML: MediaFamily = MediaFamily::new("xhtml", "application/xhtml+xml");
    pub const JSON: MediaFamily = MediaFamily::new("json", "application/json");

    pub const fn new(name: &'static str, content_type: &'static str) -> Self {
        Self { name, content_type }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }
}

impl PartialEq for MediaFamily {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for MediaFamily {}

impl Hash for MediaFamily {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for MediaFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.content_type)
    }
}

/// Outcome of asking a [`MediaType`] to take over a representation.
pub enum Conversion {
    /// The representation already belongs to the family.
    Identity,
    /// A new representation of the family was built.
    Converted(BoxRepresentation),
    /// The representation does not declare compatibility with the family.
    Incompatible,
}

/// A content-type family as registered for negotiation, with its relative
/// quality factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaType {
    family: MediaFamily,
    quality: f32,
}

impl MediaType {
    /// A family at the default quality of 1.0.
    pub const fn new(family: MediaFamily) -> Self {
        Self {
            family,
            quality: 1.0,
        }
    }

    /// A family with an explicit quality factor, clamped to `0.0..=1.0`.
    pub fn qualified(family: MediaFamily, quality: f32) -> Self {
        Self {
            family,
            quality: quality.clamp(0.0, 1.0),
        }
    }

    pub fn family(&self) -> MediaFamily {
        self.family
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Converts `rep` into this family.
    ///
    /// Succeeds only when the representation is already of the family or its
    /// compatibility table has an entry for it. A converted result that lands
    /// in some other family is discarded.
    pub fn convert(&self, rep: &dyn Representation) -> Conversion {
        if rep.family() == Some(self.family) {
            return Conversion::Identity;
        }

        match rep.convert(self.family) {
            Some(alt) if alt.family() == Some(self.family) => Conversion::Converted(alt),
            Some(alt) => {
                warn!(
                    requested = %self.family,
                    produced = ?alt.family().map(|f| f.content_type()),
                    "conversion produced a representation outside the requested family"
                );
                Conversion::Incompatible
            }
            None => Conversion::Incompatible,
        }
    }
}
