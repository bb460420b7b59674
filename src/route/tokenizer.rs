use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::route::context::{Context, Exchange};
use crate::route::token::{Message, Segment};

const SEPARATOR: char = '/';
const EXTENSION_MARKER: char = '.';

/// Turns a request into zero or more candidate messages.
///
/// Returning no message means the request is not routed at all.
pub trait Tokenizer<T>: Send + Sync {
    fn analyze(&self, context: &mut Context<'_>) -> Vec<Message<T>>;
}

/// Default tokenizer: one message made of the path's segments.
///
/// Segments starting with `.` are pulled out as content-type hints. A path
/// whose last segment looks like `name.ext` is left to the static file layer
/// unless `.ext` is one of the application's own extensions.
#[derive(Debug, Clone, Default)]
pub struct UrlTokenizer {
    application_extensions: HashSet<String>,
}

impl UrlTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let application_extensions = extensions
            .into_iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .collect();
        Self {
            application_extensions,
        }
    }

    /// Whether `extension` (with or without its leading dot) is routed by
    /// the application.
    pub fn routes_extension(&self, extension: &str) -> bool {
        self.application_extensions
            .contains(&normalize_extension(extension))
    }
}

impl Tokenizer<Segment> for UrlTokenizer {
    fn analyze(&self, context: &mut Context<'_>) -> Vec<Message<Segment>> {
        if let Some(ext) = file_extension(context.path()) {
            if !self.routes_extension(ext) {
                debug!(path = %context.path(), ext, "yielding to static file layer");
                return Vec::new();
            }
        }

        let (hints, segments) = split_segments(context.path());
        context.stash_hints(hints);

        let segments: Arc<[String]> = segments.into();
        let tokens = (0..segments.len())
            .map(|i| Segment::new(segments.clone(), i))
            .collect();

        vec![Message::new(tokens)]
    }
}

/// Splits `path` into `(hints, segments)`.
///
/// Empty entries are dropped; every entry starting with the extension marker
/// becomes a hint. Both lists keep path order.
pub fn split_segments(path: &str) -> (Vec<String>, Vec<String>) {
    path.split(SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .partition(|s| s.starts_with(EXTENSION_MARKER))
}

/// The extension of a trailing `name.ext` segment.
///
/// The segment must contain a dot that is neither its first nor its last
/// character; the extension runs from the last dot.
fn file_extension(path: &str) -> Option<&str> {
    let last = path.rsplit(SEPARATOR).next()?;
    let first_dot = last.find(EXTENSION_MARKER)?;
    if first_dot == 0 || last.ends_with(EXTENSION_MARKER) {
        return None;
    }
    last.rfind(EXTENSION_MARKER).map(|i| &last[i..])
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_ascii_lowercase();
    if ext.starts_with(EXTENSION_MARKER) {
        ext
    } else {
        format!("{EXTENSION_MARKER}{ext}")
    }
}
