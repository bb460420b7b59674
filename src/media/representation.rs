//! Renderable response artifacts.

use anyhow::Context as _;
use serde::Serialize;

use crate::http::response::{Response, StatusCode};
use crate::media::family::MediaFamily;

pub type BoxRepresentation = Box<dyn Representation>;

/// The terminal artifact of routing: something that writes itself to a
/// response.
///
/// A representation sets its own status, headers and content type.
/// Representations that can be re-expressed in another content-type family
/// say so through [`Representation::convert`].
pub trait Representation: Send {
    fn render(&self, response: &mut Response) -> anyhow::Result<()>;

    /// The family this representation belongs to, if any.
    fn family(&self) -> Option<MediaFamily> {
        None
    }

    /// Builds an equivalent representation in `family`, if compatible.
    fn convert(&self, _family: MediaFamily) -> Option<BoxRepresentation> {
        None
    }
}

/// A representation backed by a closure over the response sink.
pub struct AdHoc<F> {
    render: F,
}

impl<F> AdHoc<F>
where
    F: Fn(&mut Response) -> anyhow::Result<()> + Send,
{
    pub fn new(render: F) -> Self {
        Self { render }
    }
}

impl<F> Representation for AdHoc<F>
where
    F: Fn(&mut Response) -> anyhow::Result<()> + Send,
{
    fn render(&self, response: &mut Response) -> anyhow::Result<()> {
        (self.render)(response)
    }
}

/// Textual body in one of the text-like families.
#[derive(Debug, Clone)]
pub struct Text {
    status: StatusCode,
    family: MediaFamily,
    body: String,
}

impl Text {
    pub fn new(family: MediaFamily, body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::Ok,
            family,
            body: body.into(),
        }
    }

    pub fn plain(body: impl Into<String>) -> Self {
        Self::new(MediaFamily::PLAIN_TEXT, body)
    }

    pub fn html(body: impl Into<String>) -> Self {
        Self::new(MediaFamily::HTML, body)
    }

    pub fn xhtml(body: impl Into<String>) -> Self {
        Self::new(MediaFamily::XHTML, body)
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

impl Representation for Text {
    fn render(&self, response: &mut Response) -> anyhow::Result<()> {
        response.set_status(self.status);
        response.set_content_type(self.family.content_type());
        response.write(self.body.as_bytes());
        Ok(())
    }

    fn family(&self) -> Option<MediaFamily> {
        Some(self.family)
    }
}

/// Structured-document representation.
#[derive(Debug, Clone)]
pub struct Json {
    status: StatusCode,
    value: serde_json::Value,
}

impl Json {
    pub fn new(value: serde_json::Value) -> Self {
        Self {
            status: StatusCode::Ok,
            value,
        }
    }

    pub fn from_serialize<T: Serialize>(value: &T) -> anyhow::Result<Self> {
        let value = serde_json::to_value(value).context("value is not representable as JSON")?;
        Ok(Self::new(value))
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn value(&self) -> &serde_json::Value {
        &self.value
    }
}

impl Representation for Json {
    fn render(&self, response: &mut Response) -> anyhow::Result<()> {
        response.set_status(self.status);
        response.set_content_type(MediaFamily::JSON.content_type());
        response.write(serde_json::to_vec_pretty(&self.value)?);
        Ok(())
    }

    fn family(&self) -> Option<MediaFamily> {
        Some(MediaFamily::JSON)
    }
}

/// Points the client elsewhere with a 3xx status and a `Location` header.
#[derive(Debug, Clone)]
pub struct Redirect {
    status: StatusCode,
    location: String,
}

impl Redirect {
    /// A non-redirect status falls back to 302 Found.
    pub fn new(location: impl Into<String>, status: StatusCode) -> Self {
        let status = if status.is_redirect() {
            status
        } else {
            StatusCode::Found
        };
        Self {
            status,
            location: location.into(),
        }
    }

    pub fn found(location: impl Into<String>) -> Self {
        Self::new(location, StatusCode::Found)
    }

    pub fn see_other(location: impl Into<String>) -> Self {
        Self::new(location, StatusCode::SeeOther)
    }

    pub fn permanent(location: impl Into<String>) -> Self {
        Self::new(location, StatusCode::MovedPermanently)
    }
}

impl Representation for Redirect {
    fn render(&self, response: &mut Response) -> anyhow::Result<()> {
        response.set_status(self.status);
        response.set_header("Location", self.location.clone());
        Ok(())
    }
}

type Builder = Box<dyn Fn() -> BoxRepresentation + Send + Sync>;

/// A representation with an explicit compatibility table.
///
/// Renders as its primary representation; each `or` entry declares a family
/// it can also be expressed in and how to build that alternative.
pub struct Negotiable {
    primary: BoxRepresentation,
    alternatives: Vec<(MediaFamily, Builder)>,
}

impl Negotiable {
    pub fn new(primary: impl Representation + 'static) -> Self {
        Self {
            primary: Box::new(primary),
            alternatives: Vec::new(),
        }
    }

    pub fn or<F, R>(mut self, family: MediaFamily, build: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: Representation + 'static,
    {
        self.alternatives
            .push((family, Box::new(move || Box::new(build()) as BoxRepresentation)));
        self
    }

    /// Families this representation can be converted into.
    pub fn compatible(&self) -> impl Iterator<Item = MediaFamily> + '_ {
        self.alternatives.iter().map(|(family, _)| *family)
    }
}

impl Representation for Negotiable {
    fn render(&self, response: &mut Response) -> anyhow::Result<()> {
        self.primary.render(response)
    }

    fn family(&self) -> Option<MediaFamily> {
        self.primary.family()
    }

    fn convert(&self, family: MediaFamily) -> Option<BoxRepresentation> {
        self.alternatives
            .iter()
            .find(|(f, _)| *f == family)
            .map(|(_, build)| build())
            .or_else(|| self.primary.convert(family))
    }
}
