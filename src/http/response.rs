use std::collections::HashMap;

/// Statuses the router and the demo states emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    Created,
    NoContent,
    MovedPermanently,
    Found,
    SeeOther,
    BadRequest,
    /// Anti-forgery validation failed, or a state refused the route.
    Forbidden,
    /// No route matched.
    NotFound,
    /// The resolved state has no handler for the method.
    MethodNotAllowed,
    InternalServerError,
}

impl StatusCode {
    const fn parts(self) -> (u16, &'static str) {
        match self {
            StatusCode::Ok => (200, "OK"),
            StatusCode::Created => (201, "Created"),
            StatusCode::NoContent => (204, "No Content"),
            StatusCode::MovedPermanently => (301, "Moved Permanently"),
            StatusCode::Found => (302, "Found"),
            StatusCode::SeeOther => (303, "See Other"),
            StatusCode::BadRequest => (400, "Bad Request"),
            StatusCode::Forbidden => (403, "Forbidden"),
            StatusCode::NotFound => (404, "Not Found"),
            StatusCode::MethodNotAllowed => (405, "Method Not Allowed"),
            StatusCode::InternalServerError => (500, "Internal Server Error"),
        }
    }

    /// ```
    /// # use arcroute::http::response::StatusCode;
    /// assert_eq!(StatusCode::SeeOther.as_u16(), 303);
    /// ```
    pub fn as_u16(&self) -> u16 {
        self.parts().0
    }

    /// ```
    /// # use arcroute::http::response::StatusCode;
    /// assert_eq!(StatusCode::MethodNotAllowed.reason_phrase(), "Method Not Allowed");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        self.parts().1
    }

    pub fn is_redirect(&self) -> bool {
        matches!(
            self,
            StatusCode::MovedPermanently | StatusCode::Found | StatusCode::SeeOther
        )
    }
}

/// The sink every representation renders into.
///
/// A representation sets status, headers and content type, then appends the
/// body with [`Response::write`]. [`Response::finish`] fixes `Content-Length`
/// once rendering is over.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Plain-text response produced by the transport itself.
    fn plain(status: StatusCode) -> Self {
        let mut response = Self::new(status);
        response.set_content_type("text/plain");
        response.write(format!("{} {}", status.as_u16(), status.reason_phrase()));
        response.finish()
    }

    /// Sent for requests the router declines.
    pub fn not_found() -> Self {
        Self::plain(StatusCode::NotFound)
    }

    /// Sent when routing fails with a fatal signal.
    pub fn internal_error() -> Self {
        Self::plain(StatusCode::InternalServerError)
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(key.into(), value.into());
    }

    pub fn set_content_type(&mut self, content_type: &str) {
        self.set_header("Content-Type", content_type);
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }

    /// Appends bytes to the body.
    pub fn write(&mut self, bytes: impl AsRef<[u8]>) {
        self.body.extend_from_slice(bytes.as_ref());
    }

    /// Lossy UTF-8 view of the body.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Sets `Content-Length` from the rendered body.
    pub fn finish(mut self) -> Self {
        let len = self.body.len().to_string();
        self.set_header("Content-Length", len);
        self
    }
}
