use std::collections::HashMap;
use std::fmt;

/// HTTP request methods understood by the router.
///
/// This is a closed set. A request carrying any other method name is still
/// parsed and routed; dispatch answers it with 405 Method Not Allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    GET,
    /// GET without the body on the wire.
    HEAD,
    /// Guarded.
    POST,
    /// Guarded.
    PUT,
    DELETE,
    TRACE,
    CONNECT,
}

impl Method {
    /// Every member of the closed set, in declaration order.
    pub const ALL: [Method; 7] = [
        Method::GET,
        Method::HEAD,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::TRACE,
        Method::CONNECT,
    ];

    /// The member of the closed set named exactly `s`.
    ///
    /// ```
    /// # use arcroute::http::request::Method;
    /// assert_eq!(Method::from_str("PUT"), Some(Method::PUT));
    /// assert_eq!(Method::from_str("put"), None);
    /// assert_eq!(Method::from_str("PATCH"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::TRACE => "TRACE",
            Method::CONNECT => "CONNECT",
        }
    }

    /// Methods whose handlers only see form and query fields after the
    /// anti-forgery token has been validated.
    pub fn is_guarded(&self) -> bool {
        matches!(self, Method::POST | Method::PUT)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed request.
///
/// `method` is the raw token the client sent, so methods outside [`Method`]
/// still reach dispatch and get a 405 there.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    /// Request target as sent, query string included.
    pub path: String,
    pub version: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

/// Builder for constructing Request objects.
#[derive(Default)]
pub struct RequestBuilder {
    method: Option<String>,
    path: Option<String>,
    version: Option<String>,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method.as_str().to_string());
        self
    }

    /// Sets a method token that need not belong to [`Method`].
    pub fn raw_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            path: self.path.ok_or("path missing")?,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
            body: self.body,
        })
    }
}

impl Request {
    /// The method as a member of the closed set, if it is one.
    pub fn method(&self) -> Option<Method> {
        Method::from_str(&self.method)
    }

    /// Header lookup, exact name first, then ignoring ASCII case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(key)
            .or_else(|| {
                self.headers
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(key))
                    .map(|(_, v)| v)
            })
            .map(String::as_str)
    }

    /// `Content-Length`, or 0 when missing or unparsable.
    pub fn content_length(&self) -> usize {
        self.header("Content-Length")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    /// HTTP/1.1 connections persist unless the client sends `Connection:
    /// close`; HTTP/1.0 ones only with an explicit `keep-alive`.
    pub fn keep_alive(&self) -> bool {
        match self.header("Connection") {
            Some(v) if v.eq_ignore_ascii_case("close") => false,
            Some(v) if v.eq_ignore_ascii_case("keep-alive") => true,
            _ => self.version != "HTTP/1.0",
        }
    }

    /// The client's explicit accept-list, in the order it was sent.
    ///
    /// Media-range parameters (`;q=0.9` and friends) are dropped so entries
    /// can be matched literally against the content-type registry.
    pub fn accept_types(&self) -> Vec<String> {
        self.header("Accept")
            .map(|accept| {
                accept
                    .split(',')
                    .filter_map(|entry| {
                        let media = entry.split(';').next().unwrap_or("").trim();
                        (!media.is_empty()).then(|| media.to_string())
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
