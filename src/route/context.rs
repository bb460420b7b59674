use url::{Url, form_urlencoded};

use crate::http::request::Request;
use crate::route::signal::Signal;

/// What a handler sees of the request it answers.
///
/// Only metadata is readable unconditionally. The body and the query string
/// are reachable solely through the fallible field reads, so a guarding
/// wrapper can withhold them until the request has been authorised.
pub trait Exchange {
    /// The method token as sent by the client.
    fn method_name(&self) -> &str;

    /// The request path, without query string.
    fn path(&self) -> &str;

    /// A request header, looked up ignoring ASCII case.
    fn header(&self, name: &str) -> Option<&str>;

    /// A form-encoded body field.
    fn form(&self, key: &str) -> Result<Option<&str>, Signal>;

    /// A query-string field.
    fn query(&self, key: &str) -> Result<Option<&str>, Signal>;
}

/// Per-request routing context.
///
/// Owns the parsed path, query and form fields, and the slot in which the
/// tokenizer stashes content-type hints for negotiation.
#[derive(Debug)]
pub struct Context<'r> {
    request: &'r Request,
    path: String,
    query: Vec<(String, String)>,
    form: Vec<(String, String)>,
    hints: Vec<String>,
}

impl<'r> Context<'r> {
    pub fn new(request: &'r Request) -> Result<Self, Signal> {
        let target = request.path.split('#').next().unwrap_or("");
        let (target, query) = match target.split_once('?') {
            Some((target, query)) => (target, query),
            None => (target, ""),
        };

        let path = if target.starts_with('/') {
            target.to_string()
        } else {
            // absolute-form, e.g. "http://host/a/b"
            Url::parse(target)
                .map_err(|e| Signal::bad_request(format!("malformed request target: {e}")))?
                .path()
                .to_string()
        };

        let query = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();

        let form = if is_form_encoded(request) {
            form_urlencoded::parse(&request.body).into_owned().collect()
        } else {
            Vec::new()
        };

        Ok(Self {
            request,
            path,
            query,
            form,
            hints: Vec::new(),
        })
    }

    /// Content-type hints stashed by the tokenizer, in path order.
    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    pub fn stash_hints(&mut self, hints: impl IntoIterator<Item = String>) {
        self.hints.extend(hints);
    }

    /// Negotiation candidates: hints first, then the client's accept-list.
    pub fn acceptable(&self) -> Vec<String> {
        let mut candidates = self.hints.clone();
        candidates.extend(self.request.accept_types());
        candidates
    }

    /// Unguarded form read.
    pub(crate) fn raw_form(&self, key: &str) -> Option<&str> {
        lookup(&self.form, key)
    }

    /// Unguarded query read.
    pub(crate) fn raw_query(&self, key: &str) -> Option<&str> {
        lookup(&self.query, key)
    }
}

impl Exchange for Context<'_> {
    fn method_name(&self) -> &str {
        &self.request.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.request.header(name)
    }

    fn form(&self, key: &str) -> Result<Option<&str>, Signal> {
        Ok(self.raw_form(key))
    }

    fn query(&self, key: &str) -> Result<Option<&str>, Signal> {
        Ok(self.raw_query(key))
    }
}

fn lookup<'a>(fields: &'a [(String, String)], key: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn is_form_encoded(request: &Request) -> bool {
    request
        .header("Content-Type")
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|ct| {
            ct.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}
