use std::sync::Mutex;

use arcroute::http::request::{Method, Request, RequestBuilder};
use arcroute::http::response::{Response, StatusCode};
use arcroute::media::{Representation, Text};
use arcroute::route::dispatch::dispatch;
use arcroute::route::guard::{Guarded, TOKEN_FIELD, TOKEN_HEADER};
use arcroute::route::{
    Context, Dispatch, Exchange, KeyedProtector, MethodSet, Protector, RejectAll, State,
};

const FORM: &str = "application/x-www-form-urlencoded";
const SOURCE: &str = "X-Echo-Source";

/// Echoes `value` from the form (or the query when `X-Echo-Source: query`)
/// and records every value it was handed.
#[derive(Default)]
struct Echo {
    seen: Mutex<Vec<String>>,
}

impl State<String> for Echo {
    fn methods(&self) -> MethodSet {
        MethodSet::ALL
    }

    fn accept(&self, _method: Method, exchange: &dyn Exchange) -> Dispatch {
        let value = if exchange.header(SOURCE) == Some("query") {
            exchange.query("value")?
        } else {
            exchange.form("value")?
        };
        let value = value.unwrap_or("-").to_string();
        self.seen.lock().unwrap().push(value.clone());
        Ok(Box::new(Text::plain(value)))
    }
}

fn protector() -> KeyedProtector {
    KeyedProtector::new("test-key")
}

fn form_request(method: Method, body: &str) -> RequestBuilder {
    RequestBuilder::new()
        .method(method)
        .path("/echo")
        .header("Content-Type", FORM)
        .body(body.as_bytes().to_vec())
}

fn status_of(state: &Echo, request: &Request, protector: &dyn Protector) -> (u16, String) {
    status_of_state(state, request, protector)
}

fn status_of_state(
    state: &dyn State<String>,
    request: &Request,
    protector: &dyn Protector,
) -> (u16, String) {
    let context = Context::new(request).unwrap();
    match dispatch::<String>(state, &context, protector) {
        Ok(representation) => {
            let mut response = Response::new(StatusCode::Ok);
            representation.render(&mut response).unwrap();
            (response.status.as_u16(), response.body_text())
        }
        Err(signal) => (
            signal.status().map(|s| s.as_u16()).unwrap_or(500),
            signal.to_string(),
        ),
    }
}

#[test]
fn test_guarded_methods_without_token_are_forbidden() {
    for method in [Method::POST, Method::PUT] {
        let echo = Echo::default();
        let request = form_request(method, "value=secret").build().unwrap();

        let (status, _) = status_of(&echo, &request, &protector());

        assert_eq!(status, 403, "{method}");
        assert!(echo.seen.lock().unwrap().is_empty());
    }
}

#[test]
fn test_query_read_is_guarded_too() {
    for method in [Method::POST, Method::PUT] {
        let echo = Echo::default();
        let request = RequestBuilder::new()
            .method(method)
            .path("/echo?value=secret")
            .header(SOURCE, "query")
            .build()
            .unwrap();

        let (status, _) = status_of(&echo, &request, &protector());

        assert_eq!(status, 403, "{method}");
        assert!(echo.seen.lock().unwrap().is_empty());
    }
}

/// Collects everything an exchange hands out without a field read.
#[derive(Default)]
struct Snoop {
    visible: Mutex<Vec<String>>,
}

impl State<String> for Snoop {
    fn methods(&self) -> MethodSet {
        MethodSet::ALL
    }

    fn accept(&self, _method: Method, exchange: &dyn Exchange) -> Dispatch {
        let mut visible = self.visible.lock().unwrap();
        visible.push(exchange.method_name().to_string());
        visible.push(exchange.path().to_string());
        for name in ["Content-Type", "Content-Length", SOURCE] {
            visible.extend(exchange.header(name).map(str::to_string));
        }
        drop(visible);

        let value = exchange.form("value")?.or(exchange.query("value")?);
        Ok(Box::new(Text::plain(value.unwrap_or("-").to_string())))
    }
}

#[test]
fn test_handler_sees_no_field_bytes_before_validation() {
    for method in [Method::POST, Method::PUT] {
        let snoop = Snoop::default();
        let request = form_request(method, "value=body-secret")
            .path("/echo?value=query-secret")
            .build()
            .unwrap();

        let (status, body) = status_of_state(&snoop, &request, &protector());

        assert_eq!(status, 403, "{method}");
        assert!(!body.contains("secret"), "{method}: {body}");

        let visible = snoop.visible.lock().unwrap();
        assert_eq!(visible[0], method.as_str());
        assert_eq!(visible[1], "/echo");
        assert!(
            visible.iter().all(|seen| !seen.contains("secret")),
            "{method}: {visible:?}"
        );
    }
}

#[test]
fn test_tampered_token_is_forbidden() {
    let echo = Echo::default();
    let token = protector().issue("n0nce");
    let tampered = token.replacen("n0nce", "other", 1);
    let request = form_request(Method::POST, "value=secret")
        .header(TOKEN_HEADER, tampered)
        .build()
        .unwrap();

    let (status, _) = status_of(&echo, &request, &protector());

    assert_eq!(status, 403);
    assert!(echo.seen.lock().unwrap().is_empty());
}

#[test]
fn test_valid_header_token_releases_fields() {
    let echo = Echo::default();
    let request = form_request(Method::PUT, "value=secret")
        .header(TOKEN_HEADER, protector().issue("abc"))
        .build()
        .unwrap();

    let (status, body) = status_of(&echo, &request, &protector());

    assert_eq!(status, 200);
    assert_eq!(body, "secret");
    assert_eq!(*echo.seen.lock().unwrap(), vec!["secret".to_string()]);
}

#[test]
fn test_valid_form_token_releases_fields() {
    let echo = Echo::default();
    let body = format!("{TOKEN_FIELD}={}&value=posted", protector().issue("xyz"));
    let request = form_request(Method::POST, &body).build().unwrap();

    let (status, body) = status_of(&echo, &request, &protector());

    assert_eq!(status, 200);
    assert_eq!(body, "posted");
}

#[test]
fn test_valid_token_releases_query_fields() {
    for method in [Method::POST, Method::PUT] {
        let echo = Echo::default();
        let request = RequestBuilder::new()
            .method(method)
            .path("/echo?value=queried")
            .header(SOURCE, "query")
            .header(TOKEN_HEADER, protector().issue("q"))
            .build()
            .unwrap();

        let (status, body) = status_of(&echo, &request, &protector());

        assert_eq!(status, 200, "{method}");
        assert_eq!(body, "queried");
    }
}

#[test]
fn test_unguarded_methods_read_freely() {
    for method in [Method::GET, Method::DELETE] {
        let echo = Echo::default();
        let request = RequestBuilder::new()
            .method(method)
            .path("/echo?value=open")
            .header(SOURCE, "query")
            .build()
            .unwrap();

        let (status, body) = status_of(&echo, &request, &RejectAll);

        assert_eq!(status, 200, "{method}");
        assert_eq!(body, "open");
    }
}

#[test]
fn test_reject_all_refuses_any_token() {
    let echo = Echo::default();
    let request = form_request(Method::POST, "value=secret")
        .header(TOKEN_HEADER, protector().issue("abc"))
        .build()
        .unwrap();

    let (status, _) = status_of(&echo, &request, &RejectAll);

    assert_eq!(status, 403);
    assert!(!RejectAll.verify(""));
}

#[test]
fn test_guarded_validates_once_on_first_read() {
    let request = form_request(Method::POST, "value=secret").build().unwrap();
    let context = Context::new(&request).unwrap();
    let keyed = protector();
    let guarded = Guarded::new(&context, &keyed);

    assert!(!guarded.is_checked());
    assert_eq!(guarded.path(), "/echo");
    // Request metadata is not a field read.
    assert!(!guarded.is_checked());

    let first = guarded.form("value").unwrap_err();
    assert_eq!(first.status().map(|s| s.as_u16()), Some(403));
    assert!(guarded.is_checked());
    assert!(guarded.query("value").is_err());
}

#[test]
fn test_keyed_protector_tokens() {
    let keyed = protector();
    let token = keyed.issue("nonce-1");

    assert!(token.starts_with("nonce-1."));
    assert!(keyed.verify(&token));
    assert!(!keyed.verify("nonce-1"));
    assert!(!keyed.verify(".abc"));
    assert!(!KeyedProtector::new("other-key").verify(&token));
    assert_ne!(keyed.issue("nonce-2"), token);
}

#[test]
fn test_keyed_protector_rejects_malformed_tags() {
    let keyed = protector();
    let token = keyed.issue("nonce-1");
    let (nonce, tag) = token.rsplit_once('.').unwrap();

    assert_eq!(tag.len(), 64);
    assert!(keyed.verify(&format!("{nonce}.{}", tag.to_uppercase())));
    assert!(!keyed.verify(&format!("{nonce}.{}", &tag[..62])));
    assert!(!keyed.verify(&format!("{nonce}.{tag}00")));
    assert!(!keyed.verify(&format!("{nonce}.{}zz", &tag[..62])));
    assert!(!keyed.verify(&format!("{nonce}.")));
    assert!(!keyed.verify(&format!("{nonce}.{}", "0".repeat(64))));
}
