//! Demonstration route graph served by the binary.
//!
//! ```text
//! /                  GET, HEAD   html, or json
//! /hello[/{name}]    GET, HEAD   plain text, or json / html
//! /notes             GET, POST   POST needs an anti-forgery token and `body`
//! /start             GET         303 to /hello
//! /admin/...         aborts with 403
//! ```

use std::sync::Arc;

use serde_json::json;

use crate::http::request::Method;
use crate::http::response::StatusCode;
use crate::media::family::MediaFamily;
use crate::media::representation::{Json, Negotiable, Redirect, Text};
use crate::route::context::{Context, Exchange};
use crate::route::signal::Signal;
use crate::route::state::{Dispatch, MethodSet, State, StateRef, Transition};
use crate::route::token::Segment;

/// Root resolver for the demonstration graph.
pub fn root(_context: &Context<'_>) -> Option<StateRef<Segment>> {
    Some(Arc::new(Home))
}

struct Home;

impl State<Segment> for Home {
    fn consider(&self, token: &Segment) -> Transition<Segment> {
        if token == "hello" {
            Transition::to(Greeting { name: None })
        } else if token == "notes" {
            Transition::to(Notes)
        } else if token == "start" {
            Transition::to(Start)
        } else if token == "admin" {
            Transition::Raise(Signal::forbidden("Restricted."))
        } else {
            Transition::Absent
        }
    }

    fn methods(&self) -> MethodSet {
        MethodSet::NONE.with(Method::GET).with(Method::HEAD)
    }

    fn accept(&self, _method: Method, _exchange: &dyn Exchange) -> Dispatch {
        let page = Negotiable::new(Text::html("<h1>arcroute</h1>"))
            .or(MediaFamily::JSON, || Json::new(json!({ "routes": ["hello", "notes", "start"] })));
        Ok(Box::new(page))
    }
}

struct Greeting {
    name: Option<String>,
}

impl State<Segment> for Greeting {
    fn consider(&self, token: &Segment) -> Transition<Segment> {
        match self.name {
            None => Transition::to(Greeting {
                name: Some(token.as_str().to_string()),
            }),
            Some(_) => Transition::Absent,
        }
    }

    fn methods(&self) -> MethodSet {
        MethodSet::NONE.with(Method::GET).with(Method::HEAD)
    }

    fn accept(&self, _method: Method, _exchange: &dyn Exchange) -> Dispatch {
        let name = self.name.clone().unwrap_or_else(|| "world".to_string());
        let greeting = format!("Hello, {name}!");

        let html = greeting.clone();
        let document = json!({ "greeting": greeting.clone(), "name": name });
        let page = Negotiable::new(Text::plain(greeting))
            .or(MediaFamily::JSON, move || Json::new(document.clone()))
            .or(MediaFamily::HTML, move || Text::html(format!("<p>{html}</p>")));
        Ok(Box::new(page))
    }
}

struct Notes;

impl State<Segment> for Notes {
    fn methods(&self) -> MethodSet {
        MethodSet::NONE.with(Method::GET).with(Method::POST)
    }

    fn accept(&self, method: Method, exchange: &dyn Exchange) -> Dispatch {
        match method {
            Method::POST => {
                let body = exchange.form("body")?.unwrap_or_default().trim();
                if body.is_empty() {
                    return Err(Signal::bad_request("A note needs a `body` field."));
                }
                Ok(Box::new(
                    Text::plain(format!("Created note: {body}")).with_status(StatusCode::Created),
                ))
            }
            _ => Ok(Box::new(Text::plain(
                "POST a `body` field to create a note.",
            ))),
        }
    }
}

struct Start;

impl State<Segment> for Start {
    fn methods(&self) -> MethodSet {
        MethodSet::NONE.with(Method::GET)
    }

    fn accept(&self, _method: Method, _exchange: &dyn Exchange) -> Dispatch {
        Ok(Box::new(Redirect::see_other("/hello")))
    }
}
