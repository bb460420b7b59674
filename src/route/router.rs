use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::RoutingConfig;
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::media::negotiate::{Negotiator, Selection};
use crate::media::registry::MediaRegistry;
use crate::media::representation::BoxRepresentation;
use crate::route::context::{Context, Exchange};
use crate::route::dispatch::dispatch;
use crate::route::guard::{KeyedProtector, Protector, RejectAll};
use crate::route::signal::Signal;
use crate::route::state::{State, StateRef, Transition, Unmatched};
use crate::route::token::{Message, Segment};
use crate::route::tokenizer::{Tokenizer, UrlTokenizer};

type RootResolver<T> = Box<dyn Fn(&Context<'_>) -> Option<StateRef<T>> + Send + Sync>;
type UnmatchedFactory<T> = Box<dyn Fn(&Context<'_>, &T) -> StateRef<T> + Send + Sync>;

/// Resolves requests to responses.
///
/// ```text
/// Request → Tokenizer → Message*
///         → walk from root → terminal State
///         → dispatch(method) → Representation
///         → negotiate → render → Response
/// ```
pub struct Router<T> {
    tokenizer: Box<dyn Tokenizer<T>>,
    root: RootResolver<T>,
    unmatched: UnmatchedFactory<T>,
    negotiator: Negotiator,
    protector: Arc<dyn Protector>,
}

pub struct RouterBuilder<T> {
    tokenizer: Box<dyn Tokenizer<T>>,
    root: RootResolver<T>,
    unmatched: Option<UnmatchedFactory<T>>,
    registry: Option<Arc<MediaRegistry>>,
    selection: Selection,
    protector: Option<Arc<dyn Protector>>,
}

impl<T> RouterBuilder<T>
where
    T: Clone + fmt::Display + Send + Sync + 'static,
{
    /// Replaces the state created for a token no state understands.
    ///
    /// The factory sees the request context alongside the offending token.
    pub fn unmatched<F>(mut self, factory: F) -> Self
    where
        F: Fn(&Context<'_>, &T) -> StateRef<T> + Send + Sync + 'static,
    {
        self.unmatched = Some(Box::new(factory));
        self
    }

    pub fn registry(mut self, registry: Arc<MediaRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn protector(mut self, protector: Arc<dyn Protector>) -> Self {
        self.protector = Some(protector);
        self
    }

    pub fn build(self) -> Router<T> {
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(MediaRegistry::standard()));

        let unmatched: UnmatchedFactory<T> = match self.unmatched {
            Some(factory) => factory,
            None => Box::new(|_context: &Context<'_>, token: &T| -> StateRef<T> {
                Arc::new(Unmatched::new(token.clone()))
            }),
        };
        let protector: Arc<dyn Protector> = match self.protector {
            Some(protector) => protector,
            None => Arc::new(RejectAll),
        };

        Router {
            tokenizer: self.tokenizer,
            root: self.root,
            unmatched,
            negotiator: Negotiator::new(registry, self.selection),
            protector,
        }
    }
}

impl Router<Segment> {
    /// URL-path router configured from the `routing` section.
    pub fn from_config<F>(config: &RoutingConfig, root: F) -> Self
    where
        F: Fn(&Context<'_>) -> Option<StateRef<Segment>> + Send + Sync + 'static,
    {
        let protector: Arc<dyn Protector> = match &config.anti_forgery_key {
            Some(key) => Arc::new(KeyedProtector::new(key.as_bytes())),
            None => Arc::new(RejectAll),
        };

        Router::builder(
            UrlTokenizer::with_extensions(&config.application_extensions),
            root,
        )
        .selection(config.negotiation)
        .protector(protector)
        .build()
    }
}

impl<T> Router<T>
where
    T: Clone + fmt::Display + Send + Sync + 'static,
{
    pub fn builder<Z, F>(tokenizer: Z, root: F) -> RouterBuilder<T>
    where
        Z: Tokenizer<T> + 'static,
        F: Fn(&Context<'_>) -> Option<StateRef<T>> + Send + Sync + 'static,
    {
        RouterBuilder {
            tokenizer: Box::new(tokenizer),
            root: Box::new(root),
            unmatched: None,
            registry: None,
            selection: Selection::default(),
            protector: None,
        }
    }

    /// Handles one request.
    ///
    /// `Ok(None)` means the request was not routed and belongs to the static
    /// file layer. `Err` carries a fatal signal or a rendering failure.
    pub fn handle(&self, request: &Request) -> anyhow::Result<Option<Response>> {
        let mut context = match Context::new(request) {
            Ok(context) => context,
            Err(signal) => return render(signal.into_representation()?).map(Some),
        };

        let messages = self.tokenizer.analyze(&mut context);
        if messages.is_empty() {
            debug!(path = %request.path, "not routed");
            return Ok(None);
        }
        if messages.len() > 1 {
            debug!(count = messages.len(), "only the first rooted message is dispatched");
        }

        for message in &messages {
            let Some(root) = (self.root)(&context) else {
                continue;
            };

            let terminal = self.walk(&context, root, message)?;
            return self.respond(&context, terminal.as_ref()).map(Some);
        }

        Ok(None)
    }

    /// Walks `message` from `root` and returns the terminal state.
    ///
    /// A token no state understands drops the walk into an unmatched state
    /// that absorbs the rest. An HTTP-representable signal aborts the walk on
    /// the spot and stands in for the terminal state; a fatal one is returned.
    pub fn walk(
        &self,
        context: &Context<'_>,
        root: StateRef<T>,
        message: &Message<T>,
    ) -> Result<StateRef<T>, Signal> {
        let mut current = root;

        for token in message {
            match current.consider(token) {
                Transition::Next(next) => current = next,
                Transition::Stay => {}
                Transition::Absent => {
                    debug!(token = %token, "no transition, route unmatched");
                    current = (self.unmatched)(context, token);
                }
                Transition::Raise(signal) => {
                    debug!(token = %token, %signal, "walk aborted");
                    return signal.into_state();
                }
            }
        }

        Ok(current)
    }

    /// Dispatches the method against `state`, negotiates, and renders.
    ///
    /// A signal raised by the handler is rendered as-is, without negotiation.
    pub fn respond(&self, context: &Context<'_>, state: &dyn State<T>) -> anyhow::Result<Response> {
        let representation = match dispatch(state, context, self.protector.as_ref()) {
            Ok(representation) => self
                .negotiator
                .negotiate(representation, &context.acceptable()),
            Err(signal) => {
                debug!(path = %context.path(), %signal, "handler raised");
                signal.into_representation()?
            }
        };

        render(representation)
    }
}

fn render(representation: BoxRepresentation) -> anyhow::Result<Response> {
    let mut response = Response::new(StatusCode::Ok);
    representation.render(&mut response)?;
    Ok(response.finish())
}
