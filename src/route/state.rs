//! Route graph nodes.

use std::sync::Arc;

use crate::http::request::Method;
use crate::http::response::StatusCode;
use crate::media::representation::{BoxRepresentation, Text};
use crate::route::context::Exchange;
use crate::route::dispatch::not_allowed;
use crate::route::signal::Signal;

pub type StateRef<T> = Arc<dyn State<T>>;

/// Result of handling a method: a representation, or a signal.
pub type Dispatch = Result<BoxRepresentation, Signal>;

/// Result of offering a token to a state.
pub enum Transition<T> {
    /// Move to another state.
    Next(StateRef<T>),
    /// Remain in the current state.
    Stay,
    /// The token is not understood here.
    Absent,
    /// Stop the walk.
    Raise(Signal),
}

impl<T> Transition<T> {
    pub fn to<S>(state: S) -> Self
    where
        S: State<T> + 'static,
    {
        Transition::Next(Arc::new(state))
    }
}

/// The set of methods a state accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MethodSet(u8);

impl MethodSet {
    pub const NONE: MethodSet = MethodSet(0);
    pub const ALL: MethodSet = MethodSet(0b0111_1111);

    pub const fn with(self, method: Method) -> Self {
        MethodSet(self.0 | bit(method))
    }

    pub const fn contains(self, method: Method) -> bool {
        self.0 & bit(method) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Method> {
        Method::ALL.into_iter().filter(move |m| self.contains(*m))
    }
}

impl FromIterator<Method> for MethodSet {
    fn from_iter<I: IntoIterator<Item = Method>>(iter: I) -> Self {
        iter.into_iter().fold(MethodSet::NONE, MethodSet::with)
    }
}

const fn bit(method: Method) -> u8 {
    1 << (method as u8)
}

/// A node of the route graph.
///
/// `methods` is the handler table: `accept` is only called for methods it
/// contains. Everything else goes to `not_allowed`.
pub trait State<T>: Send + Sync {
    fn consider(&self, _token: &T) -> Transition<T> {
        Transition::Absent
    }

    fn methods(&self) -> MethodSet {
        MethodSet::NONE
    }

    fn accept(&self, method: Method, _exchange: &dyn Exchange) -> Dispatch {
        Ok(self.not_allowed(method.as_str()))
    }

    fn not_allowed(&self, method: &str) -> BoxRepresentation {
        not_allowed(method, self.methods())
    }
}

/// The state a walk falls into when a token is not understood.
///
/// It keeps the offending token, swallows every token after it, and answers
/// GET and POST with 404. One is created per occurrence.
#[derive(Debug)]
pub struct Unmatched<T> {
    token: T,
}

impl<T> Unmatched<T> {
    pub fn new(token: T) -> Self {
        Self { token }
    }

    pub fn token(&self) -> &T {
        &self.token
    }
}

impl<T> State<T> for Unmatched<T>
where
    T: Send + Sync,
{
    fn consider(&self, _token: &T) -> Transition<T> {
        Transition::Stay
    }

    fn methods(&self) -> MethodSet {
        MethodSet::NONE.with(Method::GET).with(Method::POST)
    }

    fn accept(&self, _method: Method, _exchange: &dyn Exchange) -> Dispatch {
        Ok(not_found())
    }
}

pub fn not_found() -> BoxRepresentation {
    Box::new(Text::plain("Not Found.").with_status(StatusCode::NotFound))
}
