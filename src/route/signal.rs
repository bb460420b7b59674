use std::sync::Arc;

use thiserror::Error;

use crate::http::request::Method;
use crate::http::response::StatusCode;
use crate::media::representation::{BoxRepresentation, Text};
use crate::route::context::Exchange;
use crate::route::state::{Dispatch, MethodSet, State, StateRef};

/// A fault raised by a state or handler.
///
/// HTTP-representable signals stand in for a terminal state while walking
/// and for a final representation while dispatching. Fatal signals are never
/// turned into a response here; they surface to the transport.
#[derive(Debug, Error)]
pub enum Signal {
    #[error("{} {message}", .status.as_u16())]
    Http { status: StatusCode, message: String },

    #[error(transparent)]
    Fatal(#[from] anyhow::Error),
}

impl Signal {
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        Signal::Http {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::http(StatusCode::BadRequest, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::http(StatusCode::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::http(StatusCode::NotFound, message)
    }

    pub fn fatal(error: impl Into<anyhow::Error>) -> Self {
        Signal::Fatal(error.into())
    }

    pub fn is_http(&self) -> bool {
        matches!(self, Signal::Http { .. })
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Signal::Http { status, .. } => Some(*status),
            Signal::Fatal(_) => None,
        }
    }

    /// The state this signal stands for, or the signal itself if it is fatal.
    pub fn into_state<T>(self) -> Result<StateRef<T>, Signal>
    where
        T: 'static,
    {
        match self {
            Signal::Http { status, message } => Ok(Arc::new(Raised { status, message })),
            fatal => Err(fatal),
        }
    }

    /// The final representation this signal stands for, or the signal itself
    /// if it is fatal.
    pub fn into_representation(self) -> Result<BoxRepresentation, Signal> {
        match self {
            Signal::Http { status, message } => Ok(raised_text(status, &message)),
            fatal => Err(fatal),
        }
    }
}

fn raised_text(status: StatusCode, message: &str) -> BoxRepresentation {
    Box::new(Text::plain(message).with_status(status))
}

/// Terminal state left behind by a walk that was aborted by a signal.
///
/// Answers every method in the closed set with the signal's status.
#[derive(Debug)]
struct Raised {
    status: StatusCode,
    message: String,
}

impl<T> State<T> for Raised {
    fn methods(&self) -> MethodSet {
        MethodSet::ALL
    }

    fn accept(&self, _method: Method, _exchange: &dyn Exchange) -> Dispatch {
        Ok(raised_text(self.status, &self.message))
    }
}
