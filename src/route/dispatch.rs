use tracing::debug;

use crate::http::request::Method;
use crate::http::response::{Response, StatusCode};
use crate::media::representation::{AdHoc, BoxRepresentation};
use crate::route::context::{Context, Exchange};
use crate::route::guard::{Guarded, Protector};
use crate::route::state::{Dispatch, MethodSet, State};

/// Resolves the request method against `state`'s handler table.
///
/// Unknown method names and methods missing from the table get the state's
/// not-allowed representation. POST and PUT handlers see the request through
/// a [`Guarded`] exchange.
pub fn dispatch<T>(state: &dyn State<T>, context: &Context<'_>, protector: &dyn Protector) -> Dispatch {
    let name = context.method_name();

    match Method::from_str(name) {
        Some(method) if state.methods().contains(method) => {
            if method.is_guarded() {
                let guarded = Guarded::new(context, protector);
                state.accept(method, &guarded)
            } else {
                state.accept(method, context)
            }
        }
        _ => {
            debug!(method = name, "method not allowed");
            Ok(state.not_allowed(name))
        }
    }
}

/// 405 naming the rejected method, with an `Allow` header when anything is.
pub fn not_allowed(method: &str, allowed: MethodSet) -> BoxRepresentation {
    let body = format!("The method '{method}' is not allowed.");
    let allow = allowed
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    Box::new(AdHoc::new(move |response: &mut Response| -> anyhow::Result<()> {
        response.set_status(StatusCode::MethodNotAllowed);
        response.set_content_type("text/plain");
        if !allow.is_empty() {
            response.set_header("Allow", allow.clone());
        }
        response.write(body.as_bytes());
        Ok(())
    }))
}
