//! arcroute - token-driven request routing
//!
//! Resolves a request's path into a terminal route state, dispatches the
//! request method against that state, and negotiates the response
//! representation with the client.

pub mod config;
pub mod http;
pub mod media;
pub mod route;
pub mod server;
pub mod site;
