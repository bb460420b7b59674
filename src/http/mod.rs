//! HTTP/1.1 hosting for the router.
//!
//! Each connection loops through
//!
//! ```text
//! Reading ──request──▶ Processing ──Router::handle──▶ Writing ─┬─ keep-alive ─▶ Reading
//!                                                             └─ close ──────▶ Closed
//! ```
//!
//! `Ok(None)` from the router means the path belongs to a static file layer.
//! None is mounted here, so such requests get a plain 404. HEAD responses are
//! written without their body.

pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
