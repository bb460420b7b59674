//! TCP front end: one task per accepted connection.

pub mod listener;
