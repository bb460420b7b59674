//! Content negotiation.
//!
//! ```text
//! dispatch → Representation
//!          → candidates: extension hints, then Accept entries
//!          → MediaRegistry lookup (exact string)
//!          → MediaType::convert (per-representation compatibility table)
//!          → first success replaces the representation
//! ```

pub mod family;
pub mod negotiate;
pub mod registry;
pub mod representation;

pub use family::{Conversion, MediaFamily, MediaType};
pub use negotiate::{Negotiator, Selection};
pub use registry::MediaRegistry;
pub use representation::{AdHoc, BoxRepresentation, Json, Negotiable, Redirect, Representation, Text};
