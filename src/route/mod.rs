//! Request routing.
//!
//! # Data Flow
//! ```text
//! Request
//!     → tokenizer.rs (path → Message of Segments, extension hints stashed)
//!     → router.rs walk (root.consider(token) → Next | Stay | Absent | Raise)
//!     → dispatch.rs (method × state handler table, POST/PUT guarded)
//!     → media negotiation
//!     → Representation::render
//! ```
//!
//! # Terminal outcomes of a walk
//! - Every token consumed: the last state reached.
//! - A token not understood: an [`Unmatched`] state that absorbs the rest.
//! - An HTTP-representable [`Signal`]: the walk stops at once and the signal
//!   stands in for the terminal state.
//! - A fatal [`Signal`]: returned to the caller, no response.

pub mod context;
pub mod dispatch;
pub mod guard;
pub mod router;
pub mod signal;
pub mod state;
pub mod token;
pub mod tokenizer;

pub use context::{Context, Exchange};
pub use guard::{KeyedProtector, Protector, RejectAll};
pub use router::{Router, RouterBuilder};
pub use signal::Signal;
pub use state::{Dispatch, MethodSet, State, StateRef, Transition, Unmatched};
pub use token::{Message, Segment};
pub use tokenizer::{Tokenizer, UrlTokenizer};
