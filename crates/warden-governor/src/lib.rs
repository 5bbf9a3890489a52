//! # warden-governor
//!
//! The token budget governor ("Warden"). Governs how much generated
//! output a request-serving process may produce across four nested
//! scopes, classifies the working mode (EXECUTION vs DESIGN), strips
//! disallowed content from payloads, and refuses — never truncates —
//! any operation that would exceed its budget. On internal fault it
//! fails closed: the whole policy record is replaced by the
//! minimum-safe configuration.

pub mod audit;
pub mod classifier;
pub mod filter;
pub mod governor;
pub mod ledger;
pub mod pipeline;
pub mod state;

pub use governor::Warden;
pub use pipeline::EnforceRequest;
pub use state::PolicyState;
