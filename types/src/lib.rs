//! Fundamental types for the ballot client.
//!
//! This crate defines the values shared across every other crate in the workspace:
//! the wallet identity, candidates, the session phase, the immutable session
//! snapshot published to the presentation layer, and the error taxonomy.

pub mod candidate;
pub mod error;
pub mod identity;
pub mod state;

pub use candidate::Candidate;
pub use error::{SessionError, VoteRejection};
pub use identity::Identity;
pub use state::{Phase, SessionSnapshot};
