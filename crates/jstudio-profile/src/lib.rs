//! Profile store contract and credit gate.
//!
//! The hosted profile backend is an external collaborator; this crate
//! defines the narrow key-value contract the pipeline needs from it, an
//! in-memory implementation, and the access/credit checks performed
//! around each generation.

pub mod error;
pub mod gate;
pub mod store;

pub use error::{ProfileError, ProfileResult};
pub use gate::CreditGate;
pub use store::{InMemoryProfileStore, ProfileStore};
