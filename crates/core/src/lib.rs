//! hrsync core data models.
//!
//! This crate defines the records mirrored from the HR backend, the response
//! envelope, the session collaborator, and the single-field patch descriptors
//! shared by the client and store crates.

#![warn(missing_docs)]

// Identities
mod id;

// Records and wire shapes
mod record;
mod envelope;

// Session and patches
mod session;
mod field;

// Re-exports
pub use id::RecordId;
pub use record::{Record, LeaveRecord, CandidateRecord};
pub use envelope::{Envelope, ErrorBody};
pub use session::{AuthSession, SessionToken, StaticSession};
pub use field::{FieldPatch, LeaveField, CandidateField};

/// Arbitrary JSON fields carried alongside the typed ones.
pub type Fields = serde_json::Map<String, serde_json::Value>;
