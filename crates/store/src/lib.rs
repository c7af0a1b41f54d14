//! Observable in-memory stores for leave requests and candidates.
//!
//! Each store mirrors one backend collection. It fetches the full list when
//! mounted, then applies narrowly scoped local edits after each successful
//! remote call. Consumers read with `get_state()` or react to changes through
//! `subscribe()`.

#![warn(missing_docs)]

pub mod error;
pub mod observable;
pub mod lock;
pub mod store;
pub mod leave;
pub mod candidate;

pub use error::{StoreError, Result, UNKNOWN_ERROR};
pub use observable::Observable;
pub use lock::{RecordLocks, RecordGuard};
pub use store::{RecordStore, StoreState};
pub use leave::LeaveStore;
pub use candidate::CandidateStore;
