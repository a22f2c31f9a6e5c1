//! Domain layer for the offline tour service.
//!
//! Pure types and functions shared by the store, remote, and offline
//! crates: the denormalized tour graph, download size estimation,
//! progress arithmetic, and validation helpers. No I/O lives here.

pub mod download;
pub mod error;
pub mod tour;
pub mod types;
