//! Shared types and pure domain logic for size capacity and stock planning.
//!
//! Everything here is I/O free and usable from both the backend services
//! and any UI layer that needs the same calculations.

pub mod domain;
pub mod shared;
