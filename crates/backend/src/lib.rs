//! Service layer over the `contracts` sizing logic: configuration,
//! tracing and boundary checks for capacity and stock level requests.

pub mod domain;
pub mod shared;
pub mod system;
