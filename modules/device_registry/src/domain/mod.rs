// Domain layer: business rules and the persistence ports they need.
// Pure algorithms (serial, range, resolver, warranty) are free of I/O.

pub mod error;
pub mod range;
pub mod repo;
pub mod resolver;
pub mod serial;
pub mod service;
pub mod warranty;
