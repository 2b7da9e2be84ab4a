//! Service layer for school records.
//! - Validates raw requests into typed values before touching storage.
//! - Ranks stored schools by great-circle distance from a caller's position.
//! - Hides persistence behind `SchoolRepository` so handlers and tests can swap it.

pub mod errors;
pub mod school;
#[cfg(test)]
pub mod test_support;
