//! School records: domain types, validation, proximity ranking, persistence and the
//! application service tying them together.

pub mod domain;
pub mod validation;
pub mod proximity;
pub mod repository;
pub mod service;

pub use service::SchoolService;
