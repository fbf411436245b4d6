//! Shared test mocks and utilities for the bowling score tracker.

mod clock;
mod repository;

pub use clock::{FixedClock, fixed_now};
pub use repository::{FailingDocumentRepository, InMemoryDocumentRepository};
