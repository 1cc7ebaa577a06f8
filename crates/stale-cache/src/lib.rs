//! In-memory TTL cache with advisory staleness and single-flight fetching
//!
//! Unlike an expiring cache, [`TtlCache`] never discards entries: a lookup
//! past the TTL returns the value flagged stale, so callers facing an
//! upstream outage or rate limit can serve the last known data instead of
//! erroring. [`FlightGroup`] complements it with per-key guards so that
//! concurrent misses for one key trigger a single upstream fetch.

mod cache;
mod flight;

pub use cache::{InvalidTtl, TtlCache};
pub use flight::FlightGroup;
