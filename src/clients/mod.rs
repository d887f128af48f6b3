//! Outbound HTTP clients for the geocoding and fact-generation services.

mod facts;
mod geocode;

pub use facts::FactsClient;
pub use geocode::GeocodeClient;

/// Outcome of an outbound lookup.
///
/// Distinguishes "the service answered with nothing" from "the service could
/// not be reached", leaving user messaging to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// The service returned a usable result
    Hit(T),
    /// The service answered but had no result
    Miss,
    /// Transport failure or non-success status
    Unavailable,
}
