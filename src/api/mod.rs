// =============================================================================
// HTTP API — REST endpoints over the analysis engine
// =============================================================================

pub mod rest;

pub use rest::router;
