pub mod auth;
pub mod documents;
pub mod images;
pub mod middleware;
pub mod openapi;
pub mod router;
pub mod session;
pub mod state;
pub mod views;

// Re-export the router builder so the binary and the tests share one wiring.
pub use router::build_router;
pub use state::AppState;
