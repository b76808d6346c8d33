//! HTTP surface of the Modelmux gateway.
//!
//! - [`routes`] — the axum router, one POST route per task kind
//! - [`handlers`] — request handlers + the error-to-status mapping

pub mod handlers;
pub mod routes;

pub use routes::create_router;
