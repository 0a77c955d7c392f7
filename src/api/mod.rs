//! Development backend.
//!
//! Serves the meal coordination REST surface from any `ResourceStore`,
//! so `RemoteStore` and a browser dashboard can run against a local
//! process instead of the hospital backend. Routes sit at the root
//! (`/patients`, `/meal-deliveries`, ...) with permissive CORS.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::dev_api_router;
pub use server::{start_dev_api_server, DevApiServer, DevApiSession, ServerError};
pub use types::ApiContext;
