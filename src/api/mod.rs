//! HTTP surface: router, endpoints, error mapping, server lifecycle, and
//! the event WebSocket.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod websocket;

pub use error::ApiError;
pub use router::api_router;
pub use server::{start_api_server, ApiServer};
