//! Data transfer objects for the WebSocket wire protocol.

pub mod ws;
