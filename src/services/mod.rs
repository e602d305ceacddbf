//! Service layer sitting between the routes and the session registry.

/// WebSocket connection and message handling service.
pub mod websocket_service;
