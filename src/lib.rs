//! Library crate for ultimate-ttt-back, exposing modules for the server
//! binary and integration tests.

pub mod config;
pub mod dto;
pub mod error;
pub mod game;
pub mod routes;
pub mod services;
pub mod state;
