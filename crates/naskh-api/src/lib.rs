//! HTTP API server for Naskh

pub mod routes;
pub mod server;

pub use server::{AppState, Server};
