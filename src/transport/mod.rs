//! Transport layer: CLI commands and the HTTP stub backend

pub mod cli;
pub mod http;

pub use http::{run_stub_server, StubServer};
