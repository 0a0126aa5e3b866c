//! Local HTTP API for checklist templates and checks stored in a host
//! document that only tolerates access from a single thread.
//!
//! Requests are served concurrently by actix-web; every document access is
//! funnelled through [`host::HostBridge`] onto the dedicated host thread.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod host;
pub mod server;
pub mod services;
pub mod storage;
