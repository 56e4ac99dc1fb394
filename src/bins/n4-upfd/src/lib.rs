//! N4 UPF daemon
//!
//! Minimal User Plane Function control endpoint: answers Heartbeat,
//! Association Setup and Session Establishment requests on N4 and keeps the
//! established sessions in memory.

pub mod config;
pub mod context;
pub mod n4_build;
pub mod n4_handler;
pub mod pfcp_path;

pub use config::{ConfigError, PfcpConf, UpfConfig};
pub use context::{IeClass, SessionStore, UpfSess};
pub use n4_handler::{N4Handler, N4Response};
pub use pfcp_path::{DatagramChannel, PfcpServer};
