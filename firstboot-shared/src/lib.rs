//! Firstboot Shared - common types for the configuration pipeline and its CLI
//!
//! This crate contains the error type, well-known constants, and the
//! on-disk layout used by both the core library (firstboot) and the
//! command-line front end.

pub mod constants;
pub mod errors;
pub mod layout;

pub use errors::{FirstbootError, FirstbootResult};
pub use layout::SystemConfigLayout;
