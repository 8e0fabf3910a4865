//! Libris application library
//!
//! Catalog entity modules, the generic cache-aside plumbing they share, and
//! the bootstrap that wires them into the HTTP server.

pub mod app;
pub mod catalog;
pub mod modules;
