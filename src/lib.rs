//! Public profile sharing service
//!
//! Users get one public profile each, reachable through an unguessable share
//! token, with a view counter bumped on every anonymous visit. The `client`
//! module holds the session logic a frontend uses to obtain and share the link.

pub mod auth;
pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod model;
pub mod route;
pub mod service;
pub mod store;
