//! clustergate: session and delegated cluster-auth orchestration engine.
//!
//! The embedding UI layer wires navigation and toast rendering through
//! the [`effects::Navigator`]/[`effects::Notifier`] traits, drives
//! [`auth::AuthOrchestrator::init`] at startup, consults the
//! [`routing::RouteGuard`] before each route transition, and hands the
//! delegated-handshake routes to the [`cluster::ClusterOrchestrator`].

pub mod auth;
pub mod cluster;
pub mod config;
pub mod effects;
pub mod errors;
pub mod models;
pub mod routing;
pub mod session;
pub mod utils;
