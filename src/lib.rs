//! Notes, blog posts and contacts behind a bearer-token authentication and
//! resource-ownership authorization layer.
//!
//! Request flow: `middleware::auth::access` resolves the bearer token into a
//! [`RequestContext`](services::auth::RequestContext), handlers load the
//! resource, [`OwnershipGuard`](services::auth::OwnershipGuard) decides, and
//! every failure ends in [`AppError`](error::AppError)'s `IntoResponse`.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
