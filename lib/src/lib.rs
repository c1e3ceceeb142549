#![forbid(unsafe_code)]
#![warn(clippy::dbg_macro, clippy::use_debug, clippy::todo)]

use crate::{jwt::JwtSecret, redis::RedisConnection, services::Services};

pub mod auth;
pub mod config;
pub mod jwt;
pub mod redis;
pub mod services;

/// State shared by all endpoints. The auth extractors read it from the
/// request data, so it has to be attached to the route as `Arc<SharedState>`.
#[derive(Debug, Clone)]
pub struct SharedState {
    pub jwt_secret: JwtSecret,
    pub auth_redis: RedisConnection,
    pub services: Services,
}
