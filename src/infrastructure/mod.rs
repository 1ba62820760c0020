//! Infrastructure layer - External service implementations

pub mod key_service;
pub mod logging;
