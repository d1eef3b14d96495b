//! Configuration utility functions
//!
//! This module provides helper functions for working with
//! environment variables and configuration values.

/// Get a string value from an environment variable or use the default
pub fn get_env_string(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

/// Get a usize value from an environment variable or use the default
pub fn get_env_usize(key: &str, default: usize) -> usize {
    match std::env::var(key) {
        Ok(val) => val.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring unparsable {}={:?}", key, val);
            default
        }),
        Err(_) => default,
    }
}

/// Get a f64 value from an environment variable or use the default
pub fn get_env_f64(key: &str, default: f64) -> f64 {
    match std::env::var(key) {
        Ok(val) => val.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring unparsable {}={:?}", key, val);
            default
        }),
        Err(_) => default,
    }
}
