//! Environment variable helpers
//!
//! Every `BRIDGE_*` override goes through these.
//!
//! ```ignore
//! use bridge_core::env::{env_get, env_get_millis};
//!
//! let cars: usize = env_get("BRIDGE_NORTH_CARS", 15);
//! let mean = env_get_millis("BRIDGE_NORTH_ARRIVAL_MS", Duration::from_millis(500));
//! ```

use std::str::FromStr;
use std::time::Duration;

/// Parse `key` as `T`, falling back to `default` when unset or unparsable
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    env_get_opt(key).unwrap_or(default)
}

/// Parse `key` as `T` if set and valid
#[inline]
pub fn env_get_opt<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// "1", "true", "yes", "on" (any case) are true, anything else set is false
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => matches!(val.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

/// Whole milliseconds as a `Duration`
#[inline]
pub fn env_get_millis(key: &str, default: Duration) -> Duration {
    env_get_opt::<u64>(key)
        .map(Duration::from_millis)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test owns its variable names so they can run in parallel.

    #[test]
    fn test_env_get_default() {
        let val: usize = env_get("__BRIDGE_TEST_UNSET__", 42);
        assert_eq!(val, 42);
        assert!(env_get_opt::<u64>("__BRIDGE_TEST_UNSET__").is_none());
    }

    #[test]
    fn test_env_get_set() {
        std::env::set_var("__BRIDGE_TEST_NUM__", " 123 ");
        let val: usize = env_get("__BRIDGE_TEST_NUM__", 0);
        assert_eq!(val, 123);
        std::env::remove_var("__BRIDGE_TEST_NUM__");
    }

    #[test]
    fn test_env_get_invalid_parse() {
        std::env::set_var("__BRIDGE_TEST_INVALID__", "many");
        let val: usize = env_get("__BRIDGE_TEST_INVALID__", 99);
        assert_eq!(val, 99);
        std::env::remove_var("__BRIDGE_TEST_INVALID__");
    }

    #[test]
    fn test_env_get_float() {
        std::env::set_var("__BRIDGE_TEST_SCALE__", "0.25");
        let val: f64 = env_get("__BRIDGE_TEST_SCALE__", 1.0);
        assert_eq!(val, 0.25);
        std::env::remove_var("__BRIDGE_TEST_SCALE__");
    }

    #[test]
    fn test_env_get_bool_variants() {
        assert!(env_get_bool("__BRIDGE_TEST_UNSET__", true));

        for yes in ["1", "true", "TRUE", "yes", "on"] {
            std::env::set_var("__BRIDGE_TEST_BOOL__", yes);
            assert!(env_get_bool("__BRIDGE_TEST_BOOL__", false), "{}", yes);
        }
        for no in ["0", "false", "garbage"] {
            std::env::set_var("__BRIDGE_TEST_BOOL__", no);
            assert!(!env_get_bool("__BRIDGE_TEST_BOOL__", true), "{}", no);
        }
        std::env::remove_var("__BRIDGE_TEST_BOOL__");
    }

    #[test]
    fn test_env_get_millis() {
        let d = env_get_millis("__BRIDGE_TEST_UNSET__", Duration::from_millis(500));
        assert_eq!(d, Duration::from_millis(500));

        std::env::set_var("__BRIDGE_TEST_MS__", "2500");
        let d = env_get_millis("__BRIDGE_TEST_MS__", Duration::ZERO);
        assert_eq!(d, Duration::from_millis(2500));
        std::env::remove_var("__BRIDGE_TEST_MS__");
    }
}
