//! Test harness: the built-in registry pinned to a fixed instant and seed.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use super::context::{FixedClock, ToolEnvironment};
use super::error::ToolResult;
use super::registry::ToolRegistry;

/// Monday 2024-01-15 10:30:00 UTC.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
}

pub fn registry() -> ToolRegistry {
    let env = ToolEnvironment::system()
        .with_clock(FixedClock(fixed_now()))
        .with_seed(Some(7));
    ToolRegistry::builtin(env).unwrap()
}

/// Call a built-in tool through the registry.
pub fn run(name: &str, arguments: Value) -> ToolResult<Value> {
    registry().call(name, arguments)
}

/// Call a built-in tool and unwrap the successful result.
pub fn ok(name: &str, arguments: Value) -> Value {
    run(name, arguments).unwrap_or_else(|e| panic!("{name} failed: {e}"))
}
