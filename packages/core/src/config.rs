//! Engine configuration
//!
//! Settings can come from serialized config (all fields optional, missing
//! ones take their defaults) or from environment variables:
//!
//! - `FAMILYTREE_DELETE_POLICY`: `reparent` (default) or `cascade`
//! - `FAMILYTREE_UPCOMING_LIMIT`: number of upcoming dates reported (default 3)
//! - `FAMILYTREE_HISTORY_LIMIT`: undo steps kept (default 50)

use crate::operations::{DeletePolicy, DEFAULT_HISTORY_LIMIT};
use crate::services::aggregator::DEFAULT_UPCOMING_LIMIT;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DELETE_POLICY_VAR: &str = "FAMILYTREE_DELETE_POLICY";
pub const UPCOMING_LIMIT_VAR: &str = "FAMILYTREE_UPCOMING_LIMIT";
pub const HISTORY_LIMIT_VAR: &str = "FAMILYTREE_HISTORY_LIMIT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub delete_policy: DeletePolicy,
    pub upcoming_limit: usize,
    pub history_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            delete_policy: DeletePolicy::default(),
            upcoming_limit: DEFAULT_UPCOMING_LIMIT,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by any valid `FAMILYTREE_*` variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] over an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            delete_policy: parse_or(&lookup, DELETE_POLICY_VAR, defaults.delete_policy),
            upcoming_limit: parse_or(&lookup, UPCOMING_LIMIT_VAR, defaults.upcoming_limit),
            history_limit: parse_or(&lookup, HISTORY_LIMIT_VAR, defaults.history_limit),
        }
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using default", key, raw);
            default
        }),
    }
}
