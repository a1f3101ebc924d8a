//! Wire model for flag snapshots and the compiled lookup table.
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// An immutable, versioned bundle of flag state for one project/environment
/// pair.
///
/// This is the response format of the snapshot endpoint. A snapshot is parsed
/// once per changed refresh, compiled into a [`FlagTable`], and replaced
/// wholesale on the next change; it is never mutated in place.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Snapshot version, strictly increasing per environment. Its string form
    /// doubles as the cache-validation token for conditional refreshes.
    pub version: u64,
    /// Project this snapshot belongs to. Carried through, not interpreted.
    pub project_key: String,
    /// Environment this snapshot belongs to. Carried through, not interpreted.
    pub env_key: String,
    /// Flag configurations. Order is irrelevant; lookup is by key.
    pub flags: Vec<SnapshotFlag>,
}

/// One flag's configuration within a [`Snapshot`].
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFlag {
    /// Flag key, unique within the snapshot.
    pub key: String,
    /// Key of the parent flag, if any. Parent links normally form a forest,
    /// but evaluation must tolerate cyclic input.
    #[serde(default)]
    pub parent_key: Option<String>,
    /// Base state, used when no other rule decides the outcome.
    pub enabled: bool,
    /// When true and a parent is set, an unresolved evaluation continues at
    /// the parent instead of stopping at `enabled`.
    #[serde(default)]
    pub inherit_parent: bool,
    /// Subject keys granted access unconditionally. Subordinate to the deny
    /// list.
    #[serde(default)]
    pub allow_list: HashSet<String>,
    /// Subject keys blocked unconditionally.
    #[serde(default)]
    pub deny_list: HashSet<String>,
    /// Percentage rollout in `[0, 100]`. The type is deliberately wide:
    /// out-of-range wire values must survive parsing and are rejected only
    /// when actually used in a rollout decision.
    #[serde(default)]
    pub rollout_percentage: Option<i64>,
}

/// A snapshot compiled into a key→flag lookup table.
///
/// Built once per accepted snapshot and shared immutably (behind an `Arc`)
/// between the cache and the evaluators it hands out.
#[derive(Debug)]
pub struct FlagTable {
    version: u64,
    project_key: String,
    env_key: String,
    flags: HashMap<String, SnapshotFlag>,
}

impl From<Snapshot> for FlagTable {
    fn from(snapshot: Snapshot) -> FlagTable {
        // Flag keys are unique per the server contract; if the contract is
        // violated, the last entry wins.
        let flags = snapshot
            .flags
            .into_iter()
            .map(|flag| (flag.key.clone(), flag))
            .collect();

        FlagTable {
            version: snapshot.version,
            project_key: snapshot.project_key,
            env_key: snapshot.env_key,
            flags,
        }
    }
}

impl FlagTable {
    /// Version of the snapshot this table was built from.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Project key carried over from the snapshot.
    pub fn project_key(&self) -> &str {
        &self.project_key
    }

    /// Environment key carried over from the snapshot.
    pub fn env_key(&self) -> &str {
        &self.env_key
    }

    pub(crate) fn flag(&self, key: &str) -> Option<&SnapshotFlag> {
        self.flags.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_snapshot() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"
            {
              "version": 12,
              "projectKey": "web",
              "envKey": "production",
              "flags": [
                {"key": "dark-mode", "enabled": true},
                {
                  "key": "beta",
                  "parentKey": "dark-mode",
                  "enabled": false,
                  "inheritParent": true,
                  "allowList": ["vip", "vip"],
                  "denyList": ["blocked"],
                  "rolloutPercentage": 25
                }
              ]
            }
            "#,
        )
        .unwrap();

        let table = FlagTable::from(snapshot);
        assert_eq!(table.version(), 12);
        assert_eq!(table.project_key(), "web");
        assert_eq!(table.env_key(), "production");

        let dark_mode = table.flag("dark-mode").unwrap();
        assert!(dark_mode.enabled);
        assert_eq!(dark_mode.parent_key, None);
        assert!(!dark_mode.inherit_parent);
        assert!(dark_mode.allow_list.is_empty());
        assert!(dark_mode.deny_list.is_empty());
        assert_eq!(dark_mode.rollout_percentage, None);

        let beta = table.flag("beta").unwrap();
        assert_eq!(beta.parent_key.as_deref(), Some("dark-mode"));
        assert!(beta.inherit_parent);
        // Wire duplicates collapse into set semantics.
        assert_eq!(beta.allow_list.len(), 1);
        assert!(beta.deny_list.contains("blocked"));
        assert_eq!(beta.rollout_percentage, Some(25));
    }

    #[test]
    fn rejects_non_numeric_version() {
        let result = serde_json::from_str::<Snapshot>(
            r#"{"version": "12", "projectKey": "web", "envKey": "production", "flags": []}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_non_array_flags() {
        let result = serde_json::from_str::<Snapshot>(
            r#"{"version": 12, "projectKey": "web", "envKey": "production", "flags": {}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn out_of_range_rollout_survives_parsing() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"
            {
              "version": 1,
              "projectKey": "web",
              "envKey": "production",
              "flags": [
                {"key": "too-high", "enabled": true, "rolloutPercentage": 250},
                {"key": "negative", "enabled": true, "rolloutPercentage": -5}
              ]
            }
            "#,
        )
        .unwrap();

        assert_eq!(snapshot.flags[0].rollout_percentage, Some(250));
        assert_eq!(snapshot.flags[1].rollout_percentage, Some(-5));
    }

    #[test]
    fn duplicate_keys_keep_last_entry() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"
            {
              "version": 1,
              "projectKey": "web",
              "envKey": "production",
              "flags": [
                {"key": "feat", "enabled": false},
                {"key": "feat", "enabled": true}
              ]
            }
            "#,
        )
        .unwrap();

        let table = FlagTable::from(snapshot);
        assert!(table.flag("feat").unwrap().enabled);
    }
}
