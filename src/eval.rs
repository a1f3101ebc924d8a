//! Flag evaluation: the precedence walk over a compiled flag table.
use std::{collections::HashSet, sync::Arc};

use crate::{bucketing::rollout_bucket, snapshot::FlagTable, Error, Result};

/// Maximum inheritance-chain length followed during evaluation.
///
/// Shared with administration-side validation of parent chains, so both sides
/// agree on what "too deep" means.
pub const MAX_PARENT_DEPTH: usize = 10;

/// Evaluates flags against one snapshot for one (optional) subject.
///
/// An `Evaluator` is short-lived: it closes over the flag table that was
/// current when it was created and never performs I/O, so repeated
/// [`is_enabled`](Evaluator::is_enabled) calls are pure and return identical
/// results. Obtain a fresh evaluator from
/// [`SnapshotCache::evaluator`](crate::SnapshotCache::evaluator) to pick up
/// newer snapshots.
#[derive(Debug)]
pub struct Evaluator {
    table: Arc<FlagTable>,
    subject_key: Option<String>,
}

impl Evaluator {
    pub(crate) fn new(table: Arc<FlagTable>, subject_key: Option<&str>) -> Evaluator {
        Evaluator {
            table,
            subject_key: subject_key.map(str::to_owned),
        }
    }

    /// Resolve the state of `flag_key`.
    ///
    /// At each level of the inheritance chain, rules apply in strict
    /// precedence order: deny list, then allow list, then percentage rollout,
    /// then inheritance, then the flag's base `enabled` state. The deny,
    /// allow, and rollout checks only apply when a subject key is bound.
    ///
    /// Unknown flags evaluate to `false`, and cyclic or over-deep parent
    /// chains resolve to a flag's raw `enabled` state; none of these raise,
    /// as they can arise from ordinary races between flag administration and
    /// evaluation. The only error conditions are a rollout percentage outside
    /// `[0, 100]` used in an actual rollout decision and an over-long
    /// bucketing input, both of which indicate corrupt data worth surfacing.
    pub fn is_enabled(&self, flag_key: &str) -> Result<bool> {
        let mut current_key = flag_key;
        let mut visited = HashSet::new();
        // Raw `enabled` of the last flag visited, the fail-safe result when
        // the chain is too deep.
        let mut fallback = false;
        let mut depth = 0;

        while depth <= MAX_PARENT_DEPTH {
            if visited.contains(current_key) {
                log::trace!(target: "flagpole", flag_key, cycle_at = current_key; "parent cycle detected, resolving to raw enabled state");
                return Ok(self.table.flag(current_key).map_or(false, |flag| flag.enabled));
            }

            let Some(flag) = self.table.flag(current_key) else {
                // Unknown flags are always disabled, never an error: the flag
                // may simply have been deleted since the caller learned its key.
                log::trace!(target: "flagpole", flag_key = current_key; "unknown flag, resolving to disabled");
                return Ok(false);
            };

            visited.insert(current_key);
            fallback = flag.enabled;

            if let Some(subject_key) = self.subject_key.as_deref() {
                if flag.deny_list.contains(subject_key) {
                    return Ok(false);
                }
                if flag.allow_list.contains(subject_key) {
                    return Ok(true);
                }
                if let Some(percentage) = flag.rollout_percentage {
                    // A rollout of 0 means "not configured" and falls through,
                    // same as an absent percentage.
                    if percentage > 0 {
                        if percentage > 100 {
                            log::warn!(target: "flagpole", flag_key = current_key, percentage; "rollout percentage outside [0, 100]");
                            return Err(Error::InvalidRolloutPercentage {
                                flag_key: current_key.to_owned(),
                                value: percentage,
                            });
                        }
                        let bucket = rollout_bucket(&format!("{subject_key}:{current_key}"))?;
                        return Ok(i64::from(bucket) < percentage);
                    }
                }
            }

            if flag.inherit_parent {
                if let Some(parent_key) = &flag.parent_key {
                    current_key = parent_key;
                    depth += 1;
                    continue;
                }
            }

            return Ok(flag.enabled);
        }

        log::trace!(target: "flagpole", flag_key; "parent chain exceeds maximum depth, resolving to last visited flag");
        Ok(fallback)
    }
}
