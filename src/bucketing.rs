//! Deterministic bucketing for percentage rollouts.
use crate::{Error, Result};

/// Maximum accepted bucketing input length, in bytes.
///
/// This is a defensive bound, not a business rule: realistic subject and flag
/// keys never come close to it.
pub const MAX_INPUT_LEN: usize = 1024;

/// Number of rollout buckets.
const BUCKETS: u32 = 100;

/// Map `input` to a stable bucket in `[0, 100)`.
///
/// The same input always maps to the same bucket, and distinct inputs spread
/// approximately uniformly over the buckets. Rollout evaluation composes the
/// input as `"{subject_key}:{flag_key}"`, so a subject receives independent
/// bucket assignments per flag.
///
/// Returns [`Error::BucketInputTooLong`] for inputs over [`MAX_INPUT_LEN`]
/// bytes.
pub fn rollout_bucket(input: &str) -> Result<u32> {
    if input.len() > MAX_INPUT_LEN {
        return Err(Error::BucketInputTooLong {
            length: input.len(),
        });
    }

    Ok(fnv1a_32(input.as_bytes()) % BUCKETS)
}

/// 32-bit FNV-1a over `bytes`.
fn fnv1a_32(bytes: &[u8]) -> u32 {
    const OFFSET_BASIS: u32 = 2166136261;
    const PRIME: u32 = 16777619;

    bytes.iter().fold(OFFSET_BASIS, |hash, &byte| {
        (hash ^ u32::from(byte)).wrapping_mul(PRIME)
    })
}
