//! Cross-stage compatibility fingerprints.
//!
//! The runtime compares the vertex stage's output fingerprint with the
//! fragment stage's input fingerprint to reject mismatched pairs without
//! comparing name lists.

use crate::core::Stage;
use crate::reflect::Param;

// FNV-1a 32-bit constants
const FNV_OFFSET_BASIS: u32 = 2166136261;
const FNV_PRIME: u32 = 16777619;

/// 32-bit FNV-1a of `bytes`.
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in bytes {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Order-independent hash of the declared parameter names.
///
/// Names are sorted, hashed individually and XOR-folded, so only the name
/// multiset matters.
pub fn hash_params(params: &[Param]) -> u32 {
    let mut names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    names.sort_unstable();
    names
        .into_iter()
        .fold(0, |hash, name| hash ^ fnv1a_32(name.as_bytes()))
}

/// `(input_hash, output_hash)` for a container of `stage`.
pub fn fingerprints(stage: Stage, inputs: &[Param], outputs: &[Param]) -> (u32, u32) {
    match stage {
        Stage::Fragment => (hash_params(inputs), 0),
        Stage::Vertex => (0, hash_params(outputs)),
        _ => (0, 0),
    }
}
