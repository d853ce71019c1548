//! Transcript hashing: the last step that turns the two parties' ephemeral
//! commitments and shared element into a 32-byte session key.
//!
//! Every field that isn't already fixed-width is pre-hashed to SHA-256's
//! 32-byte output before being concatenated, so the transcript is
//! unambiguous without length prefixes: `SHA256(pw)` and `SHA256(id)` can
//! never be confused with the fixed-width element encodings that follow
//! them.

use sha2::{Digest, Sha256};

/// Finalize an asymmetric-variant transcript into a 32-byte session key.
///
/// `x_msg`/`y_msg` are A's and B's outbound element bytes respectively,
/// regardless of which side is the one calling this function; `k_bytes` is
/// the shared element both sides compute independently.
pub fn finalize_spake2(
    password: &[u8],
    id_a: &[u8],
    id_b: &[u8],
    x_msg: &[u8],
    y_msg: &[u8],
    k_bytes: &[u8],
) -> [u8; 32] {
    let mut transcript = Sha256::new();
    transcript.update(Sha256::digest(password));
    transcript.update(Sha256::digest(id_a));
    transcript.update(Sha256::digest(id_b));
    transcript.update(x_msg);
    transcript.update(y_msg);
    transcript.update(k_bytes);
    transcript.finalize().into()
}

/// Finalize a symmetric-variant transcript into a 32-byte session key.
///
/// `first_msg`/`second_msg` are the two parties' outbound element bytes
/// sorted into ascending lexicographic order, so both sides hash the same
/// transcript without needing to agree on who went "first".
pub fn finalize_spake2_symmetric(
    password: &[u8],
    id_symmetric: &[u8],
    first_msg: &[u8],
    second_msg: &[u8],
    k_bytes: &[u8],
) -> [u8; 32] {
    let mut transcript = Sha256::new();
    transcript.update(Sha256::digest(password));
    transcript.update(Sha256::digest(id_symmetric));
    transcript.update(first_msg);
    transcript.update(second_msg);
    transcript.update(k_bytes);
    transcript.finalize().into()
}

/// Sort two message byte strings into the order the symmetric transcript
/// requires.
pub fn sorted_pair<'a>(a: &'a [u8], b: &'a [u8]) -> (&'a [u8], &'a [u8]) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
