//! Big-endian fixed-width integer encoding and unbiased range sampling.
//!
//! These are the lowest-level building blocks of the protocol: every scalar
//! and element encoding bottoms out in [`number_to_bytes`]/[`bytes_to_number`],
//! and every scalar sample bottoms out in [`unbiased_randrange`].

use num_bigint::BigUint;
use num_traits::Zero;

use crate::entropy::EntropySource;
use crate::error::{Error, Result};

/// Maximum number of rejection-sampling retries before
/// [`unbiased_randrange`] gives up with [`Error::EntropyExhausted`].
///
/// Each trial accepts with probability at least 1/2, so the expected number
/// of trials is under 2; this cap only trips for a broken entropy source.
const MAX_RANDRANGE_RETRIES: u32 = 10_000;

/// Number of bits needed to represent `maxval`, with the convention that
/// `size_bits(0) == 1`.
pub fn size_bits(maxval: &BigUint) -> u32 {
    let bits = maxval.bits() as u32;
    bits.max(1)
}

/// Number of bytes needed to represent `maxval`: `ceil(size_bits(maxval) / 8)`.
pub fn size_bytes(maxval: &BigUint) -> usize {
    (size_bits(maxval) as usize + 7) / 8
}

/// Encode `num` as a big-endian byte string of exactly `size_bytes(maxval)`
/// bytes. Fails with [`Error::BadArgument`] if `num > maxval`.
pub fn number_to_bytes(num: &BigUint, maxval: &BigUint) -> Result<Vec<u8>> {
    if num > maxval {
        return Err(Error::BadArgument(
            "value exceeds maxval for fixed-width encoding",
        ));
    }
    let width = size_bytes(maxval);
    let raw = num.to_bytes_be();
    // raw.len() <= width is guaranteed by num <= maxval, but stay defensive
    // rather than panic on an internal miscalculation.
    if raw.len() > width {
        return Err(Error::BadArgument("encoded value too wide for its field"));
    }
    let mut out = vec![0u8; width - raw.len()];
    out.extend_from_slice(&raw);
    Ok(out)
}

/// Decode a big-endian byte string into an integer. The inverse of
/// [`number_to_bytes`].
pub fn bytes_to_number(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// The mask applied to the most-significant byte of a candidate, and the
/// number of bytes to draw, for an unbiased sample in `[0, maxval)`.
fn generate_mask(maxval: &BigUint) -> (u8, usize) {
    let num_bytes = size_bytes(maxval);
    let num_bits = size_bits(maxval);
    let leftover_bits = num_bits % 8;
    let top_byte_mask = if leftover_bits != 0 {
        (1u16 << leftover_bits) - 1
    } else {
        0xff
    };
    (top_byte_mask as u8, num_bytes)
}

/// Return a uniformly distributed integer in `[lo, hi)`.
///
/// Draws `size_bytes(hi - lo)` bytes, masks the top byte down to the minimum
/// width that covers `hi - lo`, and retries on out-of-range candidates. Each
/// trial accepts with probability >= 1/2; [`MAX_RANDRANGE_RETRIES`] bounds
/// the worst case so a broken entropy source fails loudly instead of hanging.
pub fn unbiased_randrange(
    lo: &BigUint,
    hi: &BigUint,
    entropy: &mut dyn EntropySource,
) -> Result<BigUint> {
    debug_assert!(hi > lo, "unbiased_randrange requires hi > lo");
    let maxval = hi - lo;
    if maxval.is_zero() {
        return Ok(lo.clone());
    }
    let (mask, num_bytes) = generate_mask(&maxval);

    for _ in 0..MAX_RANDRANGE_RETRIES {
        let mut candidate_bytes = entropy.fill(num_bytes);
        debug_assert_eq!(candidate_bytes.len(), num_bytes);
        if let Some(first) = candidate_bytes.first_mut() {
            *first &= mask;
        }
        let candidate = bytes_to_number(&candidate_bytes);
        if candidate < maxval {
            return Ok(lo + candidate);
        }
    }
    Err(Error::EntropyExhausted)
}
