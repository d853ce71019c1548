//! The Ed25519 elliptic-curve group, the default backend for new deployments.
//!
//! All field and curve arithmetic is delegated to `curve25519-dalek`; this
//! module only adds the group-membership validation SPAKE2 itself demands on
//! top of the underlying signature-scheme curve implementation. A decoded
//! wire element must already sit in the prime-order subgroup (checked, never
//! forced); cofactor clearing only happens once, inside `arbitrary_element`,
//! to project a hash-derived candidate into that subgroup.

use std::sync::OnceLock;

use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;
use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::Identity;
use num_bigint::BigUint;

use spake2_core::entropy::EntropySource;
use spake2_core::error::{Error, Result};
use spake2_core::group::{password_to_scalar_biguint, Group};
use spake2_core::kdf::expand_arbitrary_element_seed;
use spake2_core::util::unbiased_randrange;

/// `2^255 - 19`, the prime field Ed25519's curve equation is defined over.
fn field_prime() -> &'static BigUint {
    static P: OnceLock<BigUint> = OnceLock::new();
    P.get_or_init(|| {
        BigUint::parse_bytes(
            b"7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFED",
            16,
        )
        .expect("Ed25519 field prime is valid hex")
    })
}

/// The prime order `L` of the Ed25519 subgroup this crate operates in.
fn subgroup_order() -> &'static BigUint {
    static L: OnceLock<BigUint> = OnceLock::new();
    L.get_or_init(|| {
        BigUint::parse_bytes(
            b"1000000000000000000000000000000014DEF9DEA2F79CD65812631A5CF5D3ED",
            16,
        )
        .expect("Ed25519 subgroup order is valid hex")
    })
}

/// `y` is only canonical if it is strictly less than the field prime; dalek's
/// field-element decoder silently reduces an overlong value instead of
/// rejecting it, so this check has to happen before decompression is even
/// attempted.
fn y_is_canonical(bytes: &[u8; 32]) -> bool {
    let mut y = *bytes;
    y[31] &= 0x7f; // clear the sign bit to isolate the y coordinate
    BigUint::from_bytes_le(&y) < *field_prime()
}

/// The Ed25519 elliptic-curve group.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ed25519Group;

impl Ed25519Group {
    fn decode_candidate(bytes: &[u8; 32]) -> Option<EdwardsPoint> {
        if !y_is_canonical(bytes) {
            return None;
        }
        CompressedEdwardsY(*bytes).decompress()
    }
}

impl Group for Ed25519Group {
    type Scalar = Scalar;
    type Element = EdwardsPoint;

    fn scalar_size_bytes(&self) -> usize {
        32
    }

    fn element_size_bytes(&self) -> usize {
        32
    }

    fn order(&self) -> &BigUint {
        subgroup_order()
    }

    fn random_scalar(&self, entropy: &mut dyn EntropySource) -> Scalar {
        let i = unbiased_randrange(&BigUint::from(0u8), subgroup_order(), entropy)
            .expect("unbiased_randrange only fails after 10,000 retries against a broken entropy source");
        biguint_to_scalar(&i)
    }

    fn scalar_to_bytes(&self, scalar: &Scalar) -> Vec<u8> {
        scalar.to_bytes().to_vec()
    }

    fn bytes_to_scalar(&self, bytes: &[u8]) -> Result<Scalar> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| Error::BadArgument("scalar encoding has the wrong width"))?;
        Option::from(Scalar::from_canonical_bytes(arr))
            .ok_or(Error::BadArgument("scalar encoding is not a canonical little-endian value"))
    }

    fn negate_scalar(&self, scalar: &Scalar) -> Scalar {
        -scalar
    }

    fn password_to_scalar(&self, password: &[u8]) -> Scalar {
        let i = password_to_scalar_biguint(password, 32, subgroup_order());
        biguint_to_scalar(&i)
    }

    fn bytes_to_element(&self, bytes: &[u8]) -> Result<EdwardsPoint> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| Error::InvalidElement)?;
        let point = Self::decode_candidate(&arr).ok_or(Error::InvalidElement)?;
        if point == EdwardsPoint::identity() || !point.is_torsion_free() {
            return Err(Error::InvalidElement);
        }
        Ok(point)
    }

    fn arbitrary_element(&self, seed: &[u8]) -> EdwardsPoint {
        let mut counter: u32 = 0;
        loop {
            let mut input = seed.to_vec();
            if counter > 0 {
                input.extend_from_slice(&counter.to_le_bytes());
            }
            let candidate = expand_arbitrary_element_seed(&input, 32);
            let arr: [u8; 32] = candidate
                .as_slice()
                .try_into()
                .expect("expand_arbitrary_element_seed(_, 32) always returns 32 bytes");
            if let Some(point) = Self::decode_candidate(&arr) {
                let cleared = point.mul_by_cofactor();
                if cleared != EdwardsPoint::identity() {
                    return cleared;
                }
            }
            counter += 1;
        }
    }

    fn element_to_bytes(&self, element: &EdwardsPoint) -> Vec<u8> {
        element.compress().to_bytes().to_vec()
    }

    fn base(&self) -> EdwardsPoint {
        ED25519_BASEPOINT_POINT
    }

    fn zero(&self) -> EdwardsPoint {
        EdwardsPoint::identity()
    }

    fn add(&self, a: &EdwardsPoint, b: &EdwardsPoint) -> EdwardsPoint {
        a + b
    }

    fn scalarmult(&self, element: &EdwardsPoint, scalar: &Scalar) -> EdwardsPoint {
        element * scalar
    }
}

/// Reduce an arbitrary-precision integer modulo `L` and encode it as the
/// little-endian bytes `curve25519_dalek::Scalar` expects.
fn biguint_to_scalar(value: &BigUint) -> Scalar {
    let reduced = value % subgroup_order();
    let mut bytes = reduced.to_bytes_le();
    bytes.resize(32, 0);
    let arr: [u8; 32] = bytes.try_into().expect("resized to exactly 32 bytes");
    Scalar::from_bytes_mod_order(arr)
}
