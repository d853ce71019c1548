//! The abstract cyclic-group contract the SPAKE2 state machine is built on.
//!
//! A concrete backend (a prime-order integer subgroup, or Ed25519) implements
//! [`Group`] once; [`crate::session::Session`] is generic over it and never
//! needs to know which backend it is driving. Selecting a group is therefore
//! a type choice, not a runtime dispatch over mutable state; see the
//! "Polymorphic group via a capability set" design note.
//!
//! Where the Python reference implementation this crate's protocol layer is
//! modeled on composes elements with infix operators (`X + Y`, `e * s`) and
//! raises `TypeError` for type-wrong combinations at runtime, this trait
//! exposes explicit `add`/`scalarmult`/`negate_scalar` methods instead: Rust's
//! type system already rejects `Scalar * Scalar` or `Element + Scalar` at
//! compile time, so there is no runtime type check left to perform.

use std::fmt::Debug;

use num_bigint::BigUint;
use num_traits::Zero;
use zeroize::Zeroize;

use crate::entropy::EntropySource;
use crate::error::Result;
use crate::kdf::expand_password;
use crate::util::{bytes_to_number, size_bytes};

/// A prime-order cyclic group, together with its scalar field, as needed by
/// the SPAKE2 protocol core.
///
/// This does not have to be implemented directly on the element/scalar type
/// itself; a thin marker type per named parameter set (e.g. one zero-sized
/// struct per integer-group security level) is the idiomatic shape, with the
/// actual arithmetic delegated to a general-purpose bignum or curve crate.
pub trait Group: Clone + Debug {
    /// An element of the scalar field `GF(q)`, `q` the subgroup order.
    type Scalar: Clone + PartialEq + Debug + Zeroize;

    /// An opaque member of the prime-order subgroup.
    type Element: Clone + PartialEq + Debug;

    /// Width, in bytes, of a fixed-width scalar encoding.
    fn scalar_size_bytes(&self) -> usize;

    /// Width, in bytes, of a fixed-width element encoding.
    fn element_size_bytes(&self) -> usize;

    /// The subgroup order `q`, as an arbitrary-precision integer. Used by the
    /// generic password-to-scalar bias reduction and by test vectors; not
    /// used on any hot path for the elliptic-curve backend.
    fn order(&self) -> &BigUint;

    /// Sample a scalar uniformly from `[0, q)`.
    fn random_scalar(&self, entropy: &mut dyn EntropySource) -> Self::Scalar;

    /// Encode a scalar to its fixed-width byte representation.
    fn scalar_to_bytes(&self, scalar: &Self::Scalar) -> Vec<u8>;

    /// Decode a fixed-width byte string into a scalar in `[0, q)`.
    fn bytes_to_scalar(&self, bytes: &[u8]) -> Result<Self::Scalar>;

    /// Negate a scalar modulo `q`.
    fn negate_scalar(&self, scalar: &Self::Scalar) -> Self::Scalar;

    /// Map an arbitrary-length password to a scalar in `[0, q)`:
    /// `bytes_to_number(expand_password(pw, scalar_size_bytes + 16)) mod q`.
    /// The 16-byte overshoot keeps the residual modular bias below 2^-128.
    fn password_to_scalar(&self, password: &[u8]) -> Self::Scalar;

    /// Decode and validate a candidate element: the bytes must represent a
    /// genuine member of the prime-order subgroup, not merely a value that
    /// parses.
    fn bytes_to_element(&self, bytes: &[u8]) -> Result<Self::Element>;

    /// Derive a subgroup element from a public seed such that no party knows
    /// its discrete log (a hash-to-group construction).
    fn arbitrary_element(&self, seed: &[u8]) -> Self::Element;

    /// Encode an element to its fixed-width byte representation.
    fn element_to_bytes(&self, element: &Self::Element) -> Vec<u8>;

    /// The generator (base point) of the subgroup.
    fn base(&self) -> Self::Element;

    /// The identity element of the subgroup.
    fn zero(&self) -> Self::Element;

    /// The group law: `a + b`.
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;

    /// Scalar multiplication: `scalar * element`.
    fn scalarmult(&self, element: &Self::Element, scalar: &Self::Scalar) -> Self::Element;
}

/// Shared implementation of `password_to_scalar`'s bias-reduction step:
/// expand the password to `scalar_size_bytes + 16` bytes, interpret as a
/// big-endian integer, and reduce modulo `order`. Every [`Group`] backend
/// calls this and then re-encodes the result in its own scalar
/// representation (big-endian for the integer groups, little-endian for
/// Ed25519).
pub fn password_to_scalar_biguint(
    password: &[u8],
    scalar_size_bytes: usize,
    order: &BigUint,
) -> BigUint {
    debug_assert!(!order.is_zero());
    let oversized = expand_password(password, scalar_size_bytes + 16);
    bytes_to_number(&oversized) % order
}

/// Fixed-width big-endian encoding of a [`BigUint`] scalar/element value,
/// shared by any backend whose wire format matches `size_bytes(modulus)`.
pub fn encode_be_fixed_width(value: &BigUint, modulus: &BigUint) -> Vec<u8> {
    let width = size_bytes(modulus);
    let raw = value.to_bytes_be();
    debug_assert!(raw.len() <= width);
    let mut out = vec![0u8; width.saturating_sub(raw.len())];
    out.extend_from_slice(&raw);
    out
}
