//! Behavioral coverage of the public session API from outside the crate,
//! complementing the backend-internal unit tests in `src/`.

use spake2::{ed25519_params, integer_params_2048, Error};
use spake2::{Spake2A, Spake2A2048, Spake2B, Spake2B2048, Spake2Symmetric};
use spake2_core::testing::PrgEntropy;

fn entropy(seed: &'static [u8]) -> spake2_core::BoxEntropy {
    Box::new(PrgEntropy::new(seed))
}

#[test]
fn integer_group_2048_sides_agree() {
    let params = integer_params_2048();
    let mut a = Spake2A2048::new(params, b"shared secret", b"idA", b"idB", entropy(b"A"));
    let mut b = Spake2B2048::new(params, b"shared secret", b"idA", b"idB", entropy(b"B"));

    let msg_a = a.start().unwrap();
    let msg_b = b.start().unwrap();
    assert_eq!(msg_a.len(), 1 + 257);
    assert_eq!(msg_b.len(), 1 + 257);

    let key_a = a.finish(&msg_b).unwrap();
    let key_b = b.finish(&msg_a).unwrap();
    assert_eq!(key_a, key_b);
}

#[test]
fn differing_identities_disagree() {
    let params = ed25519_params();
    let mut a = Spake2A::new(params, b"password", b"idA", b"idB", entropy(b"A"));
    let mut b = Spake2B::new(params, b"password", b"wrong-idA", b"idB", entropy(b"B"));

    let msg_a = a.start().unwrap();
    let msg_b = b.start().unwrap();
    let key_a = a.finish(&msg_b).unwrap();
    let key_b = b.finish(&msg_a).unwrap();
    assert_ne!(key_a, key_b);
}

#[test]
fn symmetric_side_rejects_asymmetric_peer_role() {
    let params = ed25519_params();
    let mut sym = Spake2Symmetric::new(params, b"password", b"", entropy(b"S"));
    let mut a = Spake2A::new(params, b"password", b"", b"", entropy(b"A"));

    sym.start().unwrap();
    let msg_a = a.start().unwrap();
    let err = sym.finish(&msg_a).unwrap_err();
    assert_eq!(err, Error::OffSides);
}

#[test]
fn unrecognized_role_byte_is_off_sides() {
    let params = ed25519_params();
    let mut a = Spake2A::new(params, b"password", b"", b"", entropy(b"A"));
    let msg_b_shape = {
        let mut b = Spake2B::new(params, b"password", b"", b"", entropy(b"B"));
        b.start().unwrap()
    };
    a.start().unwrap();

    let mut garbled = msg_b_shape.clone();
    garbled[0] = 0x5a; // not 'A', 'B', or 'S'
    let err = a.finish(&garbled).unwrap_err();
    assert_eq!(err, Error::OffSides);
}

#[test]
fn deterministic_entropy_reproduces_the_same_outbound_message() {
    let params = ed25519_params();
    let mut first = Spake2A::new(params, b"password", b"", b"", entropy(b"fixed-seed"));
    let mut second = Spake2A::new(params, b"password", b"", b"", entropy(b"fixed-seed"));
    assert_eq!(first.start().unwrap(), second.start().unwrap());
}
