//! SPAKE2 password-authenticated key exchange, concrete backends.
//!
//! [`Ed25519Group`] is the default; [`IntegerGroup1024`], [`IntegerGroup2048`],
//! and [`IntegerGroup3072`] are carried for compatibility with deployments
//! that predate the elliptic-curve default. Each group has a process-global,
//! lazily built [`Parameters`] set reachable through the corresponding
//! `*_params()` function below; constructing `arbitrary_element` is not
//! free, so every session sharing a group shares its parameter set rather
//! than rebuilding it.
#![doc = document_features::document_features!()]

mod ed25519_group;
mod integer_group;

use std::sync::OnceLock;

pub use ed25519_group::Ed25519Group;
pub use integer_group::{IntegerGroup1024, IntegerGroup2048, IntegerGroup3072, IntegerScalar};

pub use spake2_core::{BoxEntropy, Error, EntropySource, Group, Parameters, Result, Side};

/// The A/B/Symmetric session types, generic over [`Ed25519Group`], the
/// crate's default group for new deployments.
pub type Spake2A<'p> = spake2_core::Spake2A<'p, Ed25519Group>;
pub type Spake2B<'p> = spake2_core::Spake2B<'p, Ed25519Group>;
pub type Spake2Symmetric<'p> = spake2_core::Spake2Symmetric<'p, Ed25519Group>;

/// Convenience aliases for the 1024-bit integer group (legacy, ~80-bit security).
pub type Spake2A1024<'p> = spake2_core::Spake2A<'p, IntegerGroup1024>;
pub type Spake2B1024<'p> = spake2_core::Spake2B<'p, IntegerGroup1024>;
pub type Spake2Symmetric1024<'p> = spake2_core::Spake2Symmetric<'p, IntegerGroup1024>;

/// Convenience aliases for the 2048-bit integer group (the default integer
/// group for legacy callers).
pub type Spake2A2048<'p> = spake2_core::Spake2A<'p, IntegerGroup2048>;
pub type Spake2B2048<'p> = spake2_core::Spake2B<'p, IntegerGroup2048>;
pub type Spake2Symmetric2048<'p> = spake2_core::Spake2Symmetric<'p, IntegerGroup2048>;

/// Convenience aliases for the 3072-bit integer group (~128-bit security).
pub type Spake2A3072<'p> = spake2_core::Spake2A<'p, IntegerGroup3072>;
pub type Spake2B3072<'p> = spake2_core::Spake2B<'p, IntegerGroup3072>;
pub type Spake2Symmetric3072<'p> = spake2_core::Spake2Symmetric<'p, IntegerGroup3072>;

/// The shared, process-global parameter set for [`Ed25519Group`].
pub fn ed25519_params() -> &'static Parameters<Ed25519Group> {
    static PARAMS: OnceLock<Parameters<Ed25519Group>> = OnceLock::new();
    PARAMS.get_or_init(|| Parameters::new(Ed25519Group))
}

/// The shared, process-global parameter set for [`IntegerGroup1024`].
pub fn integer_params_1024() -> &'static Parameters<IntegerGroup1024> {
    static PARAMS: OnceLock<Parameters<IntegerGroup1024>> = OnceLock::new();
    PARAMS.get_or_init(|| Parameters::new(IntegerGroup1024))
}

/// The shared, process-global parameter set for [`IntegerGroup2048`], the
/// default integer group for legacy callers.
pub fn integer_params_2048() -> &'static Parameters<IntegerGroup2048> {
    static PARAMS: OnceLock<Parameters<IntegerGroup2048>> = OnceLock::new();
    PARAMS.get_or_init(|| Parameters::new(IntegerGroup2048))
}

/// The shared, process-global parameter set for [`IntegerGroup3072`].
pub fn integer_params_3072() -> &'static Parameters<IntegerGroup3072> {
    static PARAMS: OnceLock<Parameters<IntegerGroup3072>> = OnceLock::new();
    PARAMS.get_or_init(|| Parameters::new(IntegerGroup3072))
}

/// An entropy source backed by the operating system's random device, for
/// callers that don't need to inject their own (e.g. for deterministic
/// tests).
#[cfg(feature = "default-rng")]
pub fn os_entropy() -> BoxEntropy {
    Box::new(|n: usize| {
        use rand_core::{OsRng, RngCore};
        let mut buf = vec![0u8; n];
        OsRng.fill_bytes(&mut buf);
        buf
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use spake2_core::testing::PrgEntropy;

    #[test]
    fn asymmetric_ed25519_agrees_on_a_shared_key() {
        let params = ed25519_params();
        let mut a = Spake2A::new(params, b"password", b"", b"", Box::new(PrgEntropy::new(*b"A")));
        let mut b = Spake2B::new(params, b"password", b"", b"", Box::new(PrgEntropy::new(*b"B")));

        let msg_a = a.start().unwrap();
        let msg_b = b.start().unwrap();
        assert_eq!(msg_a[0], b'A');
        assert_eq!(msg_b[0], b'B');

        let key_a = a.finish(&msg_b).unwrap();
        let key_b = b.finish(&msg_a).unwrap();
        assert_eq!(key_a, key_b);
        assert_eq!(key_a.len(), 32);
    }

    #[test]
    fn symmetric_ed25519_agrees_regardless_of_message_order() {
        let params = ed25519_params();
        let mut s1 = Spake2Symmetric::new(params, b"password", b"", Box::new(PrgEntropy::new(*b"1")));
        let mut s2 = Spake2Symmetric::new(params, b"password", b"", Box::new(PrgEntropy::new(*b"2")));

        let msg1 = s1.start().unwrap();
        let msg2 = s2.start().unwrap();
        assert_eq!(msg1[0], b'S');
        assert_eq!(msg2[0], b'S');

        let key1 = s1.finish(&msg2).unwrap();
        let key2 = s2.finish(&msg1).unwrap();
        assert_eq!(key1, key2);
    }

    #[test]
    fn mismatched_passwords_complete_without_error_but_disagree() {
        let params = ed25519_params();
        let mut a = Spake2A::new(params, b"password", b"", b"", Box::new(PrgEntropy::new(*b"A")));
        let mut b = Spake2B::new(params, b"passwerd", b"", b"", Box::new(PrgEntropy::new(*b"B")));

        let msg_a = a.start().unwrap();
        let msg_b = b.start().unwrap();
        let key_a = a.finish(&msg_b).unwrap();
        let key_b = b.finish(&msg_a).unwrap();
        assert_ne!(key_a, key_b);
    }

    #[test]
    fn reflection_is_rejected() {
        let params = ed25519_params();
        let mut a = Spake2A::new(params, b"password", b"", b"", Box::new(PrgEntropy::new(*b"A")));
        let mut replay = a.start().unwrap();
        replay[0] = b'B';
        let err = a.finish(&replay).unwrap_err();
        assert_eq!(err, Error::ReflectionThwarted);
    }

    #[test]
    fn own_role_byte_is_rejected_as_off_sides() {
        let params = ed25519_params();
        let mut a = Spake2A::new(params, b"password", b"", b"", Box::new(PrgEntropy::new(*b"A")));
        let mut other_a = Spake2A::new(params, b"password", b"", b"", Box::new(PrgEntropy::new(*b"A2")));
        a.start().unwrap();
        let other_msg = other_a.start().unwrap();
        let err = a.finish(&other_msg).unwrap_err();
        assert_eq!(err, Error::OffSides);
    }

    #[test]
    fn start_twice_fails() {
        let params = ed25519_params();
        let mut a = Spake2A::new(params, b"password", b"", b"", Box::new(PrgEntropy::new(*b"A")));
        a.start().unwrap();
        // start() isn't re-exposed on the role wrapper as idempotent; calling
        // the underlying session twice must fail identically.
        let err = a.start().unwrap_err();
        assert_eq!(err, Error::StartedTwice);
    }

    #[test]
    fn finish_twice_fails() {
        let params = ed25519_params();
        let mut a = Spake2A::new(params, b"password", b"", b"", Box::new(PrgEntropy::new(*b"A")));
        let mut b = Spake2B::new(params, b"password", b"", b"", Box::new(PrgEntropy::new(*b"B")));
        let msg_a = a.start().unwrap();
        let msg_b = b.start().unwrap();
        a.finish(&msg_b).unwrap();
        let err = a.finish(&msg_a).unwrap_err();
        assert_eq!(err, Error::FinishedTwice);
    }

    #[test]
    fn serialize_then_deserialize_preserves_the_session() {
        let params = ed25519_params();
        let mut a = Spake2A::new(params, b"password", b"idA", b"idB", Box::new(PrgEntropy::new(*b"A")));
        let msg_a = a.start().unwrap();
        let blob = a.serialize().unwrap();

        let mut restored = Spake2A::from_serialized(&blob, params, Box::new(PrgEntropy::new(*b"unused"))).unwrap();
        let mut b = Spake2B::new(params, b"password", b"idA", b"idB", Box::new(PrgEntropy::new(*b"B")));
        let msg_b = b.start().unwrap();

        let key_restored = restored.finish(&msg_b).unwrap();
        let key_b = b.finish(&msg_a).unwrap();
        assert_eq!(key_restored, key_b);
    }

    #[test]
    fn deserialize_with_wrong_group_fails() {
        let params_1024 = integer_params_1024();
        let mut a = Spake2A1024::new(params_1024, b"password", b"", b"", Box::new(PrgEntropy::new(*b"A")));
        a.start().unwrap();
        let blob = a.serialize().unwrap();

        let params_3072 = integer_params_3072();
        let err = Spake2A3072::from_serialized(&blob, params_3072, Box::new(PrgEntropy::new(*b"A")))
            .unwrap_err();
        assert_eq!(err, Error::WrongGroup);
    }
}
