//! Deterministic byte-expansion of a seed, used both to bias-reduce a
//! password into a scalar and to derive the blinding elements M/N/S from
//! public seed strings.

use hkdf::Hkdf;
use sha2::Sha256;

const PASSWORD_INFO: &[u8] = b"SPAKE2 pw";
const ARBITRARY_ELEMENT_INFO: &[u8] = b"SPAKE2 arbitrary element";

/// Expand `ikm` into exactly `num_bytes` bytes via HKDF-SHA256 with an empty
/// salt and the `"SPAKE2 pw"` info label.
pub fn expand_password(ikm: &[u8], num_bytes: usize) -> Vec<u8> {
    expand(ikm, PASSWORD_INFO, num_bytes)
}

/// Expand `seed` into exactly `num_bytes` bytes via HKDF-SHA256 with an empty
/// salt and the `"SPAKE2 arbitrary element"` info label.
pub fn expand_arbitrary_element_seed(seed: &[u8], num_bytes: usize) -> Vec<u8> {
    expand(seed, ARBITRARY_ELEMENT_INFO, num_bytes)
}

fn expand(ikm: &[u8], info: &[u8], num_bytes: usize) -> Vec<u8> {
    let hk = Hkdf::<Sha256>::new(Some(b""), ikm);
    let mut out = vec![0u8; num_bytes];
    hk.expand(info, &mut out)
        .expect("SPAKE2 HKDF outputs requested are always within RFC 5869's 255*HashLen limit");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_password_is_deterministic_and_sized() {
        let a = expand_password(b"password", 48);
        let b = expand_password(b"password", 48);
        assert_eq!(a, b);
        assert_eq!(a.len(), 48);
    }

    #[test]
    fn different_labels_diverge() {
        let a = expand_password(b"seed", 32);
        let b = expand_arbitrary_element_seed(b"seed", 32);
        assert_ne!(a, b);
    }
}
