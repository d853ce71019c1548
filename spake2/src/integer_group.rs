//! Prime-order subgroups of `(Z/pZ)*`, at three published security levels.
//!
//! Each group is a triple `(p, q, g)`: `p` the field modulus, `q` the
//! subgroup order (`q | p - 1`), `g` a generator of the order-`q` subgroup.
//! The 1024-bit group traces back to the J-PAKE demo code; the 2048- and
//! 3072-bit groups come from NIST's DSA parameter examples. All three are
//! carried here for compatibility with deployments that predate the
//! elliptic-curve default.

use std::sync::OnceLock;

use num_bigint::BigUint;
use num_traits::{One, Zero};

use spake2_core::entropy::EntropySource;
use spake2_core::error::{Error, Result};
use spake2_core::group::{encode_be_fixed_width, password_to_scalar_biguint, Group};
use spake2_core::kdf::expand_arbitrary_element_seed;
use spake2_core::util::{bytes_to_number, unbiased_randrange};

/// A scalar in `[0, q)`. Wraps [`BigUint`] so that dropping a session can
/// zero its ephemeral and password-derived scalars in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntegerScalar(BigUint);

impl zeroize::Zeroize for IntegerScalar {
    fn zeroize(&mut self) {
        self.0 = BigUint::zero();
    }
}

struct IntegerGroupParams {
    p: BigUint,
    q: BigUint,
    g: BigUint,
    element_size_bytes: usize,
    scalar_size_bytes: usize,
}

impl IntegerGroupParams {
    fn build(p_hex: &str, q_hex: &str, g_hex: &str) -> Self {
        let p = BigUint::parse_bytes(p_hex.as_bytes(), 16).expect("hardcoded group modulus is valid hex");
        let q = BigUint::parse_bytes(q_hex.as_bytes(), 16).expect("hardcoded group order is valid hex");
        let g = BigUint::parse_bytes(g_hex.as_bytes(), 16).expect("hardcoded generator is valid hex");
        debug_assert_eq!(g.modpow(&q, &p), BigUint::one(), "generator must have order q");
        IntegerGroupParams {
            element_size_bytes: spake2_core::util::size_bytes(&p),
            scalar_size_bytes: spake2_core::util::size_bytes(&q),
            p,
            q,
            g,
        }
    }
}

macro_rules! integer_group {
    ($name:ident, $doc:literal, $p:expr, $q:expr, $g:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $name;

        impl $name {
            fn params(&self) -> &'static IntegerGroupParams {
                static PARAMS: OnceLock<IntegerGroupParams> = OnceLock::new();
                PARAMS.get_or_init(|| IntegerGroupParams::build($p, $q, $g))
            }
        }

        impl Group for $name {
            type Scalar = IntegerScalar;
            type Element = BigUint;

            fn scalar_size_bytes(&self) -> usize {
                self.params().scalar_size_bytes
            }

            fn element_size_bytes(&self) -> usize {
                self.params().element_size_bytes
            }

            fn order(&self) -> &BigUint {
                &self.params().q
            }

            fn random_scalar(&self, entropy: &mut dyn EntropySource) -> IntegerScalar {
                let q = &self.params().q;
                let i = unbiased_randrange(&BigUint::zero(), q, entropy).expect(
                    "unbiased_randrange only fails after 10,000 retries against a broken entropy source",
                );
                IntegerScalar(i)
            }

            fn scalar_to_bytes(&self, scalar: &IntegerScalar) -> Vec<u8> {
                encode_be_fixed_width(&scalar.0, &self.params().q)
            }

            fn bytes_to_scalar(&self, bytes: &[u8]) -> Result<IntegerScalar> {
                let params = self.params();
                if bytes.len() != params.scalar_size_bytes {
                    return Err(Error::BadArgument("scalar encoding has the wrong width"));
                }
                let i = bytes_to_number(bytes);
                if i >= params.q {
                    return Err(Error::BadArgument("scalar encoding is out of range"));
                }
                Ok(IntegerScalar(i))
            }

            fn negate_scalar(&self, scalar: &IntegerScalar) -> IntegerScalar {
                let q = &self.params().q;
                IntegerScalar((q - &scalar.0) % q)
            }

            fn password_to_scalar(&self, password: &[u8]) -> IntegerScalar {
                let params = self.params();
                IntegerScalar(password_to_scalar_biguint(password, params.scalar_size_bytes, &params.q))
            }

            fn bytes_to_element(&self, bytes: &[u8]) -> Result<BigUint> {
                let params = self.params();
                if bytes.len() != params.element_size_bytes {
                    return Err(Error::InvalidElement);
                }
                let i = bytes_to_number(bytes);
                // Zp* excludes 0.
                if i.is_zero() || i >= params.p {
                    return Err(Error::InvalidElement);
                }
                if i.modpow(&params.q, &params.p) != BigUint::one() {
                    return Err(Error::InvalidElement);
                }
                Ok(i)
            }

            fn arbitrary_element(&self, seed: &[u8]) -> BigUint {
                let params = self.params();
                let processed = expand_arbitrary_element_seed(seed, params.element_size_bytes);
                // r*q = p-1; h^r lands in the order-q subgroup regardless of h.
                let r = (&params.p - BigUint::one()) / &params.q;
                let h = bytes_to_number(&processed) % &params.p;
                h.modpow(&r, &params.p)
            }

            fn element_to_bytes(&self, element: &BigUint) -> Vec<u8> {
                encode_be_fixed_width(element, &self.params().p)
            }

            fn base(&self) -> BigUint {
                self.params().g.clone()
            }

            fn zero(&self) -> BigUint {
                BigUint::one()
            }

            fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
                (a * b) % &self.params().p
            }

            fn scalarmult(&self, element: &BigUint, scalar: &IntegerScalar) -> BigUint {
                let params = &self.params();
                element.modpow(&(&scalar.0 % &params.q), &params.p)
            }
        }
    };
}

integer_group!(
    IntegerGroup1024,
    "The legacy ~80-bit-security integer subgroup (L=1024, N=160).",
    "E0A67598CD1B763BC98C8ABB333E5DDA0CD3AA0E5E1FB5BA8A7B4EABC10BA338FAE06DD4B90FDA70D7CF0CB0C638BE3341BEC0AF8A7330A3307DED2299A0EE606DF035177A239C34A912C202AA5F83B9C4A7CF0235B5316BFC6EFB9A248411258B30B839AF172440F32563056CB67A861158DDD90E6A894C72A5BBEF9E286C6B",
    "E950511EAB424B9A19A2AEB4E159B7844C589C4F",
    "D29D5121B0423C2769AB21843E5A3240FF19CACC792264E3BB6BE4F78EDD1B15C4DFF7F1D905431F0AB16790E1F773B5CE01C804E509066A9919F5195F4ABC58189FD9FF987389CB5BEDF21B4DAB4F8B76A055FFE2770988FE2EC2DE11AD92219F0B351869AC24DA3D7BA87011A701CE8EE7BFE49486ED4527B7186CA4610A75"
);

integer_group!(
    IntegerGroup2048,
    "The default integer subgroup for legacy callers (~112-bit security, L=2048, N=224).",
    "C196BA05AC29E1F9C3C72D56DFFC6154A033F1477AC88EC37F09BE6C5BB95F51C296DD20D1A28A067CCC4D4316A4BD1DCA55ED1066D438C35AEBAABF57E7DAE428782A95ECA1C143DB701FD48533A3C18F0FE23557EA7AE619ECACC7E0B51652A8776D02A425567DED36EABD90CA33A1E8D988F0BBB92D02D1D20290113BB562CE1FC856EEB7CDD92D33EEA6F410859B179E7E789A8F75F645FAE2E136D252BFFAFF89528945C1ABE705A38DBC2D364AADE99BE0D0AAD82E5320121496DC65B3930E38047294FF877831A16D5228418DE8AB275D7D75651CEFED65F78AFC3EA7FE4D79B35F62A0402A1117599ADAC7B269A59F353CF450E6982D3B1702D9CA83",
    "90EAF4D1AF0708B1B612FF35E0A2997EB9E9D263C9CE659528945C0D",
    "A59A749A11242C58C894E9E5A91804E8FA0AC64B56288F8D47D51B1EDC4D65444FECA0111D78F35FC9FDD4CB1F1B79A3BA9CBEE83A3F811012503C8117F98E5048B089E387AF6949BF8784EBD9EF45876F2E6A5A495BE64B6E770409494B7FEE1DBB1E4B2BC2A53D4F893D418B7159592E4FFFDF6969E91D770DAEBD0B5CB14C00AD68EC7DC1E5745EA55C706C4A1C5C88964E34D09DEB753AD418C1AD0F4FDFD049A955E5D78491C0B7A2F1575A008CCD727AB376DB6E695515B05BD412F5B8C2F4C77EE10DA48ABD53F5DD498927EE7B692BBBCDA2FB23A516C5B4533D73980B2A3B60E384ED200AE21B40D273651AD6060C13D97FD69AA13C5611A51B9085"
);

integer_group!(
    IntegerGroup3072,
    "The strongest published integer subgroup (~128-bit security, L=3072, N=256).",
    "90066455B5CFC38F9CAA4A48B4281F292C260FEEF01FD61037E56258A7795A1C7AD46076982CE6BB956936C6AB4DCFE05E6784586940CA544B9B2140E1EB523F009D20A7E7880E4E5BFA690F1B9004A27811CD9904AF70420EEFD6EA11EF7DA129F58835FF56B89FAA637BC9AC2EFAAB903402229F491D8D3485261CD068699B6BA58A1DDBBEF6DB51E8FE34E8A78E542D7BA351C21EA8D8F1D29F5D5D15939487E27F4416B0CA632C59EFD1B1EB66511A5A0FBF615B766C5862D0BD8A3FE7A0E0DA0FB2FE1FCB19E8F9996A8EA0FCCDE538175238FC8B0EE6F29AF7F642773EBE8CD5402415A01451A840476B2FCEB0E388D30D4B376C37FE401C2A2C2F941DAD179C540C1C8CE030D460C4D983BE9AB0B20F69144C1AE13F9383EA1C08504FB0BF321503EFE43488310DD8DC77EC5B8349B8BFE97C2C560EA878DE87C11E3D597F1FEA742D73EEC7F37BE43949EF1A0D15C3F3E3FC0A8335617055AC91328EC22B50FC15B941D3D1624CD88BC25F3E941FDDC6200689581BFEC416B4B2CB73",
    "CFA0478A54717B08CE64805B76E5B14249A77A4838469DF7F7DC987EFCCFB11D",
    "5E5CBA992E0A680D885EB903AEA78E4A45A469103D448EDE3B7ACCC54D521E37F84A4BDD5B06B0970CC2D2BBB715F7B82846F9A0C393914C792E6A923E2117AB805276A975AADB5261D91673EA9AAFFEECBFA6183DFCB5D3B7332AA19275AFA1F8EC0B60FB6F66CC23AE4870791D5982AAD1AA9485FD8F4A60126FEB2CF05DB8A7F0F09B3397F3937F2E90B9E5B9C9B6EFEF642BC48351C46FB171B9BFA9EF17A961CE96C7E7A7CC3D3D03DFAD1078BA21DA425198F07D2481622BCE45969D9C4D6063D72AB7A0F08B2F49A7CC6AF335E08C4720E31476B67299E231F8BD90B39AC3AE3BE0C6B6CACEF8289A2E2873D58E51E029CAFBD55E6841489AB66B5B4B9BA6E2F784660896AFF387D92844CCB8B69475496DE19DA2E58259B090489AC8E62363CDF82CFD8EF2A427ABCD65750B506F56DDE3B988567A88126B914D7828E2B63A6D7ED0747EC59E0E0A23CE7D8A74C1D2C2A7AFB6A29799620F00E11C33787F7DED3B30E1A22D09F1FBDA1ABBBFBF25CAE05A13F812E34563F99410E73B"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_to_scalar_i2048_matches_reference_vector() {
        let group = IntegerGroup2048;
        let scalar = group.password_to_scalar(b"pw");
        let bytes = group.scalar_to_bytes(&scalar);
        assert_eq!(
            hex::encode(bytes),
            "31bfa1a2f261b3d25cb1374659295dc4911970ef2f36b11c298e87b9"
        );
    }

    #[test]
    fn password_to_scalar_i1024_matches_reference_vector() {
        let group = IntegerGroup1024;
        let scalar = group.password_to_scalar(b"pw");
        let bytes = group.scalar_to_bytes(&scalar);
        assert_eq!(hex::encode(bytes), "8e0305a470dd82cfd0d3565b26a8cc038a760db1");
    }

    #[test]
    fn password_to_scalar_i3072_matches_reference_vector() {
        let group = IntegerGroup3072;
        let scalar = group.password_to_scalar(b"pw");
        let bytes = group.scalar_to_bytes(&scalar);
        assert_eq!(
            hex::encode(bytes),
            "03e8e502ef6cd6eeea8d602d55f15b3a843db65a1fb5c6e8875ddc4607d68c8c"
        );
    }

    #[test]
    fn scalar_encoding_is_big_endian_with_leading_zero_padding() {
        let group = IntegerGroup2048;
        let scalar = IntegerScalar(BigUint::from(1u32));
        let bytes = group.scalar_to_bytes(&scalar);
        assert_eq!(bytes.len(), group.scalar_size_bytes());
        assert_eq!(*bytes.last().unwrap(), 1);
        assert!(bytes[..bytes.len() - 1].iter().all(|&b| b == 0));
    }

    #[test]
    fn base_point_has_order_q() {
        let group = IntegerGroup2048;
        let params = group.params();
        assert_eq!(params.g.modpow(&params.q, &params.p), BigUint::one());
    }

    #[test]
    fn arbitrary_element_is_deterministic_and_in_subgroup() {
        let group = IntegerGroup2048;
        let a = group.arbitrary_element(b"A");
        let b = group.arbitrary_element(b"A");
        assert_eq!(a, b);
        assert!(group.bytes_to_element(&group.element_to_bytes(&a)).is_ok());
    }

    #[test]
    fn element_and_scalar_roundtrip() {
        let group = IntegerGroup2048;
        let scalar = group.password_to_scalar(b"round trip me");
        let bytes = group.scalar_to_bytes(&scalar);
        assert_eq!(group.bytes_to_scalar(&bytes).unwrap(), scalar);

        let elem = group.arbitrary_element(b"round trip element");
        let bytes = group.element_to_bytes(&elem);
        assert_eq!(group.bytes_to_element(&bytes).unwrap(), elem);
    }

    #[test]
    fn bytes_to_element_rejects_zero_and_wrong_width() {
        let group = IntegerGroup2048;
        let zero_bytes = vec![0u8; group.element_size_bytes()];
        assert!(group.bytes_to_element(&zero_bytes).is_err());

        let short = vec![1u8; group.element_size_bytes() - 1];
        assert!(group.bytes_to_element(&short).is_err());
    }

    #[test]
    fn bytes_to_element_rejects_full_group_element_outside_subgroup() {
        let group = IntegerGroup2048;
        let params = group.params();
        // p-1 has order 2 in Zp* (it is -1 mod p), which does not divide the
        // odd subgroup order q, so it cannot be a member of the order-q
        // subgroup unless q is even.
        let candidate = &params.p - BigUint::one();
        if candidate.modpow(&params.q, &params.p) != BigUint::one() {
            let bytes = encode_be_fixed_width(&candidate, &params.p);
            assert!(group.bytes_to_element(&bytes).is_err());
        }
    }
}
