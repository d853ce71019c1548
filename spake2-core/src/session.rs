//! The SPAKE2 protocol state machine: `Parameters`, `Session`, and the three
//! role-tagged wrappers (`Spake2A`, `Spake2B`, `Spake2Symmetric`) built on
//! top of it.

use zeroize::Zeroize;

use crate::entropy::BoxEntropy;
use crate::error::{Error, Result};
use crate::group::Group;
use crate::transcript::{finalize_spake2, finalize_spake2_symmetric, sorted_pair};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which role a session plays in the exchange. Carried as a single tag byte
/// on the wire (`'A'`, `'B'`, or `'S'`); never itself part of the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
    Symmetric,
}

impl Side {
    fn tag_byte(self) -> u8 {
        match self {
            Side::A => b'A',
            Side::B => b'B',
            Side::Symmetric => b'S',
        }
    }

    fn from_tag_byte(byte: u8) -> Option<Side> {
        match byte {
            b'A' => Some(Side::A),
            b'B' => Some(Side::B),
            b'S' => Some(Side::Symmetric),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Side::A => "A",
            Side::B => "B",
            Side::Symmetric => "S",
        }
    }
}

/// A published set of blinding elements for one group: `M`/`N` for the
/// asymmetric sides, `S` for the symmetric side. Built once per group and
/// shared by reference; see the owning crate's `OnceLock`-backed statics.
#[derive(Debug)]
pub struct Parameters<G: Group> {
    pub group: G,
    pub m: G::Element,
    pub n: G::Element,
    pub s: G::Element,
}

impl<G: Group> Parameters<G> {
    /// Derive `M`, `N`, and `S` from the group's fixed public seeds.
    pub fn new(group: G) -> Self {
        let m = group.arbitrary_element(b"M");
        let n = group.arbitrary_element(b"N");
        let s = group.arbitrary_element(b"symmetric");
        Parameters { group, m, n, s }
    }

    fn blinding_for(&self, side: Side) -> &G::Element {
        match side {
            Side::A => &self.m,
            Side::B => &self.n,
            Side::Symmetric => &self.s,
        }
    }

    fn unblinding_for(&self, side: Side) -> &G::Element {
        match side {
            Side::A => &self.n,
            Side::B => &self.m,
            Side::Symmetric => &self.s,
        }
    }

    /// SHA-256 hex digest over `arbitrary_element("") || password_to_scalar("") || {M,N or S}`.
    /// Any drift in the group, encoding, KDF, or seed strings changes this,
    /// turning a restore against a mismatched parameter set into a loud
    /// `WrongGroup` failure instead of silent key disagreement.
    pub fn fingerprint_hex(&self, side: Side) -> String {
        use sha2::{Digest, Sha256};
        let group = &self.group;
        let mut hasher = Sha256::new();
        hasher.update(group.element_to_bytes(&group.arbitrary_element(b"")));
        hasher.update(group.scalar_to_bytes(&group.password_to_scalar(b"")));
        match side {
            Side::Symmetric => hasher.update(group.element_to_bytes(&self.s)),
            Side::A | Side::B => {
                hasher.update(group.element_to_bytes(&self.m));
                hasher.update(group.element_to_bytes(&self.n));
            }
        }
        hex::encode(hasher.finalize())
    }
}

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct SerializedSession {
    side: String,
    hashed_params: String,
    #[serde(rename = "idA", skip_serializing_if = "Option::is_none", default)]
    id_a: Option<String>,
    #[serde(rename = "idB", skip_serializing_if = "Option::is_none", default)]
    id_b: Option<String>,
    #[serde(rename = "idS", skip_serializing_if = "Option::is_none", default)]
    id_s: Option<String>,
    password: String,
    xy_scalar: String,
}

#[cfg(feature = "serde")]
fn decode_hex_field(field: &str) -> Result<Vec<u8>> {
    hex::decode(field).map_err(|_| Error::BadArgument("serialized session field is not valid hex"))
}

/// One party's view of a single SPAKE2 exchange, generic over the group it
/// runs in. Single-use: `start` and `finish` each fire at most once.
pub struct Session<'p, G: Group> {
    side: Side,
    params: &'p Parameters<G>,
    id_a: Vec<u8>,
    id_b: Vec<u8>,
    password: Vec<u8>,
    pw_scalar: G::Scalar,
    entropy: BoxEntropy,
    started: bool,
    finished: bool,
    xy: Option<G::Scalar>,
    outbound_message: Option<Vec<u8>>,
}

impl<'p, G: Group> Session<'p, G> {
    fn new(
        side: Side,
        params: &'p Parameters<G>,
        password: &[u8],
        id_a: &[u8],
        id_b: &[u8],
        entropy: BoxEntropy,
    ) -> Self {
        let pw_scalar = params.group.password_to_scalar(password);
        Session {
            side,
            params,
            id_a: id_a.to_vec(),
            id_b: id_b.to_vec(),
            password: password.to_vec(),
            pw_scalar,
            entropy,
            started: false,
            finished: false,
            xy: None,
            outbound_message: None,
        }
    }

    /// Sample a fresh ephemeral scalar, compute the blinded outbound element,
    /// and return the tagged `role_byte || element_bytes` message.
    pub fn start(&mut self) -> Result<Vec<u8>> {
        if self.started {
            tracing::warn!(role = self.side.label(), "start() called twice");
            return Err(Error::StartedTwice);
        }
        let _span = tracing::debug_span!("spake2_start", role = self.side.label()).entered();

        let group = &self.params.group;
        let xy = group.random_scalar(self.entropy.as_mut());
        let xy_elem = group.scalarmult(&group.base(), &xy);
        let blinded = group.add(&xy_elem, &group.scalarmult(self.params.blinding_for(self.side), &self.pw_scalar));

        let mut message = Vec::with_capacity(1 + group.element_size_bytes());
        message.push(self.side.tag_byte());
        message.extend_from_slice(&group.element_to_bytes(&blinded));

        self.xy = Some(xy);
        self.outbound_message = Some(message.clone());
        self.started = true;
        Ok(message)
    }

    /// Consume the peer's tagged message, validate it, and derive the
    /// 32-byte session key. Zeroizes `pw_scalar` and `xy` on every return
    /// path, success or failure.
    pub fn finish(&mut self, peer_message: &[u8]) -> Result<[u8; 32]> {
        if self.finished {
            tracing::warn!(role = self.side.label(), "finish() called twice");
            return Err(Error::FinishedTwice);
        }
        debug_assert!(self.started, "finish() called before start()");

        let result = self.finish_inner(peer_message);
        self.finished = true;
        self.zeroize_secrets();
        result
    }

    fn finish_inner(&self, peer_message: &[u8]) -> Result<[u8; 32]> {
        let _span = tracing::debug_span!("spake2_finish", role = self.side.label()).entered();

        if peer_message.is_empty() {
            return Err(Error::BadArgument("peer message is empty"));
        }
        let peer_side = Side::from_tag_byte(peer_message[0]).ok_or_else(|| {
            tracing::warn!(role = self.side.label(), "peer message carries an unrecognized role byte");
            Error::OffSides
        })?;
        let peer_elem_bytes = &peer_message[1..];

        let sides_match = matches!(
            (self.side, peer_side),
            (Side::A, Side::B) | (Side::B, Side::A) | (Side::Symmetric, Side::Symmetric)
        );
        if !sides_match {
            tracing::warn!(
                role = self.side.label(),
                peer = peer_side.label(),
                "peer message is not the expected counterpart role"
            );
            return Err(Error::OffSides);
        }

        let outbound_message = self
            .outbound_message
            .as_ref()
            .expect("finish_inner only runs after start() has populated outbound_message");
        if peer_elem_bytes == &outbound_message[1..] {
            tracing::warn!(role = self.side.label(), "peer element reflects our own outbound element");
            return Err(Error::ReflectionThwarted);
        }

        let group = &self.params.group;
        let peer_elem = group.bytes_to_element(peer_elem_bytes)?;

        let neg_pw_scalar = group.negate_scalar(&self.pw_scalar);
        let unblinding = self.params.unblinding_for(self.side);
        let unblinded_peer = group.add(&peer_elem, &group.scalarmult(unblinding, &neg_pw_scalar));
        let xy = self
            .xy
            .as_ref()
            .expect("finish_inner only runs after start() has populated xy");
        let shared = group.scalarmult(&unblinded_peer, xy);
        let k_bytes = group.element_to_bytes(&shared);

        let key = match self.side {
            Side::A => finalize_spake2(
                &self.password,
                &self.id_a,
                &self.id_b,
                &outbound_message[1..],
                peer_elem_bytes,
                &k_bytes,
            ),
            Side::B => finalize_spake2(
                &self.password,
                &self.id_a,
                &self.id_b,
                peer_elem_bytes,
                &outbound_message[1..],
                &k_bytes,
            ),
            Side::Symmetric => {
                let (first, second) = sorted_pair(&outbound_message[1..], peer_elem_bytes);
                finalize_spake2_symmetric(&self.password, &self.id_a, first, second, &k_bytes)
            }
        };
        Ok(key)
    }

    /// Snapshot the in-progress session (after `start`, before `finish`) as a
    /// canonical JSON dictionary suitable for out-of-process storage.
    ///
    /// The blob contains the password in clear hex; treat it as
    /// password-equivalent secret material.
    #[cfg(feature = "serde")]
    pub fn serialize(&self) -> Result<Vec<u8>> {
        if !self.started {
            return Err(Error::SerializedTooEarly);
        }
        let group = &self.params.group;
        let xy = self
            .xy
            .as_ref()
            .expect("serialize() only runs after start() has populated xy");

        let mut doc = SerializedSession {
            side: self.side.label().to_string(),
            hashed_params: self.params.fingerprint_hex(self.side),
            id_a: None,
            id_b: None,
            id_s: None,
            password: hex::encode(&self.password),
            xy_scalar: hex::encode(group.scalar_to_bytes(xy)),
        };
        match self.side {
            Side::A | Side::B => {
                doc.id_a = Some(hex::encode(&self.id_a));
                doc.id_b = Some(hex::encode(&self.id_b));
            }
            Side::Symmetric => doc.id_s = Some(hex::encode(&self.id_a)),
        }

        serde_json::to_vec(&doc).map_err(|_| Error::BadArgument("failed to encode session snapshot as JSON"))
    }

    /// Reconstruct a session from a [`Session::serialize`] blob. `expected_side`
    /// must match the role recorded in the blob; the parameter-set fingerprint
    /// must match `params`. The outbound message is re-derived deterministically
    /// from the restored `xy` rather than re-sent over the wire.
    #[cfg(feature = "serde")]
    pub fn deserialize(
        bytes: &[u8],
        params: &'p Parameters<G>,
        expected_side: Side,
        entropy: BoxEntropy,
    ) -> Result<Self> {
        let doc: SerializedSession = serde_json::from_slice(bytes)
            .map_err(|_| Error::BadArgument("serialized session is not valid JSON"))?;

        let side = match doc.side.as_str() {
            "A" => Side::A,
            "B" => Side::B,
            "S" => Side::Symmetric,
            _ => return Err(Error::BadArgument("serialized session has an unrecognized side")),
        };
        if side != expected_side {
            tracing::warn!("serialized session role does not match the reconstructing caller");
            return Err(Error::WrongSideSerialized);
        }

        let fingerprint = params.fingerprint_hex(side);
        if fingerprint != doc.hashed_params {
            tracing::warn!("serialized session parameter-set fingerprint mismatch");
            return Err(Error::WrongGroup);
        }

        let password = decode_hex_field(&doc.password)?;
        let xy_bytes = decode_hex_field(&doc.xy_scalar)?;
        let group = &params.group;
        let xy = group.bytes_to_scalar(&xy_bytes)?;
        let pw_scalar = group.password_to_scalar(&password);

        let (id_a, id_b) = match side {
            Side::A | Side::B => (
                decode_hex_field(
                    doc.id_a
                        .as_deref()
                        .ok_or(Error::BadArgument("serialized session is missing idA"))?,
                )?,
                decode_hex_field(
                    doc.id_b
                        .as_deref()
                        .ok_or(Error::BadArgument("serialized session is missing idB"))?,
                )?,
            ),
            Side::Symmetric => {
                let id = decode_hex_field(
                    doc.id_s
                        .as_deref()
                        .ok_or(Error::BadArgument("serialized session is missing idS"))?,
                )?;
                (id.clone(), id)
            }
        };

        let xy_elem = group.scalarmult(&group.base(), &xy);
        let blinded = group.add(&xy_elem, &group.scalarmult(params.blinding_for(side), &pw_scalar));
        let mut message = Vec::with_capacity(1 + group.element_size_bytes());
        message.push(side.tag_byte());
        message.extend_from_slice(&group.element_to_bytes(&blinded));

        Ok(Session {
            side,
            params,
            id_a,
            id_b,
            password,
            pw_scalar,
            entropy,
            started: true,
            finished: false,
            xy: Some(xy),
            outbound_message: Some(message),
        })
    }

    fn zeroize_secrets(&mut self) {
        self.pw_scalar.zeroize();
        if let Some(mut xy) = self.xy.take() {
            xy.zeroize();
        }
    }
}

impl<'p, G: Group> Drop for Session<'p, G> {
    fn drop(&mut self) {
        self.zeroize_secrets();
    }
}

macro_rules! role_wrapper {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        pub struct $name<'p, G: Group> {
            session: Session<'p, G>,
        }

        impl<'p, G: Group> $name<'p, G> {
            /// Begin the exchange: sample the ephemeral scalar and return the
            /// tagged outbound message.
            pub fn start(&mut self) -> Result<Vec<u8>> {
                self.session.start()
            }

            /// Consume the peer's tagged message and derive the 32-byte key.
            pub fn finish(&mut self, peer_message: &[u8]) -> Result<[u8; 32]> {
                self.session.finish(peer_message)
            }

            /// Snapshot the session as a canonical JSON dictionary.
            #[cfg(feature = "serde")]
            pub fn serialize(&self) -> Result<Vec<u8>> {
                self.session.serialize()
            }
        }
    };
}

role_wrapper!(Spake2A, "The A side of an asymmetric SPAKE2 exchange.");
role_wrapper!(Spake2B, "The B side of an asymmetric SPAKE2 exchange.");
role_wrapper!(
    Spake2Symmetric,
    "Either side of a symmetric SPAKE2 exchange, where both parties play identical roles."
);

impl<'p, G: Group> Spake2A<'p, G> {
    pub fn new(
        params: &'p Parameters<G>,
        password: &[u8],
        id_a: &[u8],
        id_b: &[u8],
        entropy: BoxEntropy,
    ) -> Self {
        Spake2A {
            session: Session::new(Side::A, params, password, id_a, id_b, entropy),
        }
    }

    #[cfg(feature = "serde")]
    pub fn from_serialized(bytes: &[u8], params: &'p Parameters<G>, entropy: BoxEntropy) -> Result<Self> {
        Ok(Spake2A {
            session: Session::deserialize(bytes, params, Side::A, entropy)?,
        })
    }
}

impl<'p, G: Group> Spake2B<'p, G> {
    pub fn new(
        params: &'p Parameters<G>,
        password: &[u8],
        id_a: &[u8],
        id_b: &[u8],
        entropy: BoxEntropy,
    ) -> Self {
        Spake2B {
            session: Session::new(Side::B, params, password, id_a, id_b, entropy),
        }
    }

    #[cfg(feature = "serde")]
    pub fn from_serialized(bytes: &[u8], params: &'p Parameters<G>, entropy: BoxEntropy) -> Result<Self> {
        Ok(Spake2B {
            session: Session::deserialize(bytes, params, Side::B, entropy)?,
        })
    }
}

impl<'p, G: Group> Spake2Symmetric<'p, G> {
    pub fn new(params: &'p Parameters<G>, password: &[u8], id_symmetric: &[u8], entropy: BoxEntropy) -> Self {
        Spake2Symmetric {
            session: Session::new(Side::Symmetric, params, password, id_symmetric, id_symmetric, entropy),
        }
    }

    #[cfg(feature = "serde")]
    pub fn from_serialized(bytes: &[u8], params: &'p Parameters<G>, entropy: BoxEntropy) -> Result<Self> {
        Ok(Spake2Symmetric {
            session: Session::deserialize(bytes, params, Side::Symmetric, entropy)?,
        })
    }
}
