//! The error taxonomy shared by every layer of the SPAKE2 protocol core.

/// Every externally observable failure mode of a SPAKE2 session or its
/// supporting group arithmetic.
///
/// All variants are fatal to the session (or operation) that raised them: a
/// session that produced an [`Error`] from `finish` must be discarded rather
/// than reused. A wrong password is *not* an error: `finish` still returns a
/// well-formed key, just one that disagrees with the peer's.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// `start()` was called on a session that had already started.
    #[error("start() can only be called once per session")]
    StartedTwice,

    /// `finish()` was called on a session that had already finished.
    #[error("finish() can only be called once per session")]
    FinishedTwice,

    /// `serialize()` was called before `start()`.
    #[error("call start() before serialize()")]
    SerializedTooEarly,

    /// `from_serialized()` was handed a blob recorded for the other role.
    #[error("serialized session is for the other side of the exchange")]
    WrongSideSerialized,

    /// The parameter-set fingerprint recorded in a serialized session does
    /// not match the parameter set supplied to `from_serialized()`.
    #[error("serialized session was created with a different parameter set")]
    WrongGroup,

    /// The peer's role byte was not the expected counterpart (including
    /// unrecognized role bytes).
    #[error("peer message carries an unexpected role byte")]
    OffSides,

    /// The peer's element bytes equal our own outbound message: someone is
    /// replaying our message back to us.
    #[error("peer message reflects our own outbound message")]
    ReflectionThwarted,

    /// The peer's element bytes do not decode to a valid member of the
    /// prime-order subgroup.
    #[error("peer element bytes are not a valid group element")]
    InvalidElement,

    /// The unbiased sampler exceeded its retry budget without producing an
    /// in-range candidate. Indicates a broken or exhausted entropy source.
    #[error("entropy source exhausted before producing an unbiased sample")]
    EntropyExhausted,

    /// A fixed-width encoding was asked to represent a value too large for
    /// its width, or a serialized session payload was malformed (bad hex,
    /// bad JSON, or a field of the wrong length).
    #[error("bad argument: {0}")]
    BadArgument(&'static str),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
