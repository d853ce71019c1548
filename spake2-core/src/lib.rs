//! Group-agnostic protocol core for SPAKE2: the byte/integer utilities, the
//! HKDF-based KDF helper, the abstract [`Group`] contract, the transcript
//! finalizer, and the `start`/`finish` session state machine.
//!
//! A concrete ciphersuite crate supplies the [`Group`] implementations (an
//! integer subgroup, an elliptic curve) this crate is generic over; this
//! crate never performs group arithmetic itself.

pub mod entropy;
pub mod error;
pub mod group;
pub mod kdf;
pub mod session;
pub mod transcript;
pub mod util;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use entropy::{BoxEntropy, EntropySource};
pub use error::{Error, Result};
pub use group::Group;
pub use session::{Parameters, Session, Side, Spake2A, Spake2B, Spake2Symmetric};
