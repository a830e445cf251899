//! Crate-wide error type.
//!
//! Every layer of the stack — tagged-object codec, BVLC, NPDU, APDU, and
//! service frames — reports failures through a single [`BacnetError`]. Each
//! decoder is expected to attach enough context (an offset, an expected vs.
//! actual tag, an object count) that a caller can tell which layer failed
//! without re-deriving it from the byte offset alone.

#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(not(feature = "std"))]
use core::fmt;

#[cfg(feature = "std")]
use std::fmt;

/// Unified error type for encode/decode failures across all layers.
#[derive(Debug)]
pub enum BacnetError {
    /// The buffer ended before a declared field could be read in full.
    TooShort {
        /// What was being read when the buffer ran out.
        context: String,
        /// Bytes needed.
        needed: usize,
        /// Bytes available.
        available: usize,
    },
    /// A byte pattern violates the wire grammar (bad BVLC type, invalid
    /// length-nibble coding, unbalanced opening/closing tags, a payload
    /// whose length doesn't match what the type requires).
    Malformed(String),
    /// A typed decoder encountered an object with the wrong application
    /// tag number or tag class.
    WrongStructure {
        /// What was expected.
        expected: String,
        /// Tag number actually found.
        found_tag: u8,
    },
    /// Polymorphic dispatch received an [`ApduItem`](crate::encoding::ApduItem)
    /// of the wrong variant (e.g. a `NamedTag` where an `Object` was required).
    WrongPayload(String),
    /// A service-level `Decode` found a different object count than the
    /// service requires.
    WrongObjectCount {
        /// Number of objects required.
        expected: usize,
        /// Number of objects found.
        found: usize,
    },
    /// Downcasting a polymorphic object slot into a concrete variant failed.
    InvalidObjectType(String),
    /// No handler exists for this PDU type / service code combination.
    NotImplemented(String),
    /// The BVLC `length` field disagrees with the actual buffer length.
    LengthInconsistent {
        /// Length declared in the BVLC header.
        declared: usize,
        /// Length actually observed.
        actual: usize,
    },
}

impl fmt::Display for BacnetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BacnetError::TooShort {
                context,
                needed,
                available,
            } => write!(
                f,
                "too short while {}: needed {} bytes, had {}",
                context, needed, available
            ),
            BacnetError::Malformed(msg) => write!(f, "malformed: {}", msg),
            BacnetError::WrongStructure { expected, found_tag } => write!(
                f,
                "wrong structure: expected {}, found tag number {}",
                expected, found_tag
            ),
            BacnetError::WrongPayload(msg) => write!(f, "wrong payload: {}", msg),
            BacnetError::WrongObjectCount { expected, found } => write!(
                f,
                "wrong object count: expected {}, found {}",
                expected, found
            ),
            BacnetError::InvalidObjectType(msg) => write!(f, "invalid object type: {}", msg),
            BacnetError::NotImplemented(msg) => write!(f, "not implemented: {}", msg),
            BacnetError::LengthInconsistent { declared, actual } => write!(
                f,
                "length inconsistent: BVLC declared {}, actual {}",
                declared, actual
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BacnetError {}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, BacnetError>;

pub(crate) fn too_short(context: impl Into<String>, needed: usize, available: usize) -> BacnetError {
    BacnetError::TooShort {
        context: context.into(),
        needed,
        available,
    }
}
