//! Sources of random bytes for the generator.

use crate::errors::EntropyError;
use rand::rngs::OsRng;
use rand::RngCore;

/// Something that can fill a buffer with random bytes.
///
/// Production code uses [`OsEntropy`]. Implementations must be
/// cryptographically secure unless they exist for reproducible tests.
pub trait EntropySource: Send {
    /// Fills `buf` completely or fails.
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), EntropyError>;
}

/// The operating system's secure random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), EntropyError> {
        OsRng.try_fill_bytes(buf)?;
        Ok(())
    }
}

/// A fixed byte sequence, repeated once exhausted.
///
/// Gives reproducible identifiers for tests and benchmarks. Never use it to
/// hand identifiers to a host.
#[derive(Debug, Clone)]
pub struct SequenceEntropy {
    bytes: Vec<u8>,
    cursor: usize,
}

impl SequenceEntropy {
    /// Creates a source that yields `bytes` in order, wrapping around.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            cursor: 0,
        }
    }

    /// Creates a source yielding `0, 1, 2, ..., 255, 0, ...`.
    #[must_use]
    pub fn counting() -> Self {
        Self::new((0..=u8::MAX).collect::<Vec<_>>())
    }

    /// Returns how many bytes have been handed out so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.cursor
    }
}

impl EntropySource for SequenceEntropy {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), EntropyError> {
        if self.bytes.is_empty() {
            return Err(EntropyError::new("byte sequence is empty"));
        }

        for slot in buf.iter_mut() {
            *slot = self.bytes[self.cursor % self.bytes.len()];
            self.cursor += 1;
        }
        Ok(())
    }
}
