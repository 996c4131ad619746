use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Persisted 64-bit asset identity.
///
/// A handle never encodes where the asset lives; the registry maps it to a
/// project-relative path. `0` is reserved as the null handle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(u64);

impl Handle {
    /// The reserved "no identity" value
    pub const NULL: Handle = Handle(0);

    /// Generate a fresh random, non-null handle
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        loop {
            let id: u64 = rng.gen();
            if id != 0 {
                return Self(id);
            }
        }
    }

    /// Wrap a raw persisted value
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value, as written to disk
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Check the handle is not the null sentinel
    pub const fn is_non_zero(self) -> bool {
        self.0 != 0
    }
}

impl From<u64> for Handle {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues handles that are unique within one session.
///
/// Random generation makes collisions vanishingly unlikely; the generator
/// still rejects any value the caller reports as taken.
#[derive(Debug, Default)]
pub struct HandleGenerator {
    issued: ahash::AHashSet<Handle>,
}

impl HandleGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a handle that is non-null, never issued before by this
    /// generator, and for which `is_taken` returns false
    pub fn allocate(&mut self, is_taken: impl Fn(Handle) -> bool) -> Handle {
        loop {
            let handle = Handle::generate();
            if !is_taken(handle) && self.issued.insert(handle) {
                return handle;
            }
        }
    }

    /// Number of handles issued this session
    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }
}
