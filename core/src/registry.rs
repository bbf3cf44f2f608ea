//! Fixed-capacity reservation registry.
//!
//! A [`ReservationRegistry`] owns a capacity that is fixed at construction and
//! an insertion-ordered list of holders. The only way to add a holder is
//! [`ReservationRegistry::reserve`], which admits requests first-come,
//! first-served until the registry is saturated and rejects every request
//! after that.
//!
//! # Concurrency
//!
//! The registry has no internal synchronization. `reserve` is a
//! check-then-act operation: two callers that both observe
//! `remaining_capacity() > 0` and then both append would overrun the
//! capacity. Callers sharing a registry must serialize reservations against
//! it, for example by routing every mutation through a single writer such as
//! the runtime `Store`, whose reducer runs under a write lock.
//!
//! # Example
//!
//! ```
//! use seatbook_core::registry::ReservationRegistry;
//!
//! # fn main() -> Result<(), seatbook_core::registry::RegistryError> {
//! let mut seats = ReservationRegistry::new(2)?;
//!
//! assert!(seats.reserve("a"));
//! assert!(seats.reserve("b"));
//! assert!(!seats.reserve("c"));
//!
//! assert_eq!(seats.holders(), &["a", "b"]);
//! assert_eq!(seats.remaining_capacity(), 0);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised when building a registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A registry must be able to admit at least one holder
    #[error("Capacity must be greater than zero")]
    ZeroCapacity,

    /// A snapshot listed more holders than its capacity allows
    #[error("Snapshot holds {holders} entries but capacity is {capacity}")]
    OverCapacity {
        /// Declared capacity
        capacity: u32,
        /// Number of holders in the snapshot
        holders: usize,
    },
}

/// Whether a registry can still admit holders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Availability {
    /// At least one unit of capacity is free
    HasRoom,
    /// Remaining capacity is zero
    Full,
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HasRoom => write!(f, "has room"),
            Self::Full => write!(f, "full"),
        }
    }
}

/// A fixed-capacity, insertion-ordered list of holders.
///
/// The holder sequence is private: it only grows through [`reserve`], and it
/// never grows past [`capacity`].
///
/// Holder identifiers are opaque. The registry does not deduplicate them, so
/// reserving the same identifier twice occupies two units of capacity.
/// Layers that need uniqueness must check [`contains`] before reserving.
///
/// [`reserve`]: ReservationRegistry::reserve
/// [`capacity`]: ReservationRegistry::capacity
/// [`contains`]: ReservationRegistry::contains
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RegistrySnapshot<H>", into = "RegistrySnapshot<H>")]
#[serde(bound(
    serialize = "H: Clone + Serialize",
    deserialize = "H: Deserialize<'de>"
))]
pub struct ReservationRegistry<H> {
    capacity: u32,
    holders: Vec<H>,
}

impl<H> ReservationRegistry<H> {
    /// Creates an empty registry with the given capacity.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ZeroCapacity`] if `capacity` is zero. Such a
    /// registry could never admit anyone.
    pub fn new(capacity: u32) -> Result<Self, RegistryError> {
        if capacity == 0 {
            return Err(RegistryError::ZeroCapacity);
        }

        Ok(Self {
            capacity,
            holders: Vec::new(),
        })
    }

    /// Returns the capacity fixed at construction.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns `capacity - holders`.
    #[must_use]
    pub fn remaining_capacity(&self) -> u32 {
        // holders.len() <= capacity, so the cast is lossless
        #[allow(clippy::cast_possible_truncation)]
        let held = self.holders.len() as u32;
        self.capacity - held
    }

    /// Attempts to admit `holder`.
    ///
    /// Returns `false` without touching the registry when it is saturated.
    /// Otherwise appends `holder` after every earlier holder and returns
    /// `true`.
    pub fn reserve(&mut self, holder: H) -> bool {
        if self.remaining_capacity() == 0 {
            return false;
        }

        self.holders.push(holder);
        true
    }

    /// Returns the admitted holders in admission order.
    #[must_use]
    pub fn holders(&self) -> &[H] {
        &self.holders
    }

    /// Returns the number of admitted holders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.holders.len()
    }

    /// Returns `true` if nobody has been admitted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }

    /// Returns `true` once remaining capacity reaches zero.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.remaining_capacity() == 0
    }

    /// Returns the current state of the `HasRoom` / `Full` machine.
    #[must_use]
    pub fn availability(&self) -> Availability {
        if self.is_full() {
            Availability::Full
        } else {
            Availability::HasRoom
        }
    }
}

impl<H: PartialEq> ReservationRegistry<H> {
    /// Returns `true` if `holder` has been admitted at least once.
    #[must_use]
    pub fn contains(&self, holder: &H) -> bool {
        self.holders.contains(holder)
    }
}

/// Wire form of a registry. Validated on the way back in.
#[derive(Serialize, Deserialize)]
struct RegistrySnapshot<H> {
    capacity: u32,
    holders: Vec<H>,
}

impl<H> TryFrom<RegistrySnapshot<H>> for ReservationRegistry<H> {
    type Error = RegistryError;

    fn try_from(snapshot: RegistrySnapshot<H>) -> Result<Self, Self::Error> {
        if snapshot.capacity == 0 {
            return Err(RegistryError::ZeroCapacity);
        }

        if snapshot.holders.len() > snapshot.capacity as usize {
            return Err(RegistryError::OverCapacity {
                capacity: snapshot.capacity,
                holders: snapshot.holders.len(),
            });
        }

        Ok(Self {
            capacity: snapshot.capacity,
            holders: snapshot.holders,
        })
    }
}

impl<H> From<ReservationRegistry<H>> for RegistrySnapshot<H> {
    fn from(registry: ReservationRegistry<H>) -> Self {
        Self {
            capacity: registry.capacity,
            holders: registry.holders,
        }
    }
}
