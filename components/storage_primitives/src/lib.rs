//! Storage size primitives for the song library
//!
//! Sizes are counted in bytes and reported in binary units (1 GiB = 1024³
//! bytes), which is what free-space figures on the library volume use.
//!
//! # Examples
//!
//! ```
//! use storage_primitives::ByteSize;
//!
//! let free = ByteSize::from_gib(10);
//! assert_eq!(free.bytes(), 10 * 1024 * 1024 * 1024);
//! assert_eq!(free.gibibytes_rounded(), 10.0);
//! println!("{}", free); // "10.0 GiB"
//! ```

use std::fmt;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

/// Size in bytes with binary-unit display
///
/// The inner value is private so every size is built through one of the
/// unit constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteSize(u64);

impl ByteSize {
    /// Create from a number of bytes
    pub const fn new(bytes: u64) -> Self {
        Self(bytes)
    }

    pub const fn from_kib(kib: u64) -> Self {
        Self(kib.saturating_mul(KIB))
    }

    pub const fn from_mib(mib: u64) -> Self {
        Self(mib.saturating_mul(MIB))
    }

    pub const fn from_gib(gib: u64) -> Self {
        Self(gib.saturating_mul(GIB))
    }

    /// Get the raw byte value
    pub const fn bytes(&self) -> u64 {
        self.0
    }

    /// Gibibytes with fractional part
    pub fn gibibytes_f64(&self) -> f64 {
        self.0 as f64 / GIB as f64
    }

    /// Gibibytes rounded to one decimal place
    pub fn gibibytes_rounded(&self) -> f64 {
        (self.gibibytes_f64() * 10.0).round() / 10.0
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= GIB {
            write!(f, "{:.1} GiB", self.gibibytes_f64())
        } else if self.0 >= MIB {
            write!(f, "{} MiB", self.0 / MIB)
        } else if self.0 >= KIB {
            write!(f, "{} KiB", self.0 / KIB)
        } else {
            write!(f, "{} bytes", self.0)
        }
    }
}

/// Alias for the free space left on the library volume
pub type FreeSpace = ByteSize;
