//! Lucky dip draws: unique random numbers from a closed range, sorted
//! ascending, taken from a cryptographically secure source.
//!
//! ```rust
//! use luckydip::generators::UniqueDrawGenerator;
//! use luckydip::source::SecureSource;
//!
//! let mut source = SecureSource::thread();
//! let draw = UniqueDrawGenerator::default()
//!     .generate(&mut source, 1, 60, 6)
//!     .unwrap();
//! assert_eq!(draw.len(), 6);
//! ```

pub mod config;
pub mod draw;
pub mod errors;
pub mod generators;
pub mod lottery;
pub mod source;
