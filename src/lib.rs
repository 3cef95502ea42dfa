//! Compile candidate masks into an exhaustive, ordered string enumerator.
//!
//! # Example
//!
//! ```rust
//! use maskgen::{PackedBuffer, Pattern};
//!
//! let mut pattern = Pattern::new("key_(a|b)[0-9]{2}").unwrap();
//! assert_eq!(pattern.count(), 200);
//!
//! let mut names: Vec<String> = Vec::new();
//! pattern.collect(&mut names).unwrap();
//! assert_eq!(names[0], "key_a00");
//! assert_eq!(names[199], "key_b99");
//!
//! // Fixed-stride layout for a single upload
//! let mut packed = PackedBuffer::new();
//! pattern.collect_range(0..3, &mut packed).unwrap();
//! assert_eq!(packed.stride(), 7);
//! assert_eq!(packed.get(2), Some(&b"key_a02"[..]));
//! ```

mod error;
mod limits;
pub mod pattern;
pub mod transport;

pub use error::{ErrorKind, MaskError, SyntaxError};
pub use limits::Limits;
pub use pattern::{Node, Pattern};
pub use transport::{Bucket, PackedBuffer};
