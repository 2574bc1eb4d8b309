//! Ordered map implemented as a [left-leaning-red-black][llrb] tree.
//!
//! - Parametrised over `key-type` and `value-type`.
//! - Point lookup via get(), insert or overwrite via put().
//! - Self balancing, tree height stays within `2 * log2(n+1)`.
//! - No delete, no iteration, no durability guarantee.
//! - Not thread safe.
//!
//! ```
//! use llrb_map::Llrb;
//!
//! let mut index: Llrb<String, i64> = Llrb::new("myinstance");
//! index.put("key1".to_string(), 10);
//! index.put("key2".to_string(), 20);
//! index.put("key1".to_string(), 30);
//!
//! assert_eq!(index.len(), 2);
//! assert_eq!(index.get("key1"), Some(30));
//! assert_eq!(index.get("key3"), None);
//! assert!(index.validate().is_ok());
//! ```
//!
//! [llrb]: https://en.wikipedia.org/wiki/Left-leaning_red-black_tree

mod depth;
mod error;
mod llrb;

pub use crate::depth::Depth;
pub use crate::error::Error;
pub use crate::llrb::{Llrb, Stats};
