//! Scene document support.
//!
//! This module parses scene editor XML documents into an owned, read-only
//! tree and locates the object hierarchy inside them.
//!
//! ## Document layout
//!
//! - Root element `game` (optionally prefixed, e.g. `gap:game`)
//! - `game/gameObjectFolder` holds the object hierarchy
//! - Names are matched on their local part, so qualified and unqualified
//!   tags are interchangeable
//!
//! # Example
//!
//! ```ignore
//! use psh_core::xml::{load, locate_root};
//!
//! let tree = load(&text)?;
//! if let Ok(folder) = locate_root(&tree) {
//!     println!("{} objects", folder.child_elements().count());
//! }
//! ```

mod document;
mod loader;

pub use document::*;
pub use loader::*;
