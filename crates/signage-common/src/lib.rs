//! Signage-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across signage:
//!
//! - **Typed IDs**: Numeric id wrappers for assets, playlists, items and screens
//! - **Asset kinds**: The closed set of slide content types
//! - **MIME detection**: Extension tables and magic-byte sniffing
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use signage_common::{AssetId, AssetKind, Error, Result};
//! use signage_common::mime::mime_from_filename;
//!
//! let asset_id = AssetId::from(7);
//! assert_eq!(asset_id.to_string(), "7");
//!
//! assert!(AssetKind::Video.has_payload());
//! assert_eq!(mime_from_filename("clip.MOV"), Some("video/quicktime"));
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("asset"))
//! }
//! # assert!(example().is_err());
//! ```

pub mod error;
pub mod ids;
pub mod mime;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
