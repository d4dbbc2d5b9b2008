//! Drive relay library.
//!
//! Accepts multipart uploads, resolves the target folder path inside Google
//! Drive (creating missing folders), stores the file with a public reader
//! permission and exposes delete-by-id. [`app::build_router`] returns the
//! complete Axum router so an external host can mount it directly.

pub mod app;
pub mod config;
pub mod drive;
pub mod error;
pub mod http;
pub mod logging;
pub mod resolver;
pub mod transfer;
pub mod version;

use shadow_rs::shadow;

shadow!(build);
