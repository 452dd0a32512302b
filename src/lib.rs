//! Library crate for userdesk.
//!
//! A terminal client for a user administration REST backend:
//! - REST adapter and wire models (`api`)
//! - Screen state, navigation and the update loop (`app`)
//! - Error taxonomy and result types (`error`)
//! - Rendering (`ui`)
//!
//! It is used by the `userdesk` binary and by tests.
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod error;
pub mod ui;

/// Convenient error and result types shared across the crate.
pub use error::{ClientError, DynError, Result};
