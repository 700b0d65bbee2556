//! Data models for platform entities.
//!
//! Only the direct-message inbox is modelled; everything else the agent
//! touches is opaque session state (see `auth::Settings`).

pub mod thread;

pub use thread::{DirectThread, InboxResponse, ThreadUser};
