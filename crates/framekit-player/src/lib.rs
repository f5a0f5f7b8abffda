//! # FrameKit Player
//!
//! The player shell: one or two annotation surfaces side by side, shared
//! transport controls, linked scrubbing and snapshot export.

pub mod shell;
pub mod types;

pub use shell::{PendingSnapshot, PlayerShell};
pub use types::{Key, Layout, Side, UnknownKey};
