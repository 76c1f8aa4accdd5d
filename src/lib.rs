//! pixsplit - Telegram bot that slices images into grids, crops them, and
//! converts them to grayscale.
//!
//! Each user sends a photo, then picks an action from a reply keyboard; a
//! per-user session remembers the last image and the pending prompt.
//!
//! ## Architecture
//!
//! ```text
//! Telegram → long poll → Event ─→ Dispatcher ─→ Transform Engine
//!                                      │             │
//! User ←──── send ←──── Transport ←────┴── replies ──┘
//! ```
//!
//! The dispatcher is a pure state machine over the session store; all I/O
//! goes through the [`channels::Transport`] trait.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod channels;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod geometry;
pub mod intent;
pub mod logging;
pub mod session;
pub mod texts;
pub mod transform;

// Re-export commonly used types
pub use channels::{Event, EventKind, TelegramChannel, Transport};
pub use config::Config;
pub use dispatch::Dispatcher;
pub use error::BotError;
pub use geometry::{best_division, CropSpec, PartitionSpec, ALLOWED_TILE_COUNTS};
pub use intent::{classify, Intent};
pub use session::{Mode, SessionStore};
pub use texts::{Locale, Msg};
pub use transform::Tile;
