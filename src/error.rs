//! Error types for the pixsplit bot.
//!
//! Everything here is recoverable and user-facing: the dispatcher maps each
//! variant to a localized reply and the process keeps running.

use thiserror::Error;

/// Result type alias using the bot error type.
pub type Result<T> = std::result::Result<T, BotError>;

/// Unified error type for command handling and image transforms.
#[derive(Error, Debug)]
pub enum BotError {
    /// A transform was requested but the user has no stored image.
    #[error("no image on file")]
    NoImageOnFile,

    /// A split or crop specification could not be parsed.
    #[error("unparseable specification: {0}")]
    Format(String),

    /// A single-integer tile count outside the allow-list.
    #[error("tile count {0} is not allowed")]
    DisallowedTileCount(u32),

    /// Requested crop exceeds the source image bounds.
    #[error("crop {width}x{height} exceeds source {source_width}x{source_height}")]
    CropTooLarge {
        width: u32,
        height: u32,
        source_width: u32,
        source_height: u32,
    },

    /// No intent matched outside of any mode.
    #[error("unknown command")]
    UnknownCommand,

    /// Image decode or encode failure.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
