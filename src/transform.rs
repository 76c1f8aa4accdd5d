//! Image transforms: grid split, grayscale, centered crop.
//!
//! All operations decode the stored bytes fresh, work on an owned bitmap, and
//! re-encode to JPEG — the session's stored bytes are never mutated. Pure,
//! synchronous computations with no suspension points.

use std::io::Cursor;

use image::{imageops, DynamicImage, GenericImageView, ImageFormat};

use crate::error::BotError;

/// Hard Telegram limit on photos per media group.
pub const MAX_BATCH: usize = 10;

/// One rectangular sub-image produced by grid partitioning, already encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub row: u32,
    pub col: u32,
    pub data: Vec<u8>,
}

fn decode(bytes: &[u8]) -> Result<DynamicImage, BotError> {
    Ok(image::load_from_memory(bytes)?)
}

fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>, BotError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Jpeg)?;
    Ok(buf.into_inner())
}

/// Pixel dimensions of an encoded image.
pub fn dimensions(bytes: &[u8]) -> Result<(u32, u32), BotError> {
    Ok(decode(bytes)?.dimensions())
}

/// Split an image into a `rows` x `cols` grid of JPEG tiles, row-major.
///
/// The source is converted to RGB and trimmed at the bottom/right edges to
/// the largest dimensions evenly divisible by the grid; the remainder strip
/// is discarded by design.
pub fn split(bytes: &[u8], rows: u32, cols: u32) -> Result<Vec<Tile>, BotError> {
    let rgb = decode(bytes)?.to_rgb8();
    let (width, height) = rgb.dimensions();

    let tile_width = (width - width % cols) / cols;
    let tile_height = (height - height % rows) / rows;
    if tile_width == 0 || tile_height == 0 {
        // Grid finer than the image itself
        return Err(BotError::Format(format!("{rows}x{cols}")));
    }

    let mut tiles = Vec::with_capacity((rows * cols) as usize);
    for row in 0..rows {
        for col in 0..cols {
            let view =
                imageops::crop_imm(&rgb, col * tile_width, row * tile_height, tile_width, tile_height);
            let data = encode_jpeg(&DynamicImage::ImageRgb8(view.to_image()))?;
            tiles.push(Tile { row, col, data });
        }
    }
    Ok(tiles)
}

/// Group tile buffers into delivery batches of at most [`MAX_BATCH`],
/// preserving generation order.
pub fn batches(tiles: Vec<Tile>) -> Vec<Vec<Vec<u8>>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for tile in tiles {
        current.push(tile.data);
        if current.len() == MAX_BATCH {
            out.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Re-encode the image as single-channel grayscale JPEG.
pub fn grayscale(bytes: &[u8]) -> Result<Vec<u8>, BotError> {
    let luma = decode(bytes)?.to_luma8();
    encode_jpeg(&DynamicImage::ImageLuma8(luma))
}

/// Top-left origin of a centered `w` x `h` rectangle inside `src_w` x `src_h`.
pub const fn centered_origin(src_w: u32, src_h: u32, w: u32, h: u32) -> (u32, u32) {
    ((src_w - w) / 2, (src_h - h) / 2)
}

/// Extract a centered `width` x `height` rectangle and encode it as JPEG.
pub fn crop_centered(bytes: &[u8], width: u32, height: u32) -> Result<Vec<u8>, BotError> {
    let rgb = decode(bytes)?.to_rgb8();
    let (src_w, src_h) = rgb.dimensions();

    if width > src_w || height > src_h {
        return Err(BotError::CropTooLarge {
            width,
            height,
            source_width: src_w,
            source_height: src_h,
        });
    }

    let (left, top) = centered_origin(src_w, src_h, width, height);
    let view = imageops::crop_imm(&rgb, left, top, width, height);
    encode_jpeg(&DynamicImage::ImageRgb8(view.to_image()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 7])
        });
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn dimensions_match_source() {
        assert_eq!(dimensions(&png_bytes(120, 80)).unwrap(), (120, 80));
    }

    #[test]
    fn dimensions_rejects_garbage() {
        assert!(matches!(
            dimensions(b"not an image"),
            Err(BotError::Image(_))
        ));
    }

    #[test]
    fn split_yields_row_major_grid_with_trimmed_edges() {
        // 101x91 by 3 rows x 4 cols trims to 100x90: tiles of 25x30
        let tiles = split(&png_bytes(101, 91), 3, 4).unwrap();
        assert_eq!(tiles.len(), 12);

        for (i, tile) in tiles.iter().enumerate() {
            assert_eq!(tile.row, i as u32 / 4);
            assert_eq!(tile.col, i as u32 % 4);
            let decoded = image::load_from_memory(&tile.data).unwrap();
            assert_eq!(decoded.dimensions(), (25, 30));
        }
    }

    #[test]
    fn split_exact_fit_loses_nothing() {
        let tiles = split(&png_bytes(100, 90), 3, 4).unwrap();
        assert_eq!(tiles.len(), 12);
        let decoded = image::load_from_memory(&tiles[0].data).unwrap();
        assert_eq!(decoded.dimensions(), (25, 30));
    }

    #[test]
    fn split_is_idempotent() {
        let src = png_bytes(64, 48);
        let first = split(&src, 2, 2).unwrap();
        let second = split(&src, 2, 2).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn split_grid_finer_than_image_is_rejected() {
        assert!(matches!(
            split(&png_bytes(4, 4), 1, 9),
            Err(BotError::Format(_))
        ));
    }

    #[test]
    fn batches_cap_at_telegram_limit() {
        let tiles = split(&png_bytes(60, 40), 3, 4).unwrap();
        let batches = batches(tiles);
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), 10);
        assert_eq!(batches[1].len(), 2);
    }

    #[test]
    fn grayscale_preserves_dimensions_and_drops_color() {
        let out = grayscale(&png_bytes(50, 30)).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.dimensions(), (50, 30));
        assert_eq!(decoded.color(), image::ColorType::L8);
    }

    #[test]
    fn centered_origin_floors() {
        assert_eq!(centered_origin(100, 90, 40, 30), (30, 30));
        assert_eq!(centered_origin(101, 91, 40, 30), (30, 30));
        assert_eq!(centered_origin(100, 90, 100, 90), (0, 0));
    }

    #[test]
    fn crop_full_extent_returns_same_dimensions() {
        let out = crop_centered(&png_bytes(80, 60), 80, 60).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.dimensions(), (80, 60));
    }

    #[test]
    fn crop_returns_requested_dimensions() {
        let out = crop_centered(&png_bytes(81, 61), 40, 20).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.dimensions(), (40, 20));
    }

    #[test]
    fn crop_exceeding_source_fails() {
        let err = crop_centered(&png_bytes(80, 60), 81, 10).unwrap_err();
        assert!(matches!(
            err,
            BotError::CropTooLarge {
                width: 81,
                height: 10,
                source_width: 80,
                source_height: 60,
            }
        ));
        assert!(crop_centered(&png_bytes(80, 60), 10, 61).is_err());
    }
}
