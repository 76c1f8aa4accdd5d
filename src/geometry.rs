//! Grid geometry: factorization of a tile count into the most square-like
//! row/column pair, and parsing of the split/crop specifications users type.

use crate::error::BotError;

/// Tile counts accepted as a bare integer in a split request.
pub const ALLOWED_TILE_COUNTS: &[u32] = &[2, 4, 6, 8, 9, 10];

/// Find the factor pair `(rows, cols)` of `n` with `rows <= cols` and the
/// smallest `|rows - cols|`.
///
/// Scans divisors ascending up to `⌊√n⌋`, so the retained pair is the one
/// closest to the square root.
pub fn best_division(n: u32) -> (u32, u32) {
    let mut best = (1, n);
    let mut min_diff = n;

    let mut i = 1;
    while i * i <= n {
        if n % i == 0 {
            let (r, c) = (i, n / i);
            if c - r < min_diff {
                best = (r, c);
                min_diff = c - r;
            }
        }
        i += 1;
    }
    best
}

/// How a split request determines the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionSpec {
    /// Explicit `RxC` input; used directly, no factorization.
    Explicit { rows: u32, cols: u32 },
    /// Bare tile count from the allow-list; resolved via [`best_division`].
    Count(u32),
}

impl PartitionSpec {
    /// Parse normalized split-request text.
    ///
    /// `"3x5"` (spaces tolerated) is an explicit pair; a bare integer must be
    /// in [`ALLOWED_TILE_COUNTS`]; anything else is a format error.
    pub fn parse(text: &str) -> Result<Self, BotError> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();

        if compact.contains('x') {
            let (rows, cols) = parse_pair(&compact)?;
            return Ok(Self::Explicit { rows, cols });
        }

        let n: u32 = compact
            .parse()
            .map_err(|_| BotError::Format(text.to_string()))?;
        if !ALLOWED_TILE_COUNTS.contains(&n) {
            return Err(BotError::DisallowedTileCount(n));
        }
        Ok(Self::Count(n))
    }

    /// Resolve to a concrete `(rows, cols)` grid.
    pub fn resolve(self) -> (u32, u32) {
        match self {
            Self::Explicit { rows, cols } => (rows, cols),
            Self::Count(n) => best_division(n),
        }
    }
}

/// A centered-crop target size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropSpec {
    pub width: u32,
    pub height: u32,
}

impl CropSpec {
    /// Parse normalized crop-request text of the form `"WxH"`.
    pub fn parse(text: &str) -> Result<Self, BotError> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let (width, height) = parse_pair(&compact)?;
        Ok(Self { width, height })
    }
}

/// Parse `"AxB"` into two positive integers.
fn parse_pair(compact: &str) -> Result<(u32, u32), BotError> {
    let err = || BotError::Format(compact.to_string());

    let mut parts = compact.split('x');
    let a = parts.next().ok_or_else(err)?;
    let b = parts.next().ok_or_else(err)?;
    if parts.next().is_some() {
        return Err(err());
    }

    let a: u32 = a.parse().map_err(|_| err())?;
    let b: u32 = b.parse().map_err(|_| err())?;
    if a == 0 || b == 0 {
        return Err(err());
    }
    Ok((a, b))
}
