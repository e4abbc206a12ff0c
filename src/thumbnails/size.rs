use serde::Serialize;
use std::num::NonZeroU32;

/// Target dimensions for a thumbnail, each original dimension divided by the divisor.
///
/// Plain integer division, so small originals can give a zero width or height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ThumbnailSize {
    pub width: u32,
    pub height: u32,
    /// The longest original side divided by the divisor.
    pub max: u32,
}

impl ThumbnailSize {
    pub fn new(original_width: u32, original_height: u32, divisor: NonZeroU32) -> Self {
        let divisor = divisor.get();
        Self {
            width: original_width / divisor,
            height: original_height / divisor,
            max: original_width.max(original_height) / divisor,
        }
    }
}
