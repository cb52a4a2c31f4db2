//! Asset path helpers and pixel dimensions.

use std::path::Path;

/// Pixel size of a sprite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetDimensions {
    pub x: u32,
    pub y: u32,
}

impl AssetDimensions {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// File name of `path` without its extension.
pub fn file_stem(path: &str) -> Option<&str> {
    Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
}

/// Reads dimensions encoded in a structured asset name.
///
/// Structured names end in `_<width>x<height>` before the extension, e.g.
/// `fire_bolt_orange_200x150.webm`. Returns `None` when the last
/// underscore-delimited token is not two integers joined by `x`.
pub fn parse_structured_dimensions(path: &str) -> Option<AssetDimensions> {
    let stem = file_stem(path)?;
    let token = stem.rsplit('_').next()?;
    let (width, height) = token.split_once('x')?;
    Some(AssetDimensions {
        x: width.parse().ok()?,
        y: height.parse().ok()?,
    })
}
