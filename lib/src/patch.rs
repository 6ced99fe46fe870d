use crate::{Dims, Error};

/// The center of a patch, in pixels
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Coord {
    pub x: u32,
    pub y: u32,
}

impl Coord {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// A square region of an image, addressed by its top left corner
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PatchRect {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

impl PatchRect {
    /// The square of edge `size` whose center is `center`. For odd sizes the
    /// center sits one pixel left/above the geometric middle.
    ///
    /// The center must be at least `size / 2` pixels from the top and left
    /// edges, which every position produced by `PositionSampler` is.
    pub fn centered_at(center: Coord, size: u32) -> Self {
        let margin = size / 2;
        debug_assert!(center.x >= margin && center.y >= margin);

        Self {
            x: center.x - margin,
            y: center.y - margin,
            size,
        }
    }

    pub fn center(&self) -> Coord {
        Coord::new(self.x + self.size / 2, self.y + self.size / 2)
    }

    /// Whether the whole rectangle lies inside `[0, width) x [0, height)`
    pub fn fits(&self, dims: Dims) -> bool {
        u64::from(self.x) + u64::from(self.size) <= u64::from(dims.width)
            && u64::from(self.y) + u64::from(self.size) <= u64::from(dims.height)
    }
}

/// Copies the pixels under `rect` out of `img`. Partially contained
/// rectangles are an error, the result is never clamped.
pub fn extract_patch(img: &image::RgbImage, rect: PatchRect) -> Result<image::RgbImage, Error> {
    let dims = Dims::new(img.width(), img.height());

    if rect.size == 0 || !rect.fits(dims) {
        return Err(Error::OutOfBounds {
            x: rect.x,
            y: rect.y,
            size: rect.size,
            image: dims,
        });
    }

    Ok(image::imageops::crop_imm(img, rect.x, rect.y, rect.size, rect.size).to_image())
}

/// The part a patch plays in a triplet
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Uniformly placed in the first image
    Anchor,
    /// Placed near the anchor, in the same image
    Positive,
    /// Uniformly placed in the second image
    Negative,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Anchor, Role::Positive, Role::Negative];

    /// The 1-based number used in output file names, eg. `_patch_2`
    pub fn number(self) -> u32 {
        match self {
            Self::Anchor => 1,
            Self::Positive => 2,
            Self::Negative => 3,
        }
    }
}
