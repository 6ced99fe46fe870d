use crate::Dims;
use std::fmt;

#[derive(Debug)]
pub struct InvalidRange {
    pub(crate) min: f64,
    pub(crate) max: f64,
    pub(crate) value: f64,
    pub(crate) name: &'static str,
}

impl fmt::Display for InvalidRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parameter '{}' - value '{}' is outside the range of {}-{}",
            self.name, self.value, self.min, self.max
        )
    }
}

#[derive(Debug)]
pub struct PatchTooLarge {
    pub image: Dims,
    pub patch_size: u32,
}

impl fmt::Display for PatchTooLarge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "a {0}x{0} patch does not leave room for a patch center in a {1}x{2} image",
            self.patch_size, self.image.width, self.image.height
        )
    }
}

#[derive(Debug)]
pub struct ProximityUnsatisfiable {
    pub anchor: u32,
    pub extent: u32,
    pub patch_size: u32,
    pub stddev: f64,
    pub attempts: u32,
}

impl fmt::Display for ProximityUnsatisfiable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not place a {}px patch near {} within an extent of {} (stddev {}) after {} attempts",
            self.patch_size, self.anchor, self.extent, self.stddev, self.attempts
        )
    }
}

#[derive(Debug)]
pub enum Error {
    /// An error in the image library occurred, eg failed to load/save
    Image(image::ImageError),
    /// Io is notoriously error free with no problems, but we cover it just in case!
    Io(std::io::Error),
    /// An input parameter had an invalid range specified
    InvalidRange(InvalidRange),
    /// The corpus pattern did not contain the `*` separating the directory
    /// from the extension filter
    InvalidPattern(String),
    /// There are no images to draw patches from
    EmptyCorpus,
    /// An image is too small to hold a patch of the requested size
    PatchTooLarge(PatchTooLarge),
    /// Rejection sampling of a positive patch center ran out of attempts
    ProximityUnsatisfiable(ProximityUnsatisfiable),
    /// A patch rectangle was not fully contained in its source image
    OutOfBounds { x: u32, y: u32, size: u32, image: Dims },
    /// The user specified an image format we don't support as the output
    UnsupportedOutputFormat(String),
}

impl Error {
    /// Errors that only concern the sample being generated, rather than the
    /// run as a whole
    pub fn is_sample_error(&self) -> bool {
        matches!(
            self,
            Self::PatchTooLarge(_) | Self::ProximityUnsatisfiable(_) | Self::OutOfBounds { .. }
        )
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Image(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image(ie) => write!(f, "{}", ie),
            Self::Io(io) => write!(f, "{}", io),
            Self::InvalidRange(ir) => write!(f, "{}", ir),
            Self::InvalidPattern(pattern) => write!(
                f,
                "pattern '{}' must contain a directory and a file extension separated by '*', eg '/home/test/*.png'",
                pattern
            ),
            Self::EmptyCorpus => write!(f, "at least 1 image must be available to draw patches from"),
            Self::PatchTooLarge(ptl) => write!(f, "{}", ptl),
            Self::ProximityUnsatisfiable(pu) => write!(f, "{}", pu),
            Self::OutOfBounds { x, y, size, image } => write!(
                f,
                "the {0}x{0} patch at ({1}, {2}) is not contained in the {3}x{4} image",
                size, x, y, image.width, image.height
            ),
            Self::UnsupportedOutputFormat(fmt) => {
                write!(f, "the output format '{}' is not supported", fmt)
            }
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(ie: image::ImageError) -> Self {
        Self::Image(ie)
    }
}

impl From<std::io::Error> for Error {
    fn from(io: std::io::Error) -> Self {
        Self::Io(io)
    }
}
