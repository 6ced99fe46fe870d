use crate::Error;
use std::{fmt, path::Path};

/// Helper type used to define the source of an image in the corpus
#[derive(Clone)]
pub enum ImageSource<'a> {
    /// A raw buffer of image data, see `image::load_from_memory` for details
    /// on what is supported
    Memory(&'a [u8]),
    /// The path to an image to load from disk. The image format is inferred
    /// from the file extension, see `image::open` for details
    Path(&'a Path),
    /// An owned path, as produced when resolving a `CorpusPattern`
    PathBuf(std::path::PathBuf),
    /// An already loaded image that is used directly
    Image(image::DynamicImage),
}

impl<'a> ImageSource<'a> {
    pub fn from_path(path: &'a Path) -> Self {
        Self::Path(path)
    }
}

impl<'a> From<image::DynamicImage> for ImageSource<'a> {
    fn from(img: image::DynamicImage) -> Self {
        Self::Image(img)
    }
}

impl<'a> From<std::path::PathBuf> for ImageSource<'a> {
    fn from(path: std::path::PathBuf) -> Self {
        Self::PathBuf(path)
    }
}

impl<'a, S> From<&'a S> for ImageSource<'a>
where
    S: AsRef<Path> + 'a + ?Sized,
{
    fn from(path: &'a S) -> Self {
        Self::Path(path.as_ref())
    }
}

impl<'a> fmt::Display for ImageSource<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory(data) => write!(f, "<{} bytes in memory>", data.len()),
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::PathBuf(path) => write!(f, "{}", path.display()),
            Self::Image(img) => {
                use image::GenericImageView;
                write!(f, "<{}x{} image>", img.width(), img.height())
            }
        }
    }
}

pub fn load_dynamic_image(src: &ImageSource<'_>) -> Result<image::DynamicImage, image::ImageError> {
    match src {
        ImageSource::Memory(data) => image::load_from_memory(data),
        ImageSource::Path(path) => image::open(path),
        ImageSource::PathBuf(path) => image::open(path),
        ImageSource::Image(img) => Ok(img.clone()),
    }
}

/// Loads an image as 8-bit RGB, dropping any alpha channel
pub(crate) fn load_image(src: &ImageSource<'_>) -> Result<image::RgbImage, Error> {
    let img = load_dynamic_image(src)?;
    Ok(img.to_rgb())
}
