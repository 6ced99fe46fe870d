use crate::{
    corpus::CorpusPicker,
    patch::{extract_patch, Coord, PatchRect, Role},
    sampler::PositionSampler,
    utils::load_image,
    Dims, Error, ImageSource,
};

/// A single extracted patch
pub struct Patch {
    pub role: Role,
    /// Index of the source image in the corpus
    pub source: usize,
    pub rect: PatchRect,
    pub image: image::RgbImage,
}

/// The anchor, positive and negative patches produced by one draw
pub struct Triplet {
    pub anchor: Patch,
    pub positive: Patch,
    pub negative: Patch,
}

impl Triplet {
    pub fn get(&self, role: Role) -> &Patch {
        match role {
            Role::Anchor => &self.anchor,
            Role::Positive => &self.positive,
            Role::Negative => &self.negative,
        }
    }

    pub fn patches(&self) -> impl Iterator<Item = &Patch> {
        Role::ALL.iter().map(move |role| self.get(*role))
    }
}

/// Draws two images from a corpus and cuts an anchor and a nearby positive
/// patch out of the first, and a negative patch out of the second.
pub struct TripletGenerator<'a> {
    corpus: CorpusPicker<ImageSource<'a>>,
    sampler: PositionSampler,
    patch_size: u32,
    stddev: f64,
}

impl<'a> TripletGenerator<'a> {
    pub fn new(
        corpus: CorpusPicker<ImageSource<'a>>,
        sampler: PositionSampler,
        patch_size: u32,
        stddev: f64,
    ) -> Self {
        Self {
            corpus,
            sampler,
            patch_size,
            stddev,
        }
    }

    pub fn corpus(&self) -> &CorpusPicker<ImageSource<'a>> {
        &self.corpus
    }

    pub fn generate(&mut self) -> Result<Triplet, Error> {
        let size = self.patch_size;

        // Both images are drawn up front, the second may well be the same
        // image as the first
        let first_idx = self.corpus.draw_index();
        let second_idx = self.corpus.draw_index();

        let first = self.load(first_idx)?;
        let first_dims = Dims::new(first.width(), first.height());

        let anchor = self.sampler.uniform_center(first_dims, size)?;
        let positive = self
            .sampler
            .proximate_center(anchor, first_dims, size, self.stddev)?;

        let second = if second_idx == first_idx {
            None
        } else {
            Some(self.load(second_idx)?)
        };
        let second_img = second.as_ref().unwrap_or(&first);
        let negative = self
            .sampler
            .uniform_center(Dims::new(second_img.width(), second_img.height()), size)?;

        log::debug!(
            "anchor {:?} positive {:?} in #{}, negative {:?} in #{}",
            anchor,
            positive,
            first_idx,
            negative,
            second_idx
        );

        Ok(Triplet {
            anchor: cut(&first, first_idx, anchor, size, Role::Anchor)?,
            positive: cut(&first, first_idx, positive, size, Role::Positive)?,
            negative: cut(second_img, second_idx, negative, size, Role::Negative)?,
        })
    }

    fn load(&self, idx: usize) -> Result<image::RgbImage, Error> {
        let src = &self.corpus.items()[idx];
        load_image(src).map_err(|e| {
            log::error!("failed to load image '{}': {}", src, e);
            e
        })
    }
}

fn cut(
    img: &image::RgbImage,
    source: usize,
    center: Coord,
    size: u32,
    role: Role,
) -> Result<Patch, Error> {
    let rect = PatchRect::centered_at(center, size);

    Ok(Patch {
        role,
        source,
        rect,
        image: extract_patch(img, rect)?,
    })
}
