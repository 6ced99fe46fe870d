//! Random patch center placement under boundary constraints

use crate::{
    errors::{self, PatchTooLarge, ProximityUnsatisfiable},
    patch::Coord,
    Dims, Error,
};
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rand_pcg::Pcg32;
use std::ops::RangeInclusive;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;

/// The centers a patch of edge `size` may take along an axis of length
/// `extent`, `[size/2, extent - size/2 - 1]`.
///
/// Fails if that range is empty, which happens whenever the extent is
/// smaller than the patch, and also for even sizes when the extent equals the
/// patch size.
pub fn center_range(extent: u32, size: u32) -> Result<RangeInclusive<u32>, Error> {
    let margin = size / 2;

    match extent.checked_sub(margin + 1) {
        Some(max) if max >= margin && size > 0 => Ok(margin..=max),
        _ => Err(Error::PatchTooLarge(PatchTooLarge {
            image: Dims::new(extent, extent),
            patch_size: size,
        })),
    }
}

fn invalid_stddev(stddev: f64) -> Error {
    Error::InvalidRange(errors::InvalidRange {
        min: f64::MIN_POSITIVE,
        max: f64::MAX,
        value: stddev,
        name: "stddev",
    })
}

#[inline]
fn in_range(value: i64, extent: u32, size: u32) -> bool {
    let margin = i64::from(size / 2);
    value - margin >= 0 && value + margin < i64::from(extent)
}

/// Draws patch centers, either uniformly over an image or near an existing
/// center. Owns its random generator, so separately constructed samplers
/// never share state.
pub struct PositionSampler {
    rng: Pcg32,
    max_attempts: u32,
}

impl PositionSampler {
    /// Creates a sampler seeded from the operating system's entropy source
    pub fn new() -> Self {
        Self::with_rng(Pcg32::from_entropy())
    }

    /// Creates a sampler with a deterministic sequence of positions
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(Pcg32::seed_from_u64(seed))
    }

    fn with_rng(rng: Pcg32) -> Self {
        Self {
            rng,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Caps how many normal draws `proximate_position` makes before giving
    /// up. A cap of 0 is treated as 1.
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// A uniformly random center along an axis of length `extent`
    pub fn uniform_position(&mut self, extent: u32, size: u32) -> Result<u32, Error> {
        let range = center_range(extent, size)?;
        Ok(self.rng.gen_range(range))
    }

    /// A center along an axis of length `extent` drawn from a normal
    /// distribution around `anchor`, truncated to the admissible range by
    /// rejecting out of range draws.
    pub fn proximate_position(
        &mut self,
        anchor: u32,
        extent: u32,
        size: u32,
        stddev: f64,
    ) -> Result<u32, Error> {
        center_range(extent, size)?;

        if !(stddev > 0.0 && stddev.is_finite()) {
            return Err(invalid_stddev(stddev));
        }

        let normal =
            Normal::new(f64::from(anchor), stddev).map_err(|_| invalid_stddev(stddev))?;

        for _ in 0..self.max_attempts {
            let value = normal.sample(&mut self.rng).round() as i64;

            if in_range(value, extent, size) {
                return Ok(value as u32);
            }
        }

        Err(Error::ProximityUnsatisfiable(ProximityUnsatisfiable {
            anchor,
            extent,
            patch_size: size,
            stddev,
            attempts: self.max_attempts,
        }))
    }

    /// A uniformly random patch center within an image
    pub fn uniform_center(&mut self, dims: Dims, size: u32) -> Result<Coord, Error> {
        check_fits(dims, size)?;

        let x = self.uniform_position(dims.width, size)?;
        let y = self.uniform_position(dims.height, size)?;
        Ok(Coord::new(x, y))
    }

    /// A patch center near `anchor`, each axis sampled independently with
    /// the same spread
    pub fn proximate_center(
        &mut self,
        anchor: Coord,
        dims: Dims,
        size: u32,
        stddev: f64,
    ) -> Result<Coord, Error> {
        check_fits(dims, size)?;

        let x = self.proximate_position(anchor.x, dims.width, size, stddev)?;
        let y = self.proximate_position(anchor.y, dims.height, size, stddev)?;
        Ok(Coord::new(x, y))
    }
}

impl Default for PositionSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Reports both dimensions of the image when either axis is too small,
/// rather than the single axis `center_range` knows about
fn check_fits(dims: Dims, size: u32) -> Result<(), Error> {
    if center_range(dims.width, size).is_err() || center_range(dims.height, size).is_err() {
        return Err(Error::PatchTooLarge(PatchTooLarge {
            image: dims,
            patch_size: size,
        }));
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn center_range_bounds() {
        assert_eq!(center_range(100, 10).unwrap(), 5..=94);
        assert_eq!(center_range(11, 10).unwrap(), 5..=5);
        assert_eq!(center_range(5, 5).unwrap(), 2..=2);
        assert_eq!(center_range(1, 1).unwrap(), 0..=0);
    }

    #[test]
    fn center_range_empty() {
        for &(extent, size) in &[(5, 10), (10, 10), (0, 1), (3, 4), (100, 0)] {
            let err = center_range(extent, size).err().unwrap();
            assert!(
                matches!(err, Error::PatchTooLarge(_)),
                "{}x{}",
                extent,
                size
            );
        }
    }

    #[test]
    fn uniform_stays_in_range() {
        let mut sampler = PositionSampler::with_seed(9);

        for &(extent, size) in &[(11, 10), (64, 32), (33, 32), (7, 3), (1000, 1)] {
            let range = center_range(extent, size).unwrap();
            for _ in 0..500 {
                let v = sampler.uniform_position(extent, size).unwrap();
                assert!(range.contains(&v), "{} not in {:?}", v, range);
            }
        }
    }

    #[test]
    fn uniform_covers_whole_range() {
        let mut sampler = PositionSampler::with_seed(1);
        let mut seen = [false; 10];

        for _ in 0..1000 {
            let v = sampler.uniform_position(14, 4).unwrap();
            seen[(v - 2) as usize] = true;
        }

        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn proximate_stays_in_range() {
        let mut sampler = PositionSampler::with_seed(77);

        // anchors at both edges of the range, with a spread wide enough that
        // a large share of draws gets rejected
        for &anchor in &[5, 6, 50, 93, 94] {
            for _ in 0..500 {
                let v = sampler.proximate_position(anchor, 100, 10, 8.0).unwrap();
                assert!((5..=94).contains(&v), "{}", v);
            }
        }
    }

    #[test]
    fn proximate_stays_near_anchor() {
        let mut sampler = PositionSampler::with_seed(5);
        let n = 2000;

        let sum: u64 = (0..n)
            .map(|_| u64::from(sampler.proximate_position(500, 1000, 32, 2.0).unwrap()))
            .sum();
        let mean = sum as f64 / f64::from(n);

        assert!((mean - 500.0).abs() < 0.5, "mean {}", mean);
    }

    #[test]
    fn proximate_gives_up() {
        // The anchor lies far outside the admissible range and the spread is
        // too small to ever reach it
        let mut sampler = PositionSampler::with_seed(3).max_attempts(50);
        let err = sampler
            .proximate_position(10_000, 100, 10, 0.5)
            .err()
            .unwrap();

        match err {
            Error::ProximityUnsatisfiable(pu) => {
                assert_eq!(pu.attempts, 50);
                assert_eq!(pu.anchor, 10_000);
            }
            other => panic!("unexpected error {}", other),
        }
    }

    #[test]
    fn rejects_bad_stddev() {
        let mut sampler = PositionSampler::with_seed(3);
        for &stddev in &[-1.0, 0.0, f64::NAN, f64::INFINITY] {
            let err = sampler.proximate_position(50, 100, 10, stddev).err();
            assert!(
                matches!(err, Some(Error::InvalidRange(_))),
                "stddev {}",
                stddev
            );
        }
    }

    #[test]
    fn too_small_image() {
        let mut sampler = PositionSampler::with_seed(0);
        let err = sampler.uniform_center(Dims::new(100, 5), 10).err().unwrap();

        match err {
            Error::PatchTooLarge(ptl) => {
                assert_eq!(ptl.image, Dims::new(100, 5));
                assert_eq!(ptl.patch_size, 10);
            }
            other => panic!("unexpected error {}", other),
        }
    }

    #[test]
    fn seeded_samplers_agree() {
        let mut a = PositionSampler::with_seed(11);
        let mut b = PositionSampler::with_seed(11);

        for _ in 0..100 {
            let ca = a.uniform_center(Dims::new(64, 48), 8).unwrap();
            let cb = b.uniform_center(Dims::new(64, 48), 8).unwrap();
            assert_eq!(ca, cb);
            assert_eq!(
                a.proximate_center(ca, Dims::new(64, 48), 8, 3.0).unwrap(),
                b.proximate_center(cb, Dims::new(64, 48), 8, 3.0).unwrap()
            );
        }
    }
}
