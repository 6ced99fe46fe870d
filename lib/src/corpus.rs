use crate::Error;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::path::{Path, PathBuf};

/// Draws items uniformly at random, with replacement, from a fixed list.
///
/// Every picker owns its own generator, so two pickers created with
/// [`CorpusPicker::new`] produce unrelated sequences, while two pickers
/// created with the same seed via [`CorpusPicker::with_seed`] produce the same
/// sequence of draws.
pub struct CorpusPicker<T> {
    items: Vec<T>,
    rng: Pcg32,
}

impl<T> CorpusPicker<T> {
    /// Creates a picker seeded from the operating system's entropy source
    pub fn new(items: Vec<T>) -> Result<Self, Error> {
        Self::with_rng(items, Pcg32::from_entropy())
    }

    /// Creates a picker with a deterministic draw sequence
    pub fn with_seed(items: Vec<T>, seed: u64) -> Result<Self, Error> {
        Self::with_rng(items, Pcg32::seed_from_u64(seed))
    }

    fn with_rng(items: Vec<T>, rng: Pcg32) -> Result<Self, Error> {
        if items.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        Ok(Self { items, rng })
    }

    /// Draws the index of an item. Draws are independent, so the same index
    /// can come up any number of times in a row.
    pub fn draw_index(&mut self) -> usize {
        self.rng.gen_range(0..self.items.len())
    }

    pub fn draw(&mut self) -> &T {
        let idx = self.draw_index();
        &self.items[idx]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.items.get(idx)
    }
}

/// A directory plus a file name filter, written as `<dir>*<filter>`, eg.
/// `/home/test/*.png`. Only the text between the first and second `*` is
/// used as the filter, anything after a second `*` is ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorpusPattern {
    pub dir: PathBuf,
    pub filter: String,
}

impl CorpusPattern {
    pub fn parse(pattern: &str) -> Result<Self, Error> {
        let mut parts = pattern.split('*');

        let dir = parts.next().unwrap_or("");
        let filter = parts
            .next()
            .ok_or_else(|| Error::InvalidPattern(pattern.to_owned()))?;

        let dir = if dir.is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(dir)
        };

        Ok(Self {
            dir,
            filter: filter.to_owned(),
        })
    }

    /// Lists the regular files directly inside `dir`, or symlinks to them,
    /// whose name contains the filter text. The result is sorted by path so that seeded runs draw the
    /// same images regardless of the order the OS enumerates them in.
    pub fn resolve(&self) -> Result<Vec<PathBuf>, Error> {
        let mut files = Vec::new();

        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            // Follows symlinks, unlike `DirEntry::file_type`
            if !entry.path().is_file() {
                continue;
            }

            if matches_filter(&entry.file_name().to_string_lossy(), &self.filter) {
                files.push(entry.path());
            }
        }

        files.sort();
        log::debug!(
            "{} file(s) in '{}' match '{}'",
            files.len(),
            self.dir.display(),
            self.filter
        );

        Ok(files)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl std::str::FromStr for CorpusPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[inline]
fn matches_filter(file_name: &str, filter: &str) -> bool {
    file_name.contains(filter)
}
