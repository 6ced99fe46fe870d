use crate::*;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Patch extraction session.
///
/// Calling `run()` draws `samples` triplets and hands each one to a
/// `TripletSink`, consuming the session in the process. You can provide a
/// `GeneratorProgress` implementation to get an update after every sample.
///
/// # Example
/// ```no_run
/// let session = patch_extract::Session::builder()
///     .patch_size(32)
///     .samples(1000)
///     .add_images(&[&"imgs/1.png", &"imgs/2.png"])
///     .build().expect("failed to build session");
///
/// let summary = session.run_to_dir("patch_output", None).expect("failed to extract patches");
/// println!("wrote {} triplets", summary.written);
/// ```
pub struct Session<'a> {
    generator: TripletGenerator<'a>,
    params: Parameters,
}

impl<'a> Session<'a> {
    /// Creates a new session with default parameters.
    pub fn builder() -> SessionBuilder<'a> {
        SessionBuilder::default()
    }

    /// The number of images triplets are drawn from
    pub fn corpus_len(&self) -> usize {
        self.generator.corpus().len()
    }

    /// Generates the triplets and passes them to `sink` in order, named
    /// `0000000`, `0000001`, ...
    pub fn run(
        mut self,
        sink: &mut dyn TripletSink,
        mut progress: Option<Box<dyn GeneratorProgress>>,
    ) -> Result<RunSummary, Error> {
        let total = self.params.samples as usize;
        let mut summary = RunSummary::default();

        log::info!(
            "extracting {} triplet(s) of {}x{} patches from {} image(s)",
            total,
            self.params.patch_size,
            self.params.patch_size,
            self.corpus_len()
        );

        for i in 0..total {
            match self.generator.generate() {
                Ok(triplet) => {
                    let id = sample_id(summary.written);
                    sink.write_triplet(&id, &triplet)?;
                    summary.written += 1;
                }
                Err(e) if self.params.skip_failed_samples && e.is_sample_error() => {
                    log::warn!("skipping sample {}: {}", i, e);
                    summary.skipped += 1;
                }
                Err(e) => return Err(e),
            }

            if let Some(ref mut progress) = progress {
                progress.update(ProgressUpdate {
                    completed: i + 1,
                    total,
                    skipped: summary.skipped,
                });
            }
        }

        sink.finish()?;

        log::info!(
            "wrote {} triplet(s), skipped {}",
            summary.written,
            summary.skipped
        );

        Ok(summary)
    }

    /// Runs the session, writing the patches and index files to `dir` in the
    /// session's output format
    pub fn run_to_dir<P: AsRef<Path>>(
        self,
        dir: P,
        progress: Option<Box<dyn GeneratorProgress>>,
    ) -> Result<RunSummary, Error> {
        let mut sink = DirectorySink::new(dir.as_ref(), self.params.output_format);
        self.run(&mut sink, progress)
    }
}

/// The zero padded identifier of the `i`th written sample
pub fn sample_id(i: usize) -> String {
    format!("{:07}", i)
}

/// The outcome of a completed run
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// The number of triplets handed to the sink
    pub written: usize,
    /// The number of samples dropped because of `skip_failed_samples`
    pub skipped: usize,
}

/// Builds a session by setting parameters and adding input images, calling
/// `build` will check all of the provided inputs to verify that patches can
/// be drawn from them
#[derive(Default)]
pub struct SessionBuilder<'a> {
    images: Vec<ImageSource<'a>>,
    patterns: Vec<CorpusPattern>,
    params: Parameters,
}

impl<'a> SessionBuilder<'a> {
    /// Creates a new `SessionBuilder`, can also be created via
    /// `Session::builder()`
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an image to the corpus triplets are drawn from
    pub fn add_image<I: Into<ImageSource<'a>>>(mut self, image: I) -> Self {
        self.images.push(image.into());
        self
    }

    /// Adds images to the corpus triplets are drawn from
    pub fn add_images<I: Into<ImageSource<'a>>, It: IntoIterator<Item = I>>(
        mut self,
        images: It,
    ) -> Self {
        self.images.extend(images.into_iter().map(|i| i.into()));
        self
    }

    /// Adds every file matching the pattern to the corpus. The directory is
    /// listed when the session is built.
    pub fn load_corpus(mut self, pattern: CorpusPattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Edge length of the square patches, in pixels.
    ///
    /// Default: 32
    pub fn patch_size(mut self, size: u32) -> Self {
        self.params.patch_size = size;
        self
    }

    /// The number of triplets to draw.
    ///
    /// Default: 100
    pub fn samples(mut self, samples: u32) -> Self {
        self.params.samples = samples;
        self
    }

    /// The standard deviation, in pixels, of the offset between the anchor
    /// and the positive patch along each axis.
    ///
    /// Default: 5.0
    pub fn stddev(mut self, stddev: f64) -> Self {
        self.params.stddev = stddev;
        self
    }

    /// A seed for the random generators, to get the same triplets from the
    /// same corpus on every run. Without a seed, the generators are seeded
    /// from the operating system.
    pub fn seed(mut self, seed: u64) -> Self {
        self.params.seed = Some(seed);
        self
    }

    /// How many draws are made when placing a positive patch before the
    /// sample is considered a failure.
    ///
    /// Default: 10000
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.params.max_attempts = max_attempts;
        self
    }

    /// The image format patches are written in by `Session::run_to_dir`.
    ///
    /// Default: `OutputFormat::Png`
    pub fn output_format(mut self, fmt: OutputFormat) -> Self {
        self.params.output_format = fmt;
        self
    }

    /// When enabled, a sample whose images are too small for the patch, or
    /// whose positive patch can't be placed, is logged and skipped instead of
    /// failing the run. Skipped samples don't use up an identifier.
    ///
    /// Default: false
    pub fn skip_failed_samples(mut self, skip: bool) -> Self {
        self.params.skip_failed_samples = skip;
        self
    }

    /// Creates a `Session`, or returns an error if invalid parameters or
    /// no images were provided
    pub fn build(mut self) -> Result<Session<'a>, Error> {
        self.check_parameters_validity()?;

        for pattern in &self.patterns {
            let files = pattern.resolve()?;
            self.images.extend(files.into_iter().map(ImageSource::from));
        }

        let (corpus, sampler) = match self.params.seed {
            Some(seed) => (
                CorpusPicker::with_seed(self.images, seed)?,
                PositionSampler::with_seed(seed.wrapping_add(1)),
            ),
            None => (CorpusPicker::new(self.images)?, PositionSampler::new()),
        };

        let sampler = sampler.max_attempts(self.params.max_attempts);

        Ok(Session {
            generator: TripletGenerator::new(
                corpus,
                sampler,
                self.params.patch_size,
                self.params.stddev,
            ),
            params: self.params,
        })
    }

    fn check_parameters_validity(&self) -> Result<(), Error> {
        if self.params.patch_size == 0 {
            return Err(Error::InvalidRange(errors::InvalidRange {
                min: 1.0,
                max: f64::from(u32::MAX),
                value: 0.0,
                name: "patch-size",
            }));
        }

        if !(self.params.stddev > 0.0 && self.params.stddev.is_finite()) {
            return Err(Error::InvalidRange(errors::InvalidRange {
                min: f64::MIN_POSITIVE,
                max: f64::MAX,
                value: self.params.stddev,
                name: "stddev",
            }));
        }

        if self.params.max_attempts == 0 {
            return Err(Error::InvalidRange(errors::InvalidRange {
                min: 1.0,
                max: f64::from(u32::MAX),
                value: 0.0,
                name: "max-attempts",
            }));
        }

        Ok(())
    }
}

/// Image formats patches can be written in
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Bmp,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Bmp => "bmp",
        }
    }

    fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Bmp => image::ImageFormat::Bmp,
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Png
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "bmp" => Ok(Self::Bmp),
            other => Err(Error::UnsupportedOutputFormat(other.to_owned())),
        }
    }
}

/// Receives the triplets of a run
pub trait TripletSink {
    fn write_triplet(&mut self, id: &str, triplet: &Triplet) -> Result<(), Error>;

    /// Called once after the last triplet of a successful run
    fn finish(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// Writes every patch as `<id>_patch_<n>.<ext>` into a directory, and lists
/// each of them as `<file> 0` in `index<n>.txt`, where `n` is 1 for anchors,
/// 2 for positives and 3 for negatives.
///
/// Nothing is created until the first triplet arrives, so a run that fails
/// before producing anything leaves the file system untouched.
pub struct DirectorySink {
    dir: PathBuf,
    format: OutputFormat,
    indices: Option<Vec<BufWriter<File>>>,
}

impl DirectorySink {
    pub fn new<P: Into<PathBuf>>(dir: P, format: OutputFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
            indices: None,
        }
    }

    pub fn index_path(&self, role: Role) -> PathBuf {
        self.dir.join(format!("index{}.txt", role.number()))
    }

    pub fn patch_file_name(&self, id: &str, role: Role) -> String {
        format!("{}_patch_{}.{}", id, role.number(), self.format.extension())
    }

    fn open_indices(&mut self) -> Result<&mut Vec<BufWriter<File>>, Error> {
        if self.indices.is_none() {
            std::fs::create_dir_all(&self.dir)?;

            let indices = Role::ALL
                .iter()
                .map(|role| -> Result<_, Error> {
                    Ok(BufWriter::new(File::create(self.index_path(*role))?))
                })
                .collect::<Result<Vec<_>, Error>>()?;

            self.indices = Some(indices);
        }

        Ok(self.indices.get_or_insert_with(Vec::new))
    }
}

impl TripletSink for DirectorySink {
    fn write_triplet(&mut self, id: &str, triplet: &Triplet) -> Result<(), Error> {
        self.open_indices()?;

        for patch in triplet.patches() {
            let name = self.patch_file_name(id, patch.role);
            patch
                .image
                .save_with_format(self.dir.join(&name), self.format.image_format())?;

            if let Some(indices) = self.indices.as_mut() {
                writeln!(indices[patch.role.number() as usize - 1], "{} 0", name)?;
            }
        }

        Ok(())
    }

    fn finish(&mut self) -> Result<(), Error> {
        // A run of 0 samples still produces (empty) index files
        for index in self.open_indices()? {
            index.flush()?;
        }

        Ok(())
    }
}

/// Helper struct for passing progress information to external callers
pub struct ProgressUpdate {
    /// The number of samples attempted so far
    pub completed: usize,
    /// The number of samples the run will attempt
    pub total: usize,
    /// The number of attempted samples that were skipped
    pub skipped: usize,
}

/// Allows the session to update external callers with the current
/// progress of the run
pub trait GeneratorProgress {
    fn update(&mut self, info: ProgressUpdate);
}

impl<G> GeneratorProgress for G
where
    G: FnMut(ProgressUpdate) + Send,
{
    fn update(&mut self, info: ProgressUpdate) {
        self(info)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Default)]
    struct MemorySink {
        ids: Vec<String>,
        sizes: Vec<(u32, u32)>,
        finished: bool,
    }

    impl TripletSink for MemorySink {
        fn write_triplet(&mut self, id: &str, triplet: &Triplet) -> Result<(), Error> {
            self.ids.push(id.to_owned());
            self.sizes
                .extend(triplet.patches().map(|p| p.image.dimensions()));
            Ok(())
        }

        fn finish(&mut self) -> Result<(), Error> {
            self.finished = true;
            Ok(())
        }
    }

    fn blank(width: u32, height: u32) -> image::DynamicImage {
        image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height))
    }

    #[test]
    fn ids_are_sequential() {
        let session = Session::builder()
            .add_image(blank(64, 64))
            .patch_size(8)
            .samples(3)
            .seed(1)
            .build()
            .unwrap();

        let mut sink = MemorySink::default();
        let summary = session.run(&mut sink, None).unwrap();

        assert_eq!(sink.ids, vec!["0000000", "0000001", "0000002"]);
        assert_eq!(sink.sizes, vec![(8, 8); 9]);
        assert!(sink.finished);
        assert_eq!(summary, RunSummary { written: 3, skipped: 0 });
    }

    #[test]
    fn defaults() {
        let params = Parameters::default();
        assert_eq!(params.patch_size, 32);
        assert_eq!(params.samples, 100);
        assert!((params.stddev - 5.0).abs() < f64::EPSILON);
        assert_eq!(params.output_format, OutputFormat::Png);
        assert!(!params.skip_failed_samples);
    }

    #[test]
    fn empty_corpus() {
        let err = Session::builder().build().err().unwrap();
        assert!(matches!(err, Error::EmptyCorpus));
    }

    #[test]
    fn invalid_parameters() {
        for builder in vec![
            Session::builder().patch_size(0),
            Session::builder().stddev(0.0),
            Session::builder().stddev(f64::NAN),
            Session::builder().max_attempts(0),
        ] {
            let err = builder.add_image(blank(10, 10)).build().err().unwrap();
            assert!(matches!(err, Error::InvalidRange(_)));
        }
    }

    #[test]
    fn geometry_error_aborts() {
        let session = Session::builder()
            .add_image(blank(5, 5))
            .patch_size(10)
            .samples(4)
            .build()
            .unwrap();

        let mut sink = MemorySink::default();
        let err = session.run(&mut sink, None).err().unwrap();

        assert!(matches!(err, Error::PatchTooLarge(_)));
        assert!(sink.ids.is_empty());
        assert!(!sink.finished);
    }

    #[test]
    fn geometry_error_skipped() {
        let session = Session::builder()
            .add_images(vec![blank(5, 5), blank(50, 50)])
            .patch_size(10)
            .samples(40)
            .seed(4)
            .skip_failed_samples(true)
            .build()
            .unwrap();

        let mut sink = MemorySink::default();
        let summary = session.run(&mut sink, None).unwrap();

        assert_eq!(summary.written + summary.skipped, 40);
        assert!(summary.skipped > 0);

        let expected: Vec<_> = (0..summary.written).map(sample_id).collect();
        assert_eq!(sink.ids, expected);
    }

    #[test]
    fn progress_is_reported() {
        use std::sync::{Arc, Mutex};

        let updates = Arc::new(Mutex::new(Vec::new()));
        let recorded = updates.clone();

        let session = Session::builder()
            .add_image(blank(20, 20))
            .patch_size(4)
            .samples(5)
            .build()
            .unwrap();

        session
            .run(
                &mut MemorySink::default(),
                Some(Box::new(move |update: ProgressUpdate| {
                    recorded
                        .lock()
                        .unwrap()
                        .push((update.completed, update.total));
                })),
            )
            .unwrap();

        let updates = updates.lock().unwrap();
        assert_eq!(*updates, vec![(1, 5), (2, 5), (3, 5), (4, 5), (5, 5)]);
    }

    #[test]
    fn output_formats() {
        assert_eq!("png".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert_eq!("jpg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::Bmp.extension(), "bmp");
        assert!(matches!(
            "tiff".parse::<OutputFormat>(),
            Err(Error::UnsupportedOutputFormat(_))
        ));
    }

    #[test]
    fn file_names() {
        let sink = DirectorySink::new("out", OutputFormat::Png);
        assert_eq!(sink.patch_file_name("0000012", Role::Positive), "0000012_patch_2.png");
        assert_eq!(sink.index_path(Role::Negative), Path::new("out").join("index3.txt"));
    }
}
