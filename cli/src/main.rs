use structopt::{clap::ErrorKind, StructOpt};

mod progress;

use patch_extract::{CorpusPattern, Error, OutputFormat, Session};
use progress::SampleProgress;
use std::path::PathBuf;

#[derive(StructOpt, Debug, PartialEq)]
#[structopt(
    name = "patch-extract",
    about = "Extracts anchor, positive and negative patch triplets from a directory of images",
    rename_all = "kebab-case"
)]
struct Opt {
    /// Size of the square image patches, in pixels
    #[structopt(long, default_value = "32")]
    size: u32,
    /// Number of image patch triplets to extract
    #[structopt(long, default_value = "100")]
    samples: u32,
    /// Standard deviation, in pixels, used to place the second patch around the first
    #[structopt(long, default_value = "5.0")]
    stddev: f64,
    /// Pattern used to find the source images. Contains the directory and the
    /// file extension separated by `*`, eg. `/home/test/*.png`
    #[structopt(short = "p", long = "pattern")]
    pattern_flag: Option<String>,
    /// Same as `--pattern`
    #[structopt(name = "PATTERN")]
    pattern_pos: Option<String>,
    /// Directory to write the extracted patches and index files to
    #[structopt(long, default_value = "./patch_output", parse(from_os_str))]
    out: PathBuf,
    /// A seed value for the random generators to get the same triplets on
    /// every run over the same images
    #[structopt(long)]
    seed: Option<u64>,
    /// Number of draws made when placing the second patch before giving up
    #[structopt(long, default_value = "10000")]
    max_attempts: u32,
    /// The format to save the patches as, one of 'png', 'jpg', 'bmp'
    #[structopt(long, default_value = "png")]
    out_fmt: OutputFormat,
    /// Skip samples whose images are too small for the patch size instead of
    /// stopping
    #[structopt(long)]
    skip_failed: bool,
    /// Don't show a progress bar
    #[structopt(long)]
    no_progress: bool,
}

impl Opt {
    fn pattern(&self) -> Option<&str> {
        self.pattern_flag
            .as_deref()
            .or_else(|| self.pattern_pos.as_deref())
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match Opt::from_iter_safe(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => match e.kind {
            ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed => e.exit(),
            _ => {
                eprintln!("{}", e.message);
                usage_and_exit();
            }
        },
    };

    let pattern = match args.pattern() {
        Some(pattern) => pattern.to_owned(),
        // Nothing to do without images, so behave as if help was requested
        None => usage_and_exit(),
    };

    if let Err(e) = real_main(&args, &pattern) {
        if atty::is(atty::Stream::Stderr) {
            eprintln!("\x1b[31merror\x1b[0m: {}", e);
        } else {
            eprintln!("error: {}", e);
        }

        std::process::exit(1);
    }
}

fn usage_and_exit() -> ! {
    let _ = Opt::clap().print_help();
    println!();
    std::process::exit(2);
}

fn real_main(args: &Opt, pattern: &str) -> Result<(), Error> {
    let pattern = CorpusPattern::parse(pattern)?;

    let mut sb = Session::builder()
        .load_corpus(pattern)
        .patch_size(args.size)
        .samples(args.samples)
        .stddev(args.stddev)
        .max_attempts(args.max_attempts)
        .output_format(args.out_fmt)
        .skip_failed_samples(args.skip_failed);

    if let Some(seed) = args.seed {
        sb = sb.seed(seed);
    }

    let session = sb.build()?;
    log::info!("found {} image(s)", session.corpus_len());

    let progress: Option<Box<dyn patch_extract::GeneratorProgress>> = if !args.no_progress {
        Some(Box::new(SampleProgress::new(args.samples)))
    } else {
        None
    };

    let summary = session.run_to_dir(&args.out, progress)?;

    if summary.skipped > 0 {
        log::warn!(
            "{} of {} samples were skipped",
            summary.skipped,
            summary.skipped + summary.written
        );
    }

    Ok(())
}
