use indicatif::{ProgressBar, ProgressStyle};
use patch_extract::{GeneratorProgress, ProgressUpdate};

pub struct SampleProgress {
    pb: ProgressBar,
    total: usize,
    skipped: usize,
}

impl SampleProgress {
    pub fn new(total: u32) -> Self {
        let pb = ProgressBar::new(u64::from(total));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .progress_chars("##-"),
        );

        Self {
            pb,
            total: total as usize,
            skipped: 0,
        }
    }
}

impl Drop for SampleProgress {
    fn drop(&mut self) {
        self.pb.finish();
    }
}

impl GeneratorProgress for SampleProgress {
    fn update(&mut self, update: ProgressUpdate) {
        if update.total != self.total {
            self.total = update.total;
            self.pb.set_length(self.total as u64);
        }

        if update.skipped != self.skipped {
            self.skipped = update.skipped;
            self.pb.set_message(&format!("({} skipped)", self.skipped));
        }

        self.pb.set_position(update.completed as u64);
    }
}
