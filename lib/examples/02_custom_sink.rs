use patch_extract::{Error, Role, Session, Triplet, TripletSink};

/// Prints where each patch was cut from instead of saving it
struct PrintSink;

impl TripletSink for PrintSink {
    fn write_triplet(&mut self, id: &str, triplet: &Triplet) -> Result<(), Error> {
        for role in Role::ALL.iter() {
            let patch = triplet.get(*role);
            println!(
                "{} {:?}: image #{} at ({}, {})",
                id, role, patch.source, patch.rect.x, patch.rect.y
            );
        }

        Ok(())
    }
}

fn main() -> Result<(), Error> {
    let session = Session::builder()
        .add_images(&[&"imgs/1.jpg", &"imgs/2.jpg"])
        .patch_size(16)
        .samples(10)
        .seed(42)
        //drop samples from images smaller than the patch rather than stopping
        .skip_failed_samples(true)
        .build()?;

    session.run(
        &mut PrintSink,
        Some(Box::new(|update: patch_extract::ProgressUpdate| {
            if update.skipped > 0 && update.completed == update.total {
                eprintln!("{} samples skipped", update.skipped);
            }
        })),
    )?;

    Ok(())
}
