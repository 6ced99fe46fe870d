fn main() -> Result<(), patch_extract::Error> {
    //create a new session over every png in imgs/
    let session = patch_extract::Session::builder()
        .load_corpus("imgs/*.png".parse()?)
        .patch_size(32)
        .samples(100)
        //keep positives within a few pixels of their anchor
        .stddev(3.0)
        .build()?;

    //write the patches and the index files
    let summary = session.run_to_dir("out/01", None)?;
    println!("wrote {} triplets", summary.written);

    Ok(())
}
