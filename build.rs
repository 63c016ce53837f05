use std::{env, fs, path::Path};

fn main() {
    // Ship config.json next to the compiled binary so the exe-dir lookup
    // in main() finds it under `cargo run`.
    let out_dir = env::var("OUT_DIR").expect("Cannot read OUT_DIR");

    // OUT_DIR = target/<profile>/build/<crate>/out; three levels up is the
    // directory the binary lands in.
    let profile_dir = Path::new(&out_dir)
        .ancestors()
        .nth(3)
        .expect("Cannot find target profile directory");

    if let Err(e) = fs::copy("config.json", profile_dir.join("config.json")) {
        println!("cargo:warning=Could not copy config.json: {e}");
    }

    println!("cargo:rerun-if-changed=config.json");
}
