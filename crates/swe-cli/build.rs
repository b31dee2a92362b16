use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Copy the bundled palettes in `data/` next to the built binary, where
/// the CLI looks them up at run time.
fn main() {
    println!("cargo:rerun-if-changed=data/");

    let source = Path::new("data");
    if !source.is_dir() {
        return;
    }

    // OUT_DIR is target/<profile>/build/<pkg>-<hash>/out
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let Some(profile_dir) = out_dir.ancestors().nth(3) else {
        return;
    };
    let destination = profile_dir.join("data");
    fs::create_dir_all(&destination).expect("create data dir next to binary");

    let entries = fs::read_dir(source).expect("read data dir");
    for path in entries.filter_map(|e| e.ok().map(|e| e.path())) {
        let is_palette = path.extension().is_some_and(|e| e == "csv");
        if let (true, Some(name)) = (is_palette, path.file_name()) {
            fs::copy(&path, destination.join(name)).expect("copy palette");
        }
    }
}
