//! Mirrors `static/` into `dist/` so deployable artifacts live in one place.

use std::path::Path;

use fs_extra::dir::{self, CopyOptions};

fn main() {
    println!("cargo:rerun-if-changed=static");

    let static_dir = Path::new("static");
    if !static_dir.exists() {
        return;
    }

    if let Err(err) = dir::create_all("dist", false) {
        println!("cargo:warning=could not prepare dist/: {err}");
        return;
    }
    let mut options = CopyOptions::new();
    options.overwrite = true;
    options.content_only = true;
    if let Err(err) = dir::copy(static_dir, "dist", &options) {
        println!("cargo:warning=static copy failed: {err}");
    }
}
