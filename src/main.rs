//! Host-side helper: `cargo run` compiles the WASM bundle into
//! `static/pkg` and serves the demo page locally.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::process::Command;

    println!("Building WASM pkg …");
    match Command::new("wasm-pack")
        .args([
            "build",
            "--release",
            "--target",
            "web",
            "--out-dir",
            "static/pkg",
        ])
        .status()
    {
        Ok(status) if status.success() => {}
        Ok(_) => {
            eprintln!("wasm-pack finished with errors. Ensure wasm-pack is installed (https://rustwasm.github.io/wasm-pack/).");
            std::process::exit(1);
        }
        Err(_) => {
            eprintln!("wasm-pack not found in PATH. Serving whatever is already in static/.");
        }
    }

    println!("Launching local server at http://127.0.0.1:8000 …");
    let served = Command::new("python3")
        .args(["-m", "http.server", "8000", "--directory", "static"])
        .status();
    if served.is_err() {
        eprintln!("python3 not found. Serve static/ with any web server instead.");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
