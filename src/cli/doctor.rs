//! Environment readiness check.

use crate::fetch::chromium::find_chromium;
use anyhow::Result;
use std::path::Path;

/// Check Chromium availability and output-directory writability.
pub async fn run() -> Result<()> {
    println!("shodan-harvest Doctor");
    println!("=====================");
    println!();

    // OS and architecture
    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;
    println!("OS:   {os}");
    println!("Arch: {arch}");
    println!();

    // Check Chromium
    let chromium_path = find_chromium();
    match &chromium_path {
        Some(path) => println!("[OK] Chromium found: {}", path.display()),
        None => println!(
            "[!!] Chromium NOT found. Install Chrome or set SHODAN_HARVEST_CHROMIUM_PATH."
        ),
    }

    // Check output directory writability
    let output_ok = probe_output_dir(Path::new("output"));
    if output_ok {
        println!("[OK] Output directory is writable");
    } else {
        println!("[!!] Output directory is not writable");
    }

    println!();
    if chromium_path.is_some() && output_ok {
        println!("Status: READY");
    } else {
        println!("Status: NOT READY");
    }

    Ok(())
}

/// Create the directory if needed and try writing a probe file into it.
fn probe_output_dir(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    let probe = dir.join(".doctor-probe");
    let ok = std::fs::write(&probe, b"probe").is_ok();
    let _ = std::fs::remove_file(&probe);
    ok
}
