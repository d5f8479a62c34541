use std::{env, path::PathBuf};

/// Print a discovery hint for Windows builds that rely on vcpkg-provided
/// FFmpeg. `ffmpeg-sys-next` only looks at `FFMPEG_DIR`, so a vcpkg install
/// without that variable fails late with an unhelpful linker error.
fn vcpkg_ffmpeg_hint() -> Option<String> {
    let vcpkg_root = env::var("VCPKG_ROOT").ok()?;
    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_string());
    let candidate = PathBuf::from(vcpkg_root).join("installed").join(triplet);

    if candidate.exists() {
        Some(format!(
            "found vcpkg FFmpeg at {0}; set FFMPEG_DIR={0} so ffmpeg-sys-next picks it up",
            candidate.display(),
        ))
    } else {
        Some(format!(
            "VCPKG_ROOT is set but {} does not exist",
            candidate.display(),
        ))
    }
}

fn main() {
    for variable in ["FFMPEG_DIR", "VCPKG_ROOT", "VCPKGRS_TRIPLET"] {
        println!("cargo:rerun-if-env-changed={variable}");
    }

    let is_windows = env::var("CARGO_CFG_TARGET_OS").is_ok_and(|os| os == "windows");
    if !is_windows || env::var_os("FFMPEG_DIR").is_some() {
        return;
    }

    match vcpkg_ffmpeg_hint() {
        Some(hint) => println!("cargo:warning={hint}"),
        None => println!(
            "cargo:warning=FFMPEG_DIR is not set; install FFmpeg (e.g. via vcpkg) and point FFMPEG_DIR at it"
        ),
    }
}
