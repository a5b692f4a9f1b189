//! Output naming.
//!
//! The sanitized copy is written next to the input; the input itself is
//! never touched.

use std::path::{Path, PathBuf};

/// Inserted between the input's base name and its extension.
pub const CLEAN_SUFFIX: &str = "_clean";

/// Returns `<dir>/<stem>_clean<.ext>` for `input`.
pub fn output_path_for(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}{}.{}", stem, CLEAN_SUFFIX, ext.to_string_lossy()),
        None => format!("{}{}", stem, CLEAN_SUFFIX),
    };
    input.with_file_name(name)
}
