//! On-disk fake toolchain fixtures.

use std::fs;

use tempfile::TempDir;

/// Descriptor text for a fake keel installation at the given version,
/// advertising the stock stub and doc commands.
pub fn descriptor_toml(version: &str) -> String {
    format!(
        r#"[toolchain]
name = "keel"
version = "{version}"

[[tool]]
name = "keelc"

[[tool.command]]
name = "stubs"
options = ["out-dir", "search-path"]

[[tool.command]]
name = "doc"
options = ["out-dir", "search-path", "title", "window-title"]
"#
    )
}

/// Lay out a fake keel installation: a descriptor plus a `bin/keelc` that
/// exists but is never executed (tests pair this with a mock runner).
pub fn fake_toolchain(version: &str) -> TempDir {
    fake_toolchain_with_descriptor(&descriptor_toml(version))
}

/// Same layout, with caller-supplied descriptor text.
pub fn fake_toolchain_with_descriptor(descriptor: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("keel.toml"), descriptor).unwrap();
    fs::create_dir(dir.path().join("bin")).unwrap();
    let launcher = format!("keelc{}", std::env::consts::EXE_SUFFIX);
    fs::write(dir.path().join("bin").join(launcher), "").unwrap();
    dir
}
