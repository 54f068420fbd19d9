use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

use super::decode::{decode_image, DecodedImage};

/// Directory that relative asset paths are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRoot {
    dir: PathBuf,
}

impl AssetRoot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `assets/` next to the running executable, falling back to the
    /// working directory when the executable path is unknown.
    pub fn beside_executable() -> Self {
        let base = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join("assets"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Absolute paths pass through unchanged.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.dir.join(relative)
    }

    pub fn read_to_string(&self, relative: impl AsRef<Path>) -> Result<String> {
        let path = self.resolve(relative);
        std::fs::read_to_string(&path).map_err(|source| Error::AssetRead { path, source })
    }

    pub fn load_image(&self, relative: impl AsRef<Path>) -> Result<DecodedImage> {
        decode_image(&self.resolve(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("trails-asset-{name}-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("shd")).unwrap();
        dir
    }

    #[test]
    fn reads_text_relative_to_root() {
        let dir = scratch_dir("text");
        std::fs::write(dir.join("shd/blit.vert"), "void main() {}").unwrap();

        let root = AssetRoot::new(&dir);
        assert_eq!(root.read_to_string("shd/blit.vert").unwrap(), "void main() {}");

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_asset_names_the_resolved_path() {
        let root = AssetRoot::new("/nonexistent-trails-root");
        let err = root.read_to_string("shd/none.frag").unwrap_err();
        match err {
            Error::AssetRead { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent-trails-root/shd/none.frag"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn absolute_paths_bypass_the_root() {
        let root = AssetRoot::new("/somewhere");
        assert_eq!(root.resolve("/etc/x"), PathBuf::from("/etc/x"));
    }

    #[test]
    fn beside_executable_ends_in_assets() {
        assert!(AssetRoot::beside_executable().dir().ends_with("assets"));
    }
}
