use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::foundation::error::{SfxError, SfxResult};

/// Sub-directory of the export directory that receives texture files.
pub const TEXTURE_DIR: &str = "Texture";

/// Maps a part's logical texture name to the physical file name written into its record.
pub trait TextureResolver {
    /// Physical file name for `logical`, or an error if it cannot be found.
    fn resolve(&mut self, logical: &str) -> SfxResult<String>;
}

/// Resolver that performs no IO and writes the logical name as is.
#[derive(Clone, Copy, Debug, Default)]
pub struct NameOnlyTextures;

impl TextureResolver for NameOnlyTextures {
    fn resolve(&mut self, logical: &str) -> SfxResult<String> {
        Ok(logical.to_string())
    }
}

/// Resolves textures by file stem inside `source_dir` and copies each one into
/// `<export_dir>/Texture/`.
#[derive(Debug)]
pub struct DirTextureResolver {
    source_dir: PathBuf,
    export_dir: PathBuf,
    resolved: HashMap<String, String>,
}

impl DirTextureResolver {
    /// Resolver reading from `source_dir` and writing under `export_dir`.
    pub fn new(source_dir: impl Into<PathBuf>, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            export_dir: export_dir.into(),
            resolved: HashMap::new(),
        }
    }

    /// `<export_dir>/Texture`.
    pub fn texture_dir(&self) -> PathBuf {
        self.export_dir.join(TEXTURE_DIR)
    }

    /// First file (in name order) whose stem equals `logical`.
    fn find(&self, logical: &str) -> SfxResult<Option<PathBuf>> {
        let entries = std::fs::read_dir(&self.source_dir).with_context(|| {
            format!("read texture directory '{}'", self.source_dir.display())
        })?;
        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("read texture directory '{}'", self.source_dir.display()))?
                .path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files
            .into_iter()
            .find(|p| p.file_stem().is_some_and(|s| s == logical)))
    }
}

impl TextureResolver for DirTextureResolver {
    #[tracing::instrument(skip(self))]
    fn resolve(&mut self, logical: &str) -> SfxResult<String> {
        if let Some(name) = self.resolved.get(logical) {
            return Ok(name.clone());
        }

        let src = self.find(logical)?.ok_or_else(|| {
            SfxError::validation(format!(
                "texture '{logical}' not found in '{}'",
                self.source_dir.display()
            ))
        })?;
        let file_name = file_name_of(&src)?;
        let dst_dir = self.texture_dir();
        std::fs::create_dir_all(&dst_dir)
            .with_context(|| format!("failed to create texture directory '{}'", dst_dir.display()))?;
        let dst = dst_dir.join(&file_name);
        std::fs::copy(&src, &dst).with_context(|| {
            format!("copy texture '{}' to '{}'", src.display(), dst.display())
        })?;
        tracing::debug!(texture = %file_name, "texture copied");

        self.resolved.insert(logical.to_string(), file_name.clone());
        Ok(file_name)
    }
}

fn file_name_of(path: &Path) -> SfxResult<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            SfxError::validation(format!(
                "texture file '{}' has no UTF-8 file name",
                path.display()
            ))
        })
}
