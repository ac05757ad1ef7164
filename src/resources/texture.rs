//! Locating texture files referenced by glTF images on disk.

use std::path::{Path, PathBuf};

use anyhow::Context;

/// An index of every file below a source directory, used to find the texture
/// file an image URI refers to.
///
/// Scenery packages frequently ship several copies of a texture under the
/// same name in different folders. Among the candidates, the one whose path
/// shares the longest prefix with a reference path (usually the asset being
/// converted) wins, which picks the copy closest to that asset.
#[derive(Clone, Debug, Default)]
pub struct TextureResolver {
    files: Vec<PathBuf>,
}

impl TextureResolver {
    /// Walk `root` recursively and remember every file found.
    pub fn scan(root: impl AsRef<Path>) -> anyhow::Result<Self> {
        let root = root.as_ref();
        let content = fs_extra::dir::get_dir_content(root)
            .with_context(|| format!("failed to list texture directory {}", root.display()))?;
        log::debug!("indexed {} files below {}", content.files.len(), root.display());
        Ok(Self::from_files(content.files.into_iter().map(PathBuf::from)))
    }

    /// Build a resolver over a known file list. The list is sorted so that
    /// resolution does not depend on directory iteration order.
    pub fn from_files(files: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut files: Vec<PathBuf> = files.into_iter().collect();
        files.sort();
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /**
     * Find the file named `file_name` (compared case-insensitively) closest to
     * `reference`.
     *
     * Closeness is the number of leading characters the candidate's path has
     * in common with `reference`. On a tie the candidate that sorts first wins.
     */
    pub fn resolve(&self, file_name: &str, reference: &str) -> Option<PathBuf> {
        let wanted = file_name.to_lowercase();
        let mut best: Option<(&PathBuf, usize)> = None;
        for candidate in self.files.iter().filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.to_lowercase() == wanted)
        }) {
            let score = common_prefix_len(&candidate.to_string_lossy(), reference);
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((candidate, score));
            }
        }
        best.map(|(path, _)| path.clone())
    }
}

/// Number of leading characters `a` and `b` have in common.
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}
