use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use super::STATE_FILE_NAME;

/// A local `terraform.tfstate` found under the discovery root.
///
/// The file contents are never inspected; state is treated as opaque bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateFile {
    /// Location on disk (root joined with the relative path).
    pub path: PathBuf,
    /// Path relative to the discovery root.
    pub relative_path: PathBuf,
}

impl StateFile {
    pub fn new(root: &Path, path: PathBuf) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.clone());

        Self {
            path,
            relative_path,
        }
    }

    /// Raw directory components between the root and the file.
    pub(crate) fn directory_components(&self) -> impl Iterator<Item = &OsStr> {
        self.relative_path
            .parent()
            .into_iter()
            .flat_map(Path::components)
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s),
                _ => None,
            })
    }

    /// Directory segments between the root and the file, or `None` when any
    /// of them is not valid UTF-8.
    pub fn directory_segments(&self) -> Option<Vec<String>> {
        self.directory_components()
            .map(|s| s.to_str().map(str::to_string))
            .collect()
    }

    /// Destination name in the container: the relative directory joined with
    /// `/` (independent of the host OS) followed by the state file name.
    ///
    /// `None` when the relative directory is not valid UTF-8. Such a path has
    /// no lossless blob name, and two of them could otherwise collide.
    pub fn blob_name(&self) -> Option<String> {
        let mut segments = self.directory_segments()?;
        segments.push(STATE_FILE_NAME.to_string());
        Some(segments.join("/"))
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}
