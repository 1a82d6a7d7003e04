use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use super::{STATE_FILE_NAME, StateFile};

/// Recursively collects every `terraform.tfstate` beneath `root`.
///
/// Hidden directories below the root (`.terraform/`, `.git/`, ...) are not
/// descended into. Entries that cannot be read are skipped. An empty result is
/// not an error here; callers decide whether that aborts the run.
pub fn find_state_files(root: &Path) -> Vec<StateFile> {
    let files: Vec<StateFile> = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::debug!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == STATE_FILE_NAME)
        .map(|entry| StateFile::new(root, entry.into_path()))
        .inspect(|file| {
            if file.relative_path.to_str().is_none() {
                tracing::warn!(
                    file = %file.relative_path.display(),
                    "path is not valid UTF-8 and cannot be uploaded"
                );
            }
        })
        .collect();

    tracing::debug!(root = %root.display(), count = files.len(), "state file discovery finished");
    files
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
