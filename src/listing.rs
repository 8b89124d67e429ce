use crate::error::AppError;
use crate::resolve::{self, EntryKind, ResolvedEntry};
use std::path::Path;

/// Classification of a single directory child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListedKind {
    Directory,
    PlayableMedia,
    /// Anything else. Kept in the raw child set, hidden when rendering, so
    /// companion files such as stray subtitles never show up in a listing.
    Other,
}

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub url_path: String,
    pub kind: ListedKind,
    pub extension: Option<String>,
}

/// Enumerate the immediate children of a resolved directory.
///
/// Non-recursive, and the order is whatever the directory enumeration
/// yields; no sorting is imposed. Any enumeration failure is returned whole,
/// never as a partial listing.
pub async fn list_directory(dir: &ResolvedEntry) -> Result<Vec<ListingEntry>, AppError> {
    debug_assert_eq!(dir.kind, EntryKind::Directory);

    let enumeration_error = |source| AppError::Enumeration {
        path: dir.fs_path.display().to_string(),
        source,
    };

    let mut read_dir = tokio::fs::read_dir(&dir.fs_path)
        .await
        .map_err(enumeration_error)?;

    let mut entries = Vec::new();
    while let Some(child) = read_dir.next_entry().await.map_err(enumeration_error)? {
        let name = child.file_name().to_string_lossy().into_owned();
        let file_type = child.file_type().await.map_err(enumeration_error)?;
        let extension = resolve::extension_of(Path::new(&name));

        let kind = if file_type.is_dir() {
            ListedKind::Directory
        } else if extension.as_deref().is_some_and(resolve::is_playable) {
            ListedKind::PlayableMedia
        } else {
            ListedKind::Other
        };

        entries.push(ListingEntry {
            url_path: format!("{}/{}", dir.url_path, name),
            name,
            kind,
            extension,
        });
    }

    Ok(entries)
}
