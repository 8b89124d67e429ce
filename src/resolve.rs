use crate::error::AppError;
use std::io;
use std::path::{Path, PathBuf};

/// Extensions the browser player is offered for. Matching is case-sensitive,
/// like the naming convention the whole scheme relies on.
pub const PLAYABLE_EXTENSIONS: &[&str] = &["mkv", "mp4"];

/// Fixed extension -> content type table for streamed files.
///
/// `mkv` is announced as `video/webm` so browsers attempt inline playback
/// instead of offering a download.
pub fn content_type(extension: &str) -> Option<&'static str> {
    match extension {
        "mkv" => Some("video/webm"),
        "mp4" => Some("video/mp4"),
        "vtt" => Some("text/vtt"),
        _ => None,
    }
}

/// Whether a file with this extension gets a player view.
pub fn is_playable(extension: &str) -> bool {
    PLAYABLE_EXTENSIONS.contains(&extension)
}

/// What a request path turned out to be on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// A request path resolved to an entry under the served root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    /// Path relative to the served root, OS-native separators.
    pub rel_path: PathBuf,
    /// Canonical filesystem path; all disk access goes through this.
    pub fs_path: PathBuf,
    /// Canonical URL path: empty for the root, "/a/b" otherwise.
    pub url_path: String,
    pub kind: EntryKind,
    /// Base-name suffix, files only, case preserved.
    pub extension: Option<String>,
}

/// Resolve an untrusted, slash-separated request path against the canonical
/// served root.
///
/// The path is reduced lexically first (empty and `.` segments dropped, `..`
/// popping a segment), so traversal above the root is rejected before any
/// filesystem access. The surviving path is then canonicalized, which also
/// catches symlinks pointing outside the root.
pub async fn resolve(root: &Path, request_path: &str) -> Result<ResolvedEntry, AppError> {
    let segments = sanitize(request_path)?;

    let rel_path: PathBuf = segments.iter().collect();
    let display = Path::new(".").join(&rel_path).display().to_string();

    let fs_path = match tokio::fs::canonicalize(root.join(&rel_path)).await {
        Ok(path) => path,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(AppError::NotFound { path: display });
        }
        Err(err) => return Err(AppError::Io(err)),
    };
    if !fs_path.starts_with(root) {
        return Err(AppError::PathEscape { path: display });
    }

    let metadata = tokio::fs::metadata(&fs_path).await?;
    let (kind, extension) = if metadata.is_dir() {
        (EntryKind::Directory, None)
    } else {
        (EntryKind::File, extension_of(&rel_path))
    };

    let url_path = if segments.is_empty() {
        String::new()
    } else {
        format!("/{}", segments.join("/"))
    };

    Ok(ResolvedEntry {
        rel_path,
        fs_path,
        url_path,
        kind,
        extension,
    })
}

/// Lexical reduction of a request path into plain segments.
fn sanitize(request_path: &str) -> Result<Vec<&str>, AppError> {
    let mut segments = Vec::new();
    for segment in request_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(AppError::PathEscape {
                        path: request_path.to_string(),
                    });
                }
            }
            other => segments.push(other),
        }
    }
    Ok(segments)
}

/// Suffix of the base name, case preserved; `None` when there is none.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn fixture() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        tokio::fs::create_dir(root.join("movies")).await.unwrap();
        tokio::fs::write(root.join("movies/clip.mp4"), b"video")
            .await
            .unwrap();
        tokio::fs::write(root.join("notes.txt"), b"text").await.unwrap();
        (dir, root)
    }

    #[tokio::test]
    async fn classifies_directory_and_file() {
        let (_guard, root) = fixture().await;

        let dir = resolve(&root, "/movies").await.unwrap();
        assert_eq!(dir.kind, EntryKind::Directory);
        assert_eq!(dir.url_path, "/movies");
        assert_eq!(dir.extension, None);

        let file = resolve(&root, "/movies/clip.mp4").await.unwrap();
        assert_eq!(file.kind, EntryKind::File);
        assert_eq!(file.extension.as_deref(), Some("mp4"));
        assert_eq!(file.fs_path, root.join("movies/clip.mp4"));
    }

    #[tokio::test]
    async fn root_resolves_to_empty_url_path() {
        let (_guard, root) = fixture().await;
        let entry = resolve(&root, "/").await.unwrap();
        assert_eq!(entry.kind, EntryKind::Directory);
        assert_eq!(entry.url_path, "");
        assert_eq!(entry.fs_path, root);
    }

    #[tokio::test]
    async fn missing_path_is_not_found() {
        let (_guard, root) = fixture().await;
        let err = resolve(&root, "/movies/nope.mkv").await.unwrap_err();
        match err {
            AppError::NotFound { path } => assert!(path.contains("nope.mkv")),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn traversal_is_rejected_before_disk_access() {
        let (_guard, root) = fixture().await;
        for attempt in ["/..", "/../..", "/movies/../../etc/passwd", "/../etc"] {
            let err = resolve(&root, attempt).await.unwrap_err();
            assert!(
                matches!(err, AppError::PathEscape { .. }),
                "{attempt} should escape"
            );
        }
    }

    #[tokio::test]
    async fn dotdot_within_root_is_neutralized() {
        let (_guard, root) = fixture().await;
        // Pops back to the root but never above it.
        let entry = resolve(&root, "/movies/../notes.txt").await.unwrap();
        assert_eq!(entry.kind, EntryKind::File);
        assert_eq!(entry.fs_path, root.join("notes.txt"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlink_escape_is_rejected() {
        let (_guard, root) = fixture().await;
        let outside = TempDir::new().unwrap();
        tokio::fs::write(outside.path().join("secret"), b"x")
            .await
            .unwrap();
        tokio::fs::symlink(outside.path(), root.join("leak"))
            .await
            .unwrap();

        let err = resolve(&root, "/leak/secret").await.unwrap_err();
        assert!(matches!(err, AppError::PathEscape { .. }));
    }

    #[tokio::test]
    async fn resolution_is_idempotent() {
        let (_guard, root) = fixture().await;
        let first = resolve(&root, "/movies/clip.mp4").await.unwrap();
        let second = resolve(&root, "/movies/clip.mp4").await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn extension_case_is_preserved() {
        assert_eq!(
            extension_of(Path::new("Show.MKV")).as_deref(),
            Some("MKV")
        );
        // And the whitelist stays case-sensitive, so this is not playable.
        assert!(!is_playable("MKV"));
        assert!(is_playable("mkv"));
    }

    #[test]
    fn content_type_table() {
        assert_eq!(content_type("mkv"), Some("video/webm"));
        assert_eq!(content_type("mp4"), Some("video/mp4"));
        assert_eq!(content_type("vtt"), Some("text/vtt"));
        assert_eq!(content_type("txt"), None);
    }
}
