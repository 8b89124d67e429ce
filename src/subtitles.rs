use crate::error::AppError;
use regex::Regex;
use std::path::Path;

/// Recognized subtitle languages, in (code, display label) form. "ro" is the
/// one marked default when present.
pub const LANGUAGES: &[(&str, &str)] = &[("ro", "Romanian"), ("en", "English")];

/// A companion subtitle found next to a media file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleTrack {
    pub language: &'static str,
    pub label: &'static str,
    /// Bare file name; resolves as a sibling URL of the media file.
    pub file_name: String,
    pub is_default: bool,
}

/// Find companion `.vtt` tracks for a media file.
///
/// Companions live in the media file's own directory (non-recursive) and are
/// named `<stem>-<lang>.vtt`, where `<stem>` is the media base name without
/// its extension and with every space turned into a literal `s`. The space
/// substitution is a compatibility rule existing libraries rely on; it must
/// not be normalized away.
///
/// Tracks come back in directory-enumeration order, not language order. No
/// companions is an empty result; an unreadable directory is an error, so
/// callers can tell "no captions" from "could not look".
pub async fn find_subtitles(media_path: &Path) -> Result<Vec<SubtitleTrack>, AppError> {
    let stem = media_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let pattern = companion_pattern(&stem);

    let dir = match media_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let enumeration_error = |source| AppError::Enumeration {
        path: dir.display().to_string(),
        source,
    };

    let mut read_dir = tokio::fs::read_dir(dir).await.map_err(enumeration_error)?;

    let mut tracks = Vec::new();
    while let Some(entry) = read_dir.next_entry().await.map_err(enumeration_error)? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(captures) = pattern.captures(&name) else {
            continue;
        };
        let code = &captures["lang"];
        if let Some(&(language, label)) = LANGUAGES.iter().find(|(c, _)| *c == code) {
            tracks.push(SubtitleTrack {
                language,
                label,
                file_name: name,
                is_default: language == "ro",
            });
        }
    }

    Ok(tracks)
}

/// Build the companion-name pattern for a media stem.
fn companion_pattern(stem: &str) -> Regex {
    let transformed = stem.replace(' ', "s");
    let codes = LANGUAGES
        .iter()
        .map(|(code, _)| *code)
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        "^{}-(?P<lang>{})\\.vtt$",
        regex::escape(&transformed),
        codes
    ))
    .expect("escaped stem always forms a valid pattern")
}
