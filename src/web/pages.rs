//! Pure HTML renderers. Every function here turns already-classified data
//! into a page string; none of them touch the filesystem or the network.

use crate::listing::{ListedKind, ListingEntry};
use crate::net::InterfaceAddresses;
use crate::resolve;
use crate::subtitles::SubtitleTrack;

const DIRECTORY_ICON: &str = r##"<svg x="0px" y="0px" focusable="false" viewBox="0 0 24 24" height="24px" width="24px" fill="#5f6368"><g><path d="M10 4H4c-1.1 0-1.99.9-1.99 2L2 18c0 1.1.9 2 2 2h16c1.1 0 2-.9 2-2V8c0-1.1-.9-2-2-2h-8l-2-2z"></path><path d="M0 0h24v24H0z" fill="none"></path></g></svg>"##;

const VIDEO_ICON: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" height="24px" viewBox="0 0 24 24" width="24px" fill="#5f6368"><path d="M0 0h24v24H0z" fill="none"/><path d="M12 2C6.48 2 2 6.48 2 12s4.48 10 10 10 10-4.48 10-10S17.52 2 12 2zm-2 14.5v-9l6 4.5-6 4.5z"/></svg>"##;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 1.5rem; background: #fafafa; color: #202124; }
#main { max-width: 48rem; margin: 0 auto; }
.file-link a { display: flex; align-items: center; gap: .5rem; padding: .3rem 0; color: #1a73e8; text-decoration: none; }
.file-link a:hover { text-decoration: underline; }
video { width: 100%; }
h2 { font-weight: normal; }
"#;

/// HTML escape helper for user-controlled names and paths.
fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + s.len() / 4);
    for ch in s.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            c => result.push(c),
        }
    }
    result
}

/// Wrap a body fragment in the shared page shell.
fn page(fragment: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <style>{STYLE}</style>\n\
         <title>WatchDir</title>\n\
         </head>\n\
         <body>\n\
         <div id=\"main\">{fragment}</div>\n\
         </body>\n\
         </html>\n"
    )
}

/// Render a directory listing.
///
/// The root directory is labelled with a bare "/" (its URL prefix is empty),
/// never a literal "." marker. Entries render in the order given; `Other`
/// children contribute nothing visible.
pub fn listing_page(url_path: &str, entries: &[ListingEntry]) -> String {
    let shown = if url_path.is_empty() { "/" } else { url_path };
    let mut fragment = format!("<p>path: {}</p>", html_escape(shown));

    for entry in entries {
        match entry.kind {
            ListedKind::Directory => {
                fragment.push_str(&format!(
                    "\n<div class=\"file-link\"><a href=\"{}\">{}<span>{}</span></a></div>",
                    html_escape(&entry.url_path),
                    DIRECTORY_ICON,
                    html_escape(&entry.name),
                ));
            }
            ListedKind::PlayableMedia => {
                let extension = entry.extension.as_deref().unwrap_or_default();
                fragment.push_str(&format!(
                    "\n<div class=\"file-link\"><a href=\"{}?viewer=yes&amp;ext={}\">{}<span>{}</span></a></div>",
                    html_escape(&entry.url_path),
                    html_escape(extension),
                    VIDEO_ICON,
                    html_escape(&entry.name),
                ));
            }
            ListedKind::Other => {}
        }
    }

    page(&fragment)
}

/// What the viewer page needs to know about the file it plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDescriptor {
    pub url_path: String,
    pub extension: String,
}

/// Render the player page, or a visible "not supported" notice when the
/// extension is outside the playable set. Never an error page.
pub fn viewer_page(media: &MediaDescriptor, tracks: &[SubtitleTrack]) -> String {
    if !resolve::is_playable(&media.extension) {
        return page(&format!(
            "File not supported!<br>{}",
            html_escape(&media.url_path)
        ));
    }

    let content_type = resolve::content_type(&media.extension).unwrap_or_default();
    let mut fragment = format!(
        "<video controls autoplay>\n<source src=\"{}\" type=\"{}\">\n",
        html_escape(&media.url_path),
        content_type,
    );
    for track in tracks {
        fragment.push_str(&format!(
            "<track label=\"{}\" kind=\"subtitles\" srclang=\"{}\" src=\"{}\"{}>\n",
            track.label,
            track.language,
            html_escape(&track.file_name),
            if track.is_default { " default" } else { "" },
        ));
    }
    fragment.push_str("Sorry, your browser doesn't support embedded videos.\n</video>");

    page(&fragment)
}

/// Render the address-listing page: one heading per reachable address, with
/// the `:port` suffix left off for plain port 80.
pub fn networks_page(
    scheme: &str,
    server_name: &str,
    port: u16,
    interfaces: &[InterfaceAddresses],
) -> String {
    let port_suffix = if port == 80 {
        String::new()
    } else {
        format!(":{port}")
    };

    let mut fragment = format!(
        "<h1>{} can be accessed from the following addresses:</h1>",
        html_escape(server_name)
    );
    for interface in interfaces {
        for address in &interface.addresses {
            let url = format!("{scheme}://{address}{port_suffix}");
            fragment.push_str(&format!(
                "\n<h2>{}: <a href=\"{url}\">{url}</a></h2>",
                html_escape(&interface.name),
            ));
        }
    }

    page(&fragment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn entry(name: &str, kind: ListedKind, extension: Option<&str>) -> ListingEntry {
        ListingEntry {
            name: name.to_string(),
            url_path: format!("/{name}"),
            kind,
            extension: extension.map(str::to_string),
        }
    }

    #[test]
    fn root_listing_shows_slash_not_dot() {
        let html = listing_page("", &[]);
        assert!(html.contains("<p>path: /</p>"));
        assert!(!html.contains("path: ."));
    }

    #[test]
    fn other_entries_are_invisible() {
        let entries = vec![
            entry("season1", ListedKind::Directory, None),
            entry("ep1.mkv", ListedKind::PlayableMedia, Some("mkv")),
            entry("ep1-ro.vtt", ListedKind::Other, Some("vtt")),
        ];
        let html = listing_page("", &entries);
        assert!(html.contains("season1"));
        assert!(html.contains("/ep1.mkv?viewer=yes&amp;ext=mkv"));
        assert!(!html.contains("ep1-ro.vtt"));
    }

    #[test]
    fn names_are_escaped() {
        let entries = vec![entry("a<b>.mkv", ListedKind::PlayableMedia, Some("mkv"))];
        let html = listing_page("", &entries);
        assert!(html.contains("a&lt;b&gt;.mkv"));
        assert!(!html.contains("<span>a<b>"));
    }

    #[test]
    fn viewer_marks_the_default_track() {
        let media = MediaDescriptor {
            url_path: "/Show Ep1.mkv".to_string(),
            extension: "mkv".to_string(),
        };
        let tracks = vec![
            SubtitleTrack {
                language: "ro",
                label: "Romanian",
                file_name: "ShowsEp1-ro.vtt".to_string(),
                is_default: true,
            },
            SubtitleTrack {
                language: "en",
                label: "English",
                file_name: "ShowsEp1-en.vtt".to_string(),
                is_default: false,
            },
        ];
        let html = viewer_page(&media, &tracks);
        assert!(html.contains("type=\"video/webm\""));
        assert!(html.contains("src=\"ShowsEp1-ro.vtt\" default"));
        assert!(html.contains("src=\"ShowsEp1-en.vtt\">"));
    }

    #[test]
    fn viewer_reports_unsupported_extensions() {
        let media = MediaDescriptor {
            url_path: "/notes.txt".to_string(),
            extension: "txt".to_string(),
        };
        let html = viewer_page(&media, &[]);
        assert!(html.contains("File not supported!"));
        assert!(!html.contains("<video"));
    }

    #[test]
    fn networks_page_omits_port_80() {
        let interfaces = vec![InterfaceAddresses {
            name: "en0".to_string(),
            addresses: vec![Ipv4Addr::new(192, 168, 1, 5)],
        }];
        let html = networks_page("http", "WatchDir", 80, &interfaces);
        assert!(html.contains("http://192.168.1.5\""));
        assert!(!html.contains(":80"));

        let html = networks_page("http", "WatchDir", 3000, &interfaces);
        assert!(html.contains("http://192.168.1.5:3000"));
    }
}
