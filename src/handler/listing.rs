//! HTML directory listings.

use crate::http::percent;
use std::io;
use std::path::Path;

/// One row of a directory listing.
struct ListingEntry {
    name: String,
    is_dir: bool,
    is_symlink: bool,
}

/// Render an HTML listing of `dir`, titled with the request path.
///
/// Entries are sorted case-insensitively by name. Directories get a
/// trailing `/` and symlinks a trailing `@` on the displayed name; the
/// link target for a directory also carries the slash so the browser
/// requests the canonical form directly.
pub fn render(dir: &Path, request_path: &str) -> io::Result<String> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let file_type = entry.file_type()?;
        entries.push(ListingEntry {
            name,
            is_dir: file_type.is_dir(),
            is_symlink: file_type.is_symlink(),
        });
    }
    entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    let title = format!("Directory listing for {}", escape_html(request_path));
    let mut body = String::new();
    body.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    body.push_str("<meta charset=\"utf-8\">\n");
    body.push_str(&format!("<title>{title}</title>\n"));
    body.push_str("</head>\n<body>\n");
    body.push_str(&format!("<h1>{title}</h1>\n<hr>\n<ul>\n"));

    for entry in &entries {
        let mut display = escape_html(&entry.name);
        let mut href = percent::encode_href(&entry.name);
        if entry.is_dir {
            display.push('/');
            href.push('/');
        } else if entry.is_symlink {
            display.push('@');
        }
        body.push_str(&format!("<li><a href=\"{href}\">{display}</a></li>\n"));
    }

    body.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    Ok(body)
}

/// Escape text for inclusion in HTML element content and attributes.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("tabserve-listing-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_render_sorts_and_marks_directories() {
        let dir = temp_dir("sort");
        fs::write(dir.join("b.txt"), b"b").unwrap();
        fs::write(dir.join("A.txt"), b"a").unwrap();
        fs::create_dir(dir.join("sub")).unwrap();

        let html = render(&dir, "/").unwrap();
        assert!(html.contains("Directory listing for /"));

        let a = html.find("A.txt").unwrap();
        let b = html.find("b.txt").unwrap();
        let s = html.find("sub/").unwrap();
        assert!(a < b, "case-insensitive order puts A.txt before b.txt");
        assert!(b < s);
        assert!(html.contains("<a href=\"sub/\">sub/</a>"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_render_escapes_names_and_encodes_hrefs() {
        let dir = temp_dir("escape");
        fs::write(dir.join("a<b>.txt"), b"x").unwrap();
        fs::write(dir.join("with space.txt"), b"x").unwrap();

        let html = render(&dir, "/<dir>/").unwrap();
        assert!(html.contains("Directory listing for /&lt;dir&gt;/"));
        assert!(html.contains("a&lt;b&gt;.txt"));
        assert!(!html.contains("<b>.txt"));
        assert!(html.contains("href=\"with%20space.txt\""));

        let _ = fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn test_render_marks_symlinks() {
        let dir = temp_dir("symlink");
        fs::write(dir.join("target.txt"), b"x").unwrap();
        std::os::unix::fs::symlink(dir.join("target.txt"), dir.join("link")).unwrap();

        let html = render(&dir, "/").unwrap();
        assert!(html.contains(">link@</a>"));
        assert!(html.contains("href=\"link\""));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_render_missing_dir_is_error() {
        let dir = std::env::temp_dir().join("tabserve-listing-definitely-missing");
        assert!(render(&dir, "/").is_err());
    }
}
