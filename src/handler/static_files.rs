//! Static file serving module
//!
//! Maps a request path onto the served root and loads the file, an index page or a
//! generated directory listing. Nothing outside the root is ever read.

use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Outcome of mapping a request path onto the root
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution {
    File(PathBuf),
    /// Directory without an index file
    Listing(PathBuf),
    /// Directory requested without its trailing slash
    Redirect(String),
    NotFound,
    Forbidden,
}

/// Serve `path` (raw URI path) from `root`
pub async fn serve(
    root: &Path,
    path: &str,
    query: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    match resolve(root, path).await {
        Resolution::File(file) => serve_file(&file, is_head).await,
        Resolution::Listing(dir) => match render_listing(&dir, path).await {
            Ok(html) => http::build_html_response(html, is_head),
            Err(e) => io_error_response(&dir, &e),
        },
        Resolution::Redirect(location) => {
            let target = match query {
                Some(q) => format!("{location}?{q}"),
                None => location,
            };
            http::build_redirect_response(&target)
        }
        Resolution::NotFound => http::build_404_response(),
        Resolution::Forbidden => http::build_403_response(),
    }
}

/// Resolve a raw request path against the canonical `root`
pub async fn resolve(root: &Path, raw_path: &str) -> Resolution {
    let decoded = percent_decode(raw_path);

    let Some(relative) = sanitize(&decoded) else {
        logger::log_warning(&format!("Path traversal attempt blocked: {raw_path}"));
        return Resolution::Forbidden;
    };

    let candidate = root.join(&relative);
    let metadata = match fs::metadata(&candidate).await {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => return Resolution::Forbidden,
        // File not found is common (404), no need to log
        Err(_) => return Resolution::NotFound,
    };

    // Symlinks may point anywhere; only their targets inside the root are served
    match fs::canonicalize(&candidate).await {
        Ok(real) if real.starts_with(root) => {}
        Ok(real) => {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {} -> {}",
                raw_path,
                real.display()
            ));
            return Resolution::Forbidden;
        }
        Err(_) => return Resolution::NotFound,
    }

    if !metadata.is_dir() {
        // "/index.html/" names a directory that does not exist
        if raw_path.ends_with('/') {
            return Resolution::NotFound;
        }
        return Resolution::File(candidate);
    }

    if !raw_path.ends_with('/') {
        return Resolution::Redirect(directory_location(&relative));
    }

    for index in INDEX_FILES {
        let index_path = candidate.join(index);
        if fs::metadata(&index_path).await.is_ok_and(|m| m.is_file()) {
            return Resolution::File(index_path);
        }
    }

    Resolution::Listing(candidate)
}

/// Turn a decoded URL path into a root-relative path
///
/// Returns `None` when the path tries to leave the root.
fn sanitize(decoded: &str) -> Option<PathBuf> {
    if decoded.contains('\0') {
        return None;
    }

    let mut relative = PathBuf::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            s if s.contains('\\') || (cfg!(windows) && s.contains(':')) => return None,
            s => relative.push(s),
        }
    }
    Some(relative)
}

/// `Location` for a root-relative directory, always of the form `/a/b/`
///
/// Built from the sanitized segments, so repeated leading slashes in the request
/// never reach the header.
fn directory_location(relative: &Path) -> String {
    let mut location = String::from("/");
    for segment in relative {
        location.push_str(&encode_segment(&segment.to_string_lossy()));
        location.push('/');
    }
    location
}

/// Decode `%XX` escapes; malformed escapes are kept as typed
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

async fn serve_file(path: &Path, is_head: bool) -> Response<Full<Bytes>> {
    match fs::read(path).await {
        Ok(content) => {
            let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));
            http::build_file_response(Bytes::from(content), content_type, is_head)
        }
        Err(e) => io_error_response(path, &e),
    }
}

fn io_error_response(path: &Path, err: &io::Error) -> Response<Full<Bytes>> {
    match err.kind() {
        io::ErrorKind::NotFound => http::build_404_response(),
        io::ErrorKind::PermissionDenied => http::build_403_response(),
        _ => {
            logger::log_error(&format!("Failed to read '{}': {}", path.display(), err));
            http::build_404_response()
        }
    }
}

/// Build the HTML index of a directory
async fn render_listing(dir: &Path, request_path: &str) -> io::Result<String> {
    let mut entries = Vec::new();
    let mut reader = fs::read_dir(dir).await?;
    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry.file_type().await.is_ok_and(|t| t.is_dir());
        entries.push((name, is_dir));
    }
    entries.sort_by_key(|(name, _)| name.to_lowercase());

    let title = format!("Directory listing for {}", escape_html(&percent_decode(request_path)));
    let mut html = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"
    );
    for (name, is_dir) in entries {
        let suffix = if is_dir { "/" } else { "" };
        html.push_str(&format!(
            "<li><a href=\"{}{suffix}\">{}{suffix}</a></li>\n",
            encode_segment(&name),
            escape_html(&name)
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    Ok(html)
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Percent-encode a file name for use as a relative link
fn encode_segment(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for b in name.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
            out.push(char::from(b));
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}
