//! Static file resolution and serving.

use crate::config::ServerState;
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::range::RangeOutcome;
use crate::http::{conditional, mime, range, response};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};

/// File names served in place of a listing when present in a directory.
const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Where a request path landed after resolution against the serving root.
enum Resolved {
    /// A regular file to serve.
    File(PathBuf),
    /// A directory to list.
    Directory(PathBuf),
    /// A directory reached without its trailing slash.
    Redirect(String),
    NotFound,
}

/// Serve the request from the state's root directory.
pub async fn serve(state: &ServerState, ctx: &RequestContext) -> Response<Full<Bytes>> {
    match resolve(state, ctx) {
        Resolved::File(path) => respond_file(ctx, &path).await,
        Resolved::Directory(dir) => match listing::render(&dir, &ctx.path) {
            Ok(html) => response::html_page(html, ctx.is_head),
            Err(e) => {
                logger::log_error(&format!("Failed to list {}: {e}", dir.display()));
                response::not_found()
            }
        },
        Resolved::Redirect(location) => response::moved_permanently(&location),
        Resolved::NotFound => response::not_found(),
    }
}

/// Map the decoded request path onto the filesystem.
///
/// Segments are normalized first (empty and `.` dropped, `..` pops without
/// ever climbing past the root), then the candidate is canonicalized and
/// checked against the root so a symlink cannot smuggle a response out of
/// the served tree.
fn resolve(state: &ServerState, ctx: &RequestContext) -> Resolved {
    let candidate = state.root.join(normalize_segments(&ctx.path));

    let Ok(metadata) = std::fs::metadata(&candidate) else {
        return Resolved::NotFound;
    };
    let Ok(canonical) = candidate.canonicalize() else {
        return Resolved::NotFound;
    };
    if !canonical.starts_with(&state.root) {
        logger::log_blocked_traversal(&ctx.path, &canonical);
        return Resolved::NotFound;
    }

    if metadata.is_dir() {
        if !ctx.raw_path.ends_with('/') {
            return Resolved::Redirect(redirect_location(ctx));
        }
        for index in INDEX_FILES {
            if let Ok(index_path) = canonical.join(index).canonicalize() {
                if index_path.starts_with(&state.root) && index_path.is_file() {
                    return Resolved::File(index_path);
                }
            }
        }
        return Resolved::Directory(canonical);
    }

    Resolved::File(canonical)
}

/// Collapse a decoded URL path into a relative filesystem path.
fn normalize_segments(path: &str) -> PathBuf {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.iter().collect()
}

/// The redirect target for a directory requested without its slash,
/// keeping any query string intact.
fn redirect_location(ctx: &RequestContext) -> String {
    match &ctx.query {
        Some(query) => format!("{}/?{query}", ctx.raw_path),
        None => format!("{}/", ctx.raw_path),
    }
}

/// Read a file and answer with 200, 206, 304, or 416 as the request
/// headers dictate. `If-None-Match`, when present, wins over
/// `If-Modified-Since`; a 304 short-circuits any `Range` handling.
async fn respond_file(ctx: &RequestContext, path: &Path) -> Response<Full<Bytes>> {
    let data = match tokio::fs::read(path).await {
        Ok(data) => Bytes::from(data),
        Err(e) => {
            logger::log_error(&format!("Failed to read {}: {e}", path.display()));
            return response::not_found();
        }
    };
    let modified = tokio::fs::metadata(path)
        .await
        .ok()
        .and_then(|meta| meta.modified().ok());

    let etag = conditional::etag(&data);
    if ctx.if_none_match.is_some() {
        if conditional::none_match(ctx.if_none_match.as_deref(), &etag) {
            return response::not_modified(&etag);
        }
    } else if let Some(mtime) = modified {
        if conditional::unmodified_since(ctx.if_modified_since.as_deref(), mtime) {
            return response::not_modified(&etag);
        }
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);
    let content_type = mime::content_type(extension.as_deref());
    let total = data.len() as u64;

    match range::parse(ctx.range.as_deref(), total) {
        RangeOutcome::Unsatisfiable => response::range_not_satisfiable(total),
        RangeOutcome::Satisfiable(r) => {
            let body = data.slice(r.start as usize..=r.end as usize);
            response::partial(body, content_type, &etag, r.start, r.end, total, ctx.is_head)
        }
        RangeOutcome::Ignored => {
            let last_modified = modified.map(conditional::http_date);
            response::ok(data, content_type, &etag, last_modified.as_deref(), ctx.is_head)
        }
    }
}
