//! Request routing: method gate, path decoding, dispatch, access logging.

use crate::config::ServerState;
use crate::handler::static_files;
use crate::http::{percent, response};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Everything the file handler needs from a request, extracted up front.
pub struct RequestContext {
    /// Percent-decoded request path.
    pub path: String,
    /// The path exactly as the client sent it, still encoded.
    pub raw_path: String,
    /// Query string without the leading `?`.
    pub query: Option<String>,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
    pub range: Option<String>,
}

/// Handle one request end to end.
///
/// Never fails: unsupported methods become 405, undecodable paths 400, and
/// everything else is answered by the file handler, so the connection always
/// gets a response. The request body is never read, hence the unconstrained
/// body type.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<ServerState>,
    peer: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let method = req.method().clone();
    let raw_path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);

    let response = if method == Method::GET || method == Method::HEAD {
        match percent::decode(&raw_path) {
            Some(path) => {
                let ctx = RequestContext {
                    path,
                    raw_path: raw_path.clone(),
                    query: query.clone(),
                    is_head: method == Method::HEAD,
                    if_none_match: header_string(&req, "if-none-match"),
                    if_modified_since: header_string(&req, "if-modified-since"),
                    range: header_string(&req, "range"),
                };
                static_files::serve(&state, &ctx).await
            }
            None => response::bad_request("request path is not valid UTF-8"),
        }
    } else {
        response::method_not_allowed()
    };

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(peer.ip().to_string(), method.to_string(), raw_path);
        entry.query = query;
        entry.http_version = version_label(req.version());
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0) as usize;
        entry.referer = header_string(&req, "referer");
        entry.user_agent = header_string(&req, "user-agent");
        entry.request_time_us = started.elapsed().as_micros() as u64;
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn header_string<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2.0",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::fs;
    use std::path::PathBuf;

    fn temp_root(tag: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("tabserve-router-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn state_for(root: &std::path::Path) -> Arc<ServerState> {
        Arc::new(ServerState::with_root(&Config::default(), root).unwrap())
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    fn request(method: &str, uri: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_serves_file() {
        let root = temp_root("get");
        fs::write(root.join("a.txt"), b"abc").unwrap();

        let resp = handle_request(request("GET", "/a.txt"), state_for(&root), peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Length"], "3");

        let _ = fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_post_is_method_not_allowed() {
        let root = temp_root("post");
        fs::write(root.join("a.txt"), b"abc").unwrap();

        let resp = handle_request(request("POST", "/a.txt"), state_for(&root), peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers()["Allow"], "GET, HEAD");

        let _ = fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_undecodable_path_is_bad_request() {
        let root = temp_root("badpath");

        let resp = handle_request(request("GET", "/%ff%fe"), state_for(&root), peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);

        let _ = fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_encoded_path_reaches_file() {
        let root = temp_root("encoded");
        fs::write(root.join("my file.txt"), b"spaced").unwrap();

        let resp = handle_request(request("GET", "/my%20file.txt"), state_for(&root), peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Length"], "6");

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_version_label() {
        assert_eq!(version_label(Version::HTTP_10), "1.0");
        assert_eq!(version_label(Version::HTTP_11), "1.1");
        assert_eq!(version_label(Version::HTTP_2), "2.0");
    }
}
