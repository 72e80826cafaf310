//! HTTP response builders.
//!
//! Free functions producing complete responses so handler code never touches
//! status codes or header assembly inline. Builder failures cannot really
//! happen with these fixed headers, but each builder still falls back to a
//! logged bare response instead of panicking.

use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// `Server` header value sent with every response.
pub const SERVER_NAME: &str = concat!("tabserve/", env!("CARGO_PKG_VERSION"));

/// 200 OK with a file body and revalidation headers.
pub fn ok(
    data: Bytes,
    content_type: &str,
    etag: &str,
    last_modified: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    let mut builder = Response::builder()
        .status(200)
        .header("Server", SERVER_NAME)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Accept-Ranges", "bytes")
        .header("ETag", etag);
    if let Some(modified) = last_modified {
        builder = builder.header("Last-Modified", modified);
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// 206 Partial Content for a satisfiable byte range.
pub fn partial(
    data: Bytes,
    content_type: &str,
    etag: &str,
    start: u64,
    end: u64,
    total: u64,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = end - start + 1;
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(206)
        .header("Server", SERVER_NAME)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Content-Range", format!("bytes {start}-{end}/{total}"))
        .header("Accept-Ranges", "bytes")
        .header("ETag", etag)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("206", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// 304 Not Modified for a successful revalidation.
pub fn not_modified(etag: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(304)
        .header("Server", SERVER_NAME)
        .header("ETag", etag)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// 301 redirect, used for directory URLs missing their trailing slash.
pub fn moved_permanently(location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(301)
        .header("Server", SERVER_NAME)
        .header("Location", location)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from("Moved Permanently")))
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// 200 OK carrying generated HTML (the directory listing).
pub fn html_page(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(200)
        .header("Server", SERVER_NAME)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// 400 Bad Request, for paths the server cannot interpret.
pub fn bad_request(message: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(400)
        .header("Server", SERVER_NAME)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(format!("400 Bad Request: {message}"))))
        .unwrap_or_else(|e| {
            log_build_error("400", &e);
            Response::new(Full::new(Bytes::from("400 Bad Request")))
        })
}

/// 404 Not Found.
pub fn not_found() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Server", SERVER_NAME)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from("404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("404 Not Found")))
        })
}

/// 405 Method Not Allowed; only GET and HEAD are served.
pub fn method_not_allowed() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Server", SERVER_NAME)
        .header("Allow", "GET, HEAD")
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// 416 Range Not Satisfiable with the total size the client may retry with.
pub fn range_not_satisfiable(total: u64) -> Response<Full<Bytes>> {
    Response::builder()
        .status(416)
        .header("Server", SERVER_NAME)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Range", format!("bytes */{total}"))
        .body(Full::new(Bytes::from("416 Range Not Satisfiable")))
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            Response::new(Full::new(Bytes::from("416 Range Not Satisfiable")))
        })
}

fn log_build_error(status: &str, error: &hyper::http::Error) {
    logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_headers_and_body() {
        let resp = ok(
            Bytes::from_static(b"hello"),
            "text/plain; charset=utf-8",
            "\"abc\"",
            Some("Thu, 01 Jan 1970 00:00:00 GMT"),
            false,
        );
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Length"], "5");
        assert_eq!(resp.headers()["ETag"], "\"abc\"");
        assert_eq!(
            resp.headers()["Last-Modified"],
            "Thu, 01 Jan 1970 00:00:00 GMT"
        );
        assert_eq!(resp.headers()["Accept-Ranges"], "bytes");
    }

    #[test]
    fn test_head_keeps_length_drops_body() {
        use hyper::body::Body;
        let resp = ok(Bytes::from_static(b"hello"), "text/plain", "\"x\"", None, true);
        assert_eq!(resp.headers()["Content-Length"], "5");
        assert_eq!(resp.body().size_hint().exact(), Some(0));
    }

    #[test]
    fn test_partial_content_range() {
        let resp = partial(
            Bytes::from_static(b"cde"),
            "application/octet-stream",
            "\"x\"",
            2,
            4,
            10,
            false,
        );
        assert_eq!(resp.status(), 206);
        assert_eq!(resp.headers()["Content-Range"], "bytes 2-4/10");
        assert_eq!(resp.headers()["Content-Length"], "3");
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(not_found().status(), 404);
        assert_eq!(bad_request("nope").status(), 400);
        assert_eq!(method_not_allowed().status(), 405);
        assert_eq!(method_not_allowed().headers()["Allow"], "GET, HEAD");
        let resp = range_not_satisfiable(10);
        assert_eq!(resp.status(), 416);
        assert_eq!(resp.headers()["Content-Range"], "bytes */10");
    }

    #[test]
    fn test_redirect_location() {
        let resp = moved_permanently("/docs/");
        assert_eq!(resp.status(), 301);
        assert_eq!(resp.headers()["Location"], "/docs/");
    }
}
