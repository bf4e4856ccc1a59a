//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, static file dispatch,
//! then the development header middleware and access logging on the way out.

use crate::config::ServerSettings;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<ServerSettings>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let query = req.uri().query().map(ToOwned::to_owned);
    let target = req
        .uri()
        .path_and_query()
        .map_or_else(|| path.clone(), ToString::to_string);
    drop(req);

    let mut response = dispatch(&method, &path, query.as_deref(), &state).await;
    http::apply_dev_headers(&mut response, &path);

    if let Some(entry) = access_entry(&state, peer_addr, &method, target, &response, started) {
        logger::log_access(&entry, state.access_log_format);
    }

    Ok(response)
}

/// Access line for a finished request, `None` when access logging is off
fn access_entry(
    state: &ServerSettings,
    peer_addr: SocketAddr,
    method: &Method,
    target: String,
    response: &Response<Full<Bytes>>,
    started: Instant,
) -> Option<AccessLogEntry> {
    if !state.access_log {
        return None;
    }
    let mut entry = AccessLogEntry::new(
        peer_addr,
        method.to_string(),
        target,
        response.status().as_u16(),
    );
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    Some(entry)
}

/// Pick the response for a method/path pair before headers are applied
async fn dispatch(
    method: &Method,
    path: &str,
    query: Option<&str>,
    state: &ServerSettings,
) -> Response<Full<Bytes>> {
    match *method {
        Method::GET => static_files::serve(&state.root, path, query, false).await,
        Method::HEAD => static_files::serve(&state.root, path, query, true).await,
        Method::OPTIONS => http::build_options_response(),
        // Read-only server: POST and friends have nothing to act on
        _ => http::build_501_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use tempfile::TempDir;

    const INDEX: &str = "<!DOCTYPE html><h1>viewer</h1>";
    const WASM: &[u8] = b"\0asm\x01\0\0\0";

    fn setup() -> (TempDir, Arc<ServerSettings>) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), INDEX).unwrap();
        std::fs::write(dir.path().join("demo.html"), "<p>demo</p>").unwrap();
        std::fs::create_dir_all(dir.path().join("pkg")).unwrap();
        std::fs::write(dir.path().join("pkg/msx2_processor_bg.wasm"), WASM).unwrap();
        std::fs::write(dir.path().join("pkg/msx2_processor.js"), "export default 1;").unwrap();
        std::fs::write(dir.path().join("style.css"), "body{}").unwrap();
        let settings = Arc::new(ServerSettings::for_root(dir.path()));
        (dir, settings)
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    async fn send(state: &Arc<ServerSettings>, method: Method, uri: &str) -> Response<Full<Bytes>> {
        let req = Request::builder().method(method).uri(uri).body(()).unwrap();
        handle_request(req, Arc::clone(state), peer()).await.unwrap()
    }

    async fn body_bytes(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    fn assert_dev_headers(resp: &Response<Full<Bytes>>) {
        let headers = resp.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
        assert_eq!(headers["access-control-allow-headers"], "Content-Type");
        assert_eq!(headers["cross-origin-opener-policy"], "same-origin");
        assert_eq!(headers["cross-origin-embedder-policy"], "require-corp");
        assert_eq!(headers["cache-control"], "no-cache, no-store, must-revalidate");
    }

    #[tokio::test]
    async fn test_root_serves_index() {
        let (_dir, state) = setup();
        let resp = send(&state, Method::GET, "/").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "text/html; charset=utf-8");
        assert_dev_headers(&resp);
        assert_eq!(body_bytes(resp).await, INDEX.as_bytes());
    }

    #[tokio::test]
    async fn test_wasm_served_byte_for_byte() {
        let (_dir, state) = setup();
        let resp = send(&state, Method::GET, "/pkg/msx2_processor_bg.wasm").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "application/wasm");
        assert_dev_headers(&resp);
        assert_eq!(body_bytes(resp).await, WASM);
    }

    #[tokio::test]
    async fn test_content_type_overrides() {
        let (_dir, state) = setup();
        let js = send(&state, Method::GET, "/pkg/msx2_processor.js").await;
        assert_eq!(js.headers()["content-type"], "application/javascript");
        let html = send(&state, Method::GET, "/demo.html").await;
        assert_eq!(html.headers()["content-type"], "text/html; charset=utf-8");
        let css = send(&state, Method::GET, "/style.css").await;
        assert_eq!(css.headers()["content-type"], "text/css");
    }

    #[tokio::test]
    async fn test_query_string_does_not_defeat_override() {
        let (_dir, state) = setup();
        let resp = send(&state, Method::GET, "/pkg/msx2_processor_bg.wasm?v=3").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "application/wasm");
    }

    #[tokio::test]
    async fn test_not_found_still_has_headers() {
        let (_dir, state) = setup();
        let resp = send(&state, Method::GET, "/missing.wasm").await;
        assert_eq!(resp.status(), 404);
        assert_dev_headers(&resp);
        assert_eq!(resp.headers()["content-type"], "application/wasm");
    }

    #[tokio::test]
    async fn test_traversal_is_client_error() {
        let (_dir, state) = setup();
        let resp = send(&state, Method::GET, "/%2e%2e/%2e%2e/etc/passwd").await;
        assert_eq!(resp.status(), 403);
        assert_dev_headers(&resp);
    }

    #[tokio::test]
    async fn test_directory_redirect_and_listing() {
        let (_dir, state) = setup();
        let resp = send(&state, Method::GET, "/pkg").await;
        assert_eq!(resp.status(), 301);
        assert_eq!(resp.headers()["location"], "/pkg/");
        assert_dev_headers(&resp);

        let resp = send(&state, Method::GET, "/pkg/").await;
        assert_eq!(resp.status(), 200);
        let body = body_bytes(resp).await;
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("msx2_processor_bg.wasm"));
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let (_dir, state) = setup();
        let resp = send(&state, Method::HEAD, "/index.html").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-length"], INDEX.len().to_string().as_str());
        assert_dev_headers(&resp);
        assert!(body_bytes(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_options_preflight() {
        let (_dir, state) = setup();
        let resp = send(&state, Method::OPTIONS, "/pkg/msx2_processor_bg.wasm").await;
        assert_eq!(resp.status(), 204);
        assert_dev_headers(&resp);
    }

    #[tokio::test]
    async fn test_post_not_implemented() {
        let (_dir, state) = setup();
        let resp = send(&state, Method::POST, "/index.html").await;
        assert_eq!(resp.status(), 501);
        assert_dev_headers(&resp);
        // Nothing was written to the served tree
        assert_eq!(
            std::fs::read_to_string(state.root.join("index.html")).unwrap(),
            INDEX
        );
    }

    #[tokio::test]
    async fn test_access_line_follows_setting() {
        let (_dir, state) = setup();
        let resp = send(&state, Method::GET, "/pkg/msx2_processor_bg.wasm?v=3").await;

        // `for_root` settings have access logging switched off
        assert!(!state.access_log);
        let target = "/pkg/msx2_processor_bg.wasm?v=3".to_string();
        let silent = access_entry(&state, peer(), &Method::GET, target.clone(), &resp, Instant::now());
        assert!(silent.is_none());

        let mut logging = ServerSettings::for_root(&state.root);
        logging.access_log = true;
        let entry = access_entry(&logging, peer(), &Method::GET, target, &resp, Instant::now())
            .unwrap();
        assert_eq!(entry.status, 200);
        assert_eq!(entry.method, "GET");
        assert_eq!(entry.path, "/pkg/msx2_processor_bg.wasm?v=3");
        assert_eq!(entry.body_bytes, WASM.len() as u64);
    }
}
