//! Per-request pipeline.
//!
//! Every request flows through the same steps: access check against
//! the configured scope, a stat of the mapped filesystem path, then
//! dispatch to the directory listing renderer or the file responder.
//! The entry point also observes the final status for the access log.

mod listing;
mod static_files;

use crate::config::ServeConfig;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::io::ErrorKind;
use std::net::IpAddr;
use std::path::{Component, Path, PathBuf};

/// Request fields the pipeline cares about, extracted up front so the
/// rest of the handler does not depend on the hyper request type.
pub struct RequestContext {
    /// Percent-decoded URL path, always starting with `/`.
    pub path: String,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
    pub range_header: Option<String>,
}

/// Entry point bound into the connection service.
///
/// Wraps the pipeline with the access-log observer: whatever response
/// comes back, its status is logged as `[<client-ip>] <status> <path>`
/// before the response is handed to hyper.
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    cfg: &ServeConfig,
    client: IpAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };
    let ctx = RequestContext {
        path: percent_decode(req.uri().path()),
        is_head: req.method() == Method::HEAD,
        if_none_match: header("if-none-match"),
        if_modified_since: header("if-modified-since"),
        range_header: header("range"),
    };

    let response = if req.method() == Method::GET || req.method() == Method::HEAD {
        respond(&ctx, cfg).await
    } else {
        http::build_405_response()
    };

    logger::log_access(client, response.status(), &ctx.path);
    Ok(response)
}

/// Core pipeline, separated from the hyper request type so tests can
/// drive it directly.
pub async fn respond(ctx: &RequestContext, cfg: &ServeConfig) -> Response<Full<Bytes>> {
    if !cfg.scope.allows(&ctx.path) {
        return http::build_404_response();
    }

    let Some(fs_path) = map_to_fs_path(&cfg.root_dir, &ctx.path) else {
        return http::build_404_response();
    };

    let meta = match tokio::fs::metadata(&fs_path).await {
        Ok(meta) => meta,
        Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
            return http::build_404_response();
        }
        Err(err) => {
            logger::log_error(&format!("fail to stat file {}: {err}.", fs_path.display()));
            return http::build_500_response();
        }
    };

    if meta.is_dir() {
        listing::serve_directory(ctx, cfg, &fs_path).await
    } else {
        static_files::serve_file(ctx, &fs_path, &meta).await
    }
}

/// Map the request path onto the serve root.
///
/// `.` and `..` segments are resolved lexically before the join, with
/// `..` clamped at the root, so the mapped path can never climb out of
/// `root_dir`.
fn map_to_fs_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for component in Path::new(request_path).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::ParentDir => {
                clean.pop();
            }
            Component::RootDir | Component::CurDir => {}
            Component::Prefix(_) => return None,
        }
    }
    Some(root.join(clean))
}

/// Decode `%XX` escapes in the request path.
///
/// Invalid escapes pass through literally; invalid UTF-8 is replaced
/// rather than rejected.
fn percent_decode(path: &str) -> String {
    fn hex_val(b: u8) -> Option<u8> {
        match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(b - b'a' + 10),
            b'A'..=b'F' => Some(b - b'A' + 10),
            _ => None,
        }
    }

    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
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
