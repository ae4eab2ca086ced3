//! File content responses.
//!
//! Conditional-GET validators (`ETag`, `Last-Modified`), single-range
//! requests, and MIME detection from the file extension. Any read
//! failure is logged and answered with a generic 500.

use super::RequestContext;
use crate::http::{self, cache, range::RangeOutcome};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::fs::Metadata;
use std::path::Path;
use tokio::fs;

pub async fn serve_file(
    ctx: &RequestContext,
    fs_path: &Path,
    meta: &Metadata,
) -> Response<Full<Bytes>> {
    let content = match fs::read(fs_path).await {
        Ok(content) => content,
        Err(err) => {
            logger::log_error(&format!("fail to open file {}: {err}.", fs_path.display()));
            return http::build_500_response();
        }
    };

    let modified = meta.modified().ok();
    let last_modified = modified.map(cache::format_http_date);
    let etag = cache::generate_etag(&content);

    // If-None-Match, when present, decides alone; only otherwise does
    // If-Modified-Since apply (RFC 9110 precedence).
    let fresh = match ctx.if_none_match.as_deref() {
        Some(inm) => cache::check_etag_match(Some(inm), &etag),
        None => cache::not_modified_since(ctx.if_modified_since.as_deref(), modified),
    };
    if fresh {
        return http::build_304_response(&etag, last_modified.as_deref());
    }

    let content_type = mime_guess::from_path(fs_path).first_or_octet_stream();
    let total = content.len();

    match crate::http::range::parse_range_header(ctx.range_header.as_deref(), total) {
        RangeOutcome::Valid { start, end } => {
            let body = if ctx.is_head {
                Bytes::new()
            } else {
                Bytes::from(content[start..=end].to_vec())
            };
            http::build_partial_response(
                body,
                content_type.as_ref(),
                &etag,
                last_modified.as_deref(),
                start,
                end,
                total,
            )
        }
        RangeOutcome::NotSatisfiable => http::build_416_response(total),
        RangeOutcome::None => {
            let body = if ctx.is_head {
                Bytes::new()
            } else {
                Bytes::from(content)
            };
            http::build_full_response(
                body,
                total,
                content_type.as_ref(),
                &etag,
                last_modified.as_deref(),
            )
        }
    }
}
