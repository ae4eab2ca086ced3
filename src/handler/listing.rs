//! Directory listing pages.
//!
//! Renders an HTML index titled with the request path, one link per
//! entry. In single-file mode the listing shows exactly the one
//! permitted file; in serve-everything mode it shows the directory's
//! direct children plus a parent link everywhere except the root.

use super::RequestContext;
use crate::config::{ServeConfig, ServeScope};
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;

pub async fn serve_directory(
    ctx: &RequestContext,
    cfg: &ServeConfig,
    fs_path: &Path,
) -> Response<Full<Bytes>> {
    let entries = match &cfg.scope {
        ServeScope::SingleFile(name) => vec![name.clone()],
        ServeScope::Everything => match read_entries(fs_path, &ctx.path).await {
            Ok(entries) => entries,
            Err(err) => {
                logger::log_error(&format!(
                    "fail to list files {}: {err}.",
                    fs_path.display()
                ));
                return http::build_500_response();
            }
        },
    };

    http::build_html_response(render(&ctx.path, &entries), ctx.is_head)
}

/// Direct children of `dir`, sorted by name, with a `..` entry first
/// unless the request path is the root.
async fn read_entries(dir: &Path, request_path: &str) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    let mut reader = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = reader.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();

    if request_path != "/" {
        names.insert(0, "..".to_string());
    }
    Ok(names)
}

fn render(request_path: &str, entries: &[String]) -> String {
    let mut links = String::new();
    for name in entries {
        let href = join_href(request_path, name);
        links.push_str(&format!("<a href=\"{href}\">{name}</a><br>\n"));
    }

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n    \
         <meta charset=\"UTF-8\">\n    \
         <title>{request_path}</title>\n\
         </head>\n\
         <body>\n\
         <h1>Index of {request_path}</h1>\n\
         <hr>\n\
         <p>\n\
         {links}</p>\n\
         </body>\n\
         </html>"
    )
}

/// Join an entry name onto the request path with filesystem-join
/// semantics, so the parent link of `/sub` points at `/`.
fn join_href(base: &str, name: &str) -> String {
    let mut parts: Vec<&str> = base
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect();
    match name {
        ".." => {
            parts.pop();
        }
        "." => {}
        _ => parts.push(name),
    }

    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}
