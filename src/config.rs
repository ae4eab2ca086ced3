//! Startup configuration.
//!
//! The serve root is resolved exactly once, before the listener binds.
//! The resulting [`ServeConfig`] is immutable and shared by reference
//! into every request, so the handlers need no synchronization.

use crate::error::StartupError;
use std::env;
use std::fs;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Process exit code for any fatal startup failure.
pub const FATAL_EXIT_CODE: i32 = 10;

/// Access policy decided at startup from the `-f` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServeScope {
    /// Any path under the root directory is reachable.
    Everything,
    /// Only the named file directly inside the root directory is
    /// reachable.
    SingleFile(String),
}

impl ServeScope {
    /// Whether the access policy permits a request path.
    ///
    /// The root `/` is always permitted; it renders the entry listing
    /// in both modes.
    pub fn allows(&self, request_path: &str) -> bool {
        if request_path == "/" {
            return true;
        }
        match self {
            Self::Everything => true,
            Self::SingleFile(name) => request_path.trim_matches('/') == name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServeConfig {
    /// Canonical absolute path of the directory being served.
    pub root_dir: PathBuf,
    pub scope: ServeScope,
    pub bind_addr: SocketAddr,
}

/// Decide between serve-everything and single-file mode.
///
/// An absent or empty argument defaults to the current working
/// directory. A directory argument serves everything under it; a
/// regular-file argument serves only that file, with its parent as the
/// root. Any stat failure is fatal.
pub fn resolve_root(arg: Option<&Path>) -> Result<(PathBuf, ServeScope), StartupError> {
    let raw = match arg {
        Some(path) if !path.as_os_str().is_empty() => path.to_path_buf(),
        _ => env::current_dir().map_err(|source| StartupError::Root {
            path: ".".to_string(),
            source,
        })?,
    };

    let root_error = |source| StartupError::Root {
        path: raw.display().to_string(),
        source,
    };

    let meta = fs::metadata(&raw).map_err(root_error)?;
    let abs = fs::canonicalize(&raw).map_err(root_error)?;

    if meta.is_dir() {
        return Ok((abs, ServeScope::Everything));
    }

    match (abs.parent(), abs.file_name()) {
        (Some(parent), Some(name)) => Ok((
            parent.to_path_buf(),
            ServeScope::SingleFile(name.to_string_lossy().into_owned()),
        )),
        _ => Err(root_error(io::Error::new(
            io::ErrorKind::InvalidInput,
            "path has no parent directory",
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn directory_argument_serves_everything() {
        let dir = tempfile::tempdir().unwrap();
        let (root, scope) = resolve_root(Some(dir.path())).unwrap();
        assert_eq!(root, dir.path().canonicalize().unwrap());
        assert_eq!(scope, ServeScope::Everything);
    }

    #[test]
    fn file_argument_serves_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("index.html");
        std::fs::write(&file, b"hello").unwrap();

        let (root, scope) = resolve_root(Some(&file)).unwrap();
        assert_eq!(root, dir.path().canonicalize().unwrap());
        assert_eq!(scope, ServeScope::SingleFile("index.html".to_string()));
    }

    #[test]
    fn missing_argument_defaults_to_cwd() {
        let (root, scope) = resolve_root(None).unwrap();
        assert_eq!(root, env::current_dir().unwrap().canonicalize().unwrap());
        assert_eq!(scope, ServeScope::Everything);
    }

    #[test]
    fn nonexistent_path_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-entry");
        let err = resolve_root(Some(&missing)).unwrap_err();
        assert!(matches!(err, StartupError::Root { .. }));
    }

    #[test]
    fn scope_always_allows_root() {
        assert!(ServeScope::Everything.allows("/"));
        assert!(ServeScope::SingleFile("a.txt".to_string()).allows("/"));
    }

    #[test]
    fn single_file_scope_allows_only_that_file() {
        let scope = ServeScope::SingleFile("index.html".to_string());
        assert!(scope.allows("/index.html"));
        assert!(scope.allows("/index.html/"));
        assert!(!scope.allows("/other.html"));
        assert!(!scope.allows("/sub/index.html"));
    }

    #[test]
    fn config_is_shareable() {
        let cfg = ServeConfig {
            root_dir: PathBuf::from("/srv/site"),
            scope: ServeScope::Everything,
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000),
        };
        let clone = cfg.clone();
        assert_eq!(clone.root_dir, cfg.root_dir);
    }
}
