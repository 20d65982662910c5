use std::fmt;
use std::path::PathBuf;

use tsumego_engine::GoError;

#[derive(Debug)]
pub enum ImportError {
    Config(String),
    Io(PathBuf, std::io::Error),
    Json(PathBuf, serde_json::Error),
    Problem(PathBuf, GoError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Config(msg) => write!(f, "Configuration error: {msg}"),
            ImportError::Io(path, e) => write!(f, "{}: {e}", path.display()),
            ImportError::Json(path, e) => write!(f, "{}: invalid JSON: {e}", path.display()),
            ImportError::Problem(path, e) => write!(f, "{}: {e}", path.display()),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Config(_) => None,
            ImportError::Io(_, e) => Some(e),
            ImportError::Json(_, e) => Some(e),
            ImportError::Problem(_, e) => Some(e),
        }
    }
}
