use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Identifier of one document, as sent by the editor (`file:///…`).
///
/// Cheap to clone; used as the key of every per-file map in the crate.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileUri(SmolStr);

impl FileUri {
    pub fn new(uri: impl AsRef<str>) -> Self {
        Self(SmolStr::new(uri.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Join a relative path onto a directory URI.
    pub fn join(&self, relative: &str) -> Self {
        let base = self.0.trim_end_matches('/');
        Self::new(format!("{base}/{relative}"))
    }
}

impl fmt::Debug for FileUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileUri({})", self.0)
    }
}

impl fmt::Display for FileUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileUri {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}

impl From<String> for FileUri {
    fn from(uri: String) -> Self {
        Self::new(uri)
    }
}
