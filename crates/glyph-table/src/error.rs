use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// An error that stops a table from being generated.
///
/// Anything short of an unreadable input is reported through
/// [`Diagnostics`](crate::Diagnostics) instead, because a partial table is still useful for
/// review.
#[derive(Debug)]
pub enum TableError {
    /// A required input file does not exist.
    MissingInputFile { path: PathBuf, source: io::Error },
    /// An input file exists but could not be read.
    Read { path: PathBuf, source: io::Error },
}

impl TableError {
    pub(crate) fn from_io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        if source.kind() == io::ErrorKind::NotFound {
            TableError::MissingInputFile { path, source }
        } else {
            TableError::Read { path, source }
        }
    }

    /// The input file the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            TableError::MissingInputFile { path, .. } | TableError::Read { path, .. } => path,
        }
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::MissingInputFile { path, .. } => {
                write!(f, "missing input file `{}'", path.display())
            }
            TableError::Read { path, source } => {
                write!(f, "cannot read `{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TableError::MissingInputFile { source, .. } | TableError::Read { source, .. } => {
                Some(source)
            }
        }
    }
}
