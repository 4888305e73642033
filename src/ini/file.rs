use log::debug;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::parser::ParseError;
use super::{Dialect, Document};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("error accessing {path:?}: {source}")]
    Stream {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("line {line_no}: {source}")]
    Parse {
        line_no: usize,
        #[source]
        source: ParseError,
    },
}

impl Error {
    fn open(path: &Path, source: io::Error) -> Self {
        Error::Open {
            path: path.into(),
            source,
        }
    }

    fn stream(path: &Path, source: io::Error) -> Self {
        Error::Stream {
            path: path.into(),
            source,
        }
    }
}

impl Document {
    /// Load `path`, picking the dialect from its extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        Self::load_with(path, Dialect::from_path(path))
    }

    pub fn load_with<P: AsRef<Path>>(path: P, dialect: Dialect) -> Result<Self, Error> {
        let path = path.as_ref();

        debug!("Loading {dialect} document {path:?}");

        let mut file = File::open(path).map_err(|e| Error::open(path, e))?;
        let mut buf = String::new();
        file.read_to_string(&mut buf)
            .map_err(|e| Error::stream(path, e))?;

        let doc = Self::parse_str(&buf, dialect)?;
        debug!("Loaded {} lines from {path:?}", doc.len());

        Ok(doc)
    }

    /// Replace the contents with those of `path`
    ///
    /// On error `self` is left exactly as it was. The dialect is kept.
    pub fn reload<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        *self = Self::load_with(path, self.dialect())?;

        Ok(())
    }

    /// Write the whole document to `path`, replacing it atomically
    ///
    /// Symlinks are followed, so the file they point to is replaced. The new
    /// file gets the mode of the old one. Read-only targets are refused.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let target = match fs::canonicalize(path) {
            Ok(target) => target,
            Err(e) if e.kind() == io::ErrorKind::NotFound => path.to_path_buf(),
            Err(e) => return Err(Error::open(path, e)),
        };
        let dir = match target.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        debug!("Saving {} lines to {target:?}", self.len());

        let old_permissions = fs::metadata(&target).ok().map(|meta| meta.permissions());
        if old_permissions.as_ref().is_some_and(|perms| perms.readonly()) {
            return Err(Error::open(
                path,
                io::Error::new(io::ErrorKind::PermissionDenied, "file is read-only"),
            ));
        }

        let mut file = NamedTempFile::new_in(dir).map_err(|e| Error::open(path, e))?;
        if let Some(perms) = old_permissions {
            file.as_file()
                .set_permissions(perms)
                .map_err(|e| Error::stream(path, e))?;
        }
        file.write_all(self.to_string().as_bytes())
            .and_then(|()| file.as_file().sync_all())
            .map_err(|e| Error::stream(path, e))?;
        file.persist(&target)
            .map_err(|e| Error::stream(path, e.error))?;

        Ok(())
    }
}
