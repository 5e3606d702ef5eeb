use std::ffi;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Largest shader source accepted by default.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "File {:?} does not exist", path)]
    NotFound { path: PathBuf },
    #[fail(display = "File {:?} is {} bytes, larger than the {} byte limit", path, size, limit)]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },
    #[fail(display = "File {:?} is empty", path)]
    EmptyFile { path: PathBuf },
    #[fail(display = "Failed to read CString from file {:?} that contains 0", path)]
    FileContainsNil { path: PathBuf },
    #[fail(display = "I/O error on {:?}", path)]
    Io {
        path: PathBuf,
        #[cause]
        inner: io::Error,
    },
    #[fail(display = "Failed get executable path")]
    FailedToGetExePath,
}

impl Error {
    fn io(path: &Path, inner: io::Error) -> Error {
        match inner.kind() {
            io::ErrorKind::NotFound => Error::NotFound { path: path.into() },
            _ => Error::Io {
                path: path.into(),
                inner,
            },
        }
    }
}

/// Root directory that resource names are resolved against.
pub struct Resources {
    root_path: PathBuf,
    max_file_size: u64,
}

impl Resources {
    pub fn from_path<P: Into<PathBuf>>(root_path: P) -> Resources {
        Resources {
            root_path: root_path.into(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Resolves `rel_path` against the directory of the running executable.
    pub fn from_relative_exe_path(rel_path: &Path) -> Result<Resources, Error> {
        let exe_file_name = ::std::env::current_exe().map_err(|_| Error::FailedToGetExePath)?;

        let exe_path = exe_file_name.parent().ok_or(Error::FailedToGetExePath)?;

        Ok(Resources::from_path(exe_path.join(rel_path)))
    }

    pub fn with_max_file_size(mut self, max_file_size: u64) -> Resources {
        self.max_file_size = max_file_size;
        self
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn path_of(&self, resource_name: &str) -> PathBuf {
        resource_name_to_path(&self.root_path, resource_name)
    }

    /// Reads a whole file into a nul-terminated string.
    ///
    /// The buffer is sized from the file length, and the read is capped at
    /// the size limit even if the file grows after its length was queried.
    pub fn load_cstring(&self, resource_name: &str) -> Result<ffi::CString, Error> {
        let path = self.path_of(resource_name);

        let file = fs::File::open(&path).map_err(|e| Error::io(&path, e))?;
        let size = file.metadata().map_err(|e| Error::io(&path, e))?.len();

        if size > self.max_file_size {
            return Err(Error::FileTooLarge {
                path,
                size,
                limit: self.max_file_size,
            });
        }

        // one extra byte for the terminator CString appends
        let mut buffer: Vec<u8> = Vec::with_capacity(size as usize + 1);
        file.take(self.max_file_size.saturating_add(1))
            .read_to_end(&mut buffer)
            .map_err(|e| Error::io(&path, e))?;

        let read = buffer.len() as u64;
        if read > self.max_file_size {
            return Err(Error::FileTooLarge {
                path,
                size: read,
                limit: self.max_file_size,
            });
        }
        if buffer.is_empty() {
            return Err(Error::EmptyFile { path });
        }

        debug!("Read {} bytes from {:?}", read, path);

        ffi::CString::new(buffer).map_err(|_| Error::FileContainsNil { path })
    }
}

fn resource_name_to_path(root_dir: &Path, location: &str) -> PathBuf {
    let mut path: PathBuf = root_dir.into();

    for part in location.split('/') {
        path = path.join(part);
    }

    path
}
