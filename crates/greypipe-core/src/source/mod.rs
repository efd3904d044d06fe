//! Stream endpoints.
//!
//! The conversion core is generic over `Read`/`Write`; this module supplies
//! the concrete endpoints the CLI wires in (stdin/stdout or files) and keeps
//! all path handling out of the decoding layers.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("could not open input {path}: {source}")]
    OpenInput { path: String, source: io::Error },
    #[error("could not create output {path}: {source}")]
    CreateOutput { path: String, source: io::Error },
}

/// Byte stream input: a file path, or stdin for `None` / `-`.
#[derive(Debug)]
pub enum StreamInput {
    Stdin(io::Stdin),
    File(File),
}

impl StreamInput {
    pub fn open(path: Option<&Path>) -> Result<Self, SourceError> {
        match path {
            None => Ok(Self::Stdin(io::stdin())),
            Some(path) if path.as_os_str() == "-" => Ok(Self::Stdin(io::stdin())),
            Some(path) => File::open(path)
                .map(Self::File)
                .map_err(|source| SourceError::OpenInput {
                    path: path.display().to_string(),
                    source,
                }),
        }
    }
}

impl Read for StreamInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Stdin(stdin) => stdin.read(buf),
            Self::File(file) => file.read(buf),
        }
    }
}

/// Command line output: a file path, or stdout for `None`.
pub enum StreamOutput {
    Stdout(io::Stdout),
    File(File),
}

impl StreamOutput {
    pub fn create(path: Option<&Path>) -> Result<Self, SourceError> {
        match path {
            None => Ok(Self::Stdout(io::stdout())),
            Some(path) => File::create(path)
                .map(Self::File)
                .map_err(|source| SourceError::CreateOutput {
                    path: path.display().to_string(),
                    source,
                }),
        }
    }
}

impl Write for StreamOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(stdout) => stdout.write(buf),
            Self::File(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(stdout) => stdout.flush(),
            Self::File(file) => file.flush(),
        }
    }
}
