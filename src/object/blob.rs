use std::io::{self, BufRead, Cursor, Read, Seek, SeekFrom};

use crate::error::Result;
use crate::git::GitInvoker;
use crate::hash::ObjectId;

/// fetch the raw content of a blob
pub fn read_blob(git: &dyn GitInvoker, id: &ObjectId) -> Result<Vec<u8>> {
    let hex = id.to_hex();
    let output = git.invoke(&["cat-file", "blob", &hex])?;
    Ok(output.into_bytes())
}

/// blob content held in memory, readable and seekable
///
/// no process or file handle stays open behind it, dropping it is all the
/// cleanup there is.
#[derive(Clone, Debug, Default)]
pub struct Blob {
    inner: Cursor<Vec<u8>>,
}

impl Blob {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            inner: Cursor::new(data),
        }
    }

    /// total length in bytes
    pub fn len(&self) -> u64 {
        self.inner.get_ref().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.inner.get_ref().is_empty()
    }

    /// whole content, regardless of position
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.get_ref()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

impl Read for Blob {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl BufRead for Blob {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt)
    }
}

impl Seek for Blob {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}
