use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Whole contents of a grid file, loaded once and never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteSource {
    bytes: Box<[u8]>,
}

impl ByteSource {
    pub fn from_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref();
        let source = Self::from_reader(BufReader::new(File::open(path)?))?;

        debug!("Loaded {:?} : {} bytes", path, source.len());

        Ok(source)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> std::io::Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        Ok(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for ByteSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes: bytes.into_boxed_slice() }
    }
}

impl From<&[u8]> for ByteSource {
    fn from(bytes: &[u8]) -> Self {
        bytes.to_vec().into()
    }
}

impl AsRef<[u8]> for ByteSource {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use tempfile::NamedTempFile;
    use super::*;

    #[test]
    fn load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[1, 2, 3, 4, 5]).unwrap();

        let source = ByteSource::from_path(file.path()).unwrap();
        assert_eq!(source.as_bytes(), &[1, 2, 3, 4, 5]);
        assert_eq!(source.len(), 5);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ByteSource::from_path(dir.path().join("h.grd")).is_err());
    }

    #[test]
    fn empty_reader() {
        let source = ByteSource::from_reader(std::io::empty()).unwrap();
        assert!(source.is_empty());
    }
}
