//! Container format detection and validation.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

/// Zip signature information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZipSignature {
    /// Starts with a local file header
    LocalFile,
    /// An archive with no entries (end of central directory only)
    Empty,
}

/// Local file header magic: PK\x03\x04
const LOCAL_FILE_MAGIC: &[u8] = b"PK\x03\x04";
/// End of central directory magic: PK\x05\x06
const EMPTY_ARCHIVE_MAGIC: &[u8] = b"PK\x05\x06";
const MAGIC_LEN: usize = 4;

/// Detect a zip container from a file path.
///
/// # Example
/// ```no_run
/// use docxtmpl::detect::detect_zip_from_path;
///
/// let signature = detect_zip_from_path("letter.docx").unwrap();
/// println!("{:?}", signature);
/// ```
pub fn detect_zip_from_path<P: AsRef<Path>>(path: P) -> Result<ZipSignature> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::TemplateNotFound(path.to_path_buf()));
    }
    let mut header = Vec::with_capacity(MAGIC_LEN);
    File::open(path)?
        .take(MAGIC_LEN as u64)
        .read_to_end(&mut header)?;
    detect_zip_from_bytes(&header)
}

/// Detect a zip container from its leading bytes.
///
/// # Returns
/// * `Ok(ZipSignature)` if the data starts with a zip signature
/// * `Err(Error::MalformedContainer)` otherwise
pub fn detect_zip_from_bytes(data: &[u8]) -> Result<ZipSignature> {
    if data.len() < MAGIC_LEN {
        return Err(Error::MalformedContainer(format!(
            "too short for a zip archive ({} bytes)",
            data.len()
        )));
    }

    if data.starts_with(LOCAL_FILE_MAGIC) {
        Ok(ZipSignature::LocalFile)
    } else if data.starts_with(EMPTY_ARCHIVE_MAGIC) {
        Ok(ZipSignature::Empty)
    } else {
        Err(Error::MalformedContainer("missing zip signature".into()))
    }
}

/// Check if bytes start like a zip archive.
pub fn is_zip_bytes(data: &[u8]) -> bool {
    detect_zip_from_bytes(data).is_ok()
}

/// Check if bytes are a zip archive holding a `word/document.xml` part.
pub fn is_docx_bytes(data: &[u8]) -> bool {
    if !is_zip_bytes(data) {
        return false;
    }
    match zip::ZipArchive::new(Cursor::new(data)) {
        Ok(archive) => archive.index_for_name(crate::package::DOCUMENT_PART).is_some(),
        Err(_) => false,
    }
}

/// Check if a file is a docx container.
///
/// # Returns
/// * `true` if the file is a zip archive with a document part
/// * `false` otherwise, including when the file cannot be read
pub fn is_docx<P: AsRef<Path>>(path: P) -> bool {
    match std::fs::read(path) {
        Ok(data) => is_docx_bytes(&data),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn archive(names: &[&str]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for name in names {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(b"<x/>").unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_detect_local_file_header() {
        let data = archive(&["a.txt"]);
        assert_eq!(detect_zip_from_bytes(&data).unwrap(), ZipSignature::LocalFile);
    }

    #[test]
    fn test_detect_empty_archive() {
        let data = archive(&[]);
        assert_eq!(detect_zip_from_bytes(&data).unwrap(), ZipSignature::Empty);
    }

    #[test]
    fn test_detect_invalid_format() {
        let result = detect_zip_from_bytes(b"%PDF-1.7");
        assert!(matches!(result, Err(Error::MalformedContainer(_))));
    }

    #[test]
    fn test_detect_too_short() {
        let result = detect_zip_from_bytes(b"PK");
        assert!(matches!(result, Err(Error::MalformedContainer(_))));
    }

    #[test]
    fn test_is_docx_bytes() {
        assert!(is_docx_bytes(&archive(&["word/document.xml"])));
        assert!(!is_docx_bytes(&archive(&["content.xml"])));
        assert!(!is_docx_bytes(b"Not a zip"));
    }

    #[test]
    fn test_missing_path() {
        let result = detect_zip_from_path("/definitely/not/here.docx");
        assert!(matches!(result, Err(Error::TemplateNotFound(_))));
        assert!(!is_docx("/definitely/not/here.docx"));
    }
}
