//! Reading and repackaging of the docx zip container.
//!
//! A template is rendered by pulling one part out of the archive, rewriting
//! it, and writing a new archive where every other entry is copied raw
//! (compressed bytes, metadata and order as in the template).

use std::io::{Cursor, Read, Write};
use std::path::Path;

use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Error, Result};

/// Name of the main document part inside a docx archive.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Read a template file, reporting a missing path as [`Error::TemplateNotFound`].
pub fn read_template<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::TemplateNotFound(path.to_path_buf()));
    }
    Ok(std::fs::read(path)?)
}

/// Extract the raw bytes of one part from an archive on disk.
///
/// # Example
///
/// ```no_run
/// use docxtmpl::package::{extract_part, DOCUMENT_PART};
///
/// let xml = extract_part("letter.docx", DOCUMENT_PART)?;
/// println!("{} bytes", xml.len());
/// # Ok::<(), docxtmpl::Error>(())
/// ```
pub fn extract_part<P: AsRef<Path>>(archive_path: P, part_name: &str) -> Result<Vec<u8>> {
    let data = read_template(archive_path)?;
    extract_part_from_bytes(&data, part_name)
}

/// Extract the raw bytes of one part from an in-memory archive.
pub fn extract_part_from_bytes(data: &[u8], part_name: &str) -> Result<Vec<u8>> {
    let mut archive = open_archive(data)?;
    let mut file = archive
        .by_name(part_name)
        .map_err(|e| part_error(e, part_name))?;

    let mut contents = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut contents)?;
    Ok(contents)
}

/// Entry names of an in-memory archive, in archive order.
pub fn list_parts(data: &[u8]) -> Result<Vec<String>> {
    let mut archive = open_archive(data)?;
    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        names.push(archive.by_index_raw(i)?.name().to_string());
    }
    Ok(names)
}

/// Build a new archive from `template` with `part_name` replaced by `content`.
///
/// Every other entry is copied without recompression. The replaced entry
/// keeps its position and is stored the way the template stored it
/// (`Stored` stays `Stored`, anything else is deflated).
pub fn rewrite_archive_bytes(template: &[u8], part_name: &str, content: &[u8]) -> Result<Vec<u8>> {
    let mut archive = open_archive(template)?;
    if archive.index_for_name(part_name).is_none() {
        return Err(Error::PartNotFound(part_name.to_string()));
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::with_capacity(template.len())));
    for i in 0..archive.len() {
        let file = archive.by_index_raw(i)?;
        if file.name() == part_name {
            let options =
                SimpleFileOptions::default().compression_method(replacement_method(file.compression()));
            writer.start_file(part_name, options)?;
            writer.write_all(content)?;
        } else {
            writer.raw_copy_file(file)?;
        }
    }

    Ok(writer.finish()?.into_inner())
}

/// Rewrite a template on disk into `output_path`.
///
/// The output is assembled in memory first; nothing is written if any step
/// fails.
pub fn rewrite_archive<P, Q>(
    template_path: P,
    part_name: &str,
    content: &[u8],
    output_path: Q,
) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let template = read_template(template_path)?;
    let bytes = rewrite_archive_bytes(&template, part_name, content)?;
    write_output(output_path.as_ref(), &bytes)
}

/// Write finished archive bytes, creating parent directories as needed.
pub fn write_output(output_path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output_path, bytes)?;
    log::info!("Wrote {} ({} bytes)", output_path.display(), bytes.len());
    Ok(())
}

fn open_archive(data: &[u8]) -> Result<ZipArchive<Cursor<&[u8]>>> {
    ZipArchive::new(Cursor::new(data)).map_err(|e| Error::MalformedContainer(e.to_string()))
}

fn part_error(err: ZipError, part_name: &str) -> Error {
    match err {
        ZipError::FileNotFound => Error::PartNotFound(part_name.to_string()),
        other => other.into(),
    }
}

fn replacement_method(original: CompressionMethod) -> CompressionMethod {
    match original {
        CompressionMethod::Stored => CompressionMethod::Stored,
        _ => CompressionMethod::Deflated,
    }
}
