use std::{
    fs,
    io::Write,
    path::Path,
};

use encoding_rs::Encoding;
use tempfile::NamedTempFile;

use crate::core::error::{Error, Result};

/// Looks up an encoding by its WHATWG label (`ISO-8859-1`, `utf-8`, `latin1`, ...).
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| Error::UnknownEncoding(label.to_string()))
}

/// Reads `path` and decodes it with `encoding`. A byte order mark overrides it.
pub fn read_decoded(path: &Path, encoding: &'static Encoding) -> Result<String> {
    let bytes = fs::read(path).map_err(|err| Error::io(path, err))?;
    let (text, _, _) = encoding.decode(&bytes);
    Ok(text.into_owned())
}

/// Encodes `text` with `encoding`. Characters the encoding cannot represent are
/// written as numeric character references (`&#8364;`).
pub fn encode(text: &str, encoding: &'static Encoding) -> Vec<u8> {
    let (bytes, _, _) = encoding.encode(text);
    bytes.into_owned()
}

/// Replaces `path` with `contents` through a temporary file in the same directory,
/// so readers see either the old or the new file, never a partial one.
pub fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut temp = NamedTempFile::new_in(dir).map_err(|err| Error::io(path, err))?;
    temp.write_all(contents)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|err| Error::io(path, err))?;

    if let Ok(metadata) = fs::metadata(path) {
        temp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(|err| Error::io(path, err))?;
    }

    temp.persist(path).map_err(|err| Error::io(path, err.error))?;
    Ok(())
}
