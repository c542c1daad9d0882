//! JSON persistence for source collections and duplicate reports.
//!
//! Files are written with 4-space indentation and non-ASCII text kept
//! literal. Writes go to a temporary file in the destination directory that
//! is renamed over the destination once complete, so a failed write never
//! leaves a truncated file behind. The replacement keeps the permissions of
//! the file it replaces; a new file gets the usual default mode.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;
use tempfile::{Builder, NamedTempFile};

use crate::error::{DedupError, FileFailure};
use crate::logging::Journal;

const INDENT: &[u8] = b"    ";

/// Serialize `value` to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`DedupError::Persistence`] if the destination directory is
/// missing or unwritable, or if encoding fails. The error is logged to
/// `journal` before it is returned.
pub fn save_json<T: Serialize + ?Sized>(
    value: &T,
    path: &Path,
    journal: &dyn Journal,
) -> Result<(), DedupError> {
    match write_atomic(value, path) {
        Ok(()) => {
            journal.info(&format!("Saved data to file: {}", path.display()));
            Ok(())
        }
        Err(source) => {
            let err = DedupError::persistence(path, source);
            journal.failure(&err);
            Err(err)
        }
    }
}

/// Read and decode the whole of `path`.
///
/// # Errors
///
/// Returns [`DedupError::Read`] if the file is missing, unreadable or does
/// not decode as `T`. The error is logged to `journal` before it is returned.
pub fn read_json<T: DeserializeOwned>(path: &Path, journal: &dyn Journal) -> Result<T, DedupError> {
    match decode(path) {
        Ok(value) => {
            journal.info(&format!("Read data from file: {}", path.display()));
            Ok(value)
        }
        Err(source) => {
            let err = DedupError::read(path, source);
            journal.failure(&err);
            Err(err)
        }
    }
}

fn encode<T: Serialize + ?Sized, W: Write>(value: &T, writer: W) -> Result<(), serde_json::Error> {
    let mut serializer = Serializer::with_formatter(writer, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)
}

fn write_atomic<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), FileFailure> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let existing = fs::metadata(path).ok().map(|meta| meta.permissions());
    let mut temp = temp_file_in(dir)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        encode(value, &mut writer)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    if let Some(permissions) = existing {
        fs::set_permissions(path, permissions)?;
    }
    Ok(())
}

/// Temporary file in `dir`, created with the mode a plain `File::create`
/// would use rather than owner-only.
fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

fn decode<T: DeserializeOwned>(path: &Path) -> Result<T, FileFailure> {
    let file = File::open(path)?;
    let value = serde_json::from_reader(BufReader::new(file))?;
    Ok(value)
}
