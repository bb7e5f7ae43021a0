//! Private utility module
use crate::error::Result;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Check whether the file extension ends with ".gz".
pub fn is_gz_file<P>(path: P) -> bool
where
    P: AsRef<Path>,
{
    path.as_ref()
        .file_name()
        .map(|a| a.to_string_lossy().ends_with(".gz"))
        .unwrap_or(false)
}

/// Create the file at `path` and hand a writer to `write`. The output is
/// gzip-compressed if the file name ends with ".gz".
pub fn write_output<P, F>(path: P, write: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let gz = is_gz_file(&path);
    let mut writer = BufWriter::new(File::create(path)?);
    if gz {
        let mut e = GzEncoder::new(writer, Compression::default());
        write(&mut e)?;
        e.finish()?.flush()?;
    } else {
        write(&mut writer)?;
        writer.flush()?;
    }
    Ok(())
}
