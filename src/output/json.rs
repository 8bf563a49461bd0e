//! JSON file output
//!
//! Writes the document as one human-readable JSON array indented with four
//! spaces.

use crate::output::traits::{Document, OutputHandler, OutputResult};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const INDENT: &[u8] = b"    ";

/// Writes documents to a JSON file, replacing any previous content
#[derive(Debug, Clone)]
pub struct JsonFileOutput {
    path: PathBuf,
}

impl JsonFileOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputHandler for JsonFileOutput {
    fn write(&self, document: &Document) -> OutputResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = BufWriter::new(File::create(&self.path)?);
        write_json(&mut writer, document)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        tracing::info!(
            "Wrote {} notices to {}",
            document.notices.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Serializes `document` into `writer` with a four-space indent
pub fn write_json<W: Write>(writer: W, document: &Document) -> OutputResult<()> {
    let mut serializer = Serializer::with_formatter(writer, PrettyFormatter::with_indent(INDENT));
    document.serialize(&mut serializer)?;
    Ok(())
}

/// Renders `document` as an indented JSON string
pub fn to_json_string(document: &Document) -> OutputResult<String> {
    let mut buffer = Vec::new();
    write_json(&mut buffer, document)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
