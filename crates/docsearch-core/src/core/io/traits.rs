use crate::core::models::document::Document;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing page formats.
///
/// Implementors handle format-specific parsing and serialization; the path
/// helpers are shared.
pub trait DocumentFile {
    /// The error type for I/O and parsing failures.
    type Error: Error + From<io::Error>;

    /// Reads a document from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the content cannot be parsed.
    fn read_from(reader: &mut impl BufRead) -> Result<Document, Self::Error>;

    /// Writes a document to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(document: &Document, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Parses a document held in memory.
    fn read_from_str(content: &str) -> Result<Document, Self::Error> {
        let mut reader = content.as_bytes();
        Self::read_from(&mut reader)
    }

    /// Serialises a document into a string.
    fn write_to_string(document: &Document) -> Result<String, Self::Error> {
        let mut buffer = Vec::new();
        Self::write_to(document, &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
    }

    /// Reads a document from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Document, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes a document to a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(document: &Document, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(document, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
