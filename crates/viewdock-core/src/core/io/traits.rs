use super::error::FormatError;
use crate::core::models::docking::ParsedDocking;
use crate::core::models::format::SourceFormat;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Defines the interface shared by all docking result readers.
///
/// Reading is all-or-nothing: the first grammar violation aborts the whole file with
/// [`FormatError::MalformedRecord`] and no partial result is returned.
pub trait DockingFile {
    /// The format tag attached to every record this reader produces.
    const FORMAT: SourceFormat;

    /// Parses docking results from a buffered reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - The buffered reader to read from.
    /// * `origin` - Path the content was read from, used to resolve sibling files.
    ///
    /// # Return
    ///
    /// Returns the poses in file order together with their structural payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the content violates the format's grammar, a required
    /// sibling file is missing, or reading fails.
    fn read_from(reader: &mut impl BufRead, origin: &Path) -> Result<ParsedDocking, FormatError>;

    /// Parses docking results from a file path.
    ///
    /// The file handle is released when this function returns, on success or error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<ParsedDocking, FormatError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader, path)
    }
}
