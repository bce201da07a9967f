//! Provides input functionality for docking result files.
//!
//! Every supported format has a reader implementing [`traits::DockingFile`]. The
//! [`detect`] module picks the reader for a file from its extension and a fixed
//! content signature, and [`read_docking`] dispatches over the closed set of
//! [`SourceFormat`] variants.

pub(crate) mod blocks;
pub mod chimerax;
pub mod detect;
pub mod error;
pub mod pydock;
pub mod swissdock;
pub mod traits;
pub mod vina;
pub mod xyz;

use crate::core::models::docking::ParsedDocking;
use crate::core::models::format::SourceFormat;
use error::FormatError;
use std::io::BufRead;
use std::path::Path;
use traits::DockingFile;

/// Reads `reader` with the parser registered for `format`.
///
/// `origin` is the path the content came from; formats that reference sibling
/// files resolve them relative to it.
pub fn read_docking(
    format: SourceFormat,
    reader: &mut impl BufRead,
    origin: &Path,
) -> Result<ParsedDocking, FormatError> {
    match format {
        SourceFormat::Vina => vina::VinaFile::read_from(reader, origin),
        SourceFormat::SwissDock => swissdock::Dock4File::read_from(reader, origin),
        SourceFormat::LegacyChimerax => chimerax::LegacyChimeraxFile::read_from(reader, origin),
        SourceFormat::PyDock => pydock::PyDockFile::read_from(reader, origin),
        SourceFormat::Xyz => xyz::XyzFile::read_from(reader, origin),
    }
}
