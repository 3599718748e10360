//! Reading oxygen tables and writing reconstructed water structures.
//!
//! Input tables carry positional `ATOM, X, Y, Z` columns after a two-line header and are
//! accepted as comma-separated (`.csv`) or tab-separated (`.xyz`) text. Output is written
//! as XYZ, fixed-column PDB or CSV, chosen by the file extension. Extensions are resolved
//! up front so an unsupported path fails before any optimization work starts.

pub mod csv;
pub mod error;
pub mod pdb;
pub(crate) mod table;
pub mod traits;
pub mod xyz;

use self::csv::CsvFile;
use self::error::FormatError;
use self::pdb::PdbFile;
use self::traits::{StructureReader, StructureWriter};
use self::xyz::XyzFile;
use crate::core::models::lattice::Lattice;
use crate::core::models::water::WaterStructure;
use phf::phf_map;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Xyz,
    Pdb,
    Csv,
}

static EXTENSIONS: phf::Map<&'static str, Format> = phf_map! {
    "xyz" => Format::Xyz,
    "pdb" => Format::Pdb,
    "ent" => Format::Pdb,
    "csv" => Format::Csv,
};

impl Format {
    /// Looks up the format registered for a file extension (case-insensitive).
    pub fn from_extension(extension: &str) -> Option<Self> {
        EXTENSIONS.get(extension.to_ascii_lowercase().as_str()).copied()
    }

    /// Resolves the format a path will be read from.
    pub fn for_input(path: &Path) -> Result<Self, FormatError> {
        let extension = extension_of(path);
        match Self::from_extension(&extension) {
            Some(format) if format.is_readable() => Ok(format),
            _ => Err(FormatError::UnsupportedInput { extension }),
        }
    }

    /// Resolves the format a path will be written as.
    pub fn for_output(path: &Path) -> Result<Self, FormatError> {
        let extension = extension_of(path);
        Self::from_extension(&extension).ok_or(FormatError::UnsupportedOutput { extension })
    }

    pub fn is_readable(self) -> bool {
        matches!(self, Format::Xyz | Format::Csv)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Xyz => write!(f, "XYZ"),
            Format::Pdb => write!(f, "PDB"),
            Format::Csv => write!(f, "CSV"),
        }
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Reads the oxygen sites of a structure file and derives its periodic box.
pub fn read_lattice(path: &Path) -> Result<Lattice, FormatError> {
    let format = Format::for_input(path)?;
    debug!(?path, %format, "Reading oxygen table.");
    let oxygens = match format {
        Format::Xyz => XyzFile::read_from_path(path)?,
        Format::Csv => CsvFile::read_from_path(path)?,
        Format::Pdb => return Err(FormatError::NotReadable(format)),
    };
    let lattice = Lattice::from_coordinates(oxygens)?;
    info!(
        oxygens = lattice.len(),
        box_x = lattice.cell().lengths().x,
        box_y = lattice.cell().lengths().y,
        box_z = lattice.cell().lengths().z,
        "Loaded lattice."
    );
    Ok(lattice)
}

/// Writes a water structure in the format selected by the path's extension.
pub fn write_structure(path: &Path, structure: &WaterStructure) -> Result<(), FormatError> {
    let format = Format::for_output(path)?;
    debug!(?path, %format, atoms = structure.len(), "Writing structure.");
    match format {
        Format::Xyz => XyzFile::write_to_path(structure, path),
        Format::Pdb => PdbFile::write_to_path(structure, path),
        Format::Csv => CsvFile::write_to_path(structure, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn extensions_resolve_case_insensitively() {
        assert_eq!(Format::from_extension("XYZ"), Some(Format::Xyz));
        assert_eq!(Format::from_extension("pdb"), Some(Format::Pdb));
        assert_eq!(Format::from_extension("gro"), None);
    }

    #[test]
    fn input_accepts_only_tables() {
        assert_eq!(
            Format::for_input(&PathBuf::from("ice.csv")).unwrap(),
            Format::Csv
        );
        assert_eq!(
            Format::for_input(&PathBuf::from("dir/ice.xyz")).unwrap(),
            Format::Xyz
        );
        assert!(matches!(
            Format::for_input(&PathBuf::from("ice.pdb")),
            Err(FormatError::UnsupportedInput { extension }) if extension == "pdb"
        ));
        assert!(matches!(
            Format::for_input(&PathBuf::from("ice")),
            Err(FormatError::UnsupportedInput { extension }) if extension.is_empty()
        ));
    }

    #[test]
    fn output_rejects_unknown_extensions() {
        assert_eq!(
            Format::for_output(&PathBuf::from("out.pdb")).unwrap(),
            Format::Pdb
        );
        assert!(matches!(
            Format::for_output(&PathBuf::from("out.gro")),
            Err(FormatError::UnsupportedOutput { extension }) if extension == "gro"
        ));
    }

    #[test]
    fn write_structure_fails_before_creating_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mol2");
        let structure = WaterStructure {
            sites: vec![],
            box_lengths: nalgebra::Vector3::repeat(1.0),
            model: Default::default(),
        };
        assert!(matches!(
            write_structure(&path, &structure),
            Err(FormatError::UnsupportedOutput { .. })
        ));
        assert!(!path.exists());
    }
}
