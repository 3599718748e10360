use super::Format;
use crate::core::models::lattice::LatticeError;
use crate::core::models::water::WaterBuildError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Input file format '{extension}' is not supported (expected .csv or .xyz)")]
    UnsupportedInput { extension: String },

    #[error("Output file format '{extension}' is not supported (expected .xyz, .pdb or .csv)")]
    UnsupportedOutput { extension: String },

    #[error("The {0} format cannot be read as an oxygen table")]
    NotReadable(Format),

    #[error("Failed to parse {format} data on line {line}: {details}")]
    Parse {
        format: Format,
        line: usize,
        details: String,
    },

    #[error("Delimited reader error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("No oxygen ('O') rows were found in the input table")]
    NoOxygens,

    #[error("Invalid lattice: {0}")]
    Lattice(#[from] LatticeError),

    #[error("Cannot reconstruct water geometry: {0}")]
    Water(#[from] WaterBuildError),
}

impl FormatError {
    pub fn parse(format: Format, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
        }
    }
}
