use super::Format;
use super::error::FormatError;
use super::table;
use super::traits::{StructureReader, StructureWriter};
use crate::core::models::water::WaterStructure;
use nalgebra::Point3;
use std::io::{BufRead, Write};

/// Tab-separated XYZ: atom count, a blank line, then `name x y z` per atom.
pub struct XyzFile;

impl StructureReader for XyzFile {
    type Error = FormatError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Point3<f64>>, Self::Error> {
        table::read_oxygens(reader, b'\t', Format::Xyz)
    }
}

impl StructureWriter for XyzFile {
    type Error = FormatError;

    fn write_to(structure: &WaterStructure, writer: &mut impl Write) -> Result<(), Self::Error> {
        writeln!(writer, "{}", structure.len())?;
        writeln!(writer)?;
        for site in &structure.sites {
            let p = &site.position;
            writeln!(
                writer,
                "{}\t{}\t{}\t{}",
                site.kind.element_name(),
                p.x,
                p.y,
                p.z
            )?;
        }
        Ok(())
    }
}
