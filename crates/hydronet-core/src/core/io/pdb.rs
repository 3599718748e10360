use super::error::FormatError;
use super::traits::StructureWriter;
use crate::core::models::water::{WATER_RESIDUE_NAME, WaterStructure};
use std::io::Write;

// Fixed-width PDB fields overflow past these values.
const MAX_ATOM_SERIAL: usize = 100_000;
const MAX_RESIDUE_NUMBER: usize = 10_000;

/// Write-only PDB encoder: one `CRYST1` record for the orthorhombic box followed by an
/// `ATOM` record for every site.
pub struct PdbFile;

impl StructureWriter for PdbFile {
    type Error = FormatError;

    fn write_to(structure: &WaterStructure, writer: &mut impl Write) -> Result<(), Self::Error> {
        let lengths = structure.box_lengths;
        writeln!(
            writer,
            "CRYST1   {:.3}   {:.3}   {:.3}  90.00  90.00  90.00 P 1           1",
            lengths.x, lengths.y, lengths.z
        )?;

        for (index, site) in structure.sites.iter().enumerate() {
            let p = &site.position;
            writeln!(
                writer,
                "{:<6}{:>5} {:^4} {:<3}  {:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}",
                "ATOM",
                (index + 1) % MAX_ATOM_SERIAL,
                site.kind.pdb_name(),
                WATER_RESIDUE_NAME,
                site.residue_number % MAX_RESIDUE_NUMBER,
                p.x,
                p.y,
                p.z,
                0.0,
                0.0
            )?;
        }
        Ok(())
    }
}
