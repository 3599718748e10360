use super::Format;
use super::error::FormatError;
use ::csv::{ReaderBuilder, StringRecord, Trim};
use nalgebra::Point3;
use std::io::BufRead;

/// Lines skipped before the table body (atom count and comment line).
pub(crate) const HEADER_LINES: usize = 2;

pub(crate) const OXYGEN_LABEL: &str = "O";

/// Reads the `ATOM, X, Y, Z` rows of a delimited table and keeps the oxygen coordinates.
///
/// Rows holding a single field are split on whitespace, so space-aligned XYZ files are
/// accepted alongside tab-separated ones. Columns after `Z` are ignored.
pub(crate) fn read_oxygens(
    reader: &mut impl BufRead,
    delimiter: u8,
    format: Format,
) -> Result<Vec<Point3<f64>>, FormatError> {
    let mut header = String::new();
    for _ in 0..HEADER_LINES {
        header.clear();
        if reader.read_line(&mut header)? == 0 {
            return Err(FormatError::NoOxygens);
        }
    }

    let mut table = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut oxygens = Vec::new();
    let mut record = StringRecord::new();
    while table.read_record(&mut record)? {
        let line = record
            .position()
            .map_or(0, |p| p.line() as usize)
            + HEADER_LINES;

        let fields: Vec<&str> = if record.len() == 1 {
            record[0].split_whitespace().collect()
        } else {
            record.iter().collect()
        };

        match fields.first() {
            Some(&label) if label == OXYGEN_LABEL => {}
            _ => continue,
        }
        if fields.len() < 4 {
            return Err(FormatError::parse(
                format,
                line,
                format!("expected ATOM, X, Y, Z columns, found {} field(s)", fields.len()),
            ));
        }

        let mut xyz = [0.0f64; 3];
        for (axis, (value, name)) in xyz.iter_mut().zip(["X", "Y", "Z"]).enumerate() {
            let raw = fields[axis + 1];
            *value = raw.parse().map_err(|_| {
                FormatError::parse(format, line, format!("invalid {name} coordinate '{raw}'"))
            })?;
            if !value.is_finite() {
                return Err(FormatError::parse(
                    format,
                    line,
                    format!("non-finite {name} coordinate '{raw}'"),
                ));
            }
        }
        oxygens.push(Point3::from(xyz));
    }

    if oxygens.is_empty() {
        return Err(FormatError::NoOxygens);
    }
    Ok(oxygens)
}
