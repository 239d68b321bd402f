//! Reading and writing of fixed-width PDB atom records.
//!
//! Only the records needed to show a structure are interpreted: `ATOM`, `HETATM`,
//! `MODEL`, `ENDMDL` and `END`. Every other record is ignored on read.

use crate::core::models::structure::Atom;
use nalgebra::Point3;
use std::fmt;
use thiserror::Error;

/// Record name of the chain terminator line.
pub const TERMINATOR_RECORD: &str = "TER";

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn parse_float(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

fn parse_optional_float(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
    default: f64,
) -> Result<f64, PdbError> {
    if slice_and_trim(line, start, end).is_empty() {
        Ok(default)
    } else {
        parse_float(line, line_num, start, end)
    }
}

fn parse_int<T: std::str::FromStr>(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
) -> Result<T, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

/// Guesses an element symbol from an atom name when columns 77-78 are blank.
fn element_from_name(name: &str) -> String {
    name.chars()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_string())
        .unwrap_or_default()
}

/// Parses one `ATOM`/`HETATM` line using the standard PDB column layout.
///
/// `line_num` is 1-based and only used for error reporting.
pub fn parse_atom_line(line: &str, line_num: usize) -> Result<Atom, PdbError> {
    if line.len() < 54 {
        return Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::LineTooShort,
        });
    }

    let hetero = slice_and_trim(line, 0, 6) == "HETATM";
    let serial = if slice_and_trim(line, 6, 11).is_empty() {
        0
    } else {
        parse_int(line, line_num, 6, 11)?
    };
    let name = slice_and_trim(line, 12, 16).to_string();
    let residue_name = slice_and_trim(line, 17, 20).to_string();
    let chain_id = slice_and_trim(line, 21, 22).chars().next().unwrap_or(' ');
    let residue_number = if slice_and_trim(line, 22, 26).is_empty() {
        0
    } else {
        parse_int(line, line_num, 22, 26)?
    };
    let x = parse_float(line, line_num, 30, 38)?;
    let y = parse_float(line, line_num, 38, 46)?;
    let z = parse_float(line, line_num, 46, 54)?;
    let occupancy = parse_optional_float(line, line_num, 54, 60, 1.0)?;
    let temperature_factor = parse_optional_float(line, line_num, 60, 66, 0.0)?;
    let element = match slice_and_trim(line, 76, 78) {
        "" => element_from_name(&name),
        symbol => symbol.to_string(),
    };

    Ok(Atom {
        hetero,
        serial,
        name,
        residue_name,
        chain_id,
        residue_number,
        position: Point3::new(x, y, z),
        occupancy,
        temperature_factor,
        element,
    })
}

/// Formats an atom as one fixed-width record line (78 columns, no line terminator).
///
/// The atom name starts in column 14, the alignment used for one- and two-letter
/// element names; the residue name follows in columns 18-21, the chain in column 22,
/// coordinates occupy columns 31-54 and the element symbol is right-justified in 77-78.
pub fn format_atom_line(atom: &Atom) -> String {
    AtomLine(atom).to_string()
}

struct AtomLine<'a>(&'a Atom);

impl fmt::Display for AtomLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let atom = self.0;
        let record = if atom.hetero { "HETATM" } else { "ATOM" };
        write!(
            f,
            "{:<6}{:>5}  {:<4}{:<4}{:1}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}{:10}{:>2}",
            record,
            atom.serial,
            atom.name,
            atom.residue_name,
            atom.chain_id,
            atom.residue_number,
            atom.position.x,
            atom.position.y,
            atom.position.z,
            atom.occupancy,
            atom.temperature_factor,
            "",
            atom.element,
        )
    }
}

/// Reads every model of a PDB text. A file without `MODEL` records yields one model.
///
/// Reading stops at the first `END` record.
pub fn read_models(text: &str) -> Result<Vec<Vec<Atom>>, PdbError> {
    let mut models: Vec<Vec<Atom>> = Vec::new();
    let mut current: Vec<Atom> = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        match slice_and_trim(line, 0, 6) {
            "ATOM" | "HETATM" => current.push(parse_atom_line(line, line_num)?),
            "MODEL" => {
                if !current.is_empty() {
                    models.push(std::mem::take(&mut current));
                }
            }
            "ENDMDL" => models.push(std::mem::take(&mut current)),
            "END" => break,
            _ => {}
        }
    }
    if !current.is_empty() {
        models.push(current);
    }

    models.retain(|m| !m.is_empty());
    if models.is_empty() {
        return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
    }
    Ok(models)
}

/// Where a synthetic line was placed by [`insert_after_first_terminator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionPoint {
    /// Inserted right after the terminator found at this 0-based line index.
    AfterTerminator { terminator_line: usize },
    /// No terminator exists; the line became the first line of the document.
    Prepended,
}

impl InsertionPoint {
    /// 0-based index of the inserted line in the resulting document.
    pub fn line_index(&self) -> usize {
        match self {
            Self::AfterTerminator { terminator_line } => terminator_line + 1,
            Self::Prepended => 0,
        }
    }
}

/// Inserts `line` right after the first line starting with `TER`.
///
/// Lines are split on `\n` only, so any `\r` stays attached to its line and the
/// document round-trips byte for byte apart from the inserted line. Without a
/// terminator the line is prepended to the document.
pub fn insert_after_first_terminator(text: &str, line: &str) -> (String, InsertionPoint) {
    let mut rows: Vec<&str> = text.split('\n').collect();
    let insertion = rows
        .iter()
        .position(|row| row.starts_with(TERMINATOR_RECORD))
        .map_or(InsertionPoint::Prepended, |terminator_line| {
            InsertionPoint::AfterTerminator { terminator_line }
        });
    rows.insert(insertion.line_index(), line);
    (rows.join("\n"), insertion)
}
