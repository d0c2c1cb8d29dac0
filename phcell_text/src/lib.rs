//! Plain text formats for `phcell`.
//!
//! A serialized filtration has one record per cell, in total order: the cell's vertices followed by its filtration value, comma separated.
//! ```text
//! 0,0.5
//! 1,0.5
//! 0,1,2
//! ```
//! A boundary dump has one line per column: the simplex dimension followed by the rows of the column, space separated.

use std::{
    fmt::{Debug, Display},
    hash::Hash,
    io,
    iter::once,
    str::FromStr,
};

use itertools::Itertools;
use log::debug;
use phcell::{
    complex::{Cell, CellComplex, SimplicialComplex},
    filtration::{Filtration, FiltrationT},
    matrices::BoundaryMatrix,
    pairs::Interval,
    PhcellError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("line {line}: cannot parse {token:?}")]
    Parse { line: u64, token: String },
    #[error("line {line}: expected at least one vertex and a filtration value")]
    MissingFields { line: u64 },
    #[error(transparent)]
    Complex(#[from] PhcellError),
}

fn parse_token<T: FromStr>(token: &str, line: u64) -> Result<T, TextError> {
    token.parse().map_err(|_| TextError::Parse {
        line,
        token: token.to_owned(),
    })
}

/// Writes every cell of `filtration` in total order.
pub fn write_filtration<FI, C, W>(
    filtration: &Filtration<FI, C>,
    writer: W,
) -> Result<(), TextError>
where
    FI: FiltrationT + Display,
    C: CellComplex,
    C::Value: Display,
    W: io::Write,
{
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(writer);
    let complex = filtration.complex();
    for (value, id) in filtration.cells_in_order() {
        let cell = complex
            .cell_at(id.index, id.dimension)
            .ok_or(PhcellError::MissingFiltrationValue {
                dimension: id.dimension,
                index: id.index,
            })?;
        let record = cell
            .values()
            .iter()
            .map(ToString::to_string)
            .chain(once(value.to_string()));
        wtr.write_record(record)?;
    }
    wtr.flush()?;
    debug!("Wrote {} cells", filtration.len());
    Ok(())
}

/// Reads a filtration of simplices, inserting cells in file order.
///
/// Faces must be listed before the cells they bound, otherwise this fails with [`PhcellError::MissingFace`].
pub fn read_filtration<V, FI, R>(
    reader: R,
) -> Result<Filtration<FI, SimplicialComplex<V>>, TextError>
where
    V: FromStr + Ord + Clone + Hash + Debug,
    FI: FromStr + FiltrationT,
    R: io::Read,
{
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut filtration = Filtration::new(SimplicialComplex::new());

    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let line = record.position().map_or(i as u64 + 1, |pos| pos.line());
        let fields = record.iter().collect_vec();
        // Need at least one vertex before the value
        let Some((value, vertices)) = fields.split_last().filter(|(_, rest)| !rest.is_empty())
        else {
            return Err(TextError::MissingFields { line });
        };
        let value: FI = parse_token(value, line)?;
        let vertices = vertices
            .iter()
            .map(|token| parse_token(token, line))
            .collect::<Result<Vec<V>, _>>()?;
        filtration.insert(Cell::simplex(vertices), value, false)?;
    }

    debug!("Read {} cells", filtration.len());
    Ok(filtration)
}

/// Writes `dimension row row ...` for every column, with rows shifted down by one if `zero_based`.
pub fn write_boundary_matrix<W: io::Write>(
    matrix: &BoundaryMatrix,
    mut writer: W,
    zero_based: bool,
) -> Result<(), TextError> {
    let shift = usize::from(zero_based);
    for column in matrix.columns() {
        let line = once(column.simplex_dimension())
            .chain(column.iter().map(|row| row - shift))
            .join(" ");
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes one line per interval, `dimension start end`, with `inf` for essential intervals.
pub fn write_intervals<FI: Display, W: io::Write>(
    intervals: &[Vec<Interval<FI>>],
    mut writer: W,
) -> Result<(), TextError> {
    for (dim, bucket) in intervals.iter().enumerate() {
        for interval in bucket {
            match &interval.end {
                Some(end) => writeln!(writer, "{dim} {} {end}", interval.start)?,
                None => writeln!(writer, "{dim} {} inf", interval.start)?,
            }
        }
    }
    Ok(())
}
