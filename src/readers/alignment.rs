use std::str::FromStr;

use crate::domain::{AlignmentHit, Interval, Strand};
use crate::error::VibesError;
use crate::model::ModelBuilder;

const QUERY_NAME: usize = 0;
const EVALUE: usize = 3;
const QUERY_START: usize = 5;
const QUERY_END: usize = 6;
const QUERY_LENGTH: usize = 7;
const TARGET_NAME: usize = 9;
const TARGET_START: usize = 10;
const TARGET_END: usize = 11;
const TARGET_LENGTH: usize = 12;
const STRAND: usize = 13;
const COLUMNS: usize = 14;

fn field<T: FromStr>(
    columns: &[&str],
    index: usize,
    what: &str,
    source: &str,
    line: usize,
) -> Result<T, VibesError> {
    let raw = columns[index].trim();
    raw.parse::<T>().map_err(|_| {
        VibesError::format(
            source,
            line,
            format!("column {index} ({what}) is not numeric: {raw:?}"),
        )
    })
}

/// Parses one data row. `line` is 1-based and only used for error messages.
pub fn parse_alignment_row(
    text: &str,
    source: &str,
    line: usize,
) -> Result<AlignmentHit, VibesError> {
    let columns: Vec<&str> = text.trim_end_matches(['\r', '\n']).split('\t').collect();
    if columns.len() != COLUMNS {
        return Err(VibesError::format(
            source,
            line,
            format!("expected {COLUMNS} tab-separated columns, found {}", columns.len()),
        ));
    }

    let query_start: u64 = field(&columns, QUERY_START, "query start", source, line)?;
    let query_end: u64 = field(&columns, QUERY_END, "query end", source, line)?;
    let target_start: u64 = field(&columns, TARGET_START, "target start", source, line)?;
    let target_end: u64 = field(&columns, TARGET_END, "target end", source, line)?;
    let strand = columns[STRAND]
        .parse::<Strand>()
        .map_err(|message| VibesError::format(source, line, message))?;

    let evalue: f64 = field(&columns, EVALUE, "e-value", source, line)?;
    if !evalue.is_finite() {
        return Err(VibesError::format(
            source,
            line,
            format!("e-value is not a finite number: {:?}", columns[EVALUE]),
        ));
    }

    Ok(AlignmentHit {
        query_name: columns[QUERY_NAME].to_string(),
        evalue,
        query: Interval::new(query_start, query_end),
        query_length: field(&columns, QUERY_LENGTH, "query length", source, line)?,
        target_name: columns[TARGET_NAME].to_string(),
        target: Interval::new(target_start, target_end),
        target_length: field(&columns, TARGET_LENGTH, "target length", source, line)?,
        strand,
    })
}

/// Data rows of a table with a header line, paired with their 1-based line numbers.
fn data_rows(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .skip(1)
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
}

/// Reads a bacterial integration table for `genome`. Returns the number of rows.
pub fn read_integration_table(
    builder: &mut ModelBuilder,
    genome: &str,
    text: &str,
    source: &str,
) -> Result<usize, VibesError> {
    builder.open_integration_genome(genome);
    let mut rows = 0;
    for (line, row) in data_rows(text) {
        let hit = parse_alignment_row(row, source, line)?;
        builder.add_integration(genome, &hit);
        rows += 1;
    }
    Ok(rows)
}

/// Reads a viral gene annotation table for `virus`. Returns the number of rows.
pub fn read_viral_gene_table(
    builder: &mut ModelBuilder,
    virus: &str,
    text: &str,
    source: &str,
) -> Result<usize, VibesError> {
    builder.open_viral_genome(virus);
    let mut rows = 0;
    for (line, row) in data_rows(text) {
        let hit = parse_alignment_row(row, source, line)?;
        builder.add_viral_gene(virus, &hit);
        rows += 1;
    }
    Ok(rows)
}
