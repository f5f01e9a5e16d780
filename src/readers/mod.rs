//! Format readers for the three kinds of VIBES output.
//!
//! The `read_*` functions in the submodules work on in-memory text; the
//! `ingest_*` functions here load a file and name the genome or virus after it.

pub mod alignment;
pub mod gene_feature;

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::domain::sequence_id_from_path;
use crate::error::VibesError;
use crate::model::ModelBuilder;

pub use alignment::{parse_alignment_row, read_integration_table, read_viral_gene_table};
pub use gene_feature::{
    SequenceRegion, parse_feature_line, parse_sequence_region, read_gene_features,
};

fn read_text(path: &Path) -> Result<String, VibesError> {
    fs::read_to_string(path)
        .map_err(|err| VibesError::Filesystem(format!("read {}: {err}", path.display())))
}

pub fn ingest_integration_table(
    builder: &mut ModelBuilder,
    path: &Path,
) -> Result<usize, VibesError> {
    let genome = sequence_id_from_path(path)?;
    let text = read_text(path)?;
    let rows = read_integration_table(builder, &genome, &text, &path.display().to_string())?;
    debug!(genome = %genome, rows, path = %path.display(), "integration table read");
    Ok(rows)
}

pub fn ingest_viral_gene_table(
    builder: &mut ModelBuilder,
    path: &Path,
) -> Result<usize, VibesError> {
    let virus = sequence_id_from_path(path)?;
    let text = read_text(path)?;
    let rows = read_viral_gene_table(builder, &virus, &text, &path.display().to_string())?;
    debug!(virus = %virus, rows, path = %path.display(), "viral gene table read");
    Ok(rows)
}

pub fn ingest_gene_features(
    builder: &mut ModelBuilder,
    path: &Path,
) -> Result<usize, VibesError> {
    let genome = sequence_id_from_path(path)?;
    let text = read_text(path)?;
    let features = read_gene_features(builder, &genome, &text, path)?;
    debug!(genome = %genome, features, path = %path.display(), "gene features read");
    Ok(features)
}
