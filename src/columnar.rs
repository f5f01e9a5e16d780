//! Struct-of-arrays buckets consumed by the VIBES-SODA front end.
//!
//! Every bucket keeps its columns private and only grows through `push`, so index
//! `i` across all columns always describes the same record. Field names are the
//! JSON keys the front end reads.

use serde::Serialize;
use thiserror::Error;

use crate::domain::{AlignmentHit, GeneFeature, Interval, Strand};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{bucket} columns disagree in length: {lengths:?}")]
pub struct ShapeError {
    pub bucket: &'static str,
    pub lengths: Vec<(&'static str, usize)>,
}

fn check_columns(
    bucket: &'static str,
    lengths: Vec<(&'static str, usize)>,
) -> Result<(), ShapeError> {
    let first = lengths.first().map(|(_, len)| *len).unwrap_or(0);
    if lengths.iter().all(|(_, len)| *len == first) {
        Ok(())
    } else {
        Err(ShapeError { bucket, lengths })
    }
}

/// Integrations on one target sequence of one genome.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationBucket {
    starts: Vec<u64>,
    ends: Vec<u64>,
    virus_names: Vec<String>,
    virus_starts: Vec<u64>,
    virus_ends: Vec<u64>,
    strands: Vec<Strand>,
    evalues: Vec<f64>,
}

impl IntegrationBucket {
    pub fn push(&mut self, hit: &AlignmentHit) {
        self.starts.push(hit.target.start());
        self.ends.push(hit.target.end());
        self.virus_names.push(hit.query_name.clone());
        self.virus_starts.push(hit.query.start());
        self.virus_ends.push(hit.query.end());
        self.strands.push(hit.strand);
        self.evalues.push(hit.evalue);
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    pub fn starts(&self) -> &[u64] {
        &self.starts
    }

    pub fn ends(&self) -> &[u64] {
        &self.ends
    }

    pub fn virus_names(&self) -> &[String] {
        &self.virus_names
    }

    pub fn virus_starts(&self) -> &[u64] {
        &self.virus_starts
    }

    pub fn virus_ends(&self) -> &[u64] {
        &self.virus_ends
    }

    pub fn strands(&self) -> &[Strand] {
        &self.strands
    }

    pub fn evalues(&self) -> &[f64] {
        &self.evalues
    }

    pub fn check_shape(&self) -> Result<(), ShapeError> {
        check_columns(
            "integration",
            vec![
                ("starts", self.starts.len()),
                ("ends", self.ends.len()),
                ("virusNames", self.virus_names.len()),
                ("virusStarts", self.virus_starts.len()),
                ("virusEnds", self.virus_ends.len()),
                ("strands", self.strands.len()),
                ("evalues", self.evalues.len()),
            ],
        )
    }
}

/// CDS calls on one target sequence of one genome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BacterialGeneBucket {
    starts: Vec<u64>,
    ends: Vec<u64>,
    labels: Vec<String>,
    strands: Vec<Strand>,
    locus_tags: Vec<String>,
}

impl BacterialGeneBucket {
    pub fn push(&mut self, feature: &GeneFeature) {
        self.starts.push(feature.interval.start());
        self.ends.push(feature.interval.end());
        self.labels.push(feature.label.clone());
        self.strands.push(feature.strand);
        self.locus_tags.push(feature.locus_tag.clone());
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    pub fn starts(&self) -> &[u64] {
        &self.starts
    }

    pub fn ends(&self) -> &[u64] {
        &self.ends
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn strands(&self) -> &[Strand] {
        &self.strands
    }

    pub fn locus_tags(&self) -> &[String] {
        &self.locus_tags
    }

    pub fn check_shape(&self) -> Result<(), ShapeError> {
        check_columns(
            "bacterial gene",
            vec![
                ("starts", self.starts.len()),
                ("ends", self.ends.len()),
                ("labels", self.labels.len()),
                ("strands", self.strands.len()),
                ("locusTags", self.locus_tags.len()),
            ],
        )
    }
}

/// Gene model hits on one virus. `starts`/`ends` are virus coordinates,
/// `model*` are coordinates on the gene model.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViralGeneBucket {
    starts: Vec<u64>,
    ends: Vec<u64>,
    model_starts: Vec<u64>,
    model_ends: Vec<u64>,
    model_lengths: Vec<u64>,
    labels: Vec<String>,
    strands: Vec<Strand>,
    evalues: Vec<f64>,
}

impl ViralGeneBucket {
    pub fn push(&mut self, hit: &AlignmentHit) {
        self.starts.push(hit.target.start());
        self.ends.push(hit.target.end());
        self.model_starts.push(hit.query.start());
        self.model_ends.push(hit.query.end());
        self.model_lengths.push(hit.query_length);
        self.labels.push(hit.query_name.clone());
        self.strands.push(hit.strand);
        self.evalues.push(hit.evalue);
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    pub fn starts(&self) -> &[u64] {
        &self.starts
    }

    pub fn ends(&self) -> &[u64] {
        &self.ends
    }

    pub fn model_starts(&self) -> &[u64] {
        &self.model_starts
    }

    pub fn model_ends(&self) -> &[u64] {
        &self.model_ends
    }

    pub fn model_lengths(&self) -> &[u64] {
        &self.model_lengths
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn strands(&self) -> &[Strand] {
        &self.strands
    }

    pub fn evalues(&self) -> &[f64] {
        &self.evalues
    }

    pub fn check_shape(&self) -> Result<(), ShapeError> {
        check_columns(
            "viral gene",
            vec![
                ("starts", self.starts.len()),
                ("ends", self.ends.len()),
                ("modelStarts", self.model_starts.len()),
                ("modelEnds", self.model_ends.len()),
                ("modelLengths", self.model_lengths.len()),
                ("labels", self.labels.len()),
                ("strands", self.strands.len()),
                ("evalues", self.evalues.len()),
            ],
        )
    }
}

/// Every virus-relative interval at which a virus was found integrated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OccurrenceBucket {
    starts: Vec<u64>,
    ends: Vec<u64>,
}

impl OccurrenceBucket {
    pub fn from_columns(starts: Vec<u64>, ends: Vec<u64>) -> Result<Self, ShapeError> {
        let bucket = Self { starts, ends };
        bucket.check_shape()?;
        Ok(bucket)
    }

    pub fn push(&mut self, interval: Interval) {
        self.starts.push(interval.start());
        self.ends.push(interval.end());
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    pub fn starts(&self) -> &[u64] {
        &self.starts
    }

    pub fn ends(&self) -> &[u64] {
        &self.ends
    }

    pub fn check_shape(&self) -> Result<(), ShapeError> {
        check_columns(
            "occurrence",
            vec![("starts", self.starts.len()), ("ends", self.ends.len())],
        )
    }
}
