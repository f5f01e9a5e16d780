use std::fmt;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::error::VibesError;

/// Closed 1-based coordinate pair, always stored with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    start: u64,
    end: u64,
}

impl Interval {
    /// Builds an interval from coordinates in either order; reversed pairs are swapped.
    pub fn new(a: u64, b: u64) -> Self {
        if a > b {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Forward,
    Reverse,
    Unstranded,
    Unknown,
}

impl Strand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Forward => "+",
            Strand::Reverse => "-",
            Strand::Unstranded => ".",
            Strand::Unknown => "?",
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strand {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            "." => Ok(Strand::Unstranded),
            "?" => Ok(Strand::Unknown),
            other => Err(format!("invalid strand {other:?}")),
        }
    }
}

impl Serialize for Strand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One row of an integration or viral-gene alignment table.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentHit {
    pub query_name: String,
    pub evalue: f64,
    pub query: Interval,
    pub query_length: u64,
    pub target_name: String,
    pub target: Interval,
    pub target_length: u64,
    pub strand: Strand,
}

/// A `CDS` record from a GFF3 file.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneFeature {
    pub sequence_name: String,
    pub interval: Interval,
    pub strand: Strand,
    pub label: String,
    pub locus_tag: String,
}

/// Column 9 of a GFF3 feature line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(IndexMap<String, String>);

impl Attributes {
    pub fn parse(column: &str) -> Result<Self, String> {
        let mut map = IndexMap::new();
        for token in column.trim().split(';') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let (key, value) = token
                .split_once('=')
                .ok_or_else(|| format!("attribute {token:?} has no '=' separator"))?;
            map.insert(key.to_string(), value.to_string());
        }
        Ok(Self(map))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn locus_tag(&self) -> Option<&str> {
        self.get("locus_tag")
    }

    /// `gene`, then `Name`, then `locus_tag`.
    pub fn display_label(&self) -> Option<&str> {
        self.get("gene")
            .or_else(|| self.get("Name"))
            .or_else(|| self.locus_tag())
    }
}

/// Genome or virus name taken from a file name: everything before the first `.`.
pub fn sequence_id_from_path(path: &Path) -> Result<String, VibesError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            VibesError::Filesystem(format!("no usable file name in {}", path.display()))
        })?;
    let stem = file_name.split('.').next().unwrap_or(file_name);
    if stem.is_empty() {
        return Err(VibesError::Filesystem(format!(
            "cannot derive a sequence name from {}",
            path.display()
        )));
    }
    Ok(stem.to_string())
}
