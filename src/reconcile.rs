use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

/// A disagreement between a previously recorded length and a GFF3 header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LengthMismatch {
    pub sequence: String,
    pub recorded: u64,
    pub authoritative: u64,
    pub source: String,
}

/// Sequence name to length, in first-recorded order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LengthTable(IndexMap<String, u64>);

impl LengthTable {
    pub fn get(&self, name: &str) -> Option<u64> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(name, len)| (name.as_str(), *len))
    }

    /// Last writer wins. Returns the replaced value when it differed.
    pub fn overwrite(&mut self, name: &str, length: u64) -> Option<u64> {
        match self.0.insert(name.to_string(), length) {
            Some(previous) if previous != length => Some(previous),
            _ => None,
        }
    }

    /// Applies an authoritative length. A conflicting earlier value is replaced and
    /// reported.
    pub fn reconcile(&mut self, name: &str, length: u64, source: &str) -> Option<LengthMismatch> {
        let previous = self.0.insert(name.to_string(), length)?;
        if previous == length {
            return None;
        }
        warn!(
            sequence = name,
            from_gff3 = length,
            from_integration_tsv = previous,
            source,
            "sequence length mismatch"
        );
        Some(LengthMismatch {
            sequence: name.to_string(),
            recorded: previous,
            authoritative: length,
            source: source.to_string(),
        })
    }
}
