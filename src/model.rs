use indexmap::IndexMap;
use tracing::debug;

use crate::columnar::{BacterialGeneBucket, IntegrationBucket, OccurrenceBucket, ViralGeneBucket};
use crate::domain::{AlignmentHit, GeneFeature};
use crate::error::VibesError;
use crate::reconcile::{LengthMismatch, LengthTable};

/// Target sequence name to bucket, for one genome.
pub type SequenceBuckets<B> = IndexMap<String, B>;

/// Everything read from one VIBES output directory. Built through [`ModelBuilder`],
/// read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntegrationModel {
    pub(crate) bacteria_sequence_lengths: LengthTable,
    pub(crate) virus_lengths: LengthTable,
    pub(crate) integrations: IndexMap<String, SequenceBuckets<IntegrationBucket>>,
    pub(crate) bacterial_genes: IndexMap<String, SequenceBuckets<BacterialGeneBucket>>,
    pub(crate) viral_genes: IndexMap<String, ViralGeneBucket>,
    pub(crate) occurrences: IndexMap<String, OccurrenceBucket>,
    pub(crate) length_mismatches: Vec<LengthMismatch>,
}

impl IntegrationModel {
    /// Genomes with an integration table, in the order their tables were read.
    pub fn genome_names(&self) -> impl Iterator<Item = &str> {
        self.integrations.keys().map(String::as_str)
    }

    pub fn bacteria_sequence_lengths(&self) -> &LengthTable {
        &self.bacteria_sequence_lengths
    }

    pub fn virus_lengths(&self) -> &LengthTable {
        &self.virus_lengths
    }

    pub fn integrations(&self, genome: &str) -> Option<&SequenceBuckets<IntegrationBucket>> {
        self.integrations.get(genome)
    }

    pub fn bacterial_genes(&self, genome: &str) -> Option<&SequenceBuckets<BacterialGeneBucket>> {
        self.bacterial_genes.get(genome)
    }

    pub fn viral_genes(&self) -> &IndexMap<String, ViralGeneBucket> {
        &self.viral_genes
    }

    pub fn occurrences(&self) -> &IndexMap<String, OccurrenceBucket> {
        &self.occurrences
    }

    pub fn length_mismatches(&self) -> &[LengthMismatch] {
        &self.length_mismatches
    }

    fn check_shapes(&self) -> Result<(), VibesError> {
        for buckets in self.integrations.values() {
            for bucket in buckets.values() {
                bucket.check_shape()?;
            }
        }
        for buckets in self.bacterial_genes.values() {
            for bucket in buckets.values() {
                bucket.check_shape()?;
            }
        }
        for bucket in self.viral_genes.values() {
            bucket.check_shape()?;
        }
        for bucket in self.occurrences.values() {
            bucket.check_shape()?;
        }
        Ok(())
    }
}

/// Single-writer accumulator fed by the format readers.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    model: IntegrationModel,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access while building, e.g. to inspect lengths between reader calls.
    pub fn model(&self) -> &IntegrationModel {
        &self.model
    }

    /// Registers a genome even when its integration table has no rows.
    pub fn open_integration_genome(&mut self, genome: &str) {
        self.model
            .integrations
            .entry(genome.to_string())
            .or_default();
    }

    pub fn add_integration(&mut self, genome: &str, hit: &AlignmentHit) {
        let model = &mut self.model;
        let buckets = model.integrations.entry(genome.to_string()).or_default();
        if !buckets.contains_key(&hit.target_name) {
            model
                .bacteria_sequence_lengths
                .overwrite(&hit.target_name, hit.target_length);
        }
        buckets
            .entry(hit.target_name.clone())
            .or_default()
            .push(hit);

        if let Some(previous) = model.virus_lengths.overwrite(&hit.query_name, hit.query_length) {
            debug!(
                virus = %hit.query_name,
                previous,
                length = hit.query_length,
                "virus length replaced by integration table"
            );
        }
        model
            .occurrences
            .entry(hit.query_name.clone())
            .or_default()
            .push(hit.query);
    }

    /// Registers a virus even when its gene table has no rows.
    pub fn open_viral_genome(&mut self, virus: &str) {
        self.model.viral_genes.entry(virus.to_string()).or_default();
    }

    /// Virus length comes from the target length here, unlike [`Self::add_integration`].
    pub fn add_viral_gene(&mut self, virus: &str, hit: &AlignmentHit) {
        let model = &mut self.model;
        model
            .viral_genes
            .entry(virus.to_string())
            .or_default()
            .push(hit);
        if let Some(previous) = model.virus_lengths.overwrite(virus, hit.target_length) {
            debug!(
                virus,
                previous,
                length = hit.target_length,
                "virus length replaced by viral gene table"
            );
        }
    }

    pub fn open_gene_genome(&mut self, genome: &str) {
        self.model
            .bacterial_genes
            .entry(genome.to_string())
            .or_default();
    }

    pub fn reconcile_sequence_length(&mut self, sequence: &str, length: u64, source: &str) {
        if let Some(mismatch) = self
            .model
            .bacteria_sequence_lengths
            .reconcile(sequence, length, source)
        {
            self.model.length_mismatches.push(mismatch);
        }
    }

    pub fn add_bacterial_gene(&mut self, genome: &str, feature: &GeneFeature) {
        self.model
            .bacterial_genes
            .entry(genome.to_string())
            .or_default()
            .entry(feature.sequence_name.clone())
            .or_default()
            .push(feature);
    }

    /// Freezes the model after checking every bucket's column lengths.
    pub fn finish(self) -> Result<IntegrationModel, VibesError> {
        self.model.check_shapes()?;
        Ok(self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Interval, Strand};

    fn hit(query: &str, target: &str, target_length: u64) -> AlignmentHit {
        AlignmentHit {
            query_name: query.to_string(),
            evalue: 0.5,
            query: Interval::new(30, 10),
            query_length: 50,
            target_name: target.to_string(),
            target: Interval::new(100, 200),
            target_length,
            strand: Strand::Forward,
        }
    }

    #[test]
    fn integration_updates_lengths_and_occurrences() {
        let mut builder = ModelBuilder::new();
        builder.add_integration("g1", &hit("v1", "chr1", 5000));
        builder.add_integration("g2", &hit("v1", "chr9", 7000));
        let model = builder.finish().unwrap();

        assert_eq!(model.bacteria_sequence_lengths().get("chr1"), Some(5000));
        assert_eq!(model.virus_lengths().get("v1"), Some(50));
        let occurrences = &model.occurrences()["v1"];
        assert_eq!(occurrences.len(), 2);
        assert_eq!(occurrences.starts(), &[10, 10]);
        assert_eq!(occurrences.ends(), &[30, 30]);
    }

    #[test]
    fn target_length_recorded_when_bucket_created() {
        let mut builder = ModelBuilder::new();
        builder.add_integration("g1", &hit("v1", "chr1", 5000));
        builder.add_integration("g1", &hit("v2", "chr1", 9999));
        assert_eq!(
            builder.model().bacteria_sequence_lengths().get("chr1"),
            Some(5000)
        );
        builder.add_integration("g2", &hit("v2", "chr1", 6000));
        assert_eq!(
            builder.model().bacteria_sequence_lengths().get("chr1"),
            Some(6000)
        );
    }

    #[test]
    fn viral_gene_table_wins_virus_length() {
        let mut builder = ModelBuilder::new();
        builder.add_integration("g1", &hit("v1", "chr1", 5000));
        builder.add_viral_gene("v1", &hit("integrase", "v1", 48_000));
        let model = builder.finish().unwrap();
        assert_eq!(model.virus_lengths().get("v1"), Some(48_000));
        assert!(model.length_mismatches().is_empty());
    }

    #[test]
    fn reconcile_collects_mismatches() {
        let mut builder = ModelBuilder::new();
        builder.add_integration("g1", &hit("v1", "chr1", 5000));
        builder.reconcile_sequence_length("chr1", 5001, "g1.gff");
        builder.reconcile_sequence_length("chr2", 10, "g1.gff");
        let model = builder.finish().unwrap();
        assert_eq!(model.length_mismatches().len(), 1);
        assert_eq!(model.bacteria_sequence_lengths().get("chr1"), Some(5001));
        assert_eq!(model.bacteria_sequence_lengths().get("chr2"), Some(10));
    }

    #[test]
    fn empty_tables_still_register_keys() {
        let mut builder = ModelBuilder::new();
        builder.open_integration_genome("g1");
        builder.open_viral_genome("v1");
        builder.open_gene_genome("g1");
        let model = builder.finish().unwrap();
        assert_eq!(model.genome_names().collect::<Vec<_>>(), vec!["g1"]);
        assert!(model.viral_genes()["v1"].is_empty());
        assert!(model.bacterial_genes("g1").unwrap().is_empty());
    }
}
