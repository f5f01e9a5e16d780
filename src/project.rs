use indexmap::{IndexMap, IndexSet};

use crate::columnar::{BacterialGeneBucket, IntegrationBucket, OccurrenceBucket, ViralGeneBucket};
use crate::error::VibesError;
use crate::model::IntegrationModel;

/// The slice of an [`IntegrationModel`] needed to draw one genome.
#[derive(Debug, Clone, PartialEq)]
pub struct GenomeProjection<'a> {
    pub genome: &'a str,
    /// Integration targets first, then gene-only sequences.
    pub sequence_names: Vec<&'a str>,
    /// Aligned with `sequence_names`.
    pub sequence_lengths: Vec<u64>,
    /// Viruses integrated into this genome, sorted.
    pub virus_names: Vec<&'a str>,
    /// Aligned with `virus_names`.
    pub virus_lengths: Vec<u64>,
    pub integrations: IndexMap<&'a str, &'a IntegrationBucket>,
    pub bacterial_genes: IndexMap<&'a str, &'a BacterialGeneBucket>,
    pub viral_genes: IndexMap<&'a str, &'a ViralGeneBucket>,
    pub occurrences: IndexMap<&'a str, &'a OccurrenceBucket>,
}

impl IntegrationModel {
    pub fn project<'a>(&'a self, genome: &'a str) -> Result<GenomeProjection<'a>, VibesError> {
        let integrations: IndexMap<&str, &IntegrationBucket> = self
            .integrations(genome)
            .into_iter()
            .flatten()
            .map(|(name, bucket)| (name.as_str(), bucket))
            .collect();
        let bacterial_genes: IndexMap<&str, &BacterialGeneBucket> = self
            .bacterial_genes(genome)
            .into_iter()
            .flatten()
            .map(|(name, bucket)| (name.as_str(), bucket))
            .collect();

        let sequence_names: Vec<&str> = integrations
            .keys()
            .chain(bacterial_genes.keys())
            .copied()
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();
        let sequence_lengths = sequence_names
            .iter()
            .map(|&sequence| {
                self.bacteria_sequence_lengths
                    .get(sequence)
                    .ok_or_else(|| VibesError::UnknownSequenceLength {
                        genome: genome.to_string(),
                        sequence: sequence.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut virus_names: Vec<&str> = integrations
            .values()
            .flat_map(|bucket| bucket.virus_names().iter().map(String::as_str))
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();
        virus_names.sort_unstable();
        let virus_lengths = virus_names
            .iter()
            .map(|&virus| {
                self.virus_lengths
                    .get(virus)
                    .ok_or_else(|| VibesError::UnknownVirusLength {
                        genome: genome.to_string(),
                        virus: virus.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let viral_genes = virus_names
            .iter()
            .filter_map(|&virus| self.viral_genes.get(virus).map(|bucket| (virus, bucket)))
            .collect();
        let occurrences = virus_names
            .iter()
            .filter_map(|&virus| self.occurrences.get(virus).map(|bucket| (virus, bucket)))
            .collect();

        Ok(GenomeProjection {
            genome,
            sequence_names,
            sequence_lengths,
            virus_names,
            virus_lengths,
            integrations,
            bacterial_genes,
            viral_genes,
            occurrences,
        })
    }
}
