use std::path::Path;

use crate::domain::{Attributes, GeneFeature, Interval, Strand};
use crate::error::VibesError;
use crate::model::ModelBuilder;

/// Header marker, including the separating space.
const SEQUENCE_REGION: &str = "##sequence-region ";
const FEATURE_COLUMNS: usize = 9;

/// A `##sequence-region <name> <start> <end>` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRegion {
    pub name: String,
    pub length: u64,
}

pub fn parse_sequence_region(
    text: &str,
    source: &str,
    line: usize,
) -> Result<SequenceRegion, VibesError> {
    let tokens: Vec<&str> = match text.strip_prefix(SEQUENCE_REGION) {
        Some(rest) => rest.split_whitespace().collect(),
        None => Vec::new(),
    };
    if tokens.len() < 3 {
        return Err(VibesError::format(
            source,
            line,
            format!("expected `{SEQUENCE_REGION}<name> <start> <end>`, found {text:?}"),
        ));
    }
    let length = tokens[2].parse::<u64>().map_err(|_| {
        VibesError::format(
            source,
            line,
            format!("sequence length is not numeric: {:?}", tokens[2]),
        )
    })?;
    Ok(SequenceRegion {
        name: tokens[0].to_string(),
        length,
    })
}

/// Parses a feature line. Returns `None` for feature types other than `CDS`.
pub fn parse_feature_line(
    text: &str,
    source: &str,
    line: usize,
) -> Result<Option<GeneFeature>, VibesError> {
    let columns: Vec<&str> = text.trim_end_matches(['\r', '\n']).split('\t').collect();
    if columns.len() != FEATURE_COLUMNS {
        return Err(VibesError::format(
            source,
            line,
            format!("expected {FEATURE_COLUMNS} tab-separated columns, found {}", columns.len()),
        ));
    }
    if columns[2] != "CDS" {
        return Ok(None);
    }

    let attributes = Attributes::parse(columns[8])
        .map_err(|message| VibesError::format(source, line, message))?;
    let locus_tag = attributes
        .locus_tag()
        .ok_or_else(|| VibesError::format(source, line, "CDS has no locus_tag attribute"))?;
    let label = attributes.display_label().unwrap_or(locus_tag);

    let coordinate = |index: usize| {
        columns[index].trim().parse::<u64>().map_err(|_| {
            VibesError::format(
                source,
                line,
                format!("column {index} is not numeric: {:?}", columns[index]),
            )
        })
    };
    let interval = Interval::new(coordinate(3)?, coordinate(4)?);
    let strand = columns[6]
        .parse::<Strand>()
        .map_err(|message| VibesError::format(source, line, message))?;

    Ok(Some(GeneFeature {
        sequence_name: columns[0].to_string(),
        interval,
        strand,
        label: label.to_string(),
        locus_tag: locus_tag.to_string(),
    }))
}

/// Reads a GFF3 file of bacterial gene calls for `genome`.
///
/// Sequence-region headers are applied first, and override lengths recorded by
/// the integration tables. Feature parsing stops at the first `>` line, which
/// starts the embedded FASTA section. Returns the number of CDS records added.
pub fn read_gene_features(
    builder: &mut ModelBuilder,
    genome: &str,
    text: &str,
    path: &Path,
) -> Result<usize, VibesError> {
    let source = path.display().to_string();

    let regions = text
        .lines()
        .enumerate()
        .filter(|(_, line)| line.starts_with(SEQUENCE_REGION))
        .map(|(index, line)| parse_sequence_region(line, &source, index + 1))
        .collect::<Result<Vec<_>, VibesError>>()?;
    if regions.is_empty() {
        return Err(VibesError::MissingAuthority(path.to_path_buf()));
    }

    builder.open_gene_genome(genome);
    for region in &regions {
        builder.reconcile_sequence_length(&region.name, region.length, &source);
    }

    let mut features = 0;
    for (index, line) in text.lines().enumerate() {
        if line.starts_with('>') {
            break;
        }
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        if let Some(feature) = parse_feature_line(line, &source, index + 1)? {
            builder.add_bacterial_gene(genome, &feature);
            features += 1;
        }
    }
    Ok(features)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use assert_matches::assert_matches;

    use super::*;

    const CDS: &str = concat!(
        "gnl|Prokka|X_1\tProdigal:002006\tCDS\t1371\t1\t.\t-\t0\t",
        "ID=X_00001;Name=mnmE;gene=mnmE;locus_tag=X_00001",
    );

    #[test]
    fn parses_sequence_region_header() {
        let region =
            parse_sequence_region("##sequence-region chr1 1 5000", "g.gff", 2).unwrap();
        assert_eq!(region.name, "chr1");
        assert_eq!(region.length, 5000);
    }

    #[test]
    fn rejects_truncated_sequence_region() {
        let err = parse_sequence_region("##sequence-region chr1 1", "g.gff", 2).unwrap_err();
        assert_matches!(err, VibesError::Format { line: 2, .. });
    }

    #[test]
    fn parses_cds_line() {
        let feature = parse_feature_line(CDS, "g.gff", 3).unwrap().unwrap();
        assert_eq!(feature.sequence_name, "gnl|Prokka|X_1");
        assert_eq!((feature.interval.start(), feature.interval.end()), (1, 1371));
        assert_eq!(feature.strand, Strand::Reverse);
        assert_eq!(feature.label, "mnmE");
        assert_eq!(feature.locus_tag, "X_00001");
    }

    #[test]
    fn rejects_extra_feature_columns() {
        let line = format!("{CDS}\textra");
        assert_matches!(
            parse_feature_line(&line, "g.gff", 3),
            Err(VibesError::Format { ref message, .. }) if message.contains("found 10")
        );
    }

    #[test]
    fn skips_non_cds_without_parsing_attributes() {
        let gene = "chr1\tProdigal\tgene\t1\t10\t.\t+\t0\tnot-an-attribute";
        assert!(parse_feature_line(gene, "g.gff", 3).unwrap().is_none());
    }

    #[test]
    fn rejects_attribute_without_separator() {
        let line = "chr1\tProdigal\tCDS\t1\t10\t.\t+\t0\tlocus_tag=L1;broken";
        assert_matches!(
            parse_feature_line(line, "g.gff", 3),
            Err(VibesError::Format { .. })
        );
    }

    #[test]
    fn missing_headers_abort_before_features() {
        let text = format!("##gff-version 3\n{CDS}\n");
        let mut builder = ModelBuilder::new();
        let err = read_gene_features(&mut builder, "g", &text, &PathBuf::from("g.gff"))
            .unwrap_err();
        assert_matches!(err, VibesError::MissingAuthority(_));
        assert!(builder.model().bacterial_genes("g").is_none());
    }

    #[test]
    fn marker_without_space_is_a_comment() {
        let text = format!("##sequence-regionX chr9\n##sequence-region chr1 1 5000\n{CDS}\n");
        let mut builder = ModelBuilder::new();
        read_gene_features(&mut builder, "g", &text, &PathBuf::from("g.gff")).unwrap();
        let lengths = builder.model().bacteria_sequence_lengths();
        assert_eq!(lengths.get("chr1"), Some(5000));
        assert_eq!(lengths.get("chr9"), None);
    }

    #[test]
    fn stops_at_fasta_section() {
        let text = format!(
            "##gff-version 3\n##sequence-region gnl|Prokka|X_1 1 5000\n{CDS}\n\
             ##FASTA\n>gnl|Prokka|X_1\nACGT\tCDS\n"
        );
        let mut builder = ModelBuilder::new();
        let added =
            read_gene_features(&mut builder, "g", &text, &PathBuf::from("g.gff")).unwrap();
        assert_eq!(added, 1);
        let lengths = builder.model().bacteria_sequence_lengths();
        assert_eq!(lengths.get("gnl|Prokka|X_1"), Some(5000));
    }
}
