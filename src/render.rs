use serde::Serialize;

use crate::error::VibesError;
use crate::project::GenomeProjection;

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, VibesError> {
    serde_json::to_string(value).map_err(|err| VibesError::Serialize(err.to_string()))
}

fn join_numbers(values: &[u64]) -> String {
    values
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Renders the JS declarations that the page template expects for one genome.
///
/// Output is a pure function of the projection, so the same projection always
/// renders to the same bytes.
pub fn render_data_block(projection: &GenomeProjection<'_>) -> Result<String, VibesError> {
    let mut block = String::new();
    let declarations = [
        ("bacteriaName", to_json(projection.genome)?),
        (
            "bacteriaSequenceLengths",
            format!("[{}]", join_numbers(&projection.sequence_lengths)),
        ),
        (
            "virusLengths",
            format!("[{}]", join_numbers(&projection.virus_lengths)),
        ),
        ("integrationData", to_json(&projection.integrations)?),
        ("bacterialGeneData", to_json(&projection.bacterial_genes)?),
        ("viralGeneData", to_json(&projection.viral_genes)?),
        ("occurrenceData", to_json(&projection.occurrences)?),
    ];
    block.push('\n');
    for (name, value) in declarations {
        block.push_str(&format!("let {name} = {value};\n\n"));
    }
    Ok(block)
}

/// `bacteriaNames = [...]` for the genome picker.
pub fn render_genome_index<'a>(
    names: impl IntoIterator<Item = &'a str>,
) -> Result<String, VibesError> {
    let names: Vec<&str> = names.into_iter().collect();
    Ok(format!("bacteriaNames = {};", to_json(&names)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AlignmentHit, Interval, Strand};
    use crate::model::ModelBuilder;

    #[test]
    fn renders_declarations_in_order() {
        let mut builder = ModelBuilder::new();
        builder.add_integration(
            "genomeA",
            &AlignmentHit {
                query_name: "phageX".to_string(),
                evalue: 1.0,
                query: Interval::new(10, 20),
                query_length: 50,
                target_name: "chr1".to_string(),
                target: Interval::new(200, 150),
                target_length: 5000,
                strand: Strand::Forward,
            },
        );
        let model = builder.finish().unwrap();
        let block = render_data_block(&model.project("genomeA").unwrap()).unwrap();

        let expected = "\nlet bacteriaName = \"genomeA\";\n\n\
            let bacteriaSequenceLengths = [5000];\n\n\
            let virusLengths = [50];\n\n\
            let integrationData = {\"chr1\":{\"starts\":[150],\"ends\":[200],\
            \"virusNames\":[\"phageX\"],\"virusStarts\":[10],\"virusEnds\":[20],\
            \"strands\":[\"+\"],\"evalues\":[1.0]}};\n\n\
            let bacterialGeneData = {};\n\n\
            let viralGeneData = {};\n\n\
            let occurrenceData = {\"phageX\":{\"starts\":[10],\"ends\":[20]}};\n\n";
        assert_eq!(block, expected);
    }

    #[test]
    fn genome_index_quotes_names() {
        let index = render_genome_index(["g1", "g\"2"]).unwrap();
        assert_eq!(index, r#"bacteriaNames = ["g1","g\"2"];"#);
    }
}
