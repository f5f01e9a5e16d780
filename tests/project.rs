use std::path::PathBuf;

use assert_matches::assert_matches;

use vibes_viz::error::VibesError;
use vibes_viz::model::{IntegrationModel, ModelBuilder};
use vibes_viz::readers::{read_gene_features, read_integration_table, read_viral_gene_table};
use vibes_viz::render::render_data_block;

const HEADER: &str = concat!(
    "query\tacc_q\tacc\tevalue\tfull\tqstart\tqend\tqlen\tstrand_q\t",
    "target\ttstart\ttend\ttlen\tstrand",
);

fn row(virus: &str, qlen: u64, target: &str, tstart: u64, tend: u64, tlen: u64) -> String {
    format!("{virus}\t-\t-\t2.5e-12\tT\t1\t40\t{qlen}\t-\t{target}\t{tstart}\t{tend}\t{tlen}\t-")
}

fn sample_model() -> IntegrationModel {
    let mut builder = ModelBuilder::new();
    let genome_a = format!(
        "{HEADER}\n{}\n{}\n{}\n",
        row("v2", 2000, "a_chr1", 500, 400, 10_000),
        row("v1", 1000, "a_chr2", 10, 60, 3_000),
        row("v2", 2000, "a_chr1", 900, 950, 10_000),
    );
    read_integration_table(&mut builder, "genomeA", &genome_a, "genomeA.tsv").unwrap();
    let genome_b = format!("{HEADER}\n{}\n", row("v3", 3000, "b_chr1", 1, 40, 8_000));
    read_integration_table(&mut builder, "genomeB", &genome_b, "genomeB.tsv").unwrap();

    let v1_genes = format!(
        "{HEADER}\nintegrase\t-\t-\t1e-40\tT\t1\t300\t310\t-\tv1\t100\t400\t1000\t+\n"
    );
    read_viral_gene_table(&mut builder, "v1", &v1_genes, "v1.tsv").unwrap();
    let v3_genes = format!(
        "{HEADER}\ncapsid\t-\t-\t1e-10\tT\t1\t90\t95\t-\tv3\t900\t810\t3000\t-\n"
    );
    read_viral_gene_table(&mut builder, "v3", &v3_genes, "v3.tsv").unwrap();

    let gff = "##gff-version 3\n\
        ##sequence-region a_chr1 1 10000\n\
        ##sequence-region a_plasmid 1 4000\n\
        a_plasmid\tProdigal\tCDS\t5\t95\t.\t+\t0\tID=p1;locus_tag=A_00001\n\
        a_chr1\tProdigal\tCDS\t100\t400\t.\t-\t0\tID=c1;Name=dnaA;locus_tag=A_00002\n\
        a_chr1\tProdigal\tgene\t100\t400\t.\t-\t0\tID=c1_gene\n";
    read_gene_features(&mut builder, "genomeA", gff, &PathBuf::from("genomeA.gff")).unwrap();

    builder.finish().unwrap()
}

#[test]
fn virus_lengths_follow_sorted_names() {
    let model = sample_model();
    let projection = model.project("genomeA").unwrap();
    assert_eq!(projection.virus_names, vec!["v1", "v2"]);
    assert_eq!(projection.virus_lengths, vec![1000, 2000]);
}

#[test]
fn sequence_lengths_align_with_union_order() {
    let model = sample_model();
    let projection = model.project("genomeA").unwrap();
    assert_eq!(projection.sequence_names, vec!["a_chr1", "a_chr2", "a_plasmid"]);
    assert_eq!(projection.sequence_lengths, vec![10_000, 3_000, 4_000]);
}

#[test]
fn projection_only_carries_integrated_viruses() {
    let model = sample_model();
    let projection = model.project("genomeA").unwrap();
    assert_eq!(projection.viral_genes.keys().copied().collect::<Vec<_>>(), vec!["v1"]);
    assert_eq!(
        projection.occurrences.keys().copied().collect::<Vec<_>>(),
        vec!["v1", "v2"]
    );
    assert_eq!(projection.occurrences["v2"].len(), 2);

    let other = model.project("genomeB").unwrap();
    assert_eq!(other.virus_names, vec!["v3"]);
    assert_eq!(other.virus_lengths, vec![3000]);
    assert!(other.bacterial_genes.is_empty());
}

#[test]
fn rendering_is_deterministic() {
    let model = sample_model();
    let first = render_data_block(&model.project("genomeA").unwrap()).unwrap();
    let second = render_data_block(&model.project("genomeA").unwrap()).unwrap();
    assert_eq!(first, second);
    assert!(first.contains("let virusLengths = [1000,2000];"));
    assert!(first.contains("let bacteriaSequenceLengths = [10000,3000,4000];"));
    assert!(first.contains(r#""labels":["A_00001"]"#));
}

#[test]
fn unknown_genome_projects_to_empty_record() {
    let model = sample_model();
    let projection = model.project("not-a-genome").unwrap();
    assert!(projection.sequence_names.is_empty());
    assert!(projection.virus_names.is_empty());
    assert!(projection.integrations.is_empty());
}

#[test]
fn gene_only_sequence_without_header_is_lookup_error() {
    let mut builder = ModelBuilder::new();
    let gff = "##sequence-region chr1 1 500\nchr9\tProdigal\tCDS\t1\t90\t.\t+\t0\tlocus_tag=X_1\n";
    read_gene_features(&mut builder, "g", gff, &PathBuf::from("g.gff")).unwrap();
    let model = builder.finish().unwrap();
    assert_matches!(
        model.project("g"),
        Err(VibesError::UnknownSequenceLength { sequence, .. }) if sequence == "chr9"
    );
}
