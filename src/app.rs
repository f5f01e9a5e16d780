use std::time::{Duration, Instant};

use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::config::ResolvedConfig;
use crate::error::VibesError;
use crate::fs_util::{list_files_with_extension, read_text, write_atomic};
use crate::model::{IntegrationModel, ModelBuilder};
use crate::readers::{ingest_gene_features, ingest_integration_table, ingest_viral_gene_table};
use crate::reconcile::LengthMismatch;
use crate::render::{render_data_block, render_genome_index};
use crate::template::{PageTemplate, combine_document};

pub const GENOME_INDEX_FILE: &str = "bacteria.js";

/// Input files found under a VIBES output directory, each list sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputLayout {
    pub integrations: Vec<Utf8PathBuf>,
    pub viral_genes: Vec<Utf8PathBuf>,
    pub gene_features: Vec<Utf8PathBuf>,
}

impl InputLayout {
    pub fn discover(root: &Utf8Path) -> Result<Self, VibesError> {
        Ok(Self {
            integrations: list_files_with_extension(
                &root.join("tsv").join("bacterial_integrations"),
                "tsv",
            )?,
            viral_genes: list_files_with_extension(
                &root.join("tsv").join("viral_gene_annotations"),
                "tsv",
            )?,
            gene_features: list_files_with_extension(&root.join("gff"), "gff")?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.integrations.is_empty() && self.viral_genes.is_empty() && self.gene_features.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenomeArtifact {
    pub genome: String,
    pub path: String,
    pub sequences: usize,
    pub viruses: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub genomes: Vec<GenomeArtifact>,
    pub index_path: String,
    pub length_mismatches: Vec<LengthMismatch>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BundleResult {
    pub path: String,
    pub bytes: usize,
}

/// Inputs for the single-file document.
#[derive(Debug, Clone)]
pub struct BundleRequest {
    pub template: Utf8PathBuf,
    pub data: Utf8PathBuf,
    pub stylesheet: Utf8PathBuf,
    pub bundle: Utf8PathBuf,
    pub output: Utf8PathBuf,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink: Sync {
    fn event(&self, event: ProgressEvent);
}

/// Runs the readers in their fixed order: integrations, viral genes, gene features.
/// The GFF3 headers reconcile lengths recorded by the integration tables, so the
/// order matters.
pub fn build_model(
    layout: &InputLayout,
    sink: &dyn ProgressSink,
) -> Result<IntegrationModel, VibesError> {
    let started = Instant::now();
    let mut builder = ModelBuilder::new();
    for path in &layout.integrations {
        ingest_integration_table(&mut builder, path.as_std_path())?;
    }
    for path in &layout.viral_genes {
        ingest_viral_gene_table(&mut builder, path.as_std_path())?;
    }
    for path in &layout.gene_features {
        ingest_gene_features(&mut builder, path.as_std_path())?;
    }
    let model = builder.finish()?;
    sink.event(ProgressEvent {
        message: format!(
            "phase=Read; {} integration, {} viral gene, {} gff files",
            layout.integrations.len(),
            layout.viral_genes.len(),
            layout.gene_features.len()
        ),
        elapsed: Some(started.elapsed()),
    });
    Ok(model)
}

pub struct App {
    config: ResolvedConfig,
}

impl App {
    pub fn new(config: ResolvedConfig) -> Self {
        Self { config }
    }

    /// Reads `input_dir` and writes one page per genome plus the genome index.
    pub fn render(
        &self,
        input_dir: &Utf8Path,
        sink: &dyn ProgressSink,
    ) -> Result<RunSummary, VibesError> {
        let layout = InputLayout::discover(input_dir)?;
        if layout.is_empty() {
            return Err(VibesError::Filesystem(format!(
                "no VIBES output files found under {input_dir}"
            )));
        }
        let template = read_text(&self.config.template)?;
        let bundle = read_text(&self.config.bundle)?;
        let page = PageTemplate::new(&template, &bundle)?;

        let model = build_model(&layout, sink)?;
        self.write_pages(&model, &page, sink)
    }

    /// Projects and renders every genome, and only writes once all of them succeeded.
    pub fn write_pages(
        &self,
        model: &IntegrationModel,
        page: &PageTemplate,
        sink: &dyn ProgressSink,
    ) -> Result<RunSummary, VibesError> {
        let started = Instant::now();
        let outdir = &self.config.outdir;
        let genomes: Vec<&str> = model.genome_names().collect();

        let rendered = genomes
            .par_iter()
            .map(|&genome| -> Result<_, VibesError> {
                let projection = model.project(genome)?;
                let block = render_data_block(&projection)?;
                let artifact = GenomeArtifact {
                    genome: genome.to_string(),
                    path: outdir.join(format!("{genome}.html")).to_string(),
                    sequences: projection.sequence_names.len(),
                    viruses: projection.virus_names.len(),
                };
                Ok((artifact, page.fill(&block)))
            })
            .collect::<Result<Vec<_>, VibesError>>()?;
        sink.event(ProgressEvent {
            message: format!("phase=Render; {} genomes", rendered.len()),
            elapsed: Some(started.elapsed()),
        });

        let index_path = outdir.join(GENOME_INDEX_FILE);
        write_atomic(&index_path, render_genome_index(genomes)?.as_bytes())?;

        rendered
            .par_iter()
            .map(|(artifact, html)| -> Result<(), VibesError> {
                write_atomic(Utf8Path::new(&artifact.path), html.as_bytes())?;
                info!(genome = %artifact.genome, path = %artifact.path, "page written");
                Ok(())
            })
            .collect::<Result<Vec<()>, _>>()?;
        sink.event(ProgressEvent {
            message: format!("phase=Write; {outdir}"),
            elapsed: Some(started.elapsed()),
        });

        Ok(RunSummary {
            genomes: rendered.into_iter().map(|(artifact, _)| artifact).collect(),
            index_path: index_path.to_string(),
            length_mismatches: model.length_mismatches().to_vec(),
        })
    }

    /// Inlines data, stylesheet and bundle into one distributable page.
    pub fn bundle(
        &self,
        request: &BundleRequest,
        sink: &dyn ProgressSink,
    ) -> Result<BundleResult, VibesError> {
        let template = read_text(&request.template)?;
        let data = read_text(&request.data)?;
        let stylesheet = read_text(&request.stylesheet)?;
        let bundle = read_text(&request.bundle)?;

        let html = combine_document(&template, &data, &stylesheet, &bundle)?;
        write_atomic(&request.output, html.as_bytes())?;
        sink.event(ProgressEvent {
            message: format!("phase=Write; {}", request.output),
            elapsed: None,
        });
        Ok(BundleResult {
            path: request.output.to_string(),
            bytes: html.len(),
        })
    }
}
