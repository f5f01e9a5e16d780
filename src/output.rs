use std::io::{self, Write};

use serde::Serialize;

use crate::app::{BundleResult, ProgressEvent, ProgressSink, RunSummary};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Human,
    Json,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_summary(result: &RunSummary) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_bundle(result: &BundleResult) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

/// Progress lines on stderr, plain-text summaries on stdout.
pub struct HumanOutput;

impl HumanOutput {
    pub fn print_summary(result: &RunSummary) {
        println!("VIBES-SODA pages: {}", result.genomes.len());
        for artifact in &result.genomes {
            println!(
                "  {} ({} sequences, {} viruses) -> {}",
                artifact.genome, artifact.sequences, artifact.viruses, artifact.path
            );
        }
        println!("genome index: {}", result.index_path);
        if !result.length_mismatches.is_empty() {
            println!("sequence length mismatches: {}", result.length_mismatches.len());
            for mismatch in &result.length_mismatches {
                println!(
                    "  {}: gff3 {} vs integration tsv {} ({})",
                    mismatch.sequence, mismatch.authoritative, mismatch.recorded, mismatch.source
                );
            }
        }
    }

    pub fn print_bundle(result: &BundleResult) {
        println!("wrote {} ({} bytes)", result.path, result.bytes);
    }
}

impl ProgressSink for HumanOutput {
    fn event(&self, event: ProgressEvent) {
        match event.elapsed {
            Some(elapsed) => eprintln!("{} ({:.2?})", event.message, elapsed),
            None => eprintln!("{}", event.message),
        }
    }
}
