//! Builds per-genome data blobs for the VIBES-SODA viewer from VIBES pipeline
//! output: integration tables, viral gene annotation tables and GFF3 gene calls.

pub mod app;
pub mod columnar;
pub mod config;
pub mod domain;
pub mod error;
pub mod fs_util;
pub mod model;
pub mod output;
pub mod project;
pub mod readers;
pub mod reconcile;
pub mod render;
pub mod template;
