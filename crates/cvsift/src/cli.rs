use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use console::style;

use cvsift_core::{
    CsvExporter, FieldProfile, NameSource, ResumePipeline, SkillCatalog, MAX_BATCH_DOCUMENTS,
};

#[derive(Parser)]
#[command(
    name = "cvsift",
    about = "Batch resume field and industry extraction",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract fields and industry tags from resumes into a CSV
    Process {
        /// Resume files (.pdf / .docx), capped at 100 per run
        files: Vec<PathBuf>,
        /// Output CSV path (default: resume_data_<timestamp>.csv)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Where the Name column comes from
        #[arg(long = "name-from", value_enum, default_value_t = NameArg::Filename)]
        name_from: NameArg,
        /// Skip the Location column
        #[arg(long)]
        no_location: bool,
        /// Skip the Total Years of Work Experience column
        #[arg(long)]
        no_experience: bool,
        /// Extra labels to check (word-boundary literal match)
        #[arg(long = "label")]
        labels: Vec<String>,
    },
    /// List the labels a run would check
    Labels {
        /// Extra labels, normalized into the list
        #[arg(long = "label")]
        labels: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum NameArg {
    /// Derive the name from the filename
    Filename,
    /// Derive the name from the first lines of the document
    Content,
}

impl From<NameArg> for NameSource {
    fn from(arg: NameArg) -> Self {
        match arg {
            NameArg::Filename => Self::Filename,
            NameArg::Content => Self::Content,
        }
    }
}

fn build_catalog(extra_labels: &[String]) -> Result<SkillCatalog> {
    SkillCatalog::builtin()
        .with_literal_labels(extra_labels)
        .context("invalid extra label")
}

pub async fn run_process(
    files: &[PathBuf],
    out: Option<&Path>,
    name_from: NameArg,
    no_location: bool,
    no_experience: bool,
    extra_labels: &[String],
) -> Result<()> {
    if files.is_empty() {
        bail!("upload at least one file");
    }
    if files.len() > MAX_BATCH_DOCUMENTS {
        eprintln!(
            "  {} {} files supplied; processing the first {MAX_BATCH_DOCUMENTS}",
            style("!").yellow(),
            files.len(),
        );
    }

    let profile = FieldProfile {
        name_source: name_from.into(),
        include_location: !no_location,
        include_experience: !no_experience,
    };
    let pipeline = ResumePipeline::new(build_catalog(extra_labels)?).with_profile(profile);

    for file in files.iter().take(MAX_BATCH_DOCUMENTS) {
        eprintln!("  {} processing {}", style("→").dim(), file.display());
    }

    let result = pipeline.process_paths(files).await;

    for failure in &result.failures {
        eprintln!(
            "  {} {}: {}",
            style("✗").red(),
            failure.filename,
            failure.reason
        );
    }

    if result.records.is_empty() {
        bail!("no data extracted from any of the supplied files");
    }

    eprintln!(
        "  {} processed {} file(s), {} failed, {} skipped over the batch cap",
        style("✓").green(),
        result.success_count(),
        result.failure_count(),
        result.truncated,
    );

    for stats in result.label_stats() {
        eprintln!(
            "    {:<22} {}/{} ({:.0}%)",
            stats.label,
            stats.count,
            result.success_count(),
            stats.percentage
        );
    }

    let out = out.map_or_else(default_output_path, Path::to_path_buf);
    let file = File::create(&out)
        .with_context(|| format!("cannot create output file {}", out.display()))?;
    CsvExporter::write(&result.schema, &result.records, file)?;

    println!(
        "Wrote {} record(s) to {}",
        result.success_count(),
        out.display()
    );

    Ok(())
}

pub fn run_labels(extra_labels: &[String]) -> Result<()> {
    let catalog = build_catalog(extra_labels)?;
    for label in catalog.labels() {
        println!("{label}");
    }
    Ok(())
}

fn default_output_path() -> PathBuf {
    PathBuf::from(format!(
        "resume_data_{}.csv",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ))
}
