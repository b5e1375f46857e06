use std::path::Path;

use crate::catalog::SkillCatalog;
use crate::document::RawDocument;
use crate::experience::ExperienceCalculator;
use crate::fields::{FieldExtractor, FieldProfile};
use crate::record::{RecordSchema, ResumeRecord};
use crate::text::{CompositeTextExtractor, TextExtractor};

/// Hard cap on documents per batch; excess documents are dropped and the
/// truncation is reported, never an error.
pub const MAX_BATCH_DOCUMENTS: usize = 100;

/// One document that produced no record, and why.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    pub filename: String,
    pub reason: String,
}

/// Per-label presence statistics over the successful records of one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStats {
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone)]
pub struct BatchResult {
    pub schema: RecordSchema,
    pub records: Vec<ResumeRecord>,
    pub failures: Vec<BatchFailure>,
    pub truncated: usize,
}

impl BatchResult {
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Single pass over the record sequence, successful records only.
    #[must_use]
    pub fn label_stats(&self) -> Vec<LabelStats> {
        let total = self.records.len();
        self.schema
            .labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let count = self
                    .records
                    .iter()
                    .filter(|r| r.tags.get(i).copied() == Some(1))
                    .count();
                let percentage = if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64 * 100.0
                };
                LabelStats {
                    label: label.clone(),
                    count,
                    percentage,
                }
            })
            .collect()
    }
}

/// Orchestrates extraction for a whole batch: text extraction, field
/// derivation, tagging, and aggregation, one document at a time in upload
/// order. The catalog is injected at construction and shared read-only.
pub struct ResumePipeline {
    text: Box<dyn TextExtractor>,
    fields: FieldExtractor,
    experience: ExperienceCalculator,
    catalog: SkillCatalog,
    limit: usize,
}

impl ResumePipeline {
    #[must_use]
    pub fn new(catalog: SkillCatalog) -> Self {
        Self {
            text: Box::new(CompositeTextExtractor::default()),
            fields: FieldExtractor::default(),
            experience: ExperienceCalculator::new(),
            catalog,
            limit: MAX_BATCH_DOCUMENTS,
        }
    }

    #[must_use]
    pub fn with_text_extractor(mut self, text: Box<dyn TextExtractor>) -> Self {
        self.text = text;
        self
    }

    #[must_use]
    pub fn with_profile(mut self, profile: FieldProfile) -> Self {
        self.fields = FieldExtractor::new(profile);
        self
    }

    #[must_use]
    pub fn with_experience(mut self, experience: ExperienceCalculator) -> Self {
        self.experience = experience;
        self
    }

    #[must_use]
    pub const fn catalog(&self) -> &SkillCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn schema(&self) -> RecordSchema {
        RecordSchema::new(self.fields.profile(), &self.catalog)
    }

    /// Build the record for one document, or `None` when no text could be
    /// extracted. No side effects beyond the returned record.
    pub async fn build_record(&self, document: &RawDocument) -> Option<ResumeRecord> {
        let text = self.text.extract(document).await;
        if text.trim().is_empty() {
            return None;
        }

        let mut fields = self.fields.extract(&document.filename, &text);
        if self.fields.profile().include_experience {
            fields.experience_years = Some(self.experience.total_years(&text));
        }

        let tags = self
            .catalog
            .rules()
            .map(|rule| u8::from(rule.matches(&text)))
            .collect();

        Some(ResumeRecord {
            filename: document.filename.clone(),
            fields,
            tags,
        })
    }

    /// Process a batch in upload order. One bad document never aborts the
    /// run; it is recorded as a failure and processing continues.
    pub async fn process(&self, documents: Vec<RawDocument>) -> BatchResult {
        let truncated = documents.len().saturating_sub(self.limit);
        if truncated > 0 {
            tracing::warn!(
                "Batch capped at {} documents; ignoring {truncated} extra",
                self.limit
            );
        }

        let mut records = Vec::new();
        let mut failures = Vec::new();

        for document in documents.into_iter().take(self.limit) {
            match self.build_record(&document).await {
                Some(record) => records.push(record),
                None => {
                    tracing::warn!("Could not extract text from {}", document.filename);
                    failures.push(BatchFailure {
                        filename: document.filename,
                        reason: "could not extract text (unsupported/empty/corrupt)".into(),
                    });
                }
            }
        }

        BatchResult {
            schema: self.schema(),
            records,
            failures,
            truncated,
        }
    }

    /// Read and process files from disk. Unreadable files are per-document
    /// failures, not batch errors.
    pub async fn process_paths<P: AsRef<Path>>(&self, paths: &[P]) -> BatchResult {
        let truncated = paths.len().saturating_sub(self.limit);
        if truncated > 0 {
            tracing::warn!(
                "Batch capped at {} documents; ignoring {truncated} extra",
                self.limit
            );
        }

        let mut documents = Vec::new();
        let mut read_failures = Vec::new();

        for path in paths.iter().take(self.limit) {
            let path = path.as_ref();
            match RawDocument::read(path).await {
                Ok(document) => documents.push(document),
                Err(e) => read_failures.push(BatchFailure {
                    filename: path.to_string_lossy().into_owned(),
                    reason: e.to_string(),
                }),
            }
        }

        let mut result = self.process(documents).await;
        result.failures.extend(read_failures);
        result.truncated = truncated;
        result
    }
}
