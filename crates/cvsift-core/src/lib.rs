pub mod catalog;
pub mod document;
pub mod error;
pub mod experience;
pub mod export;
pub mod fields;
pub mod pipeline;
pub mod record;
pub mod text;

pub use catalog::{normalize_skill_list, CatalogError, SkillCatalog, SkillRule};
pub use document::{DocumentKind, RawDocument};
pub use error::{Error, Result};
pub use experience::ExperienceCalculator;
pub use export::{CsvExporter, ExportError};
pub use fields::{FieldExtractor, FieldProfile, NameSource};
pub use pipeline::{
    BatchFailure, BatchResult, LabelStats, ResumePipeline, MAX_BATCH_DOCUMENTS,
};
pub use record::{ExtractedFields, RecordSchema, ResumeRecord};
pub use text::{
    CompositeTextExtractor, DocxTextExtractor, PdfTextExtractor, TextExtractor,
};
