use serde::{Deserialize, Serialize};

use crate::catalog::SkillCatalog;
use crate::fields::FieldProfile;

/// Atomic fields derived from one document. `""` means the field was looked
/// for and not found; `None` means the column is disabled for this run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub education: String,
    pub location: Option<String>,
    pub experience_years: Option<f64>,
}

/// The flat result for one document: filename, extracted fields, and one
/// 0/1 cell per catalog label, in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub filename: String,
    pub fields: ExtractedFields,
    pub tags: Vec<u8>,
}

/// The fixed column set of a batch, determined once per run by the field
/// profile and the active catalog. Every record shares it, which is what
/// makes the output exportable as a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    pub include_location: bool,
    pub include_experience: bool,
    pub labels: Vec<String>,
}

impl RecordSchema {
    #[must_use]
    pub fn new(profile: FieldProfile, catalog: &SkillCatalog) -> Self {
        Self {
            include_location: profile.include_location,
            include_experience: profile.include_experience,
            labels: catalog.labels().map(String::from).collect(),
        }
    }

    #[must_use]
    pub fn header(&self) -> Vec<String> {
        let mut columns = vec![
            "Filename".to_string(),
            "Name".to_string(),
            "Email".to_string(),
            "Phone Number".to_string(),
            "Education".to_string(),
        ];
        if self.include_location {
            columns.push("Location".to_string());
        }
        if self.include_experience {
            columns.push("Total Years of Work Experience".to_string());
        }
        columns.extend(self.labels.iter().cloned());
        columns
    }

    #[must_use]
    pub fn row(&self, record: &ResumeRecord) -> Vec<String> {
        let mut cells = vec![
            record.filename.clone(),
            record.fields.name.clone(),
            record.fields.email.clone(),
            record.fields.phone.clone(),
            record.fields.education.clone(),
        ];
        if self.include_location {
            cells.push(record.fields.location.clone().unwrap_or_default());
        }
        if self.include_experience {
            let years = record.fields.experience_years.unwrap_or(0.0);
            cells.push(format!("{years:.1}"));
        }
        cells.extend(record.tags.iter().map(ToString::to_string));
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SkillRule;

    fn two_label_catalog() -> SkillCatalog {
        SkillCatalog::new(vec![
            SkillRule::literal("Sales").unwrap(),
            SkillRule::literal("Pharma").unwrap(),
        ])
        .unwrap()
    }

    fn record() -> ResumeRecord {
        ResumeRecord {
            filename: "cv.pdf".into(),
            fields: ExtractedFields {
                name: "Jane Doe".into(),
                email: "jane@example.com".into(),
                phone: "987-654-3210".into(),
                education: "B.TECH".into(),
                location: Some("Pune, India".into()),
                experience_years: Some(2.5),
            },
            tags: vec![1, 0],
        }
    }

    #[test]
    fn test_full_header() {
        let schema = RecordSchema::new(FieldProfile::filename_led(), &two_label_catalog());
        assert_eq!(
            schema.header(),
            vec![
                "Filename",
                "Name",
                "Email",
                "Phone Number",
                "Education",
                "Location",
                "Total Years of Work Experience",
                "Sales",
                "Pharma",
            ]
        );
    }

    #[test]
    fn test_minimal_header() {
        let schema = RecordSchema::new(FieldProfile::content_led(), &two_label_catalog());
        assert_eq!(
            schema.header(),
            vec!["Filename", "Name", "Email", "Phone Number", "Education", "Sales", "Pharma"]
        );
    }

    #[test]
    fn test_row_matches_header_width() {
        let schema = RecordSchema::new(FieldProfile::filename_led(), &two_label_catalog());
        let row = schema.row(&record());
        assert_eq!(row.len(), schema.header().len());
        assert_eq!(row[5], "Pune, India");
        assert_eq!(row[6], "2.5");
        assert_eq!(&row[7..], ["1", "0"]);
    }
}
