use std::collections::HashMap;

use regex::{Regex, RegexBuilder};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid pattern for label '{label}': {source}")]
    InvalidPattern {
        label: String,
        #[source]
        source: regex::Error,
    },

    #[error("Duplicate label: {0}")]
    DuplicateLabel(String),

    #[error("Empty label")]
    EmptyLabel,
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// One canonical label and its ordered pattern list. Presence is boolean:
/// the first pattern that matches anywhere in the text settles it.
#[derive(Debug, Clone)]
pub struct SkillRule {
    label: String,
    patterns: Vec<Regex>,
}

impl SkillRule {
    pub fn new(label: impl Into<String>, patterns: &[&str]) -> CatalogResult<Self> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(CatalogError::EmptyLabel);
        }

        let patterns = patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| CatalogError::InvalidPattern {
                        label: label.clone(),
                        source,
                    })
            })
            .collect::<CatalogResult<Vec<_>>>()?;

        Ok(Self { label, patterns })
    }

    /// A rule matching the label itself as a word-bounded literal; the
    /// fallback for labels with no curated pattern list.
    pub fn literal(label: impl Into<String>) -> CatalogResult<Self> {
        let label = label.into();
        let pattern = format!(r"\b{}\b", regex::escape(&label.to_lowercase()));
        Self::new(label, &[pattern.as_str()])
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }
}

/// Immutable catalog of industry/vertical labels, injected into the pipeline
/// at construction and shared read-only for the whole run.
///
/// Lookup is case-insensitive on the trimmed label, so every normalized
/// display form resolves to its own pattern list.
#[derive(Debug, Clone, Default)]
pub struct SkillCatalog {
    rules: Vec<SkillRule>,
    index: HashMap<String, usize>,
}

impl SkillCatalog {
    pub fn new(rules: Vec<SkillRule>) -> CatalogResult<Self> {
        let mut index = HashMap::with_capacity(rules.len());
        for (i, rule) in rules.iter().enumerate() {
            let key = rule.label.trim().to_lowercase();
            if index.insert(key, i).is_some() {
                return Err(CatalogError::DuplicateLabel(rule.label.clone()));
            }
        }
        Ok(Self { rules, index })
    }

    /// The shipped industry/vertical catalog.
    #[must_use]
    pub fn builtin() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(|(label, patterns)| SkillRule::new(*label, patterns))
            .collect::<CatalogResult<Vec<_>>>()
            .expect("builtin patterns compile");
        Self::new(rules).expect("builtin labels are unique")
    }

    /// Extend with word-bounded literal rules for labels not already in the
    /// catalog; known labels are left untouched.
    pub fn with_literal_labels<I, S>(self, labels: I) -> CatalogResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = self.rules;
        for label in normalize_skill_list(labels) {
            let key = label.to_lowercase();
            if !rules.iter().any(|r| r.label.trim().to_lowercase() == key) {
                rules.push(SkillRule::literal(label)?);
            }
        }
        Self::new(rules)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> impl Iterator<Item = &SkillRule> {
        self.rules.iter()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(SkillRule::label)
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&SkillRule> {
        self.index
            .get(&label.trim().to_lowercase())
            .map(|&i| &self.rules[i])
    }

    /// 1 if any pattern associated with the label matches anywhere in the
    /// text, else 0. Matching is over the whole document, not a section.
    /// Labels without a catalog entry fall back to a word-bounded literal.
    #[must_use]
    pub fn check_present(&self, text: &str, label: &str) -> u8 {
        if text.is_empty() || label.trim().is_empty() {
            return 0;
        }

        let matched = match self.get(label) {
            Some(rule) => rule.matches(text),
            None => SkillRule::literal(label).is_ok_and(|rule| rule.matches(text)),
        };
        u8::from(matched)
    }
}

/// Deduplicate case-insensitively while preserving first-seen order; trim
/// whitespace and drop empties. Labels that are all-uppercase and shorter
/// than five characters are kept as-is (acronyms); everything else is
/// title-cased, with a new word starting after any non-alphabetic character.
/// Five-letter all-caps words like "SALES" are ordinary words, not acronyms.
pub fn normalize_skill_list<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = std::collections::HashSet::new();
    let mut normalized = Vec::new();

    for label in labels {
        let trimmed = label.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        if !seen.insert(trimmed.to_lowercase()) {
            continue;
        }

        let is_acronym = trimmed.chars().count() < 5
            && trimmed.chars().any(char::is_alphabetic)
            && !trimmed.chars().any(char::is_lowercase);
        if is_acronym {
            normalized.push(trimmed.to_string());
        } else {
            normalized.push(title_case(trimmed));
        }
    }

    normalized
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Canonical label set with the merged synonym lists of both shipped
/// variants. `IT` deliberately avoids the bare word "it".
const BUILTIN_RULES: &[(&str, &[&str])] = &[
    ("Pharma", &[r"\bpharma\b", r"\bpharmaceuticals?\b"]),
    (
        "Hospitality",
        &[
            r"\bhospitalit(y|ies)\b",
            r"\bhotels?\b",
            r"\bfood\s+and\s+beverage\b",
            r"\bfnb\b",
        ],
    ),
    (
        "Enterprise Software",
        &[
            r"\benterprise[\s\-]?software\b",
            r"\benterprise\s+apps?\b",
            r"\benterprise\s+solutions?\b",
        ],
    ),
    (
        "Real Estate",
        &[
            r"\breal[\s\-]?estate\b",
            r"\bproperty\s+development\b",
            r"\bproperty\s+management\b",
        ],
    ),
    (
        "Agritech",
        &[r"\bagri[\s\-]?tech\b", r"\bagriculture\b", r"\bfarming\b"],
    ),
    (
        "Sales",
        &[r"\bsales\b", r"\bsales\s+professional\b", r"\bsales\s+executive\b"],
    ),
    (
        "Business Development",
        &[
            r"\bbusiness\s+development\b",
            r"\bbd\s+manager\b",
            r"\bbusiness\s+dev\b",
            r"\bbd\b",
        ],
    ),
    ("HoReCa", &[r"\bhoreca\b", r"\bhotel\s+restaurant\s+cafe\b"]),
    ("Banking", &[r"\bbank(ing)?\b", r"\bfinancial\s+services\b"]),
    ("FMCG", &[r"\bfmcg\b", r"\bfast\s+moving\s+consumer\s+goods\b"]),
    ("Telecom", &[r"\btelecoms?\b", r"\btelecommunications?\b"]),
    ("Insurance", &[r"\binsurance\b", r"\binsurance\s+industry\b"]),
    ("Fintech", &[r"\bfintech\b", r"\bfinancial\s+technology\b"]),
    (
        "IT",
        &[
            r"\bit\s+sector\b",
            r"\binformation\s+technology\b",
            r"\bit\s+services\b",
            r"\btechnology\s+company\b",
        ],
    ),
    ("SaaS", &[r"\bsaas\b", r"\bsoftware\s+as\s+a\s+service\b"]),
    ("B2B", &[r"\bb2b\b", r"\bbusiness\-to\-business\b"]),
    (
        "Edtech",
        &[
            r"\bedtech\b",
            r"\beducation\s+technology\b",
            r"\beducational\s+technology\b",
        ],
    ),
    ("BFSI", &[r"\bbfsi\b", r"\bbanking\s+finance\s+and\s+insurance\b"]),
    ("Logistics", &[r"\blogistics?\b", r"\bsupply\s+chain\b"]),
    (
        "Ecommerce",
        &[r"\be[\s\-]?commerce\b", r"\bonline\s+retail\b"],
    ),
];
