use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::record::ExtractedFields;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
});

/// Candidate phone matchers, most specific first. The first pattern that
/// matches anywhere in the text wins.
static PHONE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\+?\d{1,3}[-.\s]?\(?\d{3,5}\)?[-.\s]?\d{3,5}[-.\s]?\d{4}",
        r"\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}",
        r"\+?\d{10,12}",
        r"\d{3}[-.\s]\d{3}[-.\s]\d{4}",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static NAME_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(resume|curriculum vitae|cv)[\s:]*").unwrap());

static EDU_SECTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(education|academic|qualification)\b").unwrap());

static DEGREE_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(bachelor[^,\n]*|master[^,\n]*|phd[^,\n]*|b\.tech[^,\n]*|m\.tech[^,\n]*|b\.e[^,\n]*|m\.e[^,\n]*|bsc[^,\n]*|msc[^,\n]*|bca[^,\n]*|mca[^,\n]*)",
    )
    .unwrap()
});

static DEGREE_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(bachelor|master|phd|b\.tech|m\.tech|b\.e|m\.e|bsc|msc|bca|mca|diploma)\b")
        .unwrap()
});

static LOCATION_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^\s*(?:location|address|city)\s*[:\-]\s*(\S.*)$").unwrap());

static LOCATION_CITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?: [A-Z][a-z]+)?,\s*(?:[A-Z]{2}\b|[A-Z][a-z]+)").unwrap()
});

/// Which signal the name field is derived from. The two strategies serve
/// different input assumptions (trustworthy filenames vs. trustworthy first
/// lines) and are never mixed within one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameSource {
    Filename,
    Content,
}

/// Per-run field configuration. The column set of every record in a batch is
/// fixed by the profile chosen at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldProfile {
    pub name_source: NameSource,
    pub include_location: bool,
    pub include_experience: bool,
}

impl FieldProfile {
    /// Filename-trustworthy variant: name from the filename, plus the
    /// location and experience columns.
    #[must_use]
    pub const fn filename_led() -> Self {
        Self {
            name_source: NameSource::Filename,
            include_location: true,
            include_experience: true,
        }
    }

    /// Content-trustworthy variant: name from the first lines of the
    /// document, basic fields only.
    #[must_use]
    pub const fn content_led() -> Self {
        Self {
            name_source: NameSource::Content,
            include_location: false,
            include_experience: false,
        }
    }

    #[must_use]
    pub const fn with_location(mut self, include: bool) -> Self {
        self.include_location = include;
        self
    }

    #[must_use]
    pub const fn with_experience(mut self, include: bool) -> Self {
        self.include_experience = include;
        self
    }
}

impl Default for FieldProfile {
    fn default() -> Self {
        Self::filename_led()
    }
}

pub struct FieldExtractor {
    profile: FieldProfile,
}

impl FieldExtractor {
    #[must_use]
    pub const fn new(profile: FieldProfile) -> Self {
        Self { profile }
    }

    #[must_use]
    pub const fn profile(&self) -> FieldProfile {
        self.profile
    }

    /// Derive all atomic fields from one document's text. Experience is
    /// computed separately; the slot is left empty here.
    #[must_use]
    pub fn extract(&self, filename: &str, text: &str) -> ExtractedFields {
        let name = match self.profile.name_source {
            NameSource::Filename => name_from_filename(filename),
            NameSource::Content => name_from_content(text),
        };

        ExtractedFields {
            name,
            email: extract_email(text),
            phone: extract_phone(text),
            education: extract_education(text),
            location: self
                .profile
                .include_location
                .then(|| extract_location(text)),
            experience_years: None,
        }
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new(FieldProfile::default())
    }
}

/// Strip the extension, replace `_`/`-` with spaces, and title-case each
/// token. Falls back to the raw filename when nothing survives.
#[must_use]
pub fn name_from_filename(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);

    let name = stem
        .replace(['_', '-'], " ")
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() {
        filename.to_string()
    } else {
        name
    }
}

/// Take the first non-empty line, strip a leading "resume"/"cv" label, and
/// accept it as a name when it tokenizes into 2-4 alphabetic words (dots
/// allowed). Failing that, try the second non-empty line, then fall back to
/// the first line truncated to 50 characters.
#[must_use]
pub fn name_from_content(text: &str) -> String {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let Some(&first) = lines.first() else {
        return String::new();
    };

    let first = NAME_LABEL_RE.replace(first, "").into_owned();
    if looks_like_name(&first) {
        return first;
    }

    if let Some(&second) = lines.get(1) {
        if looks_like_name(second) {
            return second.to_string();
        }
    }

    first.chars().take(50).collect()
}

fn looks_like_name(line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    (2..=4).contains(&words.len())
        && words
            .iter()
            .all(|w| !w.is_empty() && w.chars().all(|c| c.is_alphabetic() || c == '.'))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |c| {
        c.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
    })
}

/// First email-shaped substring, scanning left to right; `""` if none.
#[must_use]
pub fn extract_email(text: &str) -> String {
    EMAIL_RE
        .find(text)
        .map_or_else(String::new, |m| m.as_str().to_string())
}

/// First match of the highest-priority phone pattern that matches anywhere
/// in the text; `""` if none match.
#[must_use]
pub fn extract_phone(text: &str) -> String {
    PHONE_RES
        .iter()
        .find_map(|re| re.find(text))
        .map_or_else(String::new, |m| m.as_str().trim().to_string())
}

/// Section-scoped degree scan with a whole-text fallback.
///
/// When an education section header exists, the following 500 characters are
/// scanned for a degree name extended to end-of-line or comma; with no degree
/// match, the window's second non-empty line (or its only line) is returned.
/// Without a section header, the first bare degree token anywhere in the text
/// is returned upper-cased.
#[must_use]
pub fn extract_education(text: &str) -> String {
    if let Some(m) = EDU_SECTION_RE.find(text) {
        let start = m.start();
        let mut end = (start + 500).min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let window = &text[start..end];

        if let Some(degree) = DEGREE_LINE_RE.find(window) {
            return degree.as_str().trim().to_string();
        }

        let lines: Vec<&str> = window
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        return lines
            .get(1)
            .or_else(|| lines.first())
            .map_or_else(String::new, |l| (*l).to_string());
    }

    DEGREE_TOKEN_RE
        .find(text)
        .map_or_else(String::new, |m| m.as_str().to_uppercase())
}

/// Best-effort location: a labeled `Location:`/`Address:`/`City:` line wins,
/// then a `City, Region` shaped match anywhere in the text; `""` otherwise.
#[must_use]
pub fn extract_location(text: &str) -> String {
    if let Some(caps) = LOCATION_LABEL_RE.captures(text) {
        return caps[1].trim().to_string();
    }

    LOCATION_CITY_RE
        .find(text)
        .map_or_else(String::new, |m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_filename() {
        assert_eq!(name_from_filename("john_doe-resume.pdf"), "John Doe Resume");
        assert_eq!(name_from_filename("JANE.docx"), "Jane");
        assert_eq!(name_from_filename("a b.pdf"), "A B");
    }

    #[test]
    fn test_name_from_content_first_line() {
        assert_eq!(name_from_content("Jane Doe\nSales Executive"), "Jane Doe");
        assert_eq!(name_from_content("Resume: J. Smith\nfoo"), "J. Smith");
    }

    #[test]
    fn test_name_from_content_second_line() {
        let text = "Curriculum Vitae\nJohn Ronald Reuel Tolkien\nAuthor";
        assert_eq!(name_from_content(text), "John Ronald Reuel Tolkien");
    }

    #[test]
    fn test_name_from_content_truncates() {
        let long = "x".repeat(80);
        let name = name_from_content(&long);
        assert_eq!(name.chars().count(), 50);
    }

    #[test]
    fn test_name_rejects_numeric_tokens() {
        // "Jane Doe 2024" fails the all-alphabetic test; falls to line two.
        assert_eq!(name_from_content("Jane Doe 2024\nJane Doe"), "Jane Doe");
    }

    #[test]
    fn test_extract_email() {
        assert_eq!(
            extract_email("reach me at jane.doe+cv@example.co.uk today"),
            "jane.doe+cv@example.co.uk"
        );
        assert_eq!(extract_email("no address here"), "");
    }

    #[test]
    fn test_extract_phone_grouped() {
        assert_eq!(extract_phone("call 987-654-3210 now"), "987-654-3210");
    }

    #[test]
    fn test_extract_phone_international() {
        assert_eq!(
            extract_phone("mobile: +1 (555) 123-4567 (work)"),
            "+1 (555) 123-4567"
        );
    }

    #[test]
    fn test_extract_phone_bare_run() {
        assert_eq!(extract_phone("contact 9876501234"), "9876501234");
    }

    #[test]
    fn test_extract_phone_none() {
        assert_eq!(extract_phone("year 2021 only"), "");
    }

    #[test]
    fn test_education_section_degree() {
        let text = "Profile\nEducation\nB.Tech in Computer Science, 2019\nOther";
        assert_eq!(extract_education(text), "B.Tech in Computer Science");
    }

    #[test]
    fn test_education_section_second_line_fallback() {
        let text = "Education\nSome University\nGraduated 2019";
        assert_eq!(extract_education(text), "Some University");
    }

    #[test]
    fn test_education_bare_token_uppercased() {
        let text = "Jane Doe. B.Tech Computer Science. Sales.";
        assert_eq!(extract_education(text), "B.TECH");
    }

    #[test]
    fn test_education_missing() {
        assert_eq!(extract_education("nothing relevant"), "");
    }

    #[test]
    fn test_extract_location_labeled() {
        assert_eq!(extract_location("Name\nLocation: Pune, India\nx"), "Pune, India");
    }

    #[test]
    fn test_extract_location_city_pattern() {
        assert_eq!(extract_location("based in Austin, TX since 2019"), "Austin, TX");
    }

    #[test]
    fn test_extract_location_missing() {
        assert_eq!(extract_location("no places mentioned"), "");
    }

    #[test]
    fn test_profile_controls_location_column() {
        let with = FieldExtractor::new(FieldProfile::filename_led());
        let without = FieldExtractor::new(FieldProfile::content_led());
        let text = "Jane Doe\nLocation: Pune, India";

        assert!(with.extract("a.pdf", text).location.is_some());
        assert!(without.extract("a.pdf", text).location.is_none());
    }

    #[test]
    fn test_strategies_never_mix() {
        let extractor = FieldExtractor::new(FieldProfile::content_led());
        let fields = extractor.extract("someone_else.pdf", "Jane Doe\nSales");
        assert_eq!(fields.name, "Jane Doe");
        assert_eq!(extractor.profile().name_source, NameSource::Content);
    }
}
