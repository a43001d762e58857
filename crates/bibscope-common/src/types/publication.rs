use serde::{Deserialize, Serialize};

use crate::country::resolve_country;
use crate::ids::PublicationId;

/// A single author entry (spec §3).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
    /// ISO-3166 alpha-3 code, resolved from a free-form country name if necessary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
}

/// Export-tag selection for BibTeX/RIS (spec §4.2).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationType {
    Article,
    Inproceedings,
    #[default]
    Misc,
}

impl PublicationType {
    pub fn bibtex_tag(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Inproceedings => "inproceedings",
            Self::Misc => "misc",
        }
    }

    pub fn ris_tag(&self) -> &'static str {
        match self {
            Self::Article => "JOUR",
            Self::Inproceedings => "CPAPER",
            Self::Misc => "GEN",
        }
    }
}

/// The canonical publication entity (spec §3, L1).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Publication {
    pub id: PublicationId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    /// One of the registered adapter names.
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub citation_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_native_id: Option<String>,
    #[serde(default)]
    pub publication_type: PublicationType,
}

/// A publication field failed an invariant (spec §3).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PublicationValidationError {
    #[error("title is empty after trimming")]
    EmptyTitle,
    #[error("year {0} is out of range [1900, current_year+1]")]
    YearOutOfRange(i32),
    #[error("doi '{0}' does not match the 10.NNNN/... prefix form")]
    MalformedDoi(String),
    #[error("first author country '{0}' is not a recognized ISO-3166 alpha-3 code or country name")]
    UnresolvedCountry(String),
}

impl Publication {
    pub fn new(title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: PublicationId::new(),
            title: title.into(),
            abstract_text: None,
            authors: Vec::new(),
            keywords: Vec::new(),
            year: None,
            journal: None,
            source: source.into(),
            url: None,
            citation_count: 0,
            doi: None,
            source_native_id: None,
            publication_type: PublicationType::default(),
        }
    }

    /// Validate the invariants from spec §3. Does not mutate the record.
    pub fn validate(&self, current_year: i32) -> Result<(), PublicationValidationError> {
        if self.title.trim().is_empty() {
            return Err(PublicationValidationError::EmptyTitle);
        }

        if let Some(year) = self.year {
            if !(1900..=current_year + 1).contains(&year) {
                return Err(PublicationValidationError::YearOutOfRange(year));
            }
        }

        if let Some(ref doi) = self.doi {
            if !is_well_formed_doi(doi) {
                return Err(PublicationValidationError::MalformedDoi(doi.clone()));
            }
        }

        if let Some(author) = self.authors.first() {
            if let Some(ref country) = author.country {
                if resolve_country(country).is_none() {
                    return Err(PublicationValidationError::UnresolvedCountry(
                        country.clone(),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Normalized title used by the dedup levels in spec §4.2: lowercase,
    /// strip punctuation, drop a leading article, collapse whitespace.
    pub fn normalized_title(&self) -> String {
        normalize_title(&self.title)
    }
}

/// `10.NNNN/...` prefix form, minimally validated (4+ digit registrant code
/// followed by a non-empty suffix).
fn is_well_formed_doi(doi: &str) -> bool {
    let Some(rest) = doi.strip_prefix("10.") else {
        return false;
    };
    let Some((registrant, suffix)) = rest.split_once('/') else {
        return false;
    };
    !registrant.is_empty()
        && registrant.chars().all(|c| c.is_ascii_digit())
        && !suffix.is_empty()
}

pub fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped: String = lowered
        .chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect();

    let mut tokens: Vec<&str> = stripped.split_whitespace().collect();
    if matches!(tokens.first(), Some(&"a") | Some(&"an") | Some(&"the")) {
        tokens.remove(0);
    }
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_leading_article_and_punctuation() {
        assert_eq!(
            normalize_title("The AI, in: Education!"),
            "ai in education"
        );
        assert_eq!(normalize_title("AI in Education"), "ai in education");
    }

    #[test]
    fn rejects_empty_title() {
        let pub_ = Publication::new("   ", "fixture");
        assert_eq!(
            pub_.validate(2026),
            Err(PublicationValidationError::EmptyTitle)
        );
    }

    #[test]
    fn rejects_out_of_range_year() {
        let mut p = Publication::new("Something", "fixture");
        p.year = Some(1899);
        assert!(matches!(
            p.validate(2026),
            Err(PublicationValidationError::YearOutOfRange(1899))
        ));
    }

    #[test]
    fn accepts_well_formed_doi() {
        let mut p = Publication::new("Something", "fixture");
        p.doi = Some("10.1038/s41586-021-03819-2".to_string());
        assert!(p.validate(2026).is_ok());
    }

    #[test]
    fn rejects_malformed_doi() {
        let mut p = Publication::new("Something", "fixture");
        p.doi = Some("not-a-doi".to_string());
        assert!(matches!(
            p.validate(2026),
            Err(PublicationValidationError::MalformedDoi(_))
        ));
    }
}
