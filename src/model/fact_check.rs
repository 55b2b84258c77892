//! Claim records returned by the fact-check index and their classification

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const UNKNOWN_SOURCE: &str = "Unknown source";
const NOT_RATED: &str = "Not rated";
const NO_TITLE: &str = "Title not available";
const NO_LINK: &str = "#";
const UNKNOWN_DATE: &str = "Unknown date";

/// Outcome of matching an article against the fact-check index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    FoundFake,
    FoundTrue,
    NotFound,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClaimPublisher {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
}

/// One review of a claim by a fact-checking publisher
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClaimReview {
    #[serde(default)]
    pub publisher: Option<ClaimPublisher>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub review_date: Option<String>,
    #[serde(default)]
    pub textual_rating: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
}

/// Raw claim record as returned by the claims index
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRecord {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub claimant: Option<String>,
    #[serde(default)]
    pub claim_date: Option<String>,
    #[serde(default)]
    pub claim_review: Vec<ClaimReview>,
}

impl ClaimRecord {
    pub fn first_review(&self) -> Option<&ClaimReview> {
        self.claim_review.first()
    }
}

/// Classification of the matched claims
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClaimVerdict {
    pub status: ClaimStatus,
    /// Every matched claim, in index order; only the first one is scored
    pub matched_claims: Vec<ClaimRecord>,
}

/// Display form of a claim, built from its first review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClaimSummary {
    pub source: String,
    pub verdict: String,
    pub title: String,
    pub link: String,
    pub claim_date: String,
}

impl From<&ClaimRecord> for ClaimSummary {
    fn from(record: &ClaimRecord) -> Self {
        let claim_date = record
            .claim_date
            .clone()
            .unwrap_or_else(|| UNKNOWN_DATE.to_string());

        match record.first_review() {
            Some(review) => Self {
                source: review
                    .publisher
                    .as_ref()
                    .and_then(|p| p.name.clone())
                    .unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
                verdict: review
                    .textual_rating
                    .clone()
                    .unwrap_or_else(|| NOT_RATED.to_string()),
                title: review.title.clone().unwrap_or_else(|| NO_TITLE.to_string()),
                link: review.url.clone().unwrap_or_else(|| NO_LINK.to_string()),
                claim_date,
            },
            None => Self {
                source: UNKNOWN_SOURCE.to_string(),
                verdict: NOT_RATED.to_string(),
                title: NO_TITLE.to_string(),
                link: NO_LINK.to_string(),
                claim_date,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_index_payload() {
        let json = r#"{
            "text": "Le vaccin contient une puce",
            "claimDate": "2021-05-01T00:00:00Z",
            "claimReview": [{
                "publisher": {"name": "AFP Factuel", "site": "factuel.afp.com"},
                "url": "https://factuel.afp.com/x",
                "title": "Non, le vaccin ne contient pas de puce",
                "textualRating": "Faux",
                "languageCode": "fr"
            }]
        }"#;

        let record: ClaimRecord = serde_json::from_str(json).unwrap();
        let summary = ClaimSummary::from(&record);

        assert_eq!(summary.source, "AFP Factuel");
        assert_eq!(summary.verdict, "Faux");
        assert_eq!(summary.link, "https://factuel.afp.com/x");
        assert_eq!(summary.claim_date, "2021-05-01T00:00:00Z");
    }

    #[test]
    fn test_summary_without_review_uses_placeholders() {
        let summary = ClaimSummary::from(&ClaimRecord::default());
        assert_eq!(summary.source, UNKNOWN_SOURCE);
        assert_eq!(summary.verdict, NOT_RATED);
        assert_eq!(summary.link, "#");
        assert_eq!(summary.claim_date, UNKNOWN_DATE);
    }
}
