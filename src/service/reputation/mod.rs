//! Publisher reputation resolution
//!
//! Combines the local allow/deny lists with an encyclopedia lookup. Local membership is
//! authoritative for the score, but the encyclopedia is always consulted so that both
//! findings appear in the explanation.

pub mod domain;
pub mod encyclopedia;
pub mod rules;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use crate::model::config::ReputationConfig;
use crate::model::{ReputationOrigin, ReputationVerdict, SourceStatus};

pub use domain::registrable_domain;
pub use encyclopedia::{Encyclopedia, WikipediaClient};
pub use rules::KeywordClassifier;
pub use store::{LocalListing, LocalSourceList};

#[derive(Debug, thiserror::Error)]
pub enum ReputationError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected status {0}")]
    Status(u16),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Lookup timed out after {0:?}")]
    Timeout(Duration),
}

/// Resolves a reputation verdict for the domain of a URL
pub struct ReputationResolver {
    sources: LocalSourceList,
    encyclopedia: Arc<dyn Encyclopedia>,
    classifier: KeywordClassifier,
    official_markers: Vec<String>,
    academic_markers: Vec<String>,
    lookup_timeout: Duration,
}

impl ReputationResolver {
    /// Build the resolver from configuration, loading the local lists from disk
    pub fn new(config: &ReputationConfig) -> Self {
        Self::with_parts(
            config,
            LocalSourceList::load(&config.sources_path),
            Arc::new(WikipediaClient::new(config)),
        )
    }

    pub fn with_parts(
        config: &ReputationConfig,
        sources: LocalSourceList,
        encyclopedia: Arc<dyn Encyclopedia>,
    ) -> Self {
        Self {
            sources,
            encyclopedia,
            classifier: KeywordClassifier::new(&config.rules),
            official_markers: config.official_markers.clone(),
            academic_markers: config.academic_markers.clone(),
            lookup_timeout: Duration::from_secs(config.lookup_timeout_secs),
        }
    }

    /// Reputation of the publisher behind `url`
    ///
    /// Never fails: lookup errors degrade to a best-effort verdict.
    pub async fn check_source(&self, url: &str) -> ReputationVerdict {
        let domain = registrable_domain(url);
        tracing::debug!(url = %url, domain = %domain, "Checking source reputation");

        let local = self.sources.lookup(&domain);
        let knowledge_base = self.knowledge_base_verdict(&domain).await;

        let verdict = match local {
            Some(listing) => {
                let (score, status, note) = match listing {
                    LocalListing::Denied => (0.0, SourceStatus::Dangerous, "Deny-list"),
                    LocalListing::Allowed => (1.0, SourceStatus::Reliable, "Allow-list"),
                };
                ReputationVerdict::new(
                    score,
                    status,
                    ReputationOrigin::Hybrid,
                    format!(
                        "[LOCAL] {}. [ENCYCLOPEDIA] {} (encyclopedia status: {})",
                        note, knowledge_base.explanation, knowledge_base.status
                    ),
                )
            }
            None => knowledge_base,
        };

        tracing::info!(
            domain = %domain,
            score = verdict.score,
            status = %verdict.status,
            origin = ?verdict.origin,
            "Source reputation resolved"
        );

        verdict
    }

    /// Suffix heuristics, then encyclopedia lookup of the domain or its first label
    async fn knowledge_base_verdict(&self, domain: &str) -> ReputationVerdict {
        if self.official_markers.iter().any(|m| domain.contains(m.as_str())) {
            return ReputationVerdict::new(
                1.0,
                SourceStatus::Official,
                ReputationOrigin::KnowledgeBaseHeuristic,
                "Government domain suffix detected.",
            );
        }
        if self.academic_markers.iter().any(|m| domain.contains(m.as_str())) {
            return ReputationVerdict::new(
                0.95,
                SourceStatus::Academic,
                ReputationOrigin::KnowledgeBaseHeuristic,
                "University or educational domain.",
            );
        }

        let mut terms = vec![domain];
        let label = domain::first_label(domain);
        if label != domain {
            terms.push(label);
        }

        let mut lookup_failed = false;
        for term in terms {
            match self.lookup(term).await {
                Ok(Some(summary)) => return self.classify_summary(term, &summary),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(term = %term, error = %e, "Encyclopedia lookup failed");
                    lookup_failed = true;
                }
            }
        }

        let explanation = if lookup_failed {
            "Encyclopedia unavailable; no data on this site (neutral score 0.5)."
        } else {
            "No data on this site (neutral score 0.5)."
        };
        ReputationVerdict::new(
            0.5,
            SourceStatus::Unknown,
            ReputationOrigin::NotFound,
            explanation,
        )
    }

    async fn lookup(&self, term: &str) -> Result<Option<String>, ReputationError> {
        tokio::time::timeout(self.lookup_timeout, self.encyclopedia.page_summary(term))
            .await
            .map_err(|_| ReputationError::Timeout(self.lookup_timeout))?
    }

    fn classify_summary(&self, term: &str, summary: &str) -> ReputationVerdict {
        match self.classifier.classify(summary) {
            Some(rule) => {
                tracing::debug!(term = %term, status = %rule.status, "Encyclopedia summary matched keyword rule");
                ReputationVerdict::new(
                    rule.score,
                    rule.status,
                    ReputationOrigin::KnowledgeBaseLookup,
                    rule.explanation.clone(),
                )
            }
            None => ReputationVerdict::new(
                0.5,
                SourceStatus::Neutral,
                ReputationOrigin::KnowledgeBaseLookup,
                "Page found but without a strong reliability or danger marker.",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory encyclopedia recording every looked-up title
    struct FakeEncyclopedia {
        pages: HashMap<String, String>,
        fail: bool,
        lookups: Mutex<Vec<String>>,
    }

    impl FakeEncyclopedia {
        fn with_pages(pages: &[(&str, &str)]) -> Arc<Self> {
            Arc::new(Self {
                pages: pages
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                fail: false,
                lookups: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                pages: HashMap::new(),
                fail: true,
                lookups: Mutex::new(Vec::new()),
            })
        }

        fn lookups(&self) -> Vec<String> {
            self.lookups.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Encyclopedia for FakeEncyclopedia {
        async fn page_summary(&self, title: &str) -> Result<Option<String>, ReputationError> {
            self.lookups.lock().unwrap().push(title.to_string());
            if self.fail {
                return Err(ReputationError::Status(503));
            }
            Ok(self.pages.get(title).cloned())
        }
    }

    fn resolver(sources: LocalSourceList, encyclopedia: Arc<FakeEncyclopedia>) -> ReputationResolver {
        ReputationResolver::with_parts(&ReputationConfig::default(), sources, encyclopedia)
    }

    #[tokio::test]
    async fn test_government_suffix_without_lookup() {
        let encyclopedia = FakeEncyclopedia::failing();
        let resolver = resolver(LocalSourceList::default(), encyclopedia.clone());

        let verdict = resolver
            .check_source("https://www.interieur.gouv.fr/actualites/communiques")
            .await;

        assert_eq!(verdict.status, SourceStatus::Official);
        assert_eq!(verdict.score, 1.0);
        assert_eq!(verdict.origin, ReputationOrigin::KnowledgeBaseHeuristic);
        assert!(encyclopedia.lookups().is_empty());
    }

    #[tokio::test]
    async fn test_academic_suffix() {
        let resolver = resolver(LocalSourceList::default(), FakeEncyclopedia::failing());
        let verdict = resolver.check_source("https://news.mit.edu/2024/x").await;
        assert_eq!(verdict.status, SourceStatus::Academic);
        assert_eq!(verdict.score, 0.95);
    }

    #[tokio::test]
    async fn test_lookup_falls_back_to_first_label() {
        let encyclopedia = FakeEncyclopedia::with_pages(&[(
            "lemonde",
            "Le Monde est un journal quotidien français fondé en 1944.",
        )]);
        let resolver = resolver(LocalSourceList::default(), encyclopedia.clone());

        let verdict = resolver.check_source("https://www.lemonde.fr/politique/").await;

        assert_eq!(verdict.status, SourceStatus::Reliable);
        assert_eq!(verdict.score, 0.9);
        assert_eq!(verdict.origin, ReputationOrigin::KnowledgeBaseLookup);
        assert_eq!(encyclopedia.lookups(), vec!["lemonde.fr", "lemonde"]);
    }

    #[tokio::test]
    async fn test_page_without_markers_is_neutral() {
        let encyclopedia =
            FakeEncyclopedia::with_pages(&[("acme.com", "Acme est une entreprise de logiciels.")]);
        let verdict = resolver(LocalSourceList::default(), encyclopedia)
            .check_source("acme.com")
            .await;
        assert_eq!(verdict.status, SourceStatus::Neutral);
        assert_eq!(verdict.score, 0.5);
    }

    #[tokio::test]
    async fn test_unknown_site() {
        let verdict = resolver(LocalSourceList::default(), FakeEncyclopedia::with_pages(&[]))
            .check_source("https://obscure-blog.net/post")
            .await;
        assert_eq!(verdict.status, SourceStatus::Unknown);
        assert_eq!(verdict.origin, ReputationOrigin::NotFound);
        assert_eq!(verdict.score_100(), 50.0);
    }

    #[tokio::test]
    async fn test_allow_entry_covers_only_its_own_site() {
        let encyclopedia = FakeEncyclopedia::with_pages(&[]);
        let sources = LocalSourceList::new(["pravda.com.ua"], Vec::<String>::new());
        let resolver = resolver(sources, encyclopedia.clone());

        let verdict = resolver
            .check_source("https://some-random-scam.com.ua/story")
            .await;

        assert_eq!(verdict.status, SourceStatus::Unknown);
        assert_eq!(verdict.origin, ReputationOrigin::NotFound);
        assert_eq!(
            encyclopedia.lookups(),
            vec!["some-random-scam.com.ua", "some-random-scam"]
        );

        let listed = resolver.check_source("https://www.pravda.com.ua/news/1").await;
        assert_eq!(listed.status, SourceStatus::Reliable);
        assert_eq!(listed.origin, ReputationOrigin::Hybrid);
    }

    #[tokio::test]
    async fn test_local_list_is_authoritative_but_merged() {
        let encyclopedia = FakeEncyclopedia::with_pages(&[(
            "gorafi.fr",
            "Le Gorafi est un site d'information parodique.",
        )]);
        let sources = LocalSourceList::new(["gorafi.fr"], Vec::<String>::new());

        let verdict = resolver(sources, encyclopedia)
            .check_source("https://www.legorafi.fr/")
            .await;
        // legorafi.fr is not listed, the encyclopedia has no page for it
        assert_eq!(verdict.status, SourceStatus::Unknown);

        let encyclopedia = FakeEncyclopedia::with_pages(&[(
            "gorafi.fr",
            "Le Gorafi est un site d'information parodique.",
        )]);
        let sources = LocalSourceList::new(["gorafi.fr"], Vec::<String>::new());
        let verdict = resolver(sources, encyclopedia)
            .check_source("https://www.gorafi.fr/article")
            .await;

        assert_eq!(verdict.status, SourceStatus::Reliable);
        assert_eq!(verdict.score, 1.0);
        assert_eq!(verdict.origin, ReputationOrigin::Hybrid);
        assert!(verdict.explanation.contains("[LOCAL] Allow-list"));
        assert!(verdict.explanation.contains("SATIRICAL"));
    }

    #[tokio::test]
    async fn test_deny_list_takes_precedence_over_allow_list() {
        let sources = LocalSourceList::new(["both.com"], ["both.com"]);
        let verdict = resolver(sources, FakeEncyclopedia::with_pages(&[]))
            .check_source("https://both.com/a")
            .await;
        assert_eq!(verdict.status, SourceStatus::Dangerous);
        assert_eq!(verdict.score, 0.0);
    }

    #[tokio::test]
    async fn test_lookup_errors_keep_local_verdict() {
        let sources = LocalSourceList::new(Vec::<String>::new(), ["fake-news.net"]);
        let verdict = resolver(sources, FakeEncyclopedia::failing())
            .check_source("http://fake-news.net/x")
            .await;

        assert_eq!(verdict.status, SourceStatus::Dangerous);
        assert_eq!(verdict.origin, ReputationOrigin::Hybrid);
        assert!(verdict.explanation.contains("Encyclopedia unavailable"));
    }
}
