//! Prioritized keyword rules applied to encyclopedia summaries

use crate::model::KeywordRule;

/// Ordered (keywords, verdict) pairs; the first matching rule wins
pub struct KeywordClassifier {
    rules: Vec<KeywordRule>,
}

impl KeywordClassifier {
    pub fn new(rules: &[KeywordRule]) -> Self {
        let rules = rules
            .iter()
            .map(|rule| KeywordRule {
                keywords: rule
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect(),
                ..rule.clone()
            })
            .collect();
        Self { rules }
    }

    /// First rule whose keyword set hits the (case-insensitive) text
    pub fn classify(&self, text: &str) -> Option<&KeywordRule> {
        let normalized = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| normalized.contains(k.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceStatus;
    use crate::model::config::default_keyword_rules;

    #[test]
    fn test_priority_order_wins() {
        let classifier = KeywordClassifier::new(&default_keyword_rules());

        // mentions both a daily newspaper and disinformation coverage
        let summary = "Le Monde est un JOURNAL QUOTIDIEN français qui lutte contre la désinformation.";
        let rule = classifier.classify(summary).unwrap();
        assert_eq!(rule.status, SourceStatus::Reliable);
        assert_eq!(rule.score, 0.9);
    }

    #[test]
    fn test_satire_and_disinformation() {
        let classifier = KeywordClassifier::new(&default_keyword_rules());

        let satire = classifier.classify("Le Gorafi est un site d'information parodique.").unwrap();
        assert_eq!(satire.status, SourceStatus::Satirical);

        let toxic = classifier.classify("Site complotiste connu.").unwrap();
        assert_eq!(toxic.status, SourceStatus::Dangerous);
        assert_eq!(toxic.score, 0.0);
    }

    #[test]
    fn test_no_match() {
        let classifier = KeywordClassifier::new(&default_keyword_rules());
        assert!(classifier.classify("Une entreprise de logiciels.").is_none());
    }

    #[test]
    fn test_keywords_are_normalized() {
        let rules = vec![KeywordRule {
            status: SourceStatus::Satirical,
            score: 0.2,
            explanation: "satire".to_string(),
            keywords: vec!["  Satire ".to_string(), "".to_string()],
        }];
        let classifier = KeywordClassifier::new(&rules);
        assert!(classifier.classify("A SATIRE site").is_some());
        assert!(classifier.classify("anything").is_none());
    }
}
