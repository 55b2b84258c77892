//! Prompts for semantic risk analysis

/// System prompt for stylistic risk rating
pub const SEMANTIC_SYSTEM_PROMPT: &str = r#"You are a media-literacy analyst assessing the writing style of news articles.

You rate stylistic warning signs only; you do not decide whether the facts are true.
Your output must be a single strict JSON object, with no Markdown and no text around it."#;

/// Build the rating prompt for one article
pub fn build_semantic_prompt(text: &str) -> String {
    format!(
        r#"Analyze the following article text (it may be in any language):

"""
{text}
"""

Rate each marker from 0 to 10, where 10 means MOST SUSPECT:
1. Subjectivity: opinionated, emotional or one-sided wording.
2. Clickbait: sensational, exaggerated or curiosity-bait framing.
3. Missing evidence: claims made without sources, data, quotes or verifiable references.

Answer ONLY with strict JSON (no Markdown, no code fences) of exactly this shape:
{{
    "subjectivity_analysis": {{ "score": 0, "details": "..." }},
    "clickbait_analysis": {{ "score": 0, "details": "..." }},
    "evidence_analysis": {{ "missing_evidence_score": 0, "details": "..." }},
    "overall_summary": "...",
    "style_verdict": "RELIABLE | QUESTIONABLE | MISLEADING"
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_text_and_schema() {
        let prompt = build_semantic_prompt("Un article de test.");
        assert!(prompt.contains("Un article de test."));
        assert!(prompt.contains("\"missing_evidence_score\": 0"));
        assert!(prompt.contains("\"subjectivity_analysis\": { \"score\": 0"));
    }
}
