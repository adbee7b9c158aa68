//! Keyword relevance filter.
//!
//! Strict case-insensitive substring match over the title. First match
//! wins; no scoring, no tokenization — "multitasking" matches the
//! keyword "task" and that false positive is accepted.

/// Decides whether an item's title is relevant to the feed.
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    /// Keyword phrases, lower-cased at construction.
    keywords: Vec<String>,
}

impl KeywordFilter {
    pub fn new(keywords: &[String]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// True iff any keyword phrase occurs in the title, ignoring case.
    /// An empty keyword set matches nothing.
    pub fn is_relevant(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        self.keywords.iter().any(|k| title.contains(k.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(keywords: &[&str]) -> KeywordFilter {
        let owned: Vec<String> = keywords.iter().map(|k| k.to_string()).collect();
        KeywordFilter::new(&owned)
    }

    #[test]
    fn matches_are_case_insensitive() {
        let f = filter(&["small job"]);
        assert!(f.is_relevant("Need help with a SMALL JOB today"));
        assert!(f.is_relevant("small job available"));
    }

    #[test]
    fn multi_word_phrases_match_as_substrings() {
        let f = filter(&["help needed", "micro job"]);
        assert!(f.is_relevant("Urgent: help needed with spreadsheet"));
        assert!(f.is_relevant("looking for a micro job"));
        assert!(!f.is_relevant("help is on the way"));
    }

    #[test]
    fn no_keyword_means_irrelevant() {
        let f = filter(&["task", "hiring"]);
        assert!(!f.is_relevant("cat video compilation"));
    }

    #[test]
    fn empty_keyword_set_matches_nothing() {
        let f = filter(&[]);
        assert!(!f.is_relevant("hiring now"));
    }

    #[test]
    fn substring_match_is_not_tokenized() {
        let f = filter(&["task"]);
        assert!(f.is_relevant("I love multitasking"));
    }
}
