//! Category prediction — multinomial naive Bayes over TF-IDF features.
//!
//! The model is fit once at startup from a small fixed labeled corpus
//! and held in memory for the lifetime of the process. Prediction is
//! deterministic for a given model and input; vocabulary unseen at
//! training time contributes nothing to the feature vector, so
//! arbitrary input text never errors.

use std::collections::HashMap;

use regex::Regex;

use crate::error::ClassifyError;

/// Labeled corpus the default model is fit from. One seed document per
/// feed category.
pub const TRAINING_CORPUS: &[(&str, &str)] = &[
    ("design graphic design logo", "#Design"),
    ("writing content blog article", "#Content"),
    ("programming python javascript", "#Tech"),
    ("translation english vietnamese", "#Translation"),
    ("data entry excel spreadsheet", "#DataEntry"),
];

/// Laplace smoothing constant for the naive Bayes feature counts.
const SMOOTHING_ALPHA: f64 = 1.0;

// ── TF-IDF vectorizer ───────────────────────────────────────────────

/// Term-frequency / inverse-document-frequency vectorizer.
///
/// Smoothed IDF (`ln((1 + n) / (1 + df)) + 1`) with L2-normalized
/// output vectors. Tokens are lower-cased words of two or more
/// word characters.
#[derive(Debug)]
struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    token_re: Regex,
}

impl TfidfVectorizer {
    fn fit(documents: &[&str]) -> Self {
        let token_re = Regex::new(r"\b\w\w+\b").unwrap();

        // Vocabulary in sorted term order so indices are reproducible.
        let mut terms: Vec<String> = Vec::new();
        let mut doc_tokens: Vec<Vec<String>> = Vec::with_capacity(documents.len());
        for doc in documents {
            let tokens = tokenize(&token_re, doc);
            for token in &tokens {
                if !terms.contains(token) {
                    terms.push(token.clone());
                }
            }
            doc_tokens.push(tokens);
        }
        terms.sort();

        let vocabulary: HashMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();

        // Document frequency per term.
        let mut df = vec![0usize; vocabulary.len()];
        for tokens in &doc_tokens {
            let mut in_doc = vec![false; vocabulary.len()];
            for token in tokens {
                if let Some(&idx) = vocabulary.get(token) {
                    in_doc[idx] = true;
                }
            }
            for (idx, present) in in_doc.iter().enumerate() {
                if *present {
                    df[idx] += 1;
                }
            }
        }

        let n_docs = documents.len() as f64;
        let idf = df
            .iter()
            .map(|&d| ((1.0 + n_docs) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        Self {
            vocabulary,
            idf,
            token_re,
        }
    }

    /// Map text to an L2-normalized TF-IDF vector over the fitted
    /// vocabulary. Unknown terms are dropped.
    fn transform(&self, text: &str) -> Vec<f64> {
        let mut features = vec![0.0f64; self.vocabulary.len()];
        for token in tokenize(&self.token_re, text) {
            if let Some(&idx) = self.vocabulary.get(&token) {
                features[idx] += self.idf[idx];
            }
        }

        let norm = features.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for x in &mut features {
                *x /= norm;
            }
        }
        features
    }

    fn n_features(&self) -> usize {
        self.vocabulary.len()
    }
}

fn tokenize(token_re: &Regex, text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    token_re
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

// ── Classifier ──────────────────────────────────────────────────────

/// Multinomial naive Bayes classifier over TF-IDF features.
pub struct CategoryClassifier {
    vectorizer: TfidfVectorizer,
    /// Class labels, in first-appearance order of the corpus. Ties in
    /// prediction resolve to the earliest class.
    classes: Vec<String>,
    class_log_prior: Vec<f64>,
    /// Smoothed log feature likelihoods, `[class][term]`.
    feature_log_prob: Vec<Vec<f64>>,
}

impl CategoryClassifier {
    /// Fit the default model from the built-in corpus.
    pub fn pretrained() -> Self {
        Self::fit(TRAINING_CORPUS)
    }

    /// Fit a model from `(document, label)` pairs.
    pub fn fit(corpus: &[(&str, &str)]) -> Self {
        let documents: Vec<&str> = corpus.iter().map(|(doc, _)| *doc).collect();
        let vectorizer = TfidfVectorizer::fit(&documents);

        let mut classes: Vec<String> = Vec::new();
        for (_, label) in corpus {
            if !classes.iter().any(|c| c == label) {
                classes.push((*label).to_string());
            }
        }

        let n_features = vectorizer.n_features();
        let mut feature_count = vec![vec![0.0f64; n_features]; classes.len()];
        let mut class_count = vec![0.0f64; classes.len()];

        for (doc, label) in corpus {
            let class_idx = classes.iter().position(|c| c == label).unwrap();
            class_count[class_idx] += 1.0;
            let features = vectorizer.transform(doc);
            for (idx, value) in features.iter().enumerate() {
                feature_count[class_idx][idx] += value;
            }
        }

        let n_docs: f64 = class_count.iter().sum();
        let class_log_prior = class_count
            .iter()
            .map(|&c| (c / n_docs.max(1.0)).max(f64::MIN_POSITIVE).ln())
            .collect();

        let feature_log_prob = feature_count
            .iter()
            .map(|counts| {
                let total: f64 = counts.iter().sum();
                let denom = total + SMOOTHING_ALPHA * n_features as f64;
                counts
                    .iter()
                    .map(|&c| ((c + SMOOTHING_ALPHA) / denom).ln())
                    .collect()
            })
            .collect();

        Self {
            vectorizer,
            classes,
            class_log_prior,
            feature_log_prob,
        }
    }

    /// Predict a category label for the given text.
    pub fn predict(&self, text: &str) -> Result<&str, ClassifyError> {
        if self.classes.is_empty() || self.vectorizer.n_features() == 0 {
            return Err(ClassifyError::ModelUnavailable);
        }

        let features = self.vectorizer.transform(text);
        let mut best = 0usize;
        let mut best_score = f64::NEG_INFINITY;
        for (class_idx, log_probs) in self.feature_log_prob.iter().enumerate() {
            let score: f64 = self.class_log_prior[class_idx]
                + features
                    .iter()
                    .zip(log_probs)
                    .map(|(x, lp)| x * lp)
                    .sum::<f64>();
            // strictly-greater keeps the earliest class on ties
            if score > best_score {
                best_score = score;
                best = class_idx;
            }
        }

        Ok(&self.classes[best])
    }

    /// Labels this model can produce.
    pub fn labels(&self) -> &[String] {
        &self.classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corpus_documents_predict_their_own_label() {
        let clf = CategoryClassifier::pretrained();
        for (doc, label) in TRAINING_CORPUS {
            assert_eq!(clf.predict(doc).unwrap(), *label);
        }
    }

    #[test]
    fn related_vocabulary_lands_in_the_right_category() {
        let clf = CategoryClassifier::pretrained();
        assert_eq!(clf.predict("need a python programmer").unwrap(), "#Tech");
        assert_eq!(clf.predict("logo design wanted").unwrap(), "#Design");
        assert_eq!(
            clf.predict("excel data entry work available").unwrap(),
            "#DataEntry"
        );
        assert_eq!(
            clf.predict("english to vietnamese translation").unwrap(),
            "#Translation"
        );
    }

    #[test]
    fn unseen_vocabulary_is_not_an_error() {
        let clf = CategoryClassifier::pretrained();
        let label = clf.predict("xyzzy quux frobnicate").unwrap();
        assert!(clf.labels().iter().any(|l| l == label));
    }

    #[test]
    fn prediction_is_deterministic() {
        let clf = CategoryClassifier::pretrained();
        let a = clf.predict("hiring a writer for blog content").unwrap();
        let b = clf.predict("hiring a writer for blog content").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_model_is_unavailable() {
        let clf = CategoryClassifier::fit(&[]);
        assert!(matches!(
            clf.predict("anything"),
            Err(ClassifyError::ModelUnavailable)
        ));
    }

    #[test]
    fn short_tokens_are_ignored() {
        let clf = CategoryClassifier::pretrained();
        // single-character words never enter the vocabulary
        let label = clf.predict("a b c design").unwrap();
        assert_eq!(label, "#Design");
    }
}
