//! Rule-based intent analyzer

use super::types::AnalysisResult;
use super::Analyzer;
use crate::orchestrator::OrchestrationInput;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Intent reported when no rule matches.
pub const GENERIC_INTENT: &str = "orchestrate";

const GENERIC_CONFIDENCE: f64 = 0.5;
const MATCH_BASE_CONFIDENCE: f64 = 0.6;

/// Maps a set of keywords to an intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRule {
    /// Intent name
    pub intent: String,
    /// Lowercase keywords that signal the intent
    pub keywords: Vec<String>,
}

impl IntentRule {
    /// Create a rule
    #[must_use]
    pub fn new(intent: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            intent: intent.into(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

/// Classifies input by counting keyword hits per rule.
///
/// The rule with the most hits wins; ties go to the earlier rule. Confidence
/// grows with the share of input tokens that hit the winning rule. Input
/// with no matching rule gets [`GENERIC_INTENT`] at a fixed base confidence.
#[derive(Debug, Clone)]
pub struct KeywordAnalyzer {
    rules: Vec<IntentRule>,
    min_confidence: f64,
}

impl Default for KeywordAnalyzer {
    fn default() -> Self {
        Self {
            rules: default_rules(),
            min_confidence: 0.3,
        }
    }
}

fn default_rules() -> Vec<IntentRule> {
    vec![
        IntentRule::new("search", &["search", "find", "lookup", "look"]),
        IntentRule::new("navigate", &["open", "go", "navigate", "visit"]),
        IntentRule::new("summarize", &["summarize", "summary", "tldr"]),
        IntentRule::new("translate", &["translate", "translation"]),
        IntentRule::new("shortcut", &["run", "execute", "launch", "trigger"]),
    ]
}

impl KeywordAnalyzer {
    /// Create an analyzer with the default rule set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rule set
    #[must_use]
    pub fn with_rules(mut self, rules: Vec<IntentRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Set the confidence below which input is rejected
    #[must_use]
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence.clamp(0.0, 1.0);
        self
    }

    /// Classify raw text into `(intent, confidence)`.
    ///
    /// Empty text yields an empty intent with zero confidence.
    #[must_use]
    pub fn classify(&self, text: &str) -> (String, f64) {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return (String::new(), 0.0);
        }

        let mut best: Option<(&IntentRule, usize)> = None;
        for rule in &self.rules {
            let hits = tokens
                .iter()
                .filter(|t| rule.keywords.iter().any(|k| k == *t))
                .count();
            if hits > 0 && best.map_or(true, |(_, b)| hits > b) {
                best = Some((rule, hits));
            }
        }

        match best {
            Some((rule, hits)) => {
                let share = hits as f64 / tokens.len() as f64;
                let confidence = (MATCH_BASE_CONFIDENCE + (1.0 - MATCH_BASE_CONFIDENCE) * share)
                    .min(1.0);
                (rule.intent.clone(), confidence)
            }
            None => (GENERIC_INTENT.to_string(), GENERIC_CONFIDENCE),
        }
    }
}

#[async_trait]
impl Analyzer for KeywordAnalyzer {
    async fn analyze(&self, input: &OrchestrationInput) -> AnalysisResult {
        let (intent, confidence) = self.classify(&input.text());
        let validated = !intent.is_empty() && confidence >= self.min_confidence;

        AnalysisResult {
            intent,
            input: input.input.clone(),
            confidence,
            validated,
            site_hint: input.site().map(str::to_string),
            timestamp: Utc::now(),
        }
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}
