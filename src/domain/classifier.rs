//! Highlight classification heuristics
//!
//! Pure functions over a finalized text fragment and the loudness level that
//! was current when it finalized. Keyword lists and thresholds are plain
//! heuristics; there is no stemming, language model, or ranking beyond
//! discovery order.

/// Loudness level (0-100) above which a long fragment counts as emphasized
pub const DEFAULT_AUDIO_EMPHASIS_THRESHOLD: u8 = 80;

/// Maximum number of keywords derived per highlight
pub const DEFAULT_MAX_KEYWORDS: usize = 5;

/// Maximum summary length in characters, ellipsis included
pub const DEFAULT_SUMMARY_MAX_LENGTH: usize = 100;

/// Fragments at or below this many characters never trigger on loudness alone
const EMPHASIS_MIN_CHARS: usize = 10;

/// Keywords a lecturer uses when flagging something as worth remembering
const DEFAULT_HIGHLIGHT_KEYWORDS: &[&str] = &[
    "중요", "핵심", "시험", "꼭", "반드시", "기억", "주목", "포인트", "정리", "요약", "결론",
    "강조", "특히", "주의", "필수", "중점",
];

const ELLIPSIS: &str = "...";

/// Classifier tuning knobs, defaulted to the built-in heuristics
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub highlight_keywords: Vec<String>,
    pub audio_emphasis_threshold: u8,
    pub max_keywords: usize,
    pub summary_max_length: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            highlight_keywords: DEFAULT_HIGHLIGHT_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            audio_emphasis_threshold: DEFAULT_AUDIO_EMPHASIS_THRESHOLD,
            max_keywords: DEFAULT_MAX_KEYWORDS,
            summary_max_length: DEFAULT_SUMMARY_MAX_LENGTH,
        }
    }
}

/// Result of classifying one finalized fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub is_highlight: bool,
    pub summary: String,
    pub keywords: Vec<String>,
}

/// Decides whether a finalized fragment is a highlight and derives its
/// summary and keyword set. Stateless; the same (text, level) pair always
/// classifies the same way.
#[derive(Debug, Clone, Default)]
pub struct HighlightClassifier {
    config: ClassifierConfig,
}

impl HighlightClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classify a finalized fragment against the loudness level current at
    /// finalization time
    pub fn classify(&self, text: &str, audio_level: u8) -> Classification {
        Classification {
            is_highlight: self.should_highlight(text, audio_level),
            summary: self.generate_summary(text),
            keywords: self.extract_keywords(text),
        }
    }

    /// A fragment is a highlight if it names a highlight keyword, was spoken
    /// loudly enough while long enough to be a real sentence, or carries
    /// exclamation/question punctuation.
    fn should_highlight(&self, text: &str, audio_level: u8) -> bool {
        let has_keyword = self
            .config
            .highlight_keywords
            .iter()
            .any(|k| text.contains(k.as_str()));

        let emphasized = audio_level > self.config.audio_emphasis_threshold
            && text.chars().count() > EMPHASIS_MIN_CHARS;

        has_keyword || emphasized || text.contains('!') || text.contains('?')
    }

    /// First sentence of the fragment, truncated to the configured maximum.
    /// Falls back to the whole text when no sentence boundary exists.
    fn generate_summary(&self, text: &str) -> String {
        let first_sentence = text
            .split(['.', '!', '?'])
            .map(str::trim)
            .find(|piece| !piece.is_empty())
            .unwrap_or_else(|| text.trim());

        self.truncate(first_sentence)
    }

    fn truncate(&self, text: &str) -> String {
        let max = self.config.summary_max_length;
        if text.chars().count() <= max {
            return text.to_string();
        }
        let keep = max.saturating_sub(ELLIPSIS.chars().count());
        let mut out: String = text.chars().take(keep).collect();
        out.push_str(ELLIPSIS);
        out
    }

    /// Keyword candidates are whitespace tokens, punctuation-stripped and at
    /// least two characters long. A token qualifies when a neighboring token
    /// contains a highlight keyword, or when it recurs in the text while the
    /// set is still filling. First-seen order, deduplicated, capped.
    fn extract_keywords(&self, text: &str) -> Vec<String> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let mut keywords: Vec<String> = Vec::new();

        for (i, raw) in tokens.iter().enumerate() {
            let stripped: String = raw.chars().filter(|c| !c.is_ascii_punctuation()).collect();
            if stripped.chars().count() < 2 {
                continue;
            }
            if keywords.contains(&stripped) {
                continue;
            }

            let keyword_adjacent = (i > 0 && self.contains_keyword(tokens[i - 1]))
                || (i + 1 < tokens.len() && self.contains_keyword(tokens[i + 1]));

            // Literal substring count; overlapping or in-word matches are
            // accepted as-is.
            let repeated = keywords.len() < self.config.max_keywords
                && text.matches(stripped.as_str()).count() >= 2;

            if keyword_adjacent || repeated {
                keywords.push(stripped);
            }
        }

        keywords.truncate(self.config.max_keywords);
        keywords
    }

    fn contains_keyword(&self, token: &str) -> bool {
        self.config
            .highlight_keywords
            .iter()
            .any(|k| token.contains(k.as_str()))
    }
}
