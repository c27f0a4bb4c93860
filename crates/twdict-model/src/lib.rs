use serde::{Deserialize, Serialize};

/// The structured record extracted from one dictionary result page.
///
/// Built once per fetched document and never mutated afterwards. An
/// empty `word` means the page did not resolve to a headword; in that
/// case `suggestion` may carry a "did you mean" alternative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    /// The headword the page resolved to. Empty when there was no match.
    pub word: String,
    /// KK phonetic transcription with the enclosing brackets stripped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    /// URL of the pronunciation clip, when the page publishes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    /// Part-of-speech groups in document order.
    pub entries: Vec<PartOfSpeech>,
    /// Alternate spelling offered by the site. Only meaningful when
    /// `word` is empty; callers must check `word` first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// One grammatical category and its definitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartOfSpeech {
    /// Abbreviation and/or description of the category (e.g., "n. 名詞").
    pub label: String,
    /// Definitions under this category, in document order.
    pub senses: Vec<Sense>,
}

/// A single definition with its example sentences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sense {
    pub definition: String,
    pub examples: Vec<Example>,
}

/// A bilingual example sentence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Example {
    /// The original-language sentence.
    pub source_text: String,
    /// The translated sentence.
    pub translated_text: String,
    /// Words within `source_text` to emphasize when displayed.
    pub keywords: Vec<String>,
}

impl LookupResult {
    /// Whether the page resolved to a headword.
    ///
    /// `entries` may still be empty for minimal pages, so this checks
    /// only the headword itself.
    pub fn is_resolved(&self) -> bool {
        !self.word.is_empty()
    }
}
