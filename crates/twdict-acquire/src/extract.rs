//! HTML extraction for dictionary result pages.
//!
//! Extraction is total: missing or reshaped markup degrades to empty
//! fields, never to an error. The site has changed its markup several
//! times, so the shape-dependent fields (audio URL, example-sentence
//! split, suggestion) are each tried as an ordered list of strategies,
//! first hit wins.

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use twdict_model::{Example, LookupResult, PartOfSpeech, Sense};

/// Extract the structured record from a raw result page.
///
/// Never fails. An absent result panel or headword yields an empty
/// `word`, which is the "no match" signal callers check first.
pub fn extract(html: &str) -> LookupResult {
    let document = Html::parse_document(html);

    let root_sel = Selector::parse("#main").expect("valid selector");
    let Some(root) = document.select(&root_sel).next() else {
        tracing::debug!("No result panel in page");
        return LookupResult::default();
    };

    let word = select_text(root, ".title_term span")
        .or_else(|| select_text(root, ".title_term"))
        .unwrap_or_default();
    let pronunciation = select_text(root, ".proun_value")
        .map(|s| strip_brackets(&s))
        .filter(|s| !s.is_empty());
    let audio_url = audio_from_scripts(&document).or_else(|| audio_from_raw(html));
    let entries = parse_entries(root);
    let suggestion = if word.is_empty() {
        parse_suggestion(root)
    } else {
        None
    };

    LookupResult {
        word,
        pronunciation,
        audio_url,
        entries,
        suggestion,
    }
}

/// A classified item from the flat explanation list. Marker items open
/// a new part-of-speech group; continuation items are senses belonging
/// to the most recently opened group.
enum ListItem {
    Marker(String),
    Continuation(Sense),
}

/// Group the flat `<li>` sequence into part-of-speech entries.
///
/// Two passes: classify every item, then fold continuations into the
/// group opened by the nearest preceding marker. A continuation with no
/// preceding marker is corrupt input and is skipped.
fn parse_entries(root: ElementRef<'_>) -> Vec<PartOfSpeech> {
    let item_sel = Selector::parse("ul.dict_explanations > li").expect("valid selector");
    let items: Vec<ListItem> = root.select(&item_sel).map(classify_item).collect();

    let mut groups: Vec<PartOfSpeech> = Vec::new();
    for item in items {
        match item {
            ListItem::Marker(label) => groups.push(PartOfSpeech {
                label,
                senses: Vec::new(),
            }),
            ListItem::Continuation(sense) => match groups.last_mut() {
                Some(group) => group.senses.push(sense),
                None => {
                    tracing::debug!("Sense item before any part-of-speech marker, skipping");
                }
            },
        }
    }

    groups
}

fn classify_item(li: ElementRef<'_>) -> ListItem {
    let marker_sel = Selector::parse(".pos_type").expect("valid selector");

    if let Some(marker) = li.select(&marker_sel).next() {
        let abbr = select_text(marker, ".pos_abbr");
        let desc = select_text(marker, ".pos_desc");
        let label = match (abbr, desc) {
            (Some(abbr), Some(desc)) => format!("{abbr} {desc}"),
            (Some(abbr), None) => abbr,
            (None, Some(desc)) => desc,
            (None, None) => element_text(marker),
        };
        ListItem::Marker(label)
    } else {
        ListItem::Continuation(Sense {
            definition: select_text(li, ".explanation").unwrap_or_default(),
            examples: parse_examples(li),
        })
    }
}

fn parse_examples(li: ElementRef<'_>) -> Vec<Example> {
    let sample_sel = Selector::parse(".sample").expect("valid selector");
    li.select(&sample_sel).map(parse_example).collect()
}

/// Split one example node into source sentence, translation, and the
/// keywords to emphasize.
///
/// Structural split first: a dedicated `.example_sentence` child holds
/// the source and its next sibling element holds the translation. Older
/// markup runs both languages together in one node; for that shape the
/// ASCII characters recover the source sentence and whatever remains is
/// the translation.
fn parse_example(sample: ElementRef<'_>) -> Example {
    let sentence_sel = Selector::parse(".example_sentence").expect("valid selector");

    if let Some(sentence) = sample.select(&sentence_sel).next() {
        Example {
            source_text: element_text(sentence),
            translated_text: next_sibling_text(sentence),
            keywords: keywords_of(sentence),
        }
    } else {
        let (source_text, translated_text) = split_textual(&element_text(sample));
        Example {
            source_text,
            translated_text,
            keywords: keywords_of(sample),
        }
    }
}

/// Textual fallback: the ASCII characters are the source-language
/// sentence; removing that substring leaves the translation.
fn split_textual(full: &str) -> (String, String) {
    let source: String = full.chars().filter(char::is_ascii).collect();
    let source = source.trim().to_string();
    if source.is_empty() {
        return (String::new(), full.trim().to_string());
    }
    let translated = full.replacen(&source, "", 1).trim().to_string();
    (source, translated)
}

fn keywords_of(node: ElementRef<'_>) -> Vec<String> {
    let bold_sel = Selector::parse("b").expect("valid selector");
    node.select(&bold_sel)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}

/// First audio strategy: the page embeds a JSON blob in a `<script>`
/// element with the clip URL under an mp3 key. Any malformed blob is
/// skipped rather than reported.
fn audio_from_scripts(document: &Html) -> Option<String> {
    let script_sel = Selector::parse("script").expect("valid selector");

    for script in document.select(&script_sel) {
        let text: String = script.text().collect();
        if !text.contains(".mp3") {
            continue;
        }
        let Ok(value) = serde_json::from_str::<Value>(text.trim()) else {
            continue;
        };
        if let Some(url) = first_mp3(&value) {
            return Some(url);
        }
    }

    None
}

fn first_mp3(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.ends_with(".mp3") => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_mp3),
        Value::Object(map) => map.values().find_map(first_mp3),
        _ => None,
    }
}

/// Second audio strategy: scan the raw HTML for the fixed audio-CDN
/// path, which sometimes only appears inside escaped inline JS.
fn audio_from_raw(html: &str) -> Option<String> {
    let re = regex::Regex::new(r"https:(?:\\/|/)(?:\\/|/)s\.yimg\.com(?:(?:\\/|/)[0-9A-Za-z_.-]+)+\.mp3")
        .expect("valid audio pattern");
    re.find(html).map(|m| m.as_str().replace("\\/", "/"))
}

fn parse_suggestion(root: ElementRef<'_>) -> Option<String> {
    select_text(root, "h2 i").or_else(|| select_text(root, ".spell_suggestion a"))
}

/// `[tɛst]` → `tɛst`. The presenter adds its own brackets back.
fn strip_brackets(s: &str) -> String {
    s.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim()
        .to_string()
}

/// Trimmed text of the first match under `scope`, if any is non-empty.
fn select_text(scope: ElementRef<'_>, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).expect("valid selector");
    scope
        .select(&sel)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn next_sibling_text(el: ElementRef<'_>) -> String {
    el.next_siblings()
        .find_map(ElementRef::wrap)
        .map(element_text)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESOLVED: &str = include_str!("../tests/fixtures/resolved.html");
    const SUGGESTION: &str = include_str!("../tests/fixtures/suggestion.html");

    #[test]
    fn test_extract_resolved_page() {
        let result = extract(RESOLVED);

        assert_eq!(result.word, "test");
        assert_eq!(result.pronunciation.as_deref(), Some("tɛst"));
        assert_eq!(
            result.audio_url.as_deref(),
            Some("https://s.yimg.com/bg/dict/dreye/live/f/test.mp3")
        );
        assert_eq!(result.suggestion, None);

        assert_eq!(result.entries.len(), 2);
        let noun = &result.entries[0];
        assert_eq!(noun.label, "n.");
        assert_eq!(noun.senses.len(), 1);
        assert_eq!(noun.senses[0].definition, "an examination");

        let example = &noun.senses[0].examples[0];
        assert_eq!(example.source_text, "The test was easy.");
        assert_eq!(example.translated_text, "這個測驗很簡單。");
        assert_eq!(example.keywords, vec!["test".to_string()]);

        let verb = &result.entries[1];
        assert_eq!(verb.label, "vt. 及物動詞");
        assert_eq!(verb.senses.len(), 1);
        assert!(verb.senses[0].examples.is_empty());
    }

    #[test]
    fn test_extract_suggestion_page() {
        let result = extract(SUGGESTION);

        assert!(!result.is_resolved());
        assert!(result.entries.is_empty());
        assert_eq!(result.suggestion.as_deref(), Some("test"));
    }

    #[test]
    fn test_extract_is_total() {
        assert_eq!(extract(""), LookupResult::default());
        assert_eq!(extract("<html></html>"), LookupResult::default());
        assert_eq!(extract("not html at all %%%"), LookupResult::default());
    }

    #[test]
    fn test_extract_is_idempotent() {
        assert_eq!(extract(RESOLVED), extract(RESOLVED));
    }

    #[test]
    fn test_no_suggestion_when_word_present() {
        // A resolved page may still carry an <h2><i> somewhere; the
        // suggestion field must stay empty once a headword exists.
        let html = r#"
        <div id="main">
          <div class="title_term"><span>test</span></div>
          <h2>相關詞彙 <i>testing</i></h2>
        </div>
        "#;
        let result = extract(html);
        assert_eq!(result.word, "test");
        assert_eq!(result.suggestion, None);
    }

    #[test]
    fn test_suggestion_fallback_selector() {
        let html = r#"
        <div id="main">
          <div class="spell_suggestion">您是不是要查 <a href="/dictionary?p=test">test</a></div>
        </div>
        "#;
        let result = extract(html);
        assert_eq!(result.suggestion.as_deref(), Some("test"));
    }

    #[test]
    fn test_orphan_sense_is_skipped() {
        let html = r#"
        <div id="main">
          <div class="title_term"><span>test</span></div>
          <ul class="dict_explanations">
            <li><span class="explanation">orphan before any marker</span></li>
            <li><span class="pos_type"><span class="pos_abbr">n.</span></span></li>
            <li><span class="explanation">an examination</span></li>
          </ul>
        </div>
        "#;
        let result = extract(html);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].senses.len(), 1);
        assert_eq!(result.entries[0].senses[0].definition, "an examination");
    }

    #[test]
    fn test_marker_without_sense_yields_empty_group() {
        let html = r#"
        <div id="main">
          <div class="title_term"><span>test</span></div>
          <ul class="dict_explanations">
            <li><span class="pos_type"><span class="pos_abbr">n.</span></span></li>
          </ul>
        </div>
        "#;
        let result = extract(html);
        assert_eq!(result.entries.len(), 1);
        assert!(result.entries[0].senses.is_empty());
    }

    #[test]
    fn test_textual_example_split() {
        // Older markup runs both languages together in one node.
        let html = r#"
        <div id="main">
          <div class="title_term"><span>test</span></div>
          <ul class="dict_explanations">
            <li><span class="pos_type"><span class="pos_abbr">n.</span></span></li>
            <li>
              <span class="explanation">an examination</span>
              <div class="sample">He passed the <b>test</b>. 他通過了測驗。</div>
            </li>
          </ul>
        </div>
        "#;
        let result = extract(html);
        let example = &result.entries[0].senses[0].examples[0];
        assert_eq!(example.source_text, "He passed the test.");
        assert_eq!(example.translated_text, "他通過了測驗。");
        assert_eq!(example.keywords, vec!["test".to_string()]);
    }

    #[test]
    fn test_split_textual() {
        let (source, translated) = split_textual("He passed the test. 他通過了測驗。");
        assert_eq!(source, "He passed the test.");
        assert_eq!(translated, "他通過了測驗。");

        let (source, translated) = split_textual("只有中文");
        assert_eq!(source, "");
        assert_eq!(translated, "只有中文");

        let (source, translated) = split_textual("");
        assert_eq!(source, "");
        assert_eq!(translated, "");
    }

    #[test]
    fn test_strip_brackets() {
        assert_eq!(strip_brackets("[tɛst]"), "tɛst");
        assert_eq!(strip_brackets(" [ˈwɜtɚ] "), "ˈwɜtɚ");
        assert_eq!(strip_brackets("tɛst"), "tɛst");
        assert_eq!(strip_brackets("[]"), "");
    }

    #[test]
    fn test_audio_from_raw_unescapes() {
        let html = r#"<script>var player = {"url":"https:\/\/s.yimg.com\/bg\/dict\/dreye\/live\/f\/water.mp3"};</script>"#;
        assert_eq!(
            audio_from_raw(html).as_deref(),
            Some("https://s.yimg.com/bg/dict/dreye/live/f/water.mp3")
        );
        assert_eq!(audio_from_raw("<html></html>"), None);
    }

    #[test]
    fn test_audio_from_scripts_ignores_malformed_json() {
        let html = r#"
        <html><head>
          <script>var broken = {audio: "x.mp3"</script>
          <script type="application/json">{"sound":{"mp3":"https://s.yimg.com/bg/dict/ok.mp3"}}</script>
        </head><body><div id="main"></div></body></html>
        "#;
        let result = extract(html);
        assert_eq!(
            result.audio_url.as_deref(),
            Some("https://s.yimg.com/bg/dict/ok.mp3")
        );
    }

    #[test]
    fn test_content_outside_panel_is_ignored() {
        let html = r#"
        <div class="sidebar">
          <div class="title_term"><span>wrong</span></div>
        </div>
        <div id="main">
          <div class="title_term"><span>right</span></div>
        </div>
        "#;
        assert_eq!(extract(html).word, "right");
    }
}
