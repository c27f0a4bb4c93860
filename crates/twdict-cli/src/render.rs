//! Terminal presentation of a lookup result.
//!
//! Layout follows the dictionary page: pronunciation first, then each
//! part-of-speech group with numbered senses and indented bilingual
//! examples. Keywords inside example sentences are emphasized in bold.

use std::process::Stdio;

use console::Style;
use twdict_model::LookupResult;

use crate::config::Config;
use crate::lookup::{EXIT_NO_MATCH, EXIT_OK};

/// Print the report for `result` and kick off optional audio playback.
///
/// Returns 3 when there is no headword; the suggestion branch is the
/// orchestrator's job, not ours.
pub fn render(query: &str, result: &LookupResult, config: &Config) -> u8 {
    if !result.is_resolved() {
        return EXIT_NO_MATCH;
    }

    for line in report_lines(query, result) {
        println!("{line}");
    }

    if let Some(url) = &result.audio_url {
        play_audio(url, config);
    }

    EXIT_OK
}

/// Build the report as plain lines so tests can inspect them.
fn report_lines(query: &str, result: &LookupResult) -> Vec<String> {
    let mut lines = Vec::new();

    // A headword differing from the query means the site normalized or
    // redirected it; show what was actually resolved.
    if result.word != query {
        lines.push(style_line(&Style::new().yellow().bold(), &result.word));
    }

    if let Some(kk) = &result.pronunciation {
        lines.push(format!("KK: [{}]", Style::new().bold().apply_to(kk)));
    }

    for entry in &result.entries {
        if !entry.label.is_empty() {
            lines.push(style_line(&Style::new().red().bold(), &entry.label));
        }
        for (index, sense) in entry.senses.iter().enumerate() {
            lines.push(format!("  {}. {}", index + 1, sense.definition));
            for example in &sense.examples {
                lines.push(format!(
                    "     {}",
                    emphasize_keywords(
                        &example.source_text,
                        &example.keywords,
                        &Style::new().cyan(),
                        &Style::new().cyan().bold(),
                    )
                ));
                lines.push(format!(
                    "     {}",
                    Style::new().green().apply_to(&example.translated_text)
                ));
            }
        }
    }

    lines
}

fn style_line(style: &Style, text: &str) -> String {
    style.apply_to(text).to_string()
}

/// Emphasize every keyword occurrence in `sentence`.
///
/// Matching is case-sensitive and whole-word; the non-keyword stretches
/// get `base`, the matches get `strong`. Styles are applied per segment
/// because a nested style reset would cancel the surrounding color.
fn emphasize_keywords(sentence: &str, keywords: &[String], base: &Style, strong: &Style) -> String {
    if keywords.is_empty() {
        return base.apply_to(sentence).to_string();
    }

    let pattern = format!(
        r"\b(?:{})\b",
        keywords
            .iter()
            .map(|keyword| regex::escape(keyword))
            .collect::<Vec<_>>()
            .join("|")
    );
    let Ok(re) = regex::Regex::new(&pattern) else {
        return base.apply_to(sentence).to_string();
    };

    let mut out = String::new();
    let mut last = 0;
    for m in re.find_iter(sentence) {
        if m.start() > last {
            out.push_str(&base.apply_to(&sentence[last..m.start()]).to_string());
        }
        out.push_str(&strong.apply_to(m.as_str()).to_string());
        last = m.end();
    }
    if last < sentence.len() {
        out.push_str(&base.apply_to(&sentence[last..]).to_string());
    }

    out
}

/// Fire-and-forget playback of the pronunciation clip.
///
/// The configured command is split shell-style and the URL appended as
/// the sole trailing argument. The child is never awaited and failures
/// stay out of the exit code.
fn play_audio(url: &str, config: &Config) {
    let Some(cmd) = &config.player_cmd else {
        return;
    };
    let Some(argv) = shlex::split(cmd) else {
        tracing::debug!(%cmd, "Could not split playerCmd");
        return;
    };
    let Some((program, args)) = argv.split_first() else {
        return;
    };

    let spawned = std::process::Command::new(program)
        .args(args)
        .arg(url)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    match spawned {
        Ok(child) => tracing::debug!(pid = child.id(), "Spawned audio player"),
        Err(err) => tracing::debug!(err = %err, "Could not spawn audio player"),
    }
}
