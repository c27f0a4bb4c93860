//! The lookup state machine.
//!
//! `Querying(text)` resolves to one of: a rendered report, a single
//! suggestion-driven re-query, a not-found message, or a fetch failure.
//! The suggestion hop happens at most once; a suggestion page that
//! itself fails to resolve is treated as not found so the loop always
//! terminates.

use console::style;
use twdict_acquire::{extract, Client, FetchError};
use twdict_model::LookupResult;

use crate::config::Config;
use crate::render;

pub const EXIT_OK: u8 = 0;
pub const EXIT_MISSING_QUERY: u8 = 1;
pub const EXIT_FETCH_FAILED: u8 = 2;
pub const EXIT_NO_MATCH: u8 = 3;

/// What to do with an extracted page. The headword is checked before
/// the suggestion: a page carrying both is resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Resolved,
    Suggested(String),
    NotFound,
}

pub fn next_action(result: &LookupResult) -> Action {
    if result.is_resolved() {
        return Action::Resolved;
    }
    match &result.suggestion {
        Some(alt) if !alt.is_empty() => Action::Suggested(alt.clone()),
        _ => Action::NotFound,
    }
}

/// The move to make after a fetched page, given how many suggestion
/// hops were already taken.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Render,
    Retry(String),
    NoMatch,
}

/// The suggestion redirect is taken only from the first page; after
/// that, anything short of a headword is a miss, so a lookup never
/// issues more than one follow-up query.
pub fn step(hop: u8, result: &LookupResult) -> Outcome {
    match next_action(result) {
        Action::Resolved => Outcome::Render,
        Action::Suggested(alt) if hop == 0 => Outcome::Retry(alt),
        Action::Suggested(_) | Action::NotFound => Outcome::NoMatch,
    }
}

/// Run one lookup end to end and return the process exit code.
pub async fn run(query: &str, config: &Config) -> u8 {
    let client = match Client::try_new() {
        Ok(client) => client,
        Err(err) => {
            eprintln!("{err}");
            return EXIT_FETCH_FAILED;
        }
    };

    let mut query = query.to_string();
    let mut hop = 0;
    loop {
        let result = match lookup(&client, &query).await {
            Ok(result) => result,
            Err(err) => {
                eprintln!("{err}");
                return EXIT_FETCH_FAILED;
            }
        };

        match step(hop, &result) {
            Outcome::Render => return render::render(&query, &result, config),
            Outcome::NoMatch => {
                print_not_found();
                return EXIT_NO_MATCH;
            }
            Outcome::Retry(alt) => {
                println!("{}", style(format!("拼字檢查: {query} -> {alt}")).red().bold());
                query = alt;
                hop += 1;
            }
        }
    }
}

async fn lookup(client: &Client, query: &str) -> Result<LookupResult, FetchError> {
    let html = client.fetch(query).await?;
    Ok(extract(&html))
}

fn print_not_found() {
    println!("{}", style("查無此字").red().bold());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_wins_over_suggestion() {
        let result = LookupResult {
            word: "test".to_string(),
            suggestion: Some("text".to_string()),
            ..LookupResult::default()
        };
        assert_eq!(next_action(&result), Action::Resolved);
    }

    #[test]
    fn test_suggestion_when_no_headword() {
        let result = LookupResult {
            suggestion: Some("test".to_string()),
            ..LookupResult::default()
        };
        assert_eq!(next_action(&result), Action::Suggested("test".to_string()));
    }

    #[test]
    fn test_not_found_when_neither() {
        assert_eq!(next_action(&LookupResult::default()), Action::NotFound);
    }

    #[test]
    fn test_empty_suggestion_is_not_found() {
        let result = LookupResult {
            suggestion: Some(String::new()),
            ..LookupResult::default()
        };
        assert_eq!(next_action(&result), Action::NotFound);
    }

    fn suggested(alt: &str) -> LookupResult {
        LookupResult {
            suggestion: Some(alt.to_string()),
            ..LookupResult::default()
        }
    }

    #[test]
    fn test_first_suggestion_retries() {
        assert_eq!(step(0, &suggested("test")), Outcome::Retry("test".to_string()));
    }

    #[test]
    fn test_second_suggestion_is_a_miss() {
        // The retried page offering yet another suggestion ends the
        // lookup instead of chasing it.
        assert_eq!(step(1, &suggested("text")), Outcome::NoMatch);
    }

    #[test]
    fn test_resolved_retry_renders() {
        let result = LookupResult {
            word: "test".to_string(),
            ..LookupResult::default()
        };
        assert_eq!(step(1, &result), Outcome::Render);
    }

    #[test]
    fn test_at_most_one_follow_up_query() {
        // A site that suggests on every page must still terminate
        // after exactly one follow-up fetch.
        let mut fetches = 1;
        let mut hop = 0;
        loop {
            match step(hop, &suggested("test")) {
                Outcome::Retry(_) => {
                    fetches += 1;
                    hop += 1;
                }
                outcome => {
                    assert_eq!(outcome, Outcome::NoMatch);
                    break;
                }
            }
        }
        assert_eq!(fetches, 2);
    }
}
