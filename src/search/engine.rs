//! Glossary Engine
//!
//! Ties together normalization, exact lookup, fuzzy suggestions and
//! substring search over a corpus snapshot. Every function here is pure:
//! it reads the snapshot it is given and holds no state of its own.

use super::fuzzy::FuzzyMatcher;
use super::normalize::normalize;
use super::ranking::{into_terms, sort_ranked, MatchTier, Ranked};
use crate::corpus::{Corpus, Record};
use serde::Serialize;
use std::cmp::Reverse;

/// Outcome of a definition lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Lookup {
    /// The query matched a stored term exactly
    Hit(Record),
    /// No exact match; every term ranked by similarity to the query
    Miss { suggestions: Vec<String> },
}

/// Outcome of a substring search over terms and definitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchResult {
    /// Matching terms, term-field matches before definition-only matches
    Found { terms: Vec<String> },
    /// Nothing matched; carries the query as the caller typed it
    NotFound { query: String },
}

impl SearchResult {
    pub fn terms(&self) -> &[String] {
        match self {
            SearchResult::Found { terms } => terms,
            SearchResult::NotFound { .. } => &[],
        }
    }
}

/// Look up a definition, falling back to suggestions on a miss
pub fn lookup_definition(query: &str, corpus: &Corpus) -> Lookup {
    match corpus.lookup(query) {
        Some(record) => Lookup::Hit(record.clone()),
        None => Lookup::Miss {
            suggestions: suggest(query, corpus),
        },
    }
}

/// Rank every term in the corpus by similarity to the query, most similar
/// first. Ties fall back to the normalized term, then the original term.
pub fn suggest(query: &str, corpus: &Corpus) -> Vec<String> {
    if corpus.is_empty() {
        return Vec::new();
    }

    let matcher = FuzzyMatcher::new(&normalize(query));

    let mut ranked: Vec<_> = corpus
        .records()
        .iter()
        .map(|record| {
            let key = normalize(&record.term);
            Ranked::new(Reverse(matcher.score(&key)), key, record.term.as_str())
        })
        .collect();

    sort_ranked(&mut ranked);
    into_terms(ranked)
}

/// Find the query as a substring of terms or definitions
pub fn search_corpus(query: &str, corpus: &Corpus) -> SearchResult {
    let needle = normalize(query);

    let mut ranked: Vec<_> = corpus
        .records()
        .iter()
        .filter_map(|record| {
            let key = normalize(&record.term);
            let tier = if key.contains(&needle) {
                MatchTier::Term
            } else if normalize(&record.definition).contains(&needle) {
                MatchTier::Definition
            } else {
                return None;
            };
            Some(Ranked::new(tier, key, record.term.as_str()))
        })
        .collect();

    if ranked.is_empty() {
        return SearchResult::NotFound {
            query: query.to_string(),
        };
    }

    sort_ranked(&mut ranked);
    SearchResult::Found {
        terms: into_terms(ranked),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gloss_corpus() -> Corpus {
        // Deliberately not in the expected suggestion order
        Corpus::from_records(vec![
            Record::new("luster", "a prominent gloss"),
            Record::new("standard gloss", "a good resource"),
            Record::new("dictionary helper", "a gloss that is really glossing my world"),
            Record::new("abglosscd", "a cool thing"),
            Record::new("glossed gloss", "a really useful tool"),
        ])
    }

    fn agency_corpus() -> Corpus {
        Corpus::from_records(vec![
            Record::new("TAY", "Transitional Age Youth, people between the ages of sixteen and twenty-four who are in transition from state custody or foster care and are at-risk."),
            Record::new("WIB", "Workforce Investment Board, a regional entity created to implement the Workforce Investment Act of 1998 by directing federal, state and local funding to workforce development programs."),
            Record::new("ACYF", "Administration for Children, Youth and Families, a part of the Administration for Children and Families, under the Department of Health and Human Services."),
            Record::new("SAWS", "the Statewide Automated Welfare System, made up of multiple systems (including C-IV, CalWin and LEADER) which support eligibility and benefit determination."),
            Record::new("CalWIN", "CalWORKs Information Network, a service supporting the administration of public assistance programs in a consortium of California counties. Part of SAWS."),
        ])
    }

    #[test]
    fn test_suggestion_order() {
        let suggestions = suggest("shh gloss", &gloss_corpus());
        assert_eq!(
            suggestions,
            vec![
                "abglosscd",
                "glossed gloss",
                "standard gloss",
                "dictionary helper",
                "luster"
            ]
        );
    }

    #[test]
    fn test_suggestion_order_for_bare_word() {
        let suggestions = suggest("gloss", &gloss_corpus());
        assert_eq!(suggestions[..3], ["abglosscd", "glossed gloss", "standard gloss"]);
        assert_eq!(suggestions.len(), 5);
    }

    #[test]
    fn test_suggest_empty_corpus() {
        assert!(suggest("anything", &Corpus::new()).is_empty());
    }

    #[test]
    fn test_lookup_hit_takes_precedence() {
        let corpus = gloss_corpus();
        match lookup_definition("  Standard GLOSS ", &corpus) {
            Lookup::Hit(record) => {
                assert_eq!(record.term, "standard gloss");
                assert_eq!(record.definition, "a good resource");
            }
            other => panic!("expected hit, got {:?}", other),
        }
    }

    #[test]
    fn test_lookup_miss_suggests_all_terms() {
        match lookup_definition("shh gloss", &gloss_corpus()) {
            Lookup::Miss { suggestions } => assert_eq!(suggestions.len(), 5),
            other => panic!("expected miss, got {:?}", other),
        }
    }

    #[test]
    fn test_search_term_matches_first() {
        let result = search_corpus("saws", &agency_corpus());
        assert_eq!(result.terms(), ["SAWS", "CalWIN"]);

        let result = search_corpus("calwin", &agency_corpus());
        assert_eq!(result.terms(), ["CalWIN", "SAWS"]);
    }

    #[test]
    fn test_search_definition_only_matches() {
        let result = search_corpus("youth", &agency_corpus());
        assert_eq!(result.terms(), ["ACYF", "TAY"]);
    }

    #[test]
    fn test_search_finds_all_definition_mentions() {
        let result = search_corpus("state", &agency_corpus());
        let terms = result.terms();
        assert!(terms.contains(&"TAY".to_string()));
        assert!(terms.contains(&"WIB".to_string()));
        assert!(terms.contains(&"SAWS".to_string()));
    }

    #[test]
    fn test_search_not_found_keeps_original_query() {
        let result = search_corpus("  Banana ", &agency_corpus());
        assert_eq!(
            result,
            SearchResult::NotFound {
                query: "  Banana ".to_string()
            }
        );
    }

    #[test]
    fn test_search_empty_query_matches_everything() {
        let result = search_corpus("", &agency_corpus());
        assert_eq!(result.terms(), ["ACYF", "CalWIN", "SAWS", "TAY", "WIB"]);
    }

    #[test]
    fn test_search_empty_corpus() {
        let result = search_corpus("", &Corpus::new());
        assert!(matches!(result, SearchResult::NotFound { .. }));
    }

    #[test]
    fn test_search_multibyte_query() {
        let corpus = Corpus::from_records(vec![Record::new("Café", "où l'on boit")]);
        assert_eq!(search_corpus("CAFÉ", &corpus).terms(), ["Café"]);
        assert_eq!(search_corpus("OÙ", &corpus).terms(), ["Café"]);
    }

    #[test]
    fn test_lookup_serializes_with_status_tag() {
        let value = serde_json::to_value(Lookup::Miss {
            suggestions: vec!["a".to_string()],
        })
        .unwrap();
        assert_eq!(value["status"], "miss");
        assert_eq!(value["suggestions"][0], "a");
    }
}
