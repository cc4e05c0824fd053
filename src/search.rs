//! Relevance ranking of indexed commands
//!
//! Every query term is compared, case-insensitively, against each
//! whitespace-separated word of a command's title, description and content.
//!
//! | Field | word starts with term | word contains term |
//! |-------|-----------------------|--------------------|
//! | title | 1.0 | 0.125 |
//! | description | 0.5 | 0.0625 |
//! | content | 0.5 | 0.03125 |
//!
//! Scores add up over all terms and words. Commands scoring zero are dropped.

use crate::command::Command;

/// Per-field weights: (prefix match, substring match)
const TITLE_WEIGHTS: (f32, f32) = (1.0, 0.125);
const DESCRIPTION_WEIGHTS: (f32, f32) = (0.5, 0.125 / 2.0);
const CONTENT_WEIGHTS: (f32, f32) = (0.5, 0.125 / 4.0);

/// A command with its relevance score
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<'a> {
    pub command: &'a Command,
    pub score: f32,
}

/// What a search produced, deciding whether a picker is needed
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<'a> {
    /// Nothing matched; report and stop
    NoMatches,
    /// Exactly one match; go straight to resolution
    Single(&'a Command),
    /// Let the user choose
    Many(Vec<Ranked<'a>>),
}

impl<'a> SearchOutcome<'a> {
    pub fn from_ranked(mut ranked: Vec<Ranked<'a>>) -> Self {
        match ranked.len() {
            0 => SearchOutcome::NoMatches,
            1 => SearchOutcome::Single(ranked.remove(0).command),
            _ => SearchOutcome::Many(ranked),
        }
    }
}

/// Split a query into lower-cased terms, dropping empty ones
pub fn query_terms(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

fn field_score(field: &str, terms: &[String], (prefix, contains): (f32, f32)) -> f32 {
    let words: Vec<String> = field.split_whitespace().map(str::to_lowercase).collect();
    let mut score = 0.0;
    for term in terms {
        for word in &words {
            if word.starts_with(term.as_str()) {
                score += prefix;
            } else if word.contains(term.as_str()) {
                score += contains;
            }
        }
    }
    score
}

/// Relevance of one command for already-split terms
pub fn score(command: &Command, terms: &[String]) -> f32 {
    field_score(&command.title, terms, TITLE_WEIGHTS)
        + field_score(&command.description, terms, DESCRIPTION_WEIGHTS)
        + field_score(&command.content, terms, CONTENT_WEIGHTS)
}

/// Rank commands against a free-text query
///
/// Higher scores first; equal scores keep index order. An empty query skips
/// scoring and returns every command in index order with a score of zero.
pub fn rank<'a>(query: &str, commands: &'a [Command]) -> Vec<Ranked<'a>> {
    let terms = query_terms(query);
    if terms.is_empty() {
        return commands
            .iter()
            .map(|command| Ranked { command, score: 0.0 })
            .collect();
    }

    let mut ranked: Vec<Ranked<'a>> = commands
        .iter()
        .map(|command| Ranked {
            command,
            score: score(command, &terms),
        })
        .filter(|r| r.score > 0.0)
        .collect();

    // sort_by is stable, so ties stay in index order
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Rank and classify in one step
pub fn search<'a>(query: &str, commands: &'a [Command]) -> SearchOutcome<'a> {
    SearchOutcome::from_ranked(rank(query, commands))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cmd(title: &str, description: &str, content: &str) -> Command {
        let mut c = Command::new(title);
        c.description = description.to_string();
        c.content = content.to_string();
        c
    }

    fn titles<'a>(ranked: &[Ranked<'a>]) -> Vec<&'a str> {
        ranked.iter().map(|r| r.command.title.as_str()).collect()
    }

    #[test]
    fn test_prefix_match_ranking() {
        let commands = vec![
            cmd("list files", "", ""),
            cmd("list network", "", ""),
            cmd("copy file", "", ""),
        ];
        let ranked = rank("list", &commands);
        assert_eq!(titles(&ranked), vec!["list files", "list network"]);
        assert_eq!(ranked[0].score, 1.0);
        assert_eq!(ranked[1].score, 1.0);
    }

    #[test]
    fn test_field_weights() {
        let terms = query_terms("net");
        assert_eq!(score(&cmd("network", "", ""), &terms), 1.0);
        assert_eq!(score(&cmd("subnet", "", ""), &terms), 0.125);
        assert_eq!(score(&cmd("x", "network stuff", ""), &terms), 0.5);
        assert_eq!(score(&cmd("x", "subnet", ""), &terms), 0.0625);
        assert_eq!(score(&cmd("x", "", "netstat -an"), &terms), 0.5);
        assert_eq!(score(&cmd("x", "", "ip subnet"), &terms), 0.03125);
    }

    #[test]
    fn test_scores_accumulate_over_terms_and_words() {
        let terms = query_terms("ip addr");
        let c = cmd("ip addr add", "adds an ip", "ip addr add <cidr> dev <iface>");
        // title: ip + addr, description: ip, content: ip + addr
        assert_eq!(score(&c, &terms), 1.0 + 1.0 + 0.5 + 0.5 + 0.5);
    }

    #[test]
    fn test_case_insensitive() {
        let commands = vec![cmd("Docker Prune", "", "")];
        let ranked = rank("DOCKER", &commands);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].score, 1.0);
    }

    #[test]
    fn test_higher_score_first_then_index_order() {
        let commands = vec![
            cmd("restart service", "", ""),
            cmd("show logs", "logs of a service", ""),
            cmd("service status", "service", ""),
            cmd("stop service", "", ""),
        ];
        let ranked = rank("service", &commands);
        assert_eq!(
            titles(&ranked),
            vec!["service status", "restart service", "stop service", "show logs"]
        );
        assert_eq!(ranked[0].score, 1.5);
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let commands = vec![cmd("b", "", ""), cmd("a", "", "")];
        let ranked = rank("   ", &commands);
        assert_eq!(titles(&ranked), vec!["b", "a"]);
    }

    #[test]
    fn test_outcome_policy() {
        let commands = vec![
            cmd("list files", "", ""),
            cmd("list network", "", ""),
            cmd("copy file", "", ""),
        ];
        assert_eq!(search("zzz", &commands), SearchOutcome::NoMatches);
        assert_eq!(search("copy", &commands), SearchOutcome::Single(&commands[2]));
        match search("list", &commands) {
            SearchOutcome::Many(ranked) => assert_eq!(ranked.len(), 2),
            other => panic!("expected many, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_titles_are_both_ranked() {
        let commands = vec![cmd("same", "", "a"), cmd("same", "", "b")];
        let ranked = rank("same", &commands);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].command.content, "a");
        assert_eq!(ranked[1].command.content, "b");
    }

    proptest! {
        #[test]
        fn prop_ranked_scores_are_positive_and_descending(
            titles in proptest::collection::vec("[a-c ]{0,10}", 0..8),
            query in "[a-c ]{0,6}",
        ) {
            let commands: Vec<Command> = titles.iter().map(|t| cmd(t, "", "")).collect();
            let ranked = rank(&query, &commands);
            if query_terms(&query).is_empty() {
                prop_assert_eq!(ranked.len(), commands.len());
            } else {
                for pair in ranked.windows(2) {
                    prop_assert!(pair[0].score >= pair[1].score);
                }
                for r in &ranked {
                    prop_assert!(r.score > 0.0);
                }
            }
        }
    }
}
