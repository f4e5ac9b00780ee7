use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// A named group of search queries. The name doubles as the store file's
/// base name; the queries run in configuration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub name: String,
    pub queries: Vec<String>,
}

/// Load the topics and their queries from the configuration file.
///
/// Blank lines and lines starting with `#` are ignored, as is any line
/// that does not contain exactly one `=`. Queries are comma-separated,
/// whitespace-trimmed, and may be wrapped in single or double quotes.
pub fn load_topics(path: impl AsRef<Path>) -> Result<Vec<Topic>, ConfigError> {
    let contents = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
        path: path.as_ref().to_path_buf(),
        source: e,
    })?;
    Ok(parse_topics(&contents))
}

fn parse_topics(contents: &str) -> Vec<Topic> {
    let mut topics = Vec::new();
    for line in contents.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let assignment: Vec<_> = line.split('=').collect();
        let [name, queries] = assignment.as_slice() else {
            continue;
        };
        topics.push(Topic {
            name: name.trim().to_string(),
            queries: queries.split(',').map(trim_query).collect(),
        });
    }
    topics
}

fn trim_query(raw: &str) -> String {
    let query = raw.trim();
    query
        .strip_prefix('\'')
        .and_then(|q| q.strip_suffix('\''))
        .or_else(|| query.strip_prefix('"').and_then(|q| q.strip_suffix('"')))
        .unwrap_or(query)
        .to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_topics_with_comments_and_blank_lines() {
        let topics = parse_topics("sports = 'nba', 'nfl'\n# comment\n\nmusic=rock\n");
        assert_eq!(
            topics,
            vec![
                Topic {
                    name: "sports".to_string(),
                    queries: vec!["nba".to_string(), "nfl".to_string()],
                },
                Topic {
                    name: "music".to_string(),
                    queries: vec!["rock".to_string()],
                },
            ]
        );
    }

    #[test]
    fn line_without_assignment_contributes_nothing() {
        assert!(parse_topics("badline\n").is_empty());
    }

    #[test]
    fn line_with_two_assignments_is_skipped() {
        assert!(parse_topics("a = b = c\n").is_empty());
    }

    #[test]
    fn unquoted_queries_are_whitespace_trimmed() {
        let topics = parse_topics("news =  world cup ,  elections\n");
        assert_eq!(
            topics[0].queries,
            vec!["world cup".to_string(), "elections".to_string()]
        );
    }

    #[test]
    fn double_quoted_queries_are_unwrapped() {
        let topics = parse_topics("games = \"super smash\"\n");
        assert_eq!(topics[0].queries, vec!["super smash".to_string()]);
    }
}
