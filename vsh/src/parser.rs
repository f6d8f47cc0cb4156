//! Command line splitting: one optional `>` redirection, `|`-separated
//! segments, whitespace-separated words.

use crate::error::{VshError, VshResult};

/// One `|`-delimited unit of a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    pub args: Vec<String>,
}

impl Segment {
    /// Splits a chunk on whitespace. Returns `None` when the chunk has no words.
    pub fn tokenize(chunk: &str) -> Option<Self> {
        let mut words = chunk.split_whitespace().map(str::to_string);
        let name = words.next()?;
        Some(Self {
            name,
            args: words.collect(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Raw redirection target as typed (not yet resolved against the cwd).
    pub redirect: Option<String>,
    /// One entry per `|` chunk; `None` marks an empty chunk.
    pub segments: Vec<Option<Segment>>,
}

/// Parses a raw line. Only the first `>` is significant; everything after it
/// is the target. An empty target is a parse error.
pub fn parse(input: &str) -> VshResult<CommandLine> {
    let (command_part, redirect) = match input.split_once('>') {
        Some((command, target)) => {
            let target = target.trim();
            if target.is_empty() {
                return Err(VshError::Parse(
                    "No output file specified after '>'.".to_string(),
                ));
            }
            (command.trim(), Some(target.to_string()))
        }
        None => (input, None),
    };

    let segments = command_part
        .split('|')
        .map(|chunk| Segment::tokenize(chunk.trim()))
        .collect();

    Ok(CommandLine { redirect, segments })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(name: &str, args: &[&str]) -> Option<Segment> {
        Some(Segment {
            name: name.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
        })
    }

    #[test]
    fn test_single_command() {
        let line = parse("ls /home").unwrap();
        assert_eq!(line.redirect, None);
        assert_eq!(line.segments, vec![seg("ls", &["/home"])]);
    }

    #[test]
    fn test_pipeline() {
        let line = parse("cat /log.txt | grep error").unwrap();
        assert_eq!(
            line.segments,
            vec![seg("cat", &["/log.txt"]), seg("grep", &["error"])]
        );
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        let line = parse("  echo   a \t b  ").unwrap();
        assert_eq!(line.segments, vec![seg("echo", &["a", "b"])]);
    }

    #[test]
    fn test_redirection() {
        let line = parse("echo data > out.txt").unwrap();
        assert_eq!(line.redirect.as_deref(), Some("out.txt"));
        assert_eq!(line.segments, vec![seg("echo", &["data"])]);
    }

    #[test]
    fn test_only_first_redirect_splits() {
        let line = parse("echo a > b > c").unwrap();
        assert_eq!(line.redirect.as_deref(), Some("b > c"));
    }

    #[test]
    fn test_empty_redirect_target() {
        assert!(matches!(parse("echo data >   "), Err(VshError::Parse(_))));
    }

    #[test]
    fn test_empty_chunks() {
        let line = parse("echo a | | grep a").unwrap();
        assert_eq!(line.segments.len(), 3);
        assert_eq!(line.segments[1], None);

        let line = parse("> /out.txt").unwrap();
        assert_eq!(line.segments, vec![None]);
    }
}
