//! Edge-list text parsing.
//!
//! Input is a UTF-8 edge table: a header line (ignored) followed by rows
//! of `source,target[,...]`. Only the first two comma-separated fields
//! are read; malformed rows are silently skipped.

use crate::error::{CoreError, CoreResult};

/// An ordered endpoint pair. `(source, target)` and `(target, source)`
/// denote the same undirected edge once it reaches [`crate::graph`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

/// Parse an edge-list text into an ordered list of edges, preserving
/// input order. Fails only when the text has fewer than one line.
pub fn parse_edges(text: &str) -> CoreResult<Vec<Edge>> {
    let mut lines = text.lines();
    if lines.next().is_none() {
        return Err(CoreError::MalformedInput("input has no lines".to_string()));
    }

    let mut edges = Vec::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let mut fields = line.splitn(2, ',');
        let (Some(source), Some(rest)) = (fields.next(), fields.next()) else {
            continue;
        };
        let target = rest.split(',').next().unwrap_or("");

        let source = source.trim();
        let target = target.trim();
        if source.is_empty() || target.is_empty() {
            continue;
        }

        edges.push(Edge {
            source: source.to_string(),
            target: target.to_string(),
        });
    }

    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_only_yields_empty_edges() {
        let edges = parse_edges("source,target\n").unwrap();
        assert!(edges.is_empty());
    }

    #[test]
    fn no_lines_is_malformed() {
        assert!(parse_edges("").is_err());
    }

    #[test]
    fn trims_and_reads_first_two_fields() {
        let edges = parse_edges("s,t\n A , B ,extra\nC,D").unwrap();
        assert_eq!(
            edges,
            vec![
                Edge { source: "A".into(), target: "B".into() },
                Edge { source: "C".into(), target: "D".into() },
            ]
        );
    }

    #[test]
    fn skips_rows_with_empty_fields() {
        let edges = parse_edges("s,t\nA,\n,B\nC,D\n\n").unwrap();
        assert_eq!(edges, vec![Edge { source: "C".into(), target: "D".into() }]);
    }

    #[test]
    fn preserves_input_order() {
        let edges = parse_edges("s,t\nZ,Y\nA,B\nM,N").unwrap();
        let sources: Vec<_> = edges.iter().map(|e| e.source.as_str()).collect();
        assert_eq!(sources, vec!["Z", "A", "M"]);
    }
}
