//! Whole-stream ndjson validity check, run before any per-line parsing.

/// Join the lines into one JSON array and try to parse it. An invalid line
/// anywhere rejects the whole stream, which is the cue to abort the run
/// before indexing starts.
pub fn is_valid_ndjson(lines: &[String]) -> bool {
    let aggregate = format!("[{}]", lines.join(","));
    serde_json::from_str::<serde_json::Value>(&aggregate).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn accepts_well_formed_lines() {
        assert!(is_valid_ndjson(&lines(&["{\"a\":1}", "{\"b\":2}"])));
    }

    #[test]
    fn accepts_empty_stream() {
        assert!(is_valid_ndjson(&[]));
    }

    #[test]
    fn rejects_stream_with_one_bad_line() {
        assert!(!is_valid_ndjson(&lines(&["{\"a\":1}", "{not json"])));
    }
}
