use semver::Version;

/// Pulls the first version-looking token out of a tool's `--version` output.
pub fn normalize_tool_version(raw: &str) -> Option<String> {
    raw.split_whitespace().find_map(|token| {
        let candidate = token
            .trim_matches(|ch: char| matches!(ch, '[' | ']' | '(' | ')' | ',' | ';'))
            .trim_start_matches(['v', 'V']);
        if !candidate.starts_with(|ch: char| ch.is_ascii_digit()) {
            return None;
        }
        match Version::parse(candidate) {
            Ok(version) => Some(version.to_string()),
            Err(_) => Some(candidate.to_string()),
        }
    })
}
