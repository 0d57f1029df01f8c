//! Pure helpers: JQL construction and text truncation (no HTTP, no status logic).

/// Cut `s` to at most `max` characters without splitting a code point.
pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Test Sets in `project` whose summary contains `name`.
pub(crate) fn test_set_jql(project_key: &str, name: &str) -> String {
    format!(
        r#"project = {} AND issuetype = "Test Set" AND summary ~ "{}""#,
        project_key,
        escape_jql_string(name)
    )
}

/// Tests that belong to a Test Set.
pub(crate) fn test_set_members_jql(test_set_key: &str) -> String {
    format!(r#"issue in testSetTests("{}")"#, test_set_key)
}

/// Issues with one of `keys`.
pub(crate) fn keys_jql(keys: &[String]) -> String {
    format!("key in ({})", keys.join(", "))
}

fn escape_jql_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
