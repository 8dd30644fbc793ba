//! Tool pattern matching shared by the evaluator.

/// Match a tool name against a policy pattern. Patterns are exact names,
/// trailing-`*` prefixes (`exec.*` matches `exec.run`), or the bare `*`
/// wildcard.
pub fn tool_matches(pattern: &str, tool: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    if let Some(prefix) = pattern.strip_suffix('*') {
        return tool.starts_with(prefix);
    }
    pattern == tool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_prefix_and_bare_wildcard() {
        assert!(tool_matches("deploy", "deploy"));
        assert!(!tool_matches("deploy", "deploy_prod"));
        assert!(tool_matches("exec.*", "exec.run"));
        assert!(!tool_matches("exec.*", "read.file"));
        assert!(tool_matches("*", "anything"));
    }
}
