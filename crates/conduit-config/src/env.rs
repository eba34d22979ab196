use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

// `{{ env.NAME }}` or `{{ env.NAME | default("value") }}`
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#).expect("must be valid regex")
});

/// Substitute environment placeholders in raw config text
///
/// Comment lines are copied untouched so that commented-out settings may
/// reference variables that are not set.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut expanded = Vec::new();

    for line in input.split('\n') {
        if line.trim_start().starts_with('#') {
            expanded.push(Cow::Borrowed(line));
            continue;
        }

        expanded.push(expand_line(line)?);
    }

    Ok(expanded.join("\n"))
}

fn expand_line(line: &str) -> Result<Cow<'_, str>, String> {
    let mut failure = None;

    let replaced = PLACEHOLDER.replace_all(line, |caps: &Captures<'_>| {
        match resolve(&caps[1], caps.get(2).map(|m| m.as_str())) {
            Ok(value) => value,
            Err(e) => {
                if failure.is_none() {
                    failure = Some(e);
                }
                String::new()
            }
        }
    });

    match failure {
        Some(e) => Err(e),
        None => Ok(replaced),
    }
}

fn resolve(key: &str, fallback: Option<&str>) -> Result<String, String> {
    let Some(name) = key.strip_prefix("env.").filter(|n| !n.is_empty() && !n.contains('.')) else {
        return Err(format!("only variables scoped with 'env.' are supported: `{key}`"));
    };

    match (std::env::var(name), fallback) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(default)) => Ok(default.to_string()),
        (Err(_), None) => Err(format!("environment variable not found: `{name}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let input = "[server]\nlisten_address = \"127.0.0.1:8001\"\n";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn substitutes_every_placeholder_on_a_line() {
        let vars = [("CONDUIT_HOST", Some("127.0.0.1")), ("CONDUIT_PORT", Some("9000"))];
        temp_env::with_vars(vars, || {
            let out = expand_env("listen_address = \"{{ env.CONDUIT_HOST }}:{{env.CONDUIT_PORT}}\"").unwrap();
            assert_eq!(out, "listen_address = \"127.0.0.1:9000\"");
        });
    }

    #[test]
    fn unset_variable_is_an_error() {
        temp_env::with_var_unset("CONDUIT_UNSET", || {
            let err = expand_env("admin_password = \"{{ env.CONDUIT_UNSET }}\"").unwrap_err();
            assert!(err.contains("CONDUIT_UNSET"));
        });
    }

    #[test]
    fn default_applies_only_when_unset() {
        temp_env::with_var_unset("CONDUIT_FILTER", || {
            let out = expand_env("filter = \"{{ env.CONDUIT_FILTER | default(\"warn\") }}\"").unwrap();
            assert_eq!(out, "filter = \"warn\"");
        });

        temp_env::with_var("CONDUIT_FILTER", Some("debug"), || {
            let out = expand_env("filter = \"{{ env.CONDUIT_FILTER | default(\"warn\") }}\"").unwrap();
            assert_eq!(out, "filter = \"debug\"");
        });
    }

    #[test]
    fn empty_default_is_allowed() {
        temp_env::with_var_unset("CONDUIT_EMPTY", || {
            let out = expand_env("x = \"{{ env.CONDUIT_EMPTY | default(\"\") }}\"").unwrap();
            assert_eq!(out, "x = \"\"");
        });
    }

    #[test]
    fn other_scopes_are_rejected() {
        let err = expand_env("x = \"{{ vault.TOKEN }}\"").unwrap_err();
        assert!(err.contains("only variables scoped with 'env.'"));

        let err = expand_env("x = \"{{ env.A.B }}\"").unwrap_err();
        assert!(err.contains("env.A.B"));
    }

    #[test]
    fn comment_lines_are_not_expanded() {
        temp_env::with_vars([("CONDUIT_SET", Some("value")), ("CONDUIT_UNSET", None::<&str>)], || {
            let input = "  # old = \"{{ env.CONDUIT_UNSET }}\"\nnew = \"{{ env.CONDUIT_SET }}\"\n";
            let out = expand_env(input).unwrap();
            assert_eq!(out, "  # old = \"{{ env.CONDUIT_UNSET }}\"\nnew = \"value\"\n");
        });
    }
}
