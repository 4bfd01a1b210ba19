use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Expand `{{ env.VAR }}` placeholders in raw TOML text
///
/// `{{ env.VAR | default("fallback") }}` substitutes the fallback when the
/// variable is unset. Comment lines are copied through untouched so a
/// commented-out secret never has to exist in the environment.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut output = String::with_capacity(input.len());

    for (i, line) in input.lines().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        if line.trim_start().starts_with('#') {
            output.push_str(line);
        } else {
            output.push_str(&expand_line(line)?);
        }
    }

    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // 1: scoped key (`env.NAME`), 2: optional default("...") payload
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([a-zA-Z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#).expect("must be valid regex")
    })
}

fn expand_line(line: &str) -> Result<String, String> {
    let mut result = String::with_capacity(line.len());
    let mut last_end = 0;

    for captures in placeholder().captures_iter(line) {
        let Some(whole) = captures.get(0) else {
            continue;
        };

        result.push_str(&line[last_end..whole.start()]);
        result.push_str(&resolve(&captures)?);
        last_end = whole.end();
    }

    result.push_str(&line[last_end..]);
    Ok(result)
}

fn resolve(captures: &Captures<'_>) -> Result<String, String> {
    let key = captures.get(1).map_or("", |m| m.as_str());
    let default_value = captures.get(2).map(|m| m.as_str());

    let Some(var_name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        return Err(format!("only variables scoped with 'env.' are supported: `{key}`"));
    };

    match (std::env::var(var_name), default_value) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(default)) => Ok(default.to_owned()),
        (Err(_), None) => Err(format!("environment variable not found: `{var_name}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let input = "base_url = \"http://localhost\"";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn expands_every_placeholder_on_a_line() {
        let vars = [("BRIDGE_HOST", Some("localhost")), ("BRIDGE_PORT", Some("8080"))];
        temp_env::with_vars(vars, || {
            let result = expand_env("url = \"http://{{ env.BRIDGE_HOST }}:{{env.BRIDGE_PORT}}\"").unwrap();
            assert_eq!(result, "url = \"http://localhost:8080\"");
        });
    }

    #[test]
    fn missing_variable_is_an_error() {
        temp_env::with_var_unset("BRIDGE_MISSING", || {
            let err = expand_env("api_key = \"{{ env.BRIDGE_MISSING }}\"").unwrap_err();
            assert!(err.contains("BRIDGE_MISSING"));
        });
    }

    #[test]
    fn default_covers_missing_variable() {
        temp_env::with_var_unset("BRIDGE_MISSING", || {
            let result = expand_env("api_key = \"{{ env.BRIDGE_MISSING | default(\"none\") }}\"").unwrap();
            assert_eq!(result, "api_key = \"none\"");
        });
    }

    #[test]
    fn set_variable_wins_over_default() {
        temp_env::with_var("BRIDGE_KEY", Some("real"), || {
            let result = expand_env("api_key = \"{{ env.BRIDGE_KEY | default(\"\") }}\"").unwrap();
            assert_eq!(result, "api_key = \"real\"");
        });
    }

    #[test]
    fn unscoped_placeholder_is_rejected() {
        let err = expand_env("key = \"{{ secrets.KEY }}\"").unwrap_err();
        assert!(err.contains("only variables scoped with 'env.'"));
    }

    #[test]
    fn comment_lines_are_not_expanded() {
        temp_env::with_var_unset("BRIDGE_MISSING", || {
            let input = "  # api_key = \"{{ env.BRIDGE_MISSING }}\"\n";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }
}
