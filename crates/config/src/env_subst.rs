/// Expand `${NAME}` and `${NAME:-fallback}` placeholders in raw config text.
///
/// Unset variables without a fallback are left untouched so the parse error
/// (if any) points at the original placeholder.
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            // Unterminated: emit the remainder verbatim.
            out.push_str(&rest[start..]);
            return out;
        };

        let body = &after[..end];
        let (name, fallback) = match body.split_once(":-") {
            Some((name, fallback)) => (name, Some(fallback)),
            None => (body, None),
        };

        match lookup(name).or_else(|| fallback.map(str::to_owned)) {
            Some(value) if !name.is_empty() => out.push_str(&value),
            _ => {
                out.push_str("${");
                out.push_str(body);
                out.push('}');
            },
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        (name == "CQBRIDGE_PROXY").then(|| "http://127.0.0.1:7890".to_string())
    }

    #[test]
    fn expands_known_variable() {
        assert_eq!(
            substitute_env_with("proxy = \"${CQBRIDGE_PROXY}\"", lookup),
            "proxy = \"http://127.0.0.1:7890\""
        );
    }

    #[test]
    fn unknown_variable_is_kept() {
        assert_eq!(
            substitute_env_with("${CQBRIDGE_MISSING}", lookup),
            "${CQBRIDGE_MISSING}"
        );
    }

    #[test]
    fn fallback_used_when_unset() {
        assert_eq!(
            substitute_env_with("timeout = ${CQBRIDGE_TIMEOUT:-10}", lookup),
            "timeout = 10"
        );
    }

    #[test]
    fn unterminated_placeholder_is_literal() {
        assert_eq!(substitute_env_with("a ${OPEN", lookup), "a ${OPEN");
    }
}
