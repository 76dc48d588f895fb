use std::borrow::Cow;

/// Quotes `path` for use as an MI command argument.
///
/// Paths without spaces or inner quotes are returned unchanged, as are paths
/// that are already quoted and have no inner quotes.
pub fn escape_path(path: &str) -> Cow<'_, str> {
    if path.is_empty() {
        return Cow::Borrowed(path);
    }

    let quoted = path.len() >= 2 && path.starts_with('"') && path.ends_with('"');
    let inner = if quoted { &path[1..path.len() - 1] } else { path };
    let has_inner_quotes = path
        .char_indices()
        .any(|(i, c)| c == '"' && i > 0 && i < path.len() - 1);

    if (quoted || !path.contains(' ')) && !has_inner_quotes {
        return Cow::Borrowed(path);
    }

    Cow::Owned(format!("\"{}\"", inner.replace('"', "\\\"")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "")]
    #[case("/usr/src/main.c", "/usr/src/main.c")]
    #[case("/home/me/my project/main.c", r#""/home/me/my project/main.c""#)]
    #[case(r#""/home/me/my project/main.c""#, r#""/home/me/my project/main.c""#)]
    #[case(r#"/tmp/a"b.c"#, r#""/tmp/a\"b.c""#)]
    #[case(r#""/tmp/a "b".c""#, r#""/tmp/a \"b\".c""#)]
    #[case(r#""/tmp/x.c"#, r#""/tmp/x.c"#)]
    #[case("\"", "\"")]
    #[case("ü dir/ü.c", "\"ü dir/ü.c\"")]
    fn test_escape_path(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(escape_path(path), expected);
    }
}
