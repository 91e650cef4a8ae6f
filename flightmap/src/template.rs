//! Placeholder substitution shared by the tooltip and the page templates.
//!

/// Replace every `<open>key<close>` of `template` by what `lookup` gives for `key`, in one pass:
/// substituted values are never scanned again.
///
/// Unknown keys are left as-is, as is an opening delimiter without its closing one.
///
pub(crate) fn substitute<F>(template: &str, open: &str, close: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find(open) {
        out.push_str(&rest[..start]);
        let tail = &rest[start + open.len()..];
        let Some(end) = tail.find(close) else {
            rest = &rest[start..];
            break;
        };
        let key = &tail[..end];
        match lookup(key) {
            Some(value) => out.push_str(&value),
            None => {
                out.push_str(open);
                out.push_str(key);
                out.push_str(close);
            }
        }
        rest = &tail[end + close.len()..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn vars(key: &str) -> Option<String> {
        match key {
            "a" => Some("1".to_string()),
            "b" => Some("2".to_string()),
            "loop" => Some("{{a}}{a}".to_string()),
            _ => None,
        }
    }

    #[rstest]
    #[case("no placeholder", "no placeholder")]
    #[case("{{a}}", "1")]
    #[case("x{{a}}y{{b}}z", "x1y2z")]
    #[case("{{b}}{{a}}", "21")]
    #[case("{{c}}", "{{c}}")]
    #[case("{{a", "{{a")]
    #[case("{{a}} and {{b", "1 and {{b")]
    #[case("{{loop}}", "{{a}}{a}")]
    #[case("{a}", "{a}")]
    fn test_substitute_double(#[case] template: &str, #[case] res: &str) {
        assert_eq!(res, substitute(template, "{{", "}}", vars));
    }

    #[rstest]
    #[case("{a}", "1")]
    #[case("{a}/{b}", "1/2")]
    #[case("{nope} here", "{nope} here")]
    #[case("open { brace", "open { brace")]
    #[case("{loop}", "{{a}}{a}")]
    #[case("", "")]
    fn test_substitute_single(#[case] template: &str, #[case] res: &str) {
        assert_eq!(res, substitute(template, "{", "}", vars));
    }

    #[test]
    fn test_substitute_empty_key() {
        assert_eq!("[]", substitute("[]", "[", "]", |_| None));
        assert_eq!("x", substitute("[]", "[", "]", |k| k.is_empty().then(|| "x".to_string())));
    }
}
