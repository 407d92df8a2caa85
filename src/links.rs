use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::Value;

static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").expect("link pattern is valid"));

/// Replace every `[label](url)` in `text` with `\href{url}{label}`.
///
/// Both groups match lazily, so `[a](b) and [c](d)` yields two links. Label and
/// URL are inserted verbatim, without LaTeX escaping.
pub fn convert(text: &str) -> Cow<'_, str> {
    MARKDOWN_LINK.replace_all(text, r"\href{${2}}{${1}}")
}

/// Convert links in every string leaf of `value`, keeping its shape.
///
/// Sequences map element-wise and mappings value-wise; keys and non-text
/// scalars are left untouched.
pub fn transform(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(convert(&s).into_owned()),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(transform).collect()),
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(key, value)| (key, transform(value)))
                .collect(),
        ),
        Value::Tagged(mut tagged) => {
            tagged.value = transform(tagged.value);
            Value::Tagged(tagged)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(src: &str) -> Value {
        serde_yaml::from_str(src).unwrap()
    }

    #[test]
    fn single_link() {
        assert_eq!(
            convert("Built [things](http://x.com)"),
            r"Built \href{http://x.com}{things}"
        );
    }

    #[test]
    fn several_links_match_lazily() {
        assert_eq!(
            convert("[a](http://a) and [b](http://b)."),
            r"\href{http://a}{a} and \href{http://b}{b}."
        );
    }

    #[test]
    fn text_without_links_is_borrowed() {
        let text = r"Already \textbf{LaTeX} [not a link] (nor this)";
        let converted = convert(text);
        assert!(matches!(converted, Cow::Borrowed(_)));
        assert_eq!(converted, text);
    }

    #[test]
    fn links_do_not_span_lines() {
        assert_eq!(convert("[a\nb](c)"), "[a\nb](c)");
    }

    #[test]
    fn empty_label_and_url() {
        assert_eq!(convert("[]()"), r"\href{}{}");
    }

    #[test]
    fn transform_recurses_and_keeps_shape() {
        let value = yaml(
            "
- title: '[Paper](http://p)'
  year: 2020
  details:
    - 'See [repo](http://r)'
    - plain
  nested:
    deeper: ['[x](y)']
- '[top](level)'
- 42
- null
",
        );
        let expected = yaml(
            r"
- title: '\href{http://p}{Paper}'
  year: 2020
  details:
    - 'See \href{http://r}{repo}'
    - plain
  nested:
    deeper: ['\href{y}{x}']
- '\href{level}{top}'
- 42
- null
",
        );
        assert_eq!(transform(value), expected);
    }

    #[test]
    fn transform_leaves_keys_alone() {
        let value = yaml("'[k](v)': '[k](v)'");
        let transformed = transform(value);
        let map = transformed.as_mapping().unwrap();
        assert_eq!(
            map.get(Value::String("[k](v)".into())),
            Some(&Value::String(r"\href{v}{k}".into()))
        );
    }
}
