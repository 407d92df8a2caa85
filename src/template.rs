use tracing::{debug, warn};

use crate::latex;
use crate::model::{Personal, Section, Substitution};

/// A LaTeX template whose placeholders are filled in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
}

impl Template {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Replace each `\key` control word with the field's value.
    ///
    /// A token only matches when the next character is not an ASCII letter,
    /// so `\name` leaves `\namefull` untouched. Keys are applied in order.
    pub fn fill_fields(&mut self, fields: &Personal) {
        for (key, value) in fields.iter() {
            let token = format!("\\{key}");
            let (text, count) = replace_token(&self.text, &token, value);
            debug!(key, count, "personal field");
            self.text = text;
        }
    }

    /// Replace a section's marker with its fragment.
    ///
    /// Returns false, leaving the text unchanged, when the marker is absent.
    pub fn fill_section(&mut self, section: Section, fragment: &str) -> bool {
        let marker = section.marker();
        if !self.text.contains(&marker) {
            warn!(%marker, "marker not found in template");
            return false;
        }
        self.text = self.text.replace(&marker, fragment);
        debug!(section = section.title(), bytes = fragment.len(), "filled section");
        true
    }
}

fn replace_token(text: &str, token: &str, value: &str) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut count = 0;
    let mut last = 0;
    for (start, _) in text.match_indices(token) {
        let end = start + token.len();
        let at_boundary = !text[end..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic());
        if at_boundary {
            out.push_str(&text[last..start]);
            out.push_str(value);
            last = end;
            count += 1;
        }
    }
    out.push_str(&text[last..]);
    (out, count)
}

/// Apply one substitution to `template` and return the result.
pub fn replace_placeholders(template: &str, substitution: &Substitution<'_>) -> String {
    let mut template = Template::new(template);
    match substitution {
        Substitution::Personal(fields) => template.fill_fields(fields),
        Substitution::Section(data) => {
            template.fill_section(data.section(), &latex::section_fragment(data));
        }
    }
    template.into_string()
}
