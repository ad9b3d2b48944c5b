//! Attribute list tokenizer.

use std::sync::LazyLock;

use regex::Regex;

use super::{AttributeSet, DIRECTIVE_PREFIX, REMOVE_TOKEN, Removal, SHARED_CLASS};

/// One token: `.class` / `#id`, `key=value` (quoted or bare), or a compact
/// class list such as `a.b`.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[.#][\w:-]+|[\w:-]+=(?:"[^"]*"|'[^']*'|\S*)|[\w.-]+"#).unwrap()
});

impl AttributeSet {
    /// Parse an attribute list (the text between `{` and `}`).
    ///
    /// Parsing never fails: fragments that match no token form are dropped.
    /// An empty string yields a set holding only the marker class.
    ///
    /// # Example
    ///
    /// ```
    /// use figuremark::AttributeSet;
    ///
    /// let attrs = AttributeSet::parse("code.wide title='Listing 1'");
    /// assert_eq!(attrs.classes(), ["figuremark", "code", "wide"]);
    /// assert_eq!(attrs.attribute("title"), Some("Listing 1"));
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut set = Self::new();

        for token in TOKEN_PATTERN.find_iter(raw).map(|m| m.as_str()) {
            if let Some(class) = token.strip_prefix('.') {
                set.push_class(class);
            } else if let Some(id) = token.strip_prefix('#') {
                set.push_id(id);
            } else if let Some((key, value)) = token.split_once('=') {
                set.push_pair(key, strip_quotes(value));
            } else {
                for class in token.split('.') {
                    set.push_class(class);
                }
            }
        }

        set
    }

    fn push_class(&mut self, class: &str) {
        if class == REMOVE_TOKEN {
            self.classes.retain(|c| c == SHARED_CLASS);
            self.removals.classes.push(Removal::All);
        } else if let Some(name) = class.strip_prefix(REMOVE_TOKEN) {
            if name != SHARED_CLASS {
                self.classes.retain(|c| c != name);
            }
            self.removals.classes.push(Removal::One(name.to_owned()));
        } else {
            self.add_class(class);
        }
    }

    fn push_id(&mut self, id: &str) {
        if id == REMOVE_TOKEN {
            self.id = None;
            self.removals.id = Some(Removal::All);
        } else if let Some(name) = id.strip_prefix(REMOVE_TOKEN) {
            if self.id.as_deref() == Some(name) {
                self.id = None;
            }
            self.removals.id = Some(Removal::One(name.to_owned()));
        } else {
            self.id = Some(id.to_owned());
        }
    }

    fn push_pair(&mut self, key: &str, value: &str) {
        let (key, values, removals) = match key.strip_prefix(DIRECTIVE_PREFIX) {
            Some(key) => (key, &mut self.directives, &mut self.removals.directives),
            None => (key, &mut self.attributes, &mut self.removals.attributes),
        };

        if key.is_empty() {
            return;
        }

        if value == REMOVE_TOKEN {
            values.remove(key);
            removals.push(Removal::One(key.to_owned()));
        } else if key == REMOVE_TOKEN {
            values.clear();
            removals.push(Removal::All);
        } else {
            values.insert(key.to_owned(), value.to_owned());
        }
    }
}

/// Strip one matching pair of surrounding single or double quotes from a value.
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
