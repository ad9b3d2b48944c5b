//! Merging attribute sets.
//!
//! - [`AttributeSet::apply_override`]: the other set wins and may remove entries.
//!   Used to fold global lines into the running global state.
//! - [`AttributeSet::apply_fallback`]: the receiver wins, the other set only fills
//!   gaps. Used to give a figure's own attributes precedence over globals.

use std::collections::BTreeMap;

use super::{AttributeSet, Removal};

impl AttributeSet {
    /// Merge `other` into `self`, letting `other` win.
    ///
    /// Removals requested by `other` are applied first, then its values are
    /// assigned on top.
    ///
    /// # Example
    ///
    /// ```
    /// use figuremark::AttributeSet;
    ///
    /// let mut globals = AttributeSet::parse(".wide .dark :caption-before=false");
    /// globals.apply_override(&AttributeSet::parse(".-:dark .light :caption-before=-:"));
    /// assert_eq!(globals.classes(), ["figuremark", "wide", "light"]);
    /// assert_eq!(globals.directive("caption-before"), None);
    /// ```
    pub fn apply_override(&mut self, other: &Self) {
        match &other.removals.id {
            Some(Removal::All) => self.id = None,
            Some(Removal::One(id)) if self.id.as_ref() == Some(id) => self.id = None,
            _ => {}
        }
        if let Some(id) = &other.id {
            self.id = Some(id.clone());
        }

        for removal in &other.removals.classes {
            match removal {
                Removal::All => self.classes.clear(),
                Removal::One(class) => self.classes.retain(|c| c != class),
            }
        }
        for class in &other.classes {
            self.add_class(class);
        }

        override_map(
            &mut self.attributes,
            &other.attributes,
            &other.removals.attributes,
        );
        override_map(
            &mut self.directives,
            &other.directives,
            &other.removals.directives,
        );
    }

    /// Merge `other` into `self`, keeping every value `self` already has.
    ///
    /// Removals are ignored in this direction.
    ///
    /// # Example
    ///
    /// ```
    /// use figuremark::AttributeSet;
    ///
    /// let mut local = AttributeSet::parse("#mine :link-caption=none");
    /// local.apply_fallback(&AttributeSet::parse("#theirs .wide :link-caption=all :caption-before=false"));
    /// assert_eq!(local.id.as_deref(), Some("mine"));
    /// assert_eq!(local.classes(), ["figuremark", "wide"]);
    /// assert_eq!(local.directive("link-caption"), Some("none"));
    /// assert_eq!(local.directive("caption-before"), Some("false"));
    /// ```
    pub fn apply_fallback(&mut self, other: &Self) {
        if self.id.is_none() {
            self.id.clone_from(&other.id);
        }
        for class in &other.classes {
            self.add_class(class);
        }
        fallback_map(&mut self.attributes, &other.attributes);
        fallback_map(&mut self.directives, &other.directives);
    }
}

fn override_map(
    target: &mut BTreeMap<String, String>,
    values: &BTreeMap<String, String>,
    removals: &[Removal],
) {
    for removal in removals {
        match removal {
            Removal::All => target.clear(),
            Removal::One(key) => {
                target.remove(key);
            }
        }
    }
    for (key, value) in values {
        target.insert(key.clone(), value.clone());
    }
}

fn fallback_map(target: &mut BTreeMap<String, String>, values: &BTreeMap<String, String>) {
    for (key, value) in values {
        target
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }
}
