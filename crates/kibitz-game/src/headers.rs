//! PGN tag pairs.

use std::fmt;

/// Tags written before all others, in this order.
pub const SEVEN_TAG_ROSTER: [&str; 7] = ["Event", "Site", "Date", "Round", "White", "Black", "Result"];

/// Ordered tag name to value mapping.
///
/// Setting an existing tag replaces its value in place. Serialization puts
/// the Seven Tag Roster first, then every other tag in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    tags: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Headers {
        Headers::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.tags.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.tags.push((name, value)),
        }
    }

    /// Remove `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self.tags.iter().position(|(key, _)| key == name)?;
        Some(self.tags.remove(idx).1)
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Tags in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Tags in serialization order: roster tags first, then the rest.
    pub fn ordered(&self) -> Vec<(&str, &str)> {
        let roster = SEVEN_TAG_ROSTER
            .iter()
            .filter_map(|name| self.get(name).map(|value| (*name, value)));
        let rest = self.iter().filter(|(name, _)| !SEVEN_TAG_ROSTER.contains(name));
        roster.chain(rest).collect()
    }
}

/// Writes `[Name "value"]` lines, escaping `\` and `"`.
impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.ordered() {
            writeln!(f, "[{name} \"{}\"]", escape(value))?;
        }
        Ok(())
    }
}

pub(crate) fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
