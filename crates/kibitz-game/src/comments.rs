//! Comments attached to positions.

/// Comment text keyed by the FEN of the position it annotates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comments {
    entries: Vec<(String, String)>,
}

impl Comments {
    pub fn new() -> Comments {
        Comments::default()
    }

    pub fn get(&self, fen: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == fen)
            .map(|(_, text)| text.as_str())
    }

    /// Attach `text` to `fen`, replacing any previous comment.
    pub fn set(&mut self, fen: impl Into<String>, text: impl Into<String>) {
        let fen = fen.into();
        let text = text.into();
        match self.entries.iter_mut().find(|(key, _)| *key == fen) {
            Some((_, slot)) => *slot = text,
            None => self.entries.push((fen, text)),
        }
    }

    pub fn remove(&mut self, fen: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(key, _)| key == fen)?;
        Some(self.entries.remove(idx).1)
    }

    /// Keep only comments whose position appears in `reachable`.
    pub fn prune<'a>(&mut self, reachable: impl IntoIterator<Item = &'a str>) {
        let reachable: Vec<&str> = reachable.into_iter().collect();
        self.entries.retain(|(fen, _)| reachable.contains(&fen.as_str()));
    }

    pub fn take_all(&mut self) -> Vec<(String, String)> {
        std::mem::take(&mut self.entries)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(fen, comment)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(f, c)| (f.as_str(), c.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::Comments;

    #[test]
    fn set_get_remove() {
        let mut comments = Comments::new();
        comments.set("a", "first");
        comments.set("a", "second");
        assert_eq!(comments.get("a"), Some("second"));
        assert_eq!(comments.remove("a"), Some("second".to_string()));
        assert!(comments.is_empty());
    }

    #[test]
    fn prune_keeps_reachable() {
        let mut comments = Comments::new();
        comments.set("a", "1");
        comments.set("b", "2");
        comments.set("c", "3");
        comments.prune(["c", "a"]);
        let kept: Vec<&str> = comments.iter().map(|(fen, _)| fen).collect();
        assert_eq!(kept, ["a", "c"]);
    }
}
