//! Placeholder vault: shields rendered fragments from later text passes.
//!
//! A pass that produces finished HTML stores it here and leaves a marker in
//! the working text. Markers contain none of the characters the Markdown
//! rules react to, and the tag they are built from never occurs in the
//! source document, so no later rule can match inside a stored fragment and
//! no user text can forge a marker.

use regex::{Captures, Regex};

const BASE_TAG: &str = "MDSKINVAULT";

#[derive(Debug)]
pub struct PlaceholderVault {
    tag: String,
    fragments: Vec<String>,
}

impl PlaceholderVault {
    /// Creates a vault whose markers cannot collide with `source`.
    pub fn for_source(source: &str) -> Self {
        let mut tag = BASE_TAG.to_string();
        while source.contains(&tag) {
            tag.push('X');
        }
        Self {
            tag,
            fragments: Vec::new(),
        }
    }

    /// Stores a block-level fragment. The marker starts with `<`, so a line
    /// holding it is treated as raw HTML by the structural pass.
    pub fn stash_block(&mut self, html: String) -> String {
        let id = self.push(html);
        format!("<!--{}.{}.-->", self.tag, id)
    }

    /// Stores an inline fragment; the surrounding line keeps its meaning.
    pub fn stash_inline(&mut self, html: String) -> String {
        let id = self.push(html);
        format!("{}.{}.", self.tag, id)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Substitutes every marker in `text` with its fragment.
    ///
    /// A fragment may itself hold markers of fragments stored before it, so
    /// fragments are resolved in creation order first.
    pub fn resolve(self, text: &str) -> String {
        if self.fragments.is_empty() {
            return text.to_string();
        }
        let tag = regex::escape(&self.tag);
        let pattern = format!(r"<!--{tag}\.(\d+)\.-->|{tag}\.(\d+)\.");
        let Ok(marker) = Regex::new(&pattern) else {
            // The tag is escaped, so the pattern is always valid.
            return text.to_string();
        };

        let mut resolved: Vec<String> = Vec::with_capacity(self.fragments.len());
        for fragment in &self.fragments {
            let done = substitute(&marker, fragment, &resolved);
            resolved.push(done);
        }
        tracing::trace!(fragments = resolved.len(), "resolving vault markers");
        substitute(&marker, text, &resolved)
    }

    fn push(&mut self, html: String) -> usize {
        self.fragments.push(html);
        self.fragments.len() - 1
    }
}

fn substitute(marker: &Regex, text: &str, resolved: &[String]) -> String {
    marker
        .replace_all(text, |caps: &Captures<'_>| {
            let id = caps
                .get(1)
                .or_else(|| caps.get(2))
                .and_then(|m| m.as_str().parse::<usize>().ok());
            match id.and_then(|id| resolved.get(id)) {
                Some(fragment) => fragment.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
