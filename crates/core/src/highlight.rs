use regex::{Regex, RegexBuilder};

pub const DEFAULT_OPEN_MARKER: &str = "<mark>";
pub const DEFAULT_CLOSE_MARKER: &str = "</mark>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighter {
    pub open: String,
    pub close: String,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(DEFAULT_OPEN_MARKER, DEFAULT_CLOSE_MARKER)
    }
}

impl Highlighter {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Splits `text` into matched and unmatched fragments. The full phrase is
    /// marked first, then each term of two or more characters, and an already
    /// matched fragment is never split again.
    pub fn fragments(&self, text: &str, query: &str) -> Vec<Fragment> {
        let mut fragments = vec![Fragment {
            text: text.to_string(),
            matched: false,
        }];

        let phrase = query.trim();
        if phrase.is_empty() || text.is_empty() {
            return fragments;
        }

        fragments = mark(fragments, phrase);
        for term in phrase
            .split_whitespace()
            .filter(|term| term.chars().count() >= 2)
        {
            fragments = mark(fragments, term);
        }

        fragments.retain(|fragment| !fragment.text.is_empty());
        fragments
    }

    pub fn highlight(&self, text: &str, query: &str) -> String {
        let mut rendered = String::with_capacity(text.len());
        for fragment in self.fragments(text, query) {
            if fragment.matched {
                rendered.push_str(&self.open);
                rendered.push_str(&fragment.text);
                rendered.push_str(&self.close);
            } else {
                rendered.push_str(&fragment.text);
            }
        }
        rendered
    }
}

/// Wraps every case-insensitive occurrence of the trimmed query, then each
/// query term, in `<mark>` tags.
pub fn highlight(text: &str, query: &str) -> String {
    Highlighter::default().highlight(text, query)
}

fn mark(fragments: Vec<Fragment>, needle: &str) -> Vec<Fragment> {
    let Some(pattern) = needle_pattern(needle) else {
        return fragments;
    };

    let mut marked = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        if fragment.matched {
            marked.push(fragment);
            continue;
        }

        let mut cursor = 0;
        for found in pattern.find_iter(&fragment.text) {
            if found.start() > cursor {
                marked.push(Fragment {
                    text: fragment.text[cursor..found.start()].to_string(),
                    matched: false,
                });
            }
            marked.push(Fragment {
                text: found.as_str().to_string(),
                matched: true,
            });
            cursor = found.end();
        }
        if cursor < fragment.text.len() {
            marked.push(Fragment {
                text: fragment.text[cursor..].to_string(),
                matched: false,
            });
        }
    }
    marked
}

fn needle_pattern(needle: &str) -> Option<Regex> {
    RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
        .ok()
}
