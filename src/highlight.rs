//! Page highlighter: wraps configured keywords in a yellow span.
//!
//! Matching is case-insensitive (ASCII folding) and whole-word, where a word
//! character is `[A-Za-z0-9_]`. Markup inside `<...>` is copied untouched so
//! attribute values are never rewritten; a `<` only opens a tag when a letter,
//! `/` or `!` follows it. Keywords are tried in list order, so an earlier
//! keyword wins over a longer one starting at the same position.

pub const SPAN_OPEN: &str = "<span style=\"background-color: yellow;\">";
pub const SPAN_CLOSE: &str = "</span>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted {
    pub html: String,
    pub matches: usize,
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn opens_tag(next: Option<&u8>) -> bool {
    matches!(next, Some(b) if b.is_ascii_alphabetic() || *b == b'/' || *b == b'!')
}

pub struct Highlighter {
    keywords: Vec<String>,
}

impl Highlighter {
    /// Empty keywords are ignored.
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        let keywords = keywords
            .iter()
            .map(|k| k.as_ref().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    fn match_at(&self, text: &str, at: usize) -> Option<usize> {
        let bytes = text.as_bytes();
        if at > 0 && is_word_byte(bytes[at - 1]) {
            return None;
        }
        self.keywords.iter().find_map(|kw| {
            let end = at + kw.len();
            let candidate = text.get(at..end)?;
            if !candidate.eq_ignore_ascii_case(kw) {
                return None;
            }
            if end < bytes.len() && is_word_byte(bytes[end]) {
                return None;
            }
            Some(end)
        })
    }

    pub fn apply(&self, html: &str) -> Highlighted {
        let mut out = String::with_capacity(html.len());
        let mut matches = 0;
        let mut in_tag = false;
        let mut copied = 0;

        for (i, ch) in html.char_indices() {
            if i < copied {
                continue;
            }
            if in_tag {
                out.push(ch);
                in_tag = ch != '>';
                copied = i + ch.len_utf8();
                continue;
            }
            if ch == '<' && opens_tag(html.as_bytes().get(i + 1)) {
                out.push(ch);
                in_tag = true;
                copied = i + 1;
                continue;
            }
            match self.match_at(html, i) {
                Some(end) => {
                    out.push_str(SPAN_OPEN);
                    out.push_str(&html[i..end]);
                    out.push_str(SPAN_CLOSE);
                    matches += 1;
                    copied = end;
                }
                None => {
                    out.push(ch);
                    copied = i + ch.len_utf8();
                }
            }
        }

        Highlighted { html: out, matches }
    }
}
