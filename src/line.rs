/// A tokenized command line: the command name plus whitespace-delimited
/// arguments. The raw input is retained so a trailing free-form argument (a
/// path or URL with embedded spaces) can be recovered verbatim with
/// [`CommandLine::rest`].
///
/// Argument addressing is 1-based: `arg(1)` is the first token after the
/// command name, matching what users count when they type
/// `:edit some-file`.
#[derive(Debug, Clone)]
pub struct CommandLine {
    raw: String,
    spans: Vec<(usize, usize)>,
}

impl CommandLine {
    /// Splits `raw` on runs of whitespace. Never fails; the empty string
    /// parses to an empty command name and no arguments.
    pub fn parse(raw: &str) -> Self {
        let mut spans = Vec::new();
        let mut start = None;
        for (index, ch) in raw.char_indices() {
            if ch.is_whitespace() {
                if let Some(s) = start.take() {
                    spans.push((s, index));
                }
            } else if start.is_none() {
                start = Some(index);
            }
        }
        if let Some(s) = start {
            spans.push((s, raw.len()));
        }
        Self {
            raw: raw.to_string(),
            spans,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn name(&self) -> &str {
        self.spans
            .first()
            .map(|&(s, e)| &self.raw[s..e])
            .unwrap_or("")
    }

    /// The i-th argument, 1-based. `None` when `i` is zero or past the last
    /// token.
    pub fn arg(&self, i: usize) -> Option<&str> {
        if i == 0 {
            return None;
        }
        self.spans.get(i).map(|&(s, e)| &self.raw[s..e])
    }

    /// Everything from argument i's first character through the end of the
    /// raw line, untouched by tokenization. `None` under the same
    /// conditions as [`CommandLine::arg`].
    pub fn rest(&self, i: usize) -> Option<&str> {
        if i == 0 {
            return None;
        }
        self.spans.get(i).map(|&(s, _)| &self.raw[s..])
    }

    pub fn arg_count(&self) -> usize {
        self.spans.len().saturating_sub(1)
    }

    /// True while the cursor is still inside the command word itself, i.e.
    /// no whitespace has been typed after it yet. Drives whether completion
    /// offers command names or argument candidates.
    pub fn completing_name(&self) -> bool {
        self.spans.len() <= 1 && !self.raw.ends_with(char::is_whitespace)
    }

    /// The token under the cursor, or `""` right after a separator. This is
    /// the prefix completion filters against.
    pub fn partial(&self) -> &str {
        if self.raw.ends_with(char::is_whitespace) {
            return "";
        }
        self.spans
            .last()
            .map(|&(s, e)| &self.raw[s..e])
            .unwrap_or("")
    }
}
