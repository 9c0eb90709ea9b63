//! The wrapping façade: chunk, size, pack, join.

use std::borrow::Cow;

use crate::chunk::{Chunker, Chunks};
use crate::options::{Config, ConfigError, WrapOptions};
use crate::pack::Lines;

/// A validated, reusable line wrapper.
///
/// Construction does all the work that does not depend on the input:
/// widths of the indent, ellipsis and hyphen are measured, the newline
/// detector is compiled, and the break rule table is assembled. A
/// `LineWrap` can then be shared across threads and called any number of
/// times.
///
/// # Example
///
/// ```
/// use lwrap_text::{LineWrap, WrapOptions};
///
/// let lw = LineWrap::new(WrapOptions::new(10).cjk(Some(false))).unwrap();
/// assert_eq!(lw.wrap("the quick brown fox"), "the quick\nbrown fox");
/// ```
#[derive(Debug, Clone)]
pub struct LineWrap {
    config: Config,
    chunker: Chunker,
}

impl LineWrap {
    /// Validate `opts`, reading the locale from the process environment
    /// when it is not set explicitly.
    pub fn new(opts: WrapOptions) -> Result<Self, ConfigError> {
        let config = Config::new(&opts)?;
        Self::build(&opts, config)
    }

    /// Like [`LineWrap::new`] with a custom environment lookup.
    pub fn with_env<F>(opts: WrapOptions, get_env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Config::with_env(&opts, get_env)?;
        Self::build(&opts, config)
    }

    fn build(opts: &WrapOptions, config: Config) -> Result<Self, ConfigError> {
        let chunker = Chunker::new(opts.newline.as_deref(), opts.newline_replacement.clone())?;
        Ok(Self { config, chunker })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The break stream for `text`, before sizing.
    pub fn chunks<'a>(&'a self, text: &'a str) -> Chunks<'a> {
        self.chunker.chunks(text)
    }

    /// Lazily wrap `text` into indented lines without terminators.
    pub fn lines<'a>(&'a self, text: &'a str) -> Lines<'a> {
        Lines::new(&self.config, self.chunker.chunks(text), text.is_empty())
    }

    /// Wrap `text`, joining lines with the line terminator. No terminator
    /// is added after the last line.
    #[must_use]
    pub fn wrap(&self, text: &str) -> String {
        let terminator = self.config.line_terminator();
        let mut out = String::with_capacity(text.len() + text.len() / 8);
        for (i, line) in self.lines(text).enumerate() {
            if i > 0 {
                out.push_str(terminator);
            }
            out.push_str(&line);
        }
        out
    }
}

/// Wrap `text` at `width` with default options.
pub fn wrap(text: &str, width: usize) -> Result<String, ConfigError> {
    Ok(LineWrap::new(WrapOptions::new(width))?.wrap(text))
}

/// Escape `&`, `<`, `>` and no-break space for HTML output.
#[must_use]
pub fn html_escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '\u{A0}']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{A0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Indent, Overflow};

    fn lw(opts: WrapOptions) -> LineWrap {
        LineWrap::with_env(opts.cjk(Some(false)), |_| None).unwrap()
    }

    #[test]
    fn line_wrap_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LineWrap>();
    }

    #[test]
    fn wrap_joins_with_terminator() {
        let w = lw(WrapOptions::new(3).line_terminator("\r\n"));
        assert_eq!(w.wrap("ab cd ef"), "ab\r\ncd\r\nef");
    }

    #[test]
    fn wrap_has_no_trailing_terminator() {
        let w = lw(WrapOptions::new(80));
        assert_eq!(w.wrap("foo bar"), "foo bar");
        assert_eq!(w.wrap(""), "");
    }

    #[test]
    fn reusable_across_calls() {
        let w = lw(WrapOptions::new(5));
        assert_eq!(w.wrap("aa bb cc"), "aa bb\ncc");
        assert_eq!(w.wrap("dd ee ff"), "dd ee\nff");
    }

    #[test]
    fn shared_across_threads() {
        let w = std::sync::Arc::new(lw(WrapOptions::new(4)));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let w = std::sync::Arc::clone(&w);
                std::thread::spawn(move || w.wrap("ab bc cd"))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), "ab\nbc\ncd");
        }
    }

    #[test]
    fn chunks_exposes_breaks() {
        let w = lw(WrapOptions::new(80));
        let texts: Vec<&str> = w.chunks("a b").map(|b| b.text).collect();
        assert_eq!(texts, vec!["a", " ", "b"]);
    }

    #[test]
    fn invalid_newline_pattern() {
        let err = LineWrap::with_env(WrapOptions::new(10).newline(Some("[")), |_| None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern(_)));
    }

    #[test]
    fn newline_pattern_matching_nothing_rejected() {
        let err = LineWrap::with_env(WrapOptions::new(10).newline(Some("x*")), |_| None).unwrap_err();
        assert_eq!(err, ConfigError::EmptyNewlineMatch("x*".into()));
        assert_eq!(
            err.to_string(),
            "newline pattern \"x*\" matches the empty string"
        );
    }

    #[test]
    fn hyperlink_escape_never_split() {
        let link = "\x1b]8;;https://example.com/a b\x07";
        let text = format!("go {link}here\x1b]8;;\x07 now");
        let w = lw(WrapOptions::new(6));
        let out = w.wrap(&text);
        assert!(out.contains(link), "{out:?}");
        assert!(out.contains("\x1b]8;;\x07"), "{out:?}");
        assert!(out.lines().all(|line| !line.ends_with(' ')));
    }

    #[test]
    fn construction_errors_propagate() {
        let err = LineWrap::with_env(WrapOptions::new(4).indent(Indent::Columns(4)), |_| None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::NoRoomToWrap { .. }));
    }

    #[test]
    fn clip_with_custom_ellipsis() {
        let w = lw(WrapOptions::new(6).overflow(Overflow::Clip).ellipsis("..."));
        assert_eq!(w.wrap("abcdefghij"), "abc...");
    }

    #[test]
    fn free_wrap() {
        assert_eq!(wrap("foo bar", 80).unwrap(), "foo bar");
        assert!(wrap("foo", 0).is_err());
    }

    #[test]
    fn html_escape_replaces_specials() {
        assert_eq!(html_escape("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert_eq!(html_escape("x\u{A0}y"), "x&nbsp;y");
        assert!(matches!(html_escape("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn html_escape_as_escape_fn() {
        let w = lw(WrapOptions::new(80).escape(|s| html_escape(s).into_owned()));
        assert_eq!(
            w.wrap("<b> https://example.com/?a=1&b=2"),
            "&lt;b&gt; https://example.com/?a=1&b=2"
        );
    }
}
