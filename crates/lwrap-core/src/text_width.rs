//! Display width helpers shared by chunk sizing and line packing.
//!
//! Widths are computed per extended grapheme cluster, so emoji sequences,
//! flags, and combining marks count as the single glyph a terminal draws.
//! East Asian Ambiguous characters follow a [`WidthPolicy`], normally
//! derived from the locale.
//!
//! Unless styling is counted, escape sequences are treated as zero-width
//! clusters that are never split.
//!
//! # Example
//! ```
//! use lwrap_core::{TextWidth, WidthPolicy};
//!
//! let measure = TextWidth::new(WidthPolicy::Standard);
//! assert_eq!(measure.width("hello"), 5);
//! assert_eq!(measure.width("\u{4F60}\u{597D}"), 4);
//! assert_eq!(measure.width("\x1b[1mbold\x1b[0m"), 4);
//!
//! let slices: Vec<&str> = measure.break_at("abcdefg", 3).map(|s| s.text).collect();
//! assert_eq!(slices, vec!["abc", "def", "g"]);
//! ```

use unicode_display_width::width as unicode_display_width;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::escape::{self, ESC};

/// Environment variable that forces the ambiguous-width policy.
pub const CJK_WIDTH_ENV: &str = "LWRAP_CJK_WIDTH";

#[inline]
fn env_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Does this locale tag use double-width ambiguous characters?
///
/// Accepts BCP 47 (`ja-JP`) and POSIX (`ja_JP.UTF-8`) spellings.
#[inline]
#[must_use]
pub fn is_cjk_locale(locale: &str) -> bool {
    let lower = locale.trim().to_ascii_lowercase();
    lower.starts_with("ja") || lower.starts_with("zh") || lower.starts_with("ko")
}

/// Normalize a POSIX locale (`en_US.UTF-8@euro`) into a BCP 47 tag (`en-US`).
#[must_use]
pub fn normalize_locale(locale: &str) -> String {
    let trimmed = locale.trim();
    let base = trimmed
        .split(['.', '@'])
        .next()
        .unwrap_or(trimmed);
    base.replace('_', "-")
}

/// Locale from the usual POSIX variables, using a custom environment lookup.
///
/// `LC_ALL` wins over `LC_CTYPE`, which wins over `LANG`. The `C` and
/// `POSIX` pseudo-locales carry no language and are skipped.
pub fn locale_from_env<F>(get_env: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    ["LC_ALL", "LC_CTYPE", "LANG"].iter().find_map(|key| {
        let value = get_env(key)?;
        let value = value.trim();
        if value.is_empty() || value == "C" || value == "POSIX" {
            return None;
        }
        Some(normalize_locale(value))
    })
}

/// Compute the CJK width policy for `locale` using a custom environment lookup.
///
/// [`CJK_WIDTH_ENV`] overrides the locale when it is set.
pub fn cjk_width_from_env<F>(locale: &str, get_env: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = get_env(CJK_WIDTH_ENV) {
        return env_flag(&value);
    }
    is_cjk_locale(locale)
}

#[inline]
fn ascii_display_width(text: &str) -> usize {
    let mut width = 0;
    for b in text.bytes() {
        match b {
            b'\t' | b'\n' | b'\r' => width += 1,
            0x20..=0x7E => width += 1,
            _ => {}
        }
    }
    width
}

/// Fast-path width for pure printable ASCII.
#[inline]
#[must_use]
pub fn ascii_width(text: &str) -> Option<usize> {
    if text.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
        Some(text.len())
    } else {
        None
    }
}

#[inline]
fn is_zero_width_codepoint(c: char) -> bool {
    let u = c as u32;
    matches!(u, 0x0000..=0x001F | 0x007F..=0x009F)
        || matches!(u, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0x20D0..=0x20FF)
        || matches!(u, 0xFE20..=0xFE2F)
        || matches!(u, 0xFE00..=0xFE0F | 0xE0100..=0xE01EF)
        || matches!(
            u,
            0x00AD | 0x034F | 0x180E | 0x200B | 0x200C | 0x200D | 0x200E | 0x200F | 0x2060 | 0xFEFF
        )
        || matches!(u, 0x202A..=0x202E | 0x2066..=0x2069 | 0x206A..=0x206F)
}

/// Unicode character width measurement policy.
///
/// Controls how East Asian Ambiguous characters (box drawing, arrows,
/// Greek letters, the ellipsis) are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WidthPolicy {
    /// East Asian Ambiguous characters are single-width.
    #[default]
    Standard,
    /// East Asian Ambiguous characters are double-width, as CJK terminals
    /// render them.
    CjkAmbiguousWide,
}

impl WidthPolicy {
    /// Policy for a resolved CJK decision.
    #[inline]
    #[must_use]
    pub const fn for_cjk(cjk: bool) -> Self {
        if cjk {
            Self::CjkAmbiguousWide
        } else {
            Self::Standard
        }
    }

    /// Width of a single grapheme cluster.
    #[inline]
    #[must_use]
    pub fn grapheme_width(self, grapheme: &str) -> usize {
        if grapheme.is_ascii() {
            return ascii_display_width(grapheme);
        }
        if grapheme.chars().all(is_zero_width_codepoint) {
            return 0;
        }
        match self {
            Self::CjkAmbiguousWide => grapheme.width_cjk(),
            Self::Standard => unicode_display_width(grapheme) as usize,
        }
    }
}

/// One measured unit of text: a grapheme cluster or a whole escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cluster<'a> {
    pub text: &'a str,
    pub width: usize,
}

/// A budgeted piece of text produced by [`TextWidth::break_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice<'a> {
    pub text: &'a str,
    pub cells: usize,
    pub is_last: bool,
}

/// Width measurer: a [`WidthPolicy`] plus the styling rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextWidth {
    policy: WidthPolicy,
    include_styling: bool,
}

impl TextWidth {
    /// Create a measurer that treats escape sequences as zero-width.
    #[must_use]
    pub const fn new(policy: WidthPolicy) -> Self {
        Self {
            policy,
            include_styling: false,
        }
    }

    /// Count the printable bytes of escape sequences as cells.
    #[must_use]
    pub const fn include_styling(mut self, include: bool) -> Self {
        self.include_styling = include;
        self
    }

    #[inline]
    #[must_use]
    pub const fn policy(self) -> WidthPolicy {
        self.policy
    }

    /// Width of a string in terminal cells.
    ///
    /// # Performance
    /// - Printable ASCII: byte length, no allocation
    /// - Non-ASCII without escapes or zero-width code points: one table pass
    /// - Otherwise: per-cluster measurement
    #[must_use]
    pub fn width(self, text: &str) -> usize {
        if let Some(width) = ascii_width(text) {
            return width;
        }
        let skip_styling = !self.include_styling && escape::has_escapes(text);
        if skip_styling {
            return self.clusters(text).map(|c| c.width).sum();
        }
        if text.is_ascii() {
            return ascii_display_width(text);
        }
        if !text.chars().any(is_zero_width_codepoint) {
            return match self.policy {
                WidthPolicy::CjkAmbiguousWide => text.width_cjk(),
                WidthPolicy::Standard => unicode_display_width(text) as usize,
            };
        }
        text.graphemes(true)
            .map(|g| self.policy.grapheme_width(g))
            .sum()
    }

    /// Iterate the measured units of `text`.
    #[must_use]
    pub fn clusters(self, text: &str) -> Clusters<'_> {
        Clusters {
            rest: text,
            measure: self,
        }
    }

    /// Longest prefix of `text` that fits in `max_cells`, with its width.
    ///
    /// Zero-width units directly after the last fitting cluster stay with
    /// the prefix, so a trailing reset sequence is not orphaned.
    #[must_use]
    pub fn truncate(self, text: &str, max_cells: usize) -> (&str, usize) {
        let mut end = 0;
        let mut cells = 0;
        for cluster in self.clusters(text) {
            if cells + cluster.width > max_cells {
                break;
            }
            end += cluster.text.len();
            cells += cluster.width;
        }
        (&text[..end], cells)
    }

    /// Split `text` into ordered slices of at most `max_cells` cells.
    ///
    /// A slice always carries at least one visible cluster, even if that
    /// cluster alone is wider than the budget.
    #[must_use]
    pub fn break_at(self, text: &str, max_cells: usize) -> BreakAt<'_> {
        BreakAt {
            rest: text,
            max_cells,
            measure: self,
        }
    }
}

/// Iterator over [`Cluster`]s. See [`TextWidth::clusters`].
#[derive(Debug, Clone)]
pub struct Clusters<'a> {
    rest: &'a str,
    measure: TextWidth,
}

impl<'a> Iterator for Clusters<'a> {
    type Item = Cluster<'a>;

    fn next(&mut self) -> Option<Cluster<'a>> {
        let rest = self.rest;
        if rest.is_empty() {
            return None;
        }
        if !self.measure.include_styling && rest.as_bytes()[0] == ESC {
            let (text, tail) = rest.split_at(escape::sequence_len(rest.as_bytes()));
            self.rest = tail;
            return Some(Cluster { text, width: 0 });
        }
        let grapheme = rest.graphemes(true).next()?;
        self.rest = &rest[grapheme.len()..];
        Some(Cluster {
            text: grapheme,
            width: self.measure.policy.grapheme_width(grapheme),
        })
    }
}

/// Iterator over budgeted [`Slice`]s. See [`TextWidth::break_at`].
#[derive(Debug, Clone)]
pub struct BreakAt<'a> {
    rest: &'a str,
    max_cells: usize,
    measure: TextWidth,
}

impl<'a> Iterator for BreakAt<'a> {
    type Item = Slice<'a>;

    fn next(&mut self) -> Option<Slice<'a>> {
        if self.rest.is_empty() {
            return None;
        }
        let mut end = 0;
        let mut cells = 0;
        let mut visible = false;
        for cluster in self.measure.clusters(self.rest) {
            if visible && cells + cluster.width > self.max_cells {
                break;
            }
            end += cluster.text.len();
            cells += cluster.width;
            visible |= cluster.width > 0;
        }
        let (text, tail) = self.rest.split_at(end);
        self.rest = tail;
        Some(Slice {
            text,
            cells,
            is_last: tail.is_empty(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STD: TextWidth = TextWidth::new(WidthPolicy::Standard);
    const CJK: TextWidth = TextWidth::new(WidthPolicy::CjkAmbiguousWide);

    // ── Width ─────────────────────────────────────────────────────────

    #[test]
    fn width_ascii() {
        assert_eq!(STD.width("hello"), 5);
        assert_eq!(STD.width(""), 0);
    }

    #[test]
    fn width_ascii_controls() {
        assert_eq!(STD.width("a\tb"), 3);
        assert_eq!(STD.width("a\x07b"), 2);
    }

    #[test]
    fn width_cjk_ideographs() {
        assert_eq!(STD.width("\u{4F60}\u{597D}"), 4);
        assert_eq!(STD.width("a\u{4E2D}b"), 4);
    }

    #[test]
    fn width_combining_marks() {
        assert_eq!(STD.width("e\u{0301}"), 1);
        assert_eq!(STD.width("e\u{0301}\u{0302}x"), 2);
    }

    #[test]
    fn width_zero_width_space() {
        assert_eq!(STD.width("a\u{200B}b"), 2);
    }

    #[test]
    fn width_ambiguous_follows_policy() {
        assert_eq!(STD.width("\u{2026}"), 1);
        assert_eq!(CJK.width("\u{2026}"), 2);
        assert_eq!(STD.width("\u{4E2D}"), CJK.width("\u{4E2D}"));
    }

    #[test]
    fn width_skips_escapes_by_default() {
        assert_eq!(STD.width("\x1b[31mred\x1b[0m"), 3);
        assert_eq!(STD.width("\x1b]8;;http://x\x07link\x1b]8;;\x07"), 4);
    }

    #[test]
    fn width_counts_escapes_when_styling_included() {
        let styled = STD.include_styling(true);
        assert_eq!(styled.width("\x1b[31mred"), 7);
    }

    // ── Clusters ──────────────────────────────────────────────────────

    #[test]
    fn clusters_keep_graphemes_whole() {
        let units: Vec<&str> = STD.clusters("e\u{0301}bc").map(|c| c.text).collect();
        assert_eq!(units, vec!["e\u{0301}", "b", "c"]);
    }

    #[test]
    fn clusters_treat_escape_as_one_unit() {
        let units: Vec<(&str, usize)> = STD
            .clusters("a\x1b[1mb")
            .map(|c| (c.text, c.width))
            .collect();
        assert_eq!(units, vec![("a", 1), ("\x1b[1m", 0), ("b", 1)]);
    }

    #[test]
    fn clusters_split_escape_when_styling_included() {
        let count = STD.include_styling(true).clusters("\x1b[1m").count();
        assert_eq!(count, 4);
    }

    // ── Truncate ──────────────────────────────────────────────────────

    #[test]
    fn truncate_basic() {
        assert_eq!(STD.truncate("hello world", 5), ("hello", 5));
        assert_eq!(STD.truncate("hi", 5), ("hi", 2));
        assert_eq!(STD.truncate("abc", 0), ("", 0));
    }

    #[test]
    fn truncate_wide_char_boundary() {
        assert_eq!(STD.truncate("\u{4F60}\u{597D}", 3), ("\u{4F60}", 2));
        assert_eq!(STD.truncate("a\u{4F60}", 2), ("a", 1));
    }

    #[test]
    fn truncate_keeps_trailing_escape() {
        assert_eq!(STD.truncate("ab\x1b[0mcd", 2), ("ab\x1b[0m", 2));
    }

    #[test]
    fn truncate_never_splits_escape() {
        assert_eq!(STD.truncate("\x1b[31mabc", 1), ("\x1b[31ma", 1));
    }

    // ── BreakAt ───────────────────────────────────────────────────────

    #[test]
    fn break_at_slices_in_order() {
        let slices: Vec<Slice<'_>> = STD.break_at("abcdefg", 3).collect();
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].text, "abc");
        assert_eq!(slices[0].cells, 3);
        assert!(!slices[0].is_last);
        assert_eq!(slices[2].text, "g");
        assert!(slices[2].is_last);
    }

    #[test]
    fn break_at_respects_wide_chars() {
        let slices: Vec<&str> = STD
            .break_at("\u{4E00}\u{4E01}\u{4E02}", 3)
            .map(|s| s.text)
            .collect();
        assert_eq!(slices, vec!["\u{4E00}", "\u{4E01}", "\u{4E02}"]);
    }

    #[test]
    fn break_at_emits_lone_oversized_cluster() {
        let slices: Vec<(&str, usize)> = STD
            .break_at("\u{4E00}a", 1)
            .map(|s| (s.text, s.cells))
            .collect();
        assert_eq!(slices, vec![("\u{4E00}", 2), ("a", 1)]);
    }

    #[test]
    fn break_at_zero_budget_still_progresses() {
        assert_eq!(STD.break_at("abc", 0).count(), 3);
    }

    #[test]
    fn break_at_empty() {
        assert_eq!(STD.break_at("", 4).count(), 0);
    }

    #[test]
    fn break_at_leading_escape_rides_with_first_cluster() {
        let slices: Vec<&str> = STD.break_at("\x1b[1mab", 1).map(|s| s.text).collect();
        assert_eq!(slices, vec!["\x1b[1ma", "b"]);
    }

    // ── Environment ───────────────────────────────────────────────────

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn cjk_locale_detection() {
        assert!(is_cjk_locale("ja-JP"));
        assert!(is_cjk_locale("zh_TW.UTF-8"));
        assert!(is_cjk_locale("ko"));
        assert!(!is_cjk_locale("en-US"));
    }

    #[test]
    fn locale_precedence() {
        let lookup = env(&[("LANG", "de_DE.UTF-8"), ("LC_CTYPE", "ja_JP.UTF-8")]);
        assert_eq!(locale_from_env(lookup).as_deref(), Some("ja-JP"));
    }

    #[test]
    fn locale_skips_posix() {
        let lookup = env(&[("LC_ALL", "C"), ("LANG", "fr_FR")]);
        assert_eq!(locale_from_env(lookup).as_deref(), Some("fr-FR"));
        assert_eq!(locale_from_env(env(&[])), None);
    }

    #[test]
    fn normalize_strips_codeset_and_modifier() {
        assert_eq!(normalize_locale("en_US.UTF-8"), "en-US");
        assert_eq!(normalize_locale("de_DE@euro"), "de-DE");
        assert_eq!(normalize_locale("sr-Latn"), "sr-Latn");
    }

    #[test]
    fn cjk_env_override_wins() {
        assert!(cjk_width_from_env("en-US", env(&[(CJK_WIDTH_ENV, "1")])));
        assert!(!cjk_width_from_env("ja-JP", env(&[(CJK_WIDTH_ENV, "off")])));
        assert!(cjk_width_from_env("ja-JP", env(&[])));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const STD: TextWidth = TextWidth::new(WidthPolicy::Standard);

    proptest! {
        #[test]
        fn break_at_reconstructs_input(s in "[a-z\u{4E00}-\u{4E10} ]{0,40}", max in 1usize..8) {
            let joined: String = STD.break_at(&s, max).map(|slice| slice.text).collect();
            prop_assert_eq!(joined, s);
        }

        #[test]
        fn break_at_slices_fit_budget(s in "[a-z\u{4E00}-\u{4E10}]{1,40}", max in 2usize..8) {
            for slice in STD.break_at(&s, max) {
                prop_assert!(slice.cells <= max, "slice {:?} exceeds {}", slice.text, max);
                prop_assert_eq!(slice.cells, STD.width(slice.text));
            }
        }

        #[test]
        fn only_final_slice_is_last(s in "[a-z]{1,30}", max in 1usize..6) {
            let slices: Vec<Slice<'_>> = STD.break_at(&s, max).collect();
            let last = slices.len() - 1;
            for (i, slice) in slices.iter().enumerate() {
                prop_assert_eq!(slice.is_last, i == last);
            }
        }

        #[test]
        fn truncate_is_prefix_within_budget(s in "[a-z\u{4E00}-\u{4E10}]{0,30}", max in 0usize..20) {
            let (prefix, cells) = STD.truncate(&s, max);
            prop_assert!(s.starts_with(prefix));
            prop_assert!(cells <= max);
            prop_assert_eq!(cells, STD.width(prefix));
        }

        #[test]
        fn styling_never_adds_width(word in "[a-z]{0,10}", code in 0u8..108) {
            let styled = format!("\x1b[{code}m{word}\x1b[0m");
            prop_assert_eq!(STD.width(&styled), word.len());
        }
    }
}
