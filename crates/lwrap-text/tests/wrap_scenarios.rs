//! End-to-end wrapping scenarios through the public API.

use lwrap_text::{Indent, LineWrap, Overflow, WrapOptions};

/// A wrapper isolated from the process locale.
fn wrapper(opts: WrapOptions) -> LineWrap {
    LineWrap::with_env(opts.cjk(Some(false)), |_| None).expect("valid options")
}

fn wrap(text: &str, opts: WrapOptions) -> String {
    wrapper(opts).wrap(text)
}

#[test]
fn short_line_unchanged() {
    assert_eq!(wrap("foo bar", WrapOptions::new(80)), "foo bar");
}

#[test]
fn newline_replaced_with_space() {
    assert_eq!(wrap("foo\nbar", WrapOptions::new(80)), "foo bar");
    assert_eq!(wrap("foo \r\n\r\n  bar", WrapOptions::new(80)), "foo bar");
}

#[test]
fn space_run_dropped_at_wrap() {
    assert_eq!(wrap("foo    bar", WrapOptions::new(4)), "foo\nbar");
}

#[test]
fn clip_with_ellipsis() {
    let opts = WrapOptions::new(4).overflow(Overflow::Clip).ellipsis("\u{2026}");
    assert_eq!(wrap("abcde", opts), "abc\u{2026}");
}

#[test]
fn anywhere_with_hyphen() {
    let opts = WrapOptions::new(4).overflow(Overflow::Anywhere).hyphen("-");
    assert_eq!(wrap("abcde", opts), "abc-\nde");
}

#[test]
fn word_as_wide_as_line_overflows() {
    let clip = WrapOptions::new(4).overflow(Overflow::Clip);
    assert_eq!(wrap("abcd", clip), "abc\u{2026}");
    let anywhere = WrapOptions::new(4).overflow(Overflow::Anywhere);
    assert_eq!(wrap("abcd", anywhere), "abc-\nd");
    assert_eq!(wrap("abcd", WrapOptions::new(4)), "abcd");
    assert_eq!(wrap("abc", WrapOptions::new(4).overflow(Overflow::Anywhere)), "abc");
}

#[test]
fn url_kept_whole() {
    assert_eq!(
        wrap("a https://example.com", WrapOptions::new(4)),
        "a\nhttps://example.com"
    );
}

#[test]
fn invalid_url_breaks_normally() {
    assert_eq!(wrap("http://a.0/", WrapOptions::new(4)), "http://\na.0/");
}

#[test]
fn numeric_indent() {
    let opts = WrapOptions::new(4).indent(Indent::Columns(2));
    assert_eq!(wrap("ab bc", opts), "  ab\n  bc");
}

#[test]
fn text_indent() {
    let opts = WrapOptions::new(8).indent(Indent::Text("> ".into()));
    assert_eq!(wrap("one two three", opts), "> one\n> two\n> three");
}

#[test]
fn newline_detector_disabled() {
    assert_eq!(wrap("foo\nbar", WrapOptions::new(80).newline(None)), "foo\nbar");
}

#[test]
fn ogham_space_breaks() {
    assert_eq!(wrap("foo\u{1680}bar", WrapOptions::new(4)), "foo\nbar");
}

#[test]
fn spaces_between_dashes_stay() {
    assert_eq!(
        wrap("\u{2014}  \u{2014}", WrapOptions::new(4)),
        "\u{2014}  \u{2014}"
    );
}

#[test]
fn breaker_positions() {
    let lw = wrapper(WrapOptions::new(80));
    let breaks: Vec<(usize, bool)> = lw
        .chunks("utf8 base64\" Default:")
        .map(|b| (b.position, b.space_run))
        .collect();
    assert_eq!(breaks, vec![(4, false), (5, true), (13, false), (21, false)]);
}

#[test]
fn wide_characters_count_two_cells() {
    assert_eq!(
        wrap("\u{4E2D}\u{6587}\u{5B57}\u{7B26}", WrapOptions::new(4)),
        "\u{4E2D}\u{6587}\n\u{5B57}\u{7B26}"
    );
}

#[test]
fn styling_is_zero_width() {
    let text = "\x1b[1mbold\x1b[0m text";
    assert_eq!(wrap(text, WrapOptions::new(9)), text);
    assert_eq!(
        wrap(text, WrapOptions::new(9).include_styling(true)),
        "\x1b[1mbold\x1b[0m\ntext"
    );
}

#[test]
fn outdented_first_line_at_column() {
    let opts = WrapOptions::new(12)
        .indent(Indent::Columns(4))
        .indent_first(false)
        .first_column(Some(6));
    assert_eq!(wrap("alpha beta gamma", opts), "alpha\n    beta\n    gamma");
}

#[test]
fn first_column_word_fits_on_next_line() {
    for overflow in [Overflow::Clip, Overflow::Anywhere] {
        let opts = WrapOptions::new(10)
            .indent_first(false)
            .first_column(Some(6))
            .overflow(overflow);
        assert_eq!(wrap("ab cdefgh", opts), "ab\ncdefgh");
    }
}

#[test]
fn first_column_overlong_word_clipped_on_next_line() {
    let opts = WrapOptions::new(8)
        .indent_first(false)
        .first_column(Some(4))
        .overflow(Overflow::Clip);
    assert_eq!(wrap("ab abcdefghij cd", opts), "ab\nabcdefg\u{2026}\ncd");
}

#[test]
fn first_column_split_starts_each_piece_on_a_line() {
    let opts = WrapOptions::new(8)
        .indent(Indent::Columns(2))
        .indent_first(false)
        .first_column(Some(1))
        .overflow(Overflow::Anywhere);
    assert_eq!(
        wrap("abcdefghijklmn", opts),
        "abcdef-\n  ghijk-\n  lmn"
    );
}

#[test]
fn replacement_string_wraps() {
    let opts = WrapOptions::new(80).newline_replacement(" | ");
    assert_eq!(wrap("a\nb", opts), "a | b");
}

#[test]
fn empty_and_blank_inputs() {
    assert_eq!(wrap("", WrapOptions::new(10)), "");
    assert_eq!(wrap("   \n  ", WrapOptions::new(10)), "");
    let indented = wrapper(WrapOptions::new(10).indent(Indent::Columns(2)));
    assert_eq!(indented.lines("").collect::<Vec<_>>(), vec!["  "]);
}

#[test]
fn cjk_locale_widens_ambiguous() {
    let narrow = LineWrap::with_env(WrapOptions::new(4), |_| None).expect("valid");
    assert_eq!(narrow.wrap("\u{00B1}\u{00B1}\u{00B1} x"), "\u{00B1}\u{00B1}\u{00B1}\nx");

    let wide = LineWrap::with_env(WrapOptions::new(4).locale(Some("ja_JP".into())), |_| None)
        .expect("valid");
    assert_eq!(wide.wrap("\u{00B1}\u{00B1} x"), "\u{00B1}\u{00B1}\nx");
    assert_eq!(wide.wrap("\u{00B1} x"), "\u{00B1} x");
}
