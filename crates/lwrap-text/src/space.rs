//! Line breaking that keeps whitespace runs together.
//!
//! The standard table glues spaces to the word before them. For wrapping we
//! want the opposite: every run of "fancy" spaces (ordinary spaces, tabs,
//! and other `Zs` separators) becomes its own break, tagged so the packer can
//! hold it back instead of printing it at the end of a line.
//!
//! This deliberately departs from UAX #14. Runs that follow an opening or
//! closing bracket, a quote, a zero-width space or `B2` stay with the
//! preceding word, as the standard rules require.

use lwrap_linebreak::{BreakState, Breaks, LineClass, Opportunity, RuleError, Rules};
use unicode_general_category::{GeneralCategory, get_general_category};

/// Tag set on breaks that end a whitespace run.
pub const SPACE: &str = "space";

/// A run of text ending at a break opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Break<'a> {
    pub text: &'a str,
    /// Byte offset just past `text` in the input.
    pub position: usize,
    /// `text` is a whitespace run.
    pub space_run: bool,
    /// `text` must be emitted as-is: never escaped, never re-broken.
    pub verbatim: bool,
    pub must_break: bool,
}

/// Overlay state: are we inside a whitespace run?
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaceRun {
    in_run: bool,
}

/// Is `cls` the ordinary space class?
#[inline]
#[must_use]
pub fn is_break_class_space(cls: LineClass) -> bool {
    cls == LineClass::SP
}

/// Is `ch` in the Unicode space-separator category (`Zs`)?
#[inline]
#[must_use]
pub fn is_space_separator(ch: char) -> bool {
    get_general_category(ch) == GeneralCategory::SpaceSeparator
}

/// Spaces for wrapping purposes: `SP`, plus the `BA` code points that are a
/// tab or a space separator (OGHAM SPACE MARK, EN SPACE, ...).
#[must_use]
pub fn is_fancy_space(ch: char, cls: LineClass) -> bool {
    if is_break_class_space(cls) {
        return true;
    }
    cls == LineClass::BA && (ch == '\t' || is_space_separator(ch))
}

fn next_is_fancy(s: &BreakState<SpaceRun>) -> bool {
    s.next.is_some_and(|n| is_fancy_space(n.ch, n.cls))
}

// Before LB02.
fn initial_spaces(s: &mut BreakState<SpaceRun>) -> Opportunity {
    if s.cur.is_none() && next_is_fancy(s) {
        s.extra.in_run = true;
    }
    Opportunity::Pass
}

// Replaces LB03.
fn trailing_spaces(s: &mut BreakState<SpaceRun>) -> Opportunity {
    if s.next.is_some() {
        return Opportunity::Pass;
    }
    if s.pending_len() == 0 {
        return Opportunity::NoBreak;
    }
    if s.extra.in_run {
        s.set_prop(SPACE, true);
    }
    Opportunity::MustBreak
}

// Before LB04. A hard line end closes any open run.
fn hard_break_ends_run(s: &mut BreakState<SpaceRun>) -> Opportunity {
    if s.cur_class().is_some_and(LineClass::is_hard_break) {
        s.extra.in_run = false;
    }
    Opportunity::Pass
}

// Before LBspacesStop.
fn spaces_break(s: &mut BreakState<SpaceRun>) -> Opportunity {
    if !s.extra.in_run {
        return Opportunity::Pass;
    }
    if next_is_fancy(s) {
        return Opportunity::NoBreak;
    }
    s.set_prop(SPACE, true);
    s.extra.in_run = false;
    Opportunity::MayBreak
}

// Replaces LB07.
fn spaces_start(s: &mut BreakState<SpaceRun>) -> Opportunity {
    use LineClass::{B2, CL, CP, OP, QU, SP, ZW, ZWJ};

    let Some(next) = s.next else {
        return Opportunity::Pass;
    };
    match next.cls {
        ZW | ZWJ => return Opportunity::NoBreak,
        SP => {
            // LB8, LB14, LB15, LB16 and LB17 decide these.
            if matches!(s.cur_class(), Some(ZW | OP | QU | CL | CP | B2)) {
                return Opportunity::Pass;
            }
            s.extra.in_run = true;
            return Opportunity::MayBreak;
        }
        _ => {}
    }
    if is_fancy_space(next.ch, next.cls) {
        s.extra.in_run = true;
        return Opportunity::MayBreak;
    }
    Opportunity::Pass
}

// Replaces LB18.
fn break_after_space(s: &mut BreakState<SpaceRun>) -> Opportunity {
    if s.cur_class() == Some(LineClass::SP) {
        s.set_prop(SPACE, true);
        return Opportunity::MayBreak;
    }
    Opportunity::Pass
}

/// The standard rule table with the whitespace-run overlay applied.
#[derive(Debug, Clone)]
pub struct SpaceBreaker {
    rules: Rules<SpaceRun>,
}

impl SpaceBreaker {
    pub fn new() -> Result<Self, RuleError> {
        let mut rules = Rules::new();
        rules.insert_before("LB02", "initialSpaces", initial_spaces)?;
        rules.replace("LB03", trailing_spaces)?;
        rules.insert_before("LB04", "hardBreakEndsRun", hard_break_ends_run)?;
        rules.insert_before("LBspacesStop", "spacesBreak", spaces_break)?;
        rules.replace("LB07", spaces_start)?;
        rules.replace("LB18", break_after_space)?;
        Ok(Self { rules })
    }

    #[must_use]
    pub fn rules(&self) -> &Rules<SpaceRun> {
        &self.rules
    }

    /// Lazily split `text` into [`Break`]s.
    pub fn breaks<'r, 'a>(&'r self, text: &'a str) -> SpaceBreaks<'r, 'a> {
        SpaceBreaks {
            inner: self.rules.breaks(text),
            start: 0,
        }
    }
}

/// Iterator over the [`Break`]s of a text. See [`SpaceBreaker::breaks`].
pub struct SpaceBreaks<'r, 'a> {
    inner: Breaks<'r, 'a, SpaceRun>,
    start: usize,
}

impl<'a> Iterator for SpaceBreaks<'_, 'a> {
    type Item = Break<'a>;

    fn next(&mut self) -> Option<Break<'a>> {
        let brk = self.inner.next()?;
        let text = &self.inner.text()[self.start..brk.position];
        self.start = brk.position;
        Some(Break {
            text,
            position: brk.position,
            space_run: brk.prop(SPACE),
            verbatim: false,
            must_break: brk.required,
        })
    }
}
