//! Evaluation state for a single break boundary.

use smallvec::SmallVec;

use crate::class::LineClass;

/// Verdict a rule returns for a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opportunity {
    /// The rule does not apply; ask the next one.
    Pass,
    NoBreak,
    MayBreak,
    MustBreak,
}

impl Opportunity {
    /// Whether this verdict produces a break.
    #[inline]
    #[must_use]
    pub const fn is_break(self) -> bool {
        matches!(self, Self::MayBreak | Self::MustBreak)
    }
}

/// A code point together with its resolved line-break class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharInfo {
    pub ch: char,
    pub cls: LineClass,
}

impl CharInfo {
    #[inline]
    #[must_use]
    pub fn new(ch: char) -> Self {
        Self {
            ch,
            cls: LineClass::of(ch).resolved(),
        }
    }
}

/// Boolean tags attached to an emitted break.
pub type Props = SmallVec<[(&'static str, bool); 2]>;

/// Everything a rule can see about the boundary under evaluation.
///
/// `cur` is the character before the boundary (`None` at start of text) and
/// `next` the character after it (`None` at end of text). A run of spaces
/// that follows a character without a break in front of it is transparent:
/// `cur` keeps the character before the run and `spaces` is set.
#[derive(Debug, Clone)]
pub struct BreakState<E> {
    pub cur: Option<CharInfo>,
    pub next: Option<CharInfo>,
    pub spaces: bool,
    /// Class of the character before `cur`.
    pub prev: Option<LineClass>,
    /// Consecutive regional indicators ending at `cur`.
    pub ri_count: usize,
    /// Byte offset of the boundary.
    pub pos: usize,
    /// Byte offset of the last emitted break.
    pub prev_chunk: usize,
    /// Overlay state, fresh for every pass over a text.
    pub extra: E,
    props: Props,
}

impl<E: Default> Default for BreakState<E> {
    fn default() -> Self {
        Self {
            cur: None,
            next: None,
            spaces: false,
            prev: None,
            ri_count: 0,
            pos: 0,
            prev_chunk: 0,
            extra: E::default(),
            props: Props::new(),
        }
    }
}

impl<E> BreakState<E> {
    /// Bytes since the last emitted break.
    #[inline]
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pos - self.prev_chunk
    }

    /// `cur`, unless a run of spaces separates it from `next`.
    #[inline]
    #[must_use]
    pub fn direct(&self) -> Option<CharInfo> {
        if self.spaces { None } else { self.cur }
    }

    /// Class of `cur`, if any.
    #[inline]
    #[must_use]
    pub fn cur_class(&self) -> Option<LineClass> {
        self.cur.map(|c| c.cls)
    }

    /// Class of `next`, if any.
    #[inline]
    #[must_use]
    pub fn next_class(&self) -> Option<LineClass> {
        self.next.map(|c| c.cls)
    }

    /// Adjacent class pair `(cur, next)` with no spaces between them.
    #[inline]
    #[must_use]
    pub fn pair(&self) -> Option<(LineClass, LineClass)> {
        Some((self.direct()?.cls, self.next?.cls))
    }

    /// Tag the break emitted at this boundary.
    pub fn set_prop(&mut self, name: &'static str, value: bool) {
        match self.props.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.props.push((name, value)),
        }
    }

    /// Current value of a tag, `false` when unset.
    #[must_use]
    pub fn prop(&self, name: &str) -> bool {
        self.props
            .iter()
            .find(|(n, _)| *n == name)
            .is_some_and(|(_, v)| *v)
    }

    /// Start a new boundary at `pos` with `next` after it.
    pub(crate) fn enter(&mut self, pos: usize, next: Option<CharInfo>) {
        self.pos = pos;
        self.next = next;
        self.props.clear();
    }

    pub(crate) fn take_props(&mut self) -> Props {
        std::mem::take(&mut self.props)
    }

    /// Whether a combining mark or ZWJ at `next` attaches to `cur` (LB9).
    pub(crate) fn absorbs_combining(&self) -> bool {
        match self.direct() {
            Some(cur) => !cur.cls.rejects_combining(),
            None => false,
        }
    }

    /// Move past the boundary just evaluated.
    pub(crate) fn advance(&mut self, broke: bool) {
        let Some(mut next) = self.next else {
            return;
        };
        let is_ri = next.cls == LineClass::RI;

        if matches!(next.cls, LineClass::CM | LineClass::ZWJ) {
            if !broke && self.absorbs_combining() {
                // X CM* behaves as X, but the joiner itself stays visible to LB8a.
                if let Some(cur) = self.cur.as_mut() {
                    cur.ch = next.ch;
                }
                return;
            }
            next.cls = LineClass::AL;
        }

        if next.cls == LineClass::SP && self.cur.is_some() && !broke {
            self.spaces = true;
            return;
        }

        let was_ri = self.direct().is_some_and(|c| c.cls == LineClass::RI);
        self.ri_count = match (is_ri, was_ri) {
            (true, true) => self.ri_count + 1,
            (true, false) => 1,
            _ => 0,
        };
        self.prev = self.cur_class();
        self.cur = Some(next);
        self.spaces = false;
    }
}
