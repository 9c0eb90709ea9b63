//! Lazy break iteration over a text.

use std::str::CharIndices;

use crate::class::LineClass;
use crate::rules::Rules;
use crate::state::{BreakState, CharInfo, Opportunity, Props};

/// A break opportunity after `position` bytes of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBreak {
    pub position: usize,
    /// A mandatory break (hard line end or end of text).
    pub required: bool,
    pub props: Props,
}

impl LineBreak {
    /// Value of a tag set by the rules, `false` when unset.
    #[must_use]
    pub fn prop(&self, name: &str) -> bool {
        self.props
            .iter()
            .find(|(n, _)| *n == name)
            .is_some_and(|(_, v)| *v)
    }
}

/// Iterator over the [`LineBreak`]s of a text. See [`Rules::breaks`].
pub struct Breaks<'r, 'a, E> {
    rules: &'r Rules<E>,
    text: &'a str,
    chars: CharIndices<'a>,
    state: BreakState<E>,
    done: bool,
}

impl<'r, 'a, E: Default> Breaks<'r, 'a, E> {
    pub(crate) fn new(rules: &'r Rules<E>, text: &'a str) -> Self {
        Self {
            rules,
            text,
            chars: text.char_indices(),
            state: BreakState::default(),
            done: text.is_empty(),
        }
    }
}

impl<'r, 'a, E> Breaks<'r, 'a, E> {
    /// The text being broken.
    #[must_use]
    pub fn text(&self) -> &'a str {
        self.text
    }

    fn lookup(&self, ch: char) -> CharInfo {
        let mut info = CharInfo::new(ch);
        // LB10: an unattached mark stands alone as AL.
        if matches!(info.cls, LineClass::CM | LineClass::ZWJ) && !self.state.absorbs_combining() {
            info.cls = LineClass::AL;
        }
        info
    }
}

impl<E> Iterator for Breaks<'_, '_, E> {
    type Item = LineBreak;

    fn next(&mut self) -> Option<LineBreak> {
        while !self.done {
            let (pos, next) = match self.chars.next() {
                Some((pos, ch)) => (pos, Some(self.lookup(ch))),
                None => {
                    self.done = true;
                    (self.text.len(), None)
                }
            };
            self.state.enter(pos, next);

            let op = self.rules.evaluate(&mut self.state);
            let broke = op.is_break();
            let found = broke.then(|| LineBreak {
                position: pos,
                required: op == Opportunity::MustBreak,
                props: self.state.take_props(),
            });
            if broke {
                self.state.prev_chunk = pos;
            }
            self.state.advance(broke);

            if found.is_some() {
                return found;
            }
        }
        None
    }
}

impl<E> std::iter::FusedIterator for Breaks<'_, '_, E> {}
