//! Greedy line packing.
//!
//! Fragments are placed left to right. Whitespace runs are held back and
//! only written once a following word fits on the same line, so no line
//! ends in spaces. The first word on a line is always placed, which keeps
//! the packer moving even when a single word is wider than the line.

use std::borrow::Cow;
use std::mem;

use crate::chunk::Chunks;
use crate::fragment::{Fragment, FragmentSizer, Fragments};
use crate::options::Config;
use crate::space::Break;

/// What the packer did with a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// A whitespace run, held until the next word.
    Pending,
    /// First word on the line.
    Start,
    /// Appended after the held whitespace.
    Append,
    /// Did not fit; the line was emitted and the word starts the next one.
    Wrap,
}

/// Receives packing decisions as they happen.
pub trait PackObserver: Send + Sync {
    fn fragment(&self, _text: &str, _width: usize, _placement: Placement) {}

    fn line(&self, _line: &str) {}
}

/// Reports packing decisions as `trace` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceObserver;

impl PackObserver for TraceObserver {
    fn fragment(&self, text: &str, width: usize, placement: Placement) {
        tracing::trace!(text, width, ?placement, "fragment");
    }

    fn line(&self, line: &str) {
        tracing::trace!(line, "line");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    Running,
    Done,
}

/// Iterator over wrapped lines, each indented and without a terminator.
pub struct Lines<'a> {
    config: &'a Config,
    empty_input: bool,
    chunks: Chunks<'a>,
    /// Pieces of an oversized break, each starting its own line.
    fragments: Option<Fragments<'a>>,
    line: String,
    cur: usize,
    spaces: String,
    spaces_width: usize,
    /// Nothing occupies the current line yet. Only the first line can be.
    fresh: bool,
    /// Something from the input was placed on the current line.
    placed: bool,
    phase: Phase,
}

impl<'a> Lines<'a> {
    pub(crate) fn new(config: &'a Config, chunks: Chunks<'a>, empty_input: bool) -> Self {
        let line = if config.indent_first {
            config.indent.clone()
        } else {
            String::new()
        };
        Self {
            config,
            empty_input,
            chunks,
            fragments: None,
            line,
            cur: config.first_indent,
            spaces: String::new(),
            spaces_width: 0,
            fresh: config.first_indent <= config.indent_width,
            placed: false,
            phase: Phase::Start,
        }
    }

    fn escaped(&self, fragment: Fragment<'a>) -> Cow<'a, str> {
        match &self.config.escape {
            Some(escape) if !fragment.verbatim => Cow::Owned(escape(&*fragment.text)),
            _ => fragment.text,
        }
    }

    fn observe(&self, text: &str, width: usize, placement: Placement) {
        if let Some(observer) = &self.config.observer {
            observer.fragment(text, width, placement);
        }
    }

    fn emit(&self, line: String) -> String {
        if let Some(observer) = &self.config.observer {
            observer.line(&line);
        }
        line
    }

    fn clear_spaces(&mut self) {
        self.spaces.clear();
        self.spaces_width = 0;
    }

    /// Place one break, returning a line if this completed one.
    ///
    /// A break that fits after the held whitespace is appended whole.
    /// Anything else starts a line, and is sized against that line's budget.
    fn place(&mut self, brk: Break<'a>) -> Option<String> {
        let sizer = FragmentSizer::new(self.config);
        let width = self.config.measure.width(brk.text);

        if brk.space_run {
            for fragment in sizer.sized(brk, width, false) {
                self.hold(fragment);
            }
            return None;
        }

        if !self.fresh && self.cur + self.spaces_width + width <= self.config.width {
            self.append(Fragment {
                text: Cow::Borrowed(brk.text),
                width,
                space_run: false,
                verbatim: brk.verbatim,
            });
            return None;
        }

        let mut fragments = sizer.sized(brk, width, self.fresh);
        let line = fragments.next().and_then(|f| self.start_line(f));
        self.fragments = Some(fragments);
        line
    }

    fn hold(&mut self, fragment: Fragment<'a>) {
        let width = fragment.width;
        let text = self.escaped(fragment);
        self.observe(&text, width, Placement::Pending);
        self.spaces.push_str(&text);
        self.spaces_width += width;
    }

    fn append(&mut self, fragment: Fragment<'a>) {
        let width = fragment.width;
        let text = self.escaped(fragment);
        self.observe(&text, width, Placement::Append);
        self.line.push_str(&self.spaces);
        self.line.push_str(&text);
        self.cur += self.spaces_width + width;
        self.clear_spaces();
        self.placed = true;
    }

    /// Put `fragment` at the start of a line: the current one while it is
    /// still fresh, otherwise a new one.
    fn start_line(&mut self, fragment: Fragment<'a>) -> Option<String> {
        let width = fragment.width;
        let text = self.escaped(fragment);
        self.clear_spaces();
        self.placed = true;

        if self.fresh {
            self.observe(&text, width, Placement::Start);
            self.line.push_str(&text);
            self.cur += width;
            self.fresh = false;
            return None;
        }

        self.observe(&text, width, Placement::Wrap);
        let mut next = String::with_capacity(self.config.indent.len() + text.len());
        next.push_str(&self.config.indent);
        next.push_str(&text);
        let done = mem::replace(&mut self.line, next);
        self.cur = self.config.indent_width + width;
        Some(self.emit(done))
    }
}

impl Iterator for Lines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match self.phase {
            Phase::Done => return None,
            Phase::Start if self.empty_input => {
                self.phase = Phase::Done;
                return self
                    .config
                    .indent_first
                    .then(|| self.emit(self.config.indent.clone()));
            }
            Phase::Start => self.phase = Phase::Running,
            Phase::Running => {}
        }

        loop {
            if let Some(fragment) = self.fragments.as_mut().and_then(Iterator::next) {
                match self.start_line(fragment) {
                    Some(line) => return Some(line),
                    None => continue,
                }
            }
            self.fragments = None;
            let Some(brk) = self.chunks.next() else {
                break;
            };
            if let Some(line) = self.place(brk) {
                return Some(line);
            }
        }

        self.phase = Phase::Done;
        if self.placed {
            let line = mem::take(&mut self.line);
            return Some(self.emit(line));
        }
        None
    }
}

impl std::iter::FusedIterator for Lines<'_> {}
