//! Splitting input into breaks: newline replacements, URLs, and words.

use std::ops::Range;

use lwrap_core::escape::find_sequence;
use regex::Regex;
use url::Url;

use crate::options::ConfigError;
use crate::space::{Break, SpaceBreaker, SpaceBreaks};

/// Cheap URL candidate scan; every hit is confirmed with a real parser.
/// Candidates stop at ESC and BEL so they never run into an escape sequence.
const URL_CANDIDATE: &str = r"[a-z]{2,8}://[^\s\x1b\x07]+";

/// Strict WHATWG check of a URL candidate.
#[must_use]
pub fn is_valid_url(candidate: &str) -> bool {
    Url::parse(candidate).is_ok()
}

/// Produces the [`Break`] stream the sizer and packer consume.
#[derive(Debug, Clone)]
pub struct Chunker {
    breaker: SpaceBreaker,
    newline: Option<Regex>,
    urls: Regex,
    replacement: String,
}

impl Chunker {
    /// `newline` is the detector pattern; `None` keeps newlines as text.
    /// A pattern that matches the empty string is rejected.
    pub fn new(newline: Option<&str>, replacement: impl Into<String>) -> Result<Self, ConfigError> {
        let newline = newline.map(Regex::new).transpose()?;
        if let Some(re) = newline.as_ref().filter(|re| re.is_match("")) {
            return Err(ConfigError::EmptyNewlineMatch(re.as_str().to_owned()));
        }
        Ok(Self {
            breaker: SpaceBreaker::new()?,
            newline,
            urls: Regex::new(URL_CANDIDATE)?,
            replacement: replacement.into(),
        })
    }

    #[must_use]
    pub fn breaker(&self) -> &SpaceBreaker {
        &self.breaker
    }

    /// Lazily split `text` into breaks.
    ///
    /// Each newline match becomes the breaks of the replacement string, each
    /// valid URL one verbatim break, and everything else is split by the
    /// [`SpaceBreaker`]. Positions are byte offsets into `text`.
    pub fn chunks<'a>(&'a self, text: &'a str) -> Chunks<'a> {
        let mut chunks = Chunks {
            chunker: self,
            text,
            pos: 0,
            piece_end: 0,
            newline: None,
            url: None,
            current: None,
        };
        chunks.start_piece();
        chunks
    }
}

#[derive(Debug, Clone, Copy)]
enum Segment {
    Plain(usize, usize),
    Url(usize, usize),
    Newline(usize),
}

enum Active<'a> {
    /// Breaks of `piece`, which starts at `offset`.
    Text {
        breaks: SpaceBreaks<'a, 'a>,
        piece: &'a str,
        offset: usize,
        /// The first escape sequence in `piece` not yet passed.
        escape: Option<Range<usize>>,
    },
    /// Breaks of the replacement, standing in at `at`.
    Replacement { breaks: SpaceBreaks<'a, 'a>, at: usize },
}

/// Iterator over the [`Break`]s of a text. See [`Chunker::chunks`].
pub struct Chunks<'a> {
    chunker: &'a Chunker,
    text: &'a str,
    pos: usize,
    /// End of the newline-free piece containing `pos`.
    piece_end: usize,
    /// The newline match that ends the current piece.
    newline: Option<(usize, usize)>,
    /// A URL candidate found ahead of `pos`.
    url: Option<(usize, usize)>,
    current: Option<Active<'a>>,
}

impl<'a> Chunks<'a> {
    fn start_piece(&mut self) {
        self.url = None;
        self.newline = self.find_newline(self.pos);
        self.piece_end = self.newline.map_or(self.text.len(), |(start, _)| start);
    }

    /// The next non-empty newline match at or after `from`.
    fn find_newline(&self, mut from: usize) -> Option<(usize, usize)> {
        let re = self.chunker.newline.as_ref()?;
        loop {
            let m = re.find_at(self.text, from)?;
            if !m.is_empty() {
                return Some((m.start(), m.end()));
            }
            from = m.end() + self.text[m.end()..].chars().next()?.len_utf8();
        }
    }

    fn next_segment(&mut self) -> Option<Segment> {
        if self.pos < self.piece_end {
            return Some(self.piece_segment());
        }
        let (_, end) = self.newline.take()?;
        self.pos = end;
        self.start_piece();
        Some(Segment::Newline(end))
    }

    fn piece_segment(&mut self) -> Segment {
        let (pos, end) = (self.pos, self.piece_end);
        let found = match self.url.take() {
            Some(url) => Some(url),
            None => self.find_url(pos, end),
        };
        match found {
            None => {
                self.pos = end;
                Segment::Plain(pos, end)
            }
            Some((start, stop)) if start > pos => {
                self.url = Some((start, stop));
                self.pos = start;
                Segment::Plain(pos, start)
            }
            Some((start, stop)) => {
                self.pos = stop;
                let candidate = &self.text[start..stop];
                if is_valid_url(candidate) {
                    Segment::Url(start, stop)
                } else {
                    tracing::debug!(candidate, "not a valid URL, breaking as text");
                    Segment::Plain(start, stop)
                }
            }
        }
    }

    /// The next URL candidate in `pos..end` that is not inside an escape
    /// sequence.
    fn find_url(&self, mut pos: usize, end: usize) -> Option<(usize, usize)> {
        let piece = &self.text[..end];
        loop {
            let m = self.chunker.urls.find_at(piece, pos)?;
            let mut escape = find_sequence(piece, pos);
            while let Some(esc) = escape.clone().filter(|esc| esc.end <= m.start()) {
                escape = find_sequence(piece, esc.end);
            }
            match escape {
                Some(esc) if esc.start < m.start() => pos = esc.end,
                _ => return Some((m.start(), m.end())),
            }
        }
    }
}

/// Grow `brk`, a break of `piece`, until it no longer ends inside an escape
/// sequence.
fn settle<'a>(
    brk: Break<'a>,
    breaks: &mut SpaceBreaks<'a, 'a>,
    piece: &'a str,
    escape: &mut Option<Range<usize>>,
) -> Break<'a> {
    let start = brk.position - brk.text.len();
    let mut end = brk.position;
    let mut must_break = brk.must_break;
    let mut merged = false;
    loop {
        while let Some(esc) = escape.clone().filter(|esc| esc.end <= end) {
            *escape = find_sequence(piece, esc.end);
        }
        match escape {
            Some(esc) if esc.start < end => match breaks.next() {
                Some(next) => {
                    end = next.position;
                    must_break = next.must_break;
                    merged = true;
                }
                None => break,
            },
            _ => break,
        }
    }
    if !merged {
        return brk;
    }
    Break {
        text: &piece[start..end],
        position: end,
        space_run: false,
        verbatim: false,
        must_break,
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Break<'a>;

    fn next(&mut self) -> Option<Break<'a>> {
        loop {
            match self.current.as_mut() {
                Some(Active::Text {
                    breaks,
                    piece,
                    offset,
                    escape,
                }) => {
                    if let Some(brk) = breaks.next() {
                        let mut brk = settle(brk, breaks, *piece, escape);
                        brk.position += *offset;
                        return Some(brk);
                    }
                }
                Some(Active::Replacement { breaks, at }) => {
                    if let Some(mut brk) = breaks.next() {
                        brk.position = *at;
                        return Some(brk);
                    }
                }
                None => {}
            }
            self.current = None;

            let (chunker, text) = (self.chunker, self.text);
            match self.next_segment()? {
                Segment::Plain(start, end) => {
                    let piece = &text[start..end];
                    self.current = Some(Active::Text {
                        breaks: chunker.breaker.breaks(piece),
                        piece,
                        offset: start,
                        escape: find_sequence(piece, 0),
                    });
                }
                Segment::Url(start, end) => {
                    return Some(Break {
                        text: &text[start..end],
                        position: end,
                        space_run: false,
                        verbatim: true,
                        must_break: false,
                    });
                }
                Segment::Newline(at) => {
                    self.current = Some(Active::Replacement {
                        breaks: chunker.breaker.breaks(&chunker.replacement),
                        at,
                    });
                }
            }
        }
    }
}
