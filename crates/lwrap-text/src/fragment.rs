//! Measuring breaks and applying the overflow policy to over-long ones.

use std::borrow::Cow;

use lwrap_core::TextWidth;

use crate::options::{Config, Overflow};
use crate::space::Break;

/// A measured piece of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment<'a> {
    pub text: Cow<'a, str>,
    /// Width of `text` in cells.
    pub width: usize,
    pub space_run: bool,
    pub verbatim: bool,
}

/// Turns [`Break`]s into [`Fragment`]s that fit the line, per the
/// configured [`Overflow`].
#[derive(Debug, Clone, Copy)]
pub struct FragmentSizer<'c> {
    config: &'c Config,
}

impl<'c> FragmentSizer<'c> {
    #[must_use]
    pub fn new(config: &'c Config) -> Self {
        Self { config }
    }

    /// Cells a single fragment may occupy. The first line is shorter when
    /// the caller already wrote up to `first_column`.
    #[must_use]
    pub fn available(&self, first_line: bool) -> usize {
        match self.config.first_line_offset() {
            Some(column) if first_line => self.config.width.saturating_sub(column),
            _ => self.config.working_width,
        }
    }

    /// Size `brk`, splitting or clipping it when it does not fit.
    ///
    /// `first_line` says the break starts on the still-unwritten first line.
    /// Only that line uses the `first_column` budget; later pieces of a split
    /// use the working width.
    pub fn fragments<'a>(&self, brk: Break<'a>, first_line: bool) -> Fragments<'a>
    where
        'c: 'a,
    {
        let width = self.config.measure.width(brk.text);
        self.sized(brk, width, first_line)
    }

    /// [`fragments`](Self::fragments) for a break already measured at `width`.
    pub fn sized<'a>(&self, brk: Break<'a>, width: usize, first_line: bool) -> Fragments<'a>
    where
        'c: 'a,
    {
        let config: &'a Config = self.config;
        let measure = config.measure;
        let available = self.available(first_line);

        if width < available {
            return Fragments::one(Fragment {
                text: Cow::Borrowed(brk.text),
                width,
                space_run: brk.space_run,
                verbatim: brk.verbatim,
            });
        }
        if brk.space_run {
            return Fragments::one(Fragment {
                text: Cow::Borrowed(&config.newline_replacement),
                width: config.replacement_width,
                space_run: true,
                verbatim: false,
            });
        }

        match config.overflow {
            Overflow::Visible => Fragments::one(Fragment {
                text: Cow::Borrowed(brk.text),
                width,
                space_run: false,
                verbatim: brk.verbatim,
            }),
            Overflow::Clip => {
                let budget = available.saturating_sub(config.ellipsis_width);
                let (kept, cells) = measure.truncate(brk.text, budget);
                Fragments::one(Fragment {
                    text: Cow::Owned(format!("{kept}{}", config.ellipsis)),
                    width: cells + config.ellipsis_width,
                    space_run: false,
                    verbatim: brk.verbatim,
                })
            }
            Overflow::Anywhere => Fragments(Inner::Split {
                measure,
                rest: brk.text,
                budget: available.saturating_sub(config.hyphen_width),
                rest_budget: config.working_width.saturating_sub(config.hyphen_width),
                hyphen: &config.hyphen,
                hyphen_width: config.hyphen_width,
                verbatim: brk.verbatim,
            }),
        }
    }
}

/// Iterator over the fragments of one break.
///
/// Every fragment after the first starts a line of its own.
#[derive(Debug, Clone)]
pub struct Fragments<'a>(Inner<'a>);

#[derive(Debug, Clone)]
enum Inner<'a> {
    One(Option<Fragment<'a>>),
    Split {
        measure: TextWidth,
        rest: &'a str,
        /// Cells for the next slice, before the hyphen.
        budget: usize,
        rest_budget: usize,
        hyphen: &'a str,
        hyphen_width: usize,
        verbatim: bool,
    },
}

impl<'a> Fragments<'a> {
    fn one(fragment: Fragment<'a>) -> Self {
        Self(Inner::One(Some(fragment)))
    }
}

impl<'a> Iterator for Fragments<'a> {
    type Item = Fragment<'a>;

    fn next(&mut self) -> Option<Fragment<'a>> {
        match &mut self.0 {
            Inner::One(fragment) => fragment.take(),
            Inner::Split {
                measure,
                rest,
                budget,
                rest_budget,
                hyphen,
                hyphen_width,
                verbatim,
            } => {
                let slice = measure.break_at(rest, *budget).next()?;
                *rest = &rest[slice.text.len()..];
                *budget = *rest_budget;
                let fragment = if slice.is_last {
                    Fragment {
                        text: Cow::Borrowed(slice.text),
                        width: slice.cells,
                        space_run: false,
                        verbatim: *verbatim,
                    }
                } else {
                    Fragment {
                        text: Cow::Owned(format!("{}{hyphen}", slice.text)),
                        width: slice.cells + *hyphen_width,
                        space_run: false,
                        verbatim: *verbatim,
                    }
                };
                Some(fragment)
            }
        }
    }
}

impl std::iter::FusedIterator for Fragments<'_> {}
