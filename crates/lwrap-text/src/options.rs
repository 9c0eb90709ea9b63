//! Wrapping options and their validated form.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use lwrap_core::text_width::{cjk_width_from_env, locale_from_env};
use lwrap_core::{TextWidth, WidthPolicy};
use lwrap_linebreak::RuleError;

use crate::pack::{PackObserver, TraceObserver};

/// Horizontal whitespace before a run of line terminators, the run itself,
/// and any whitespace after it.
pub const DEFAULT_NEWLINE: &str =
    r"[^\S\r\n\v\f\x85\u{2028}\u{2029}]*[\r\n\v\f\x85\u{2028}\u{2029}]+\s*";

/// Transform applied to every non-verbatim fragment before it is placed.
pub type EscapeFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// What to do with a single token wider than the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Overflow {
    /// Let it stick out past the width.
    #[default]
    Visible,
    /// Cut it to fit and end it with the ellipsis.
    Clip,
    /// Split it across lines, ending each piece but the last with the hyphen.
    Anywhere,
}

impl FromStr for Overflow {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "visible" => Ok(Self::Visible),
            "clip" => Ok(Self::Clip),
            "anywhere" => Ok(Self::Anywhere),
            _ => Err(ConfigError::InvalidOverflow(s.to_string())),
        }
    }
}

impl fmt::Display for Overflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Visible => "visible",
            Self::Clip => "clip",
            Self::Anywhere => "anywhere",
        })
    }
}

/// Line indentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indent {
    /// This many copies of the indent character.
    Columns(usize),
    /// A literal prefix.
    Text(String),
}

impl Indent {
    /// A number means columns, anything else is literal text.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.parse::<usize>() {
            Ok(n) => Self::Columns(n),
            Err(_) => Self::Text(s.to_string()),
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// Errors detected when options are turned into a wrapper.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The indent leaves no columns to wrap into.
    NoRoomToWrap { width: usize, indent_width: usize },
    /// An overflow name other than `visible`, `clip` or `anywhere`.
    InvalidOverflow(String),
    /// With clipping, the first line has no room for the ellipsis.
    FirstColumnTooWide { first_column: usize, limit: usize },
    /// The newline detector does not compile.
    InvalidPattern(regex::Error),
    /// The newline detector matches the empty string.
    EmptyNewlineMatch(String),
    /// The line-break rule table could not be assembled.
    Rules(RuleError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRoomToWrap { width, indent_width } => write!(
                f,
                "no space to wrap: width {width} leaves nothing after an indent of {indent_width}"
            ),
            Self::InvalidOverflow(s) => write!(f, "invalid overflow style: \"{s}\""),
            Self::FirstColumnTooWide {
                first_column,
                limit,
            } => write!(
                f,
                "first column {first_column} leaves no room for the ellipsis (at most {limit})"
            ),
            Self::InvalidPattern(e) => write!(f, "invalid newline pattern: {e}"),
            Self::EmptyNewlineMatch(p) => {
                write!(f, "newline pattern \"{p}\" matches the empty string")
            }
            Self::Rules(e) => write!(f, "line-break rules: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidPattern(e) => Some(e),
            Self::Rules(e) => Some(e),
            _ => None,
        }
    }
}

impl From<regex::Error> for ConfigError {
    fn from(e: regex::Error) -> Self {
        Self::InvalidPattern(e)
    }
}

impl From<RuleError> for ConfigError {
    fn from(e: RuleError) -> Self {
        Self::Rules(e)
    }
}

/// Options for [`LineWrap`](crate::LineWrap).
#[derive(Clone)]
pub struct WrapOptions {
    /// Maximum line width in cells, indentation included.
    pub width: usize,
    pub indent: Indent,
    /// Repeated for [`Indent::Columns`].
    pub indent_char: String,
    /// Indent the first line too. When off, the first line is assumed to
    /// already start at `first_column`.
    pub indent_first: bool,
    pub first_column: Option<usize>,
    /// Regex matching newlines to replace; `None` keeps newlines as text.
    pub newline: Option<String>,
    pub newline_replacement: String,
    pub overflow: Overflow,
    pub ellipsis: String,
    pub hyphen: String,
    /// BCP 47 or POSIX locale; read from the environment when unset.
    pub locale: Option<String>,
    /// Count the bytes of escape sequences as cells.
    pub include_styling: bool,
    /// Force the East Asian ambiguous-width policy.
    pub cjk: Option<bool>,
    pub escape: Option<EscapeFn>,
    /// Joins lines in [`LineWrap::wrap`](crate::LineWrap::wrap).
    pub line_terminator: String,
    /// Trace every packing decision.
    pub verbose: bool,
    pub observer: Option<Arc<dyn PackObserver>>,
}

impl WrapOptions {
    /// Default options at the given width.
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            width,
            indent: Indent::default(),
            indent_char: " ".to_string(),
            indent_first: true,
            first_column: None,
            newline: Some(DEFAULT_NEWLINE.to_string()),
            newline_replacement: " ".to_string(),
            overflow: Overflow::Visible,
            ellipsis: "\u{2026}".to_string(),
            hyphen: "-".to_string(),
            locale: None,
            include_styling: false,
            cjk: None,
            escape: None,
            line_terminator: "\n".to_string(),
            verbose: false,
            observer: None,
        }
    }

    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub fn indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn indent_char(mut self, ch: impl Into<String>) -> Self {
        self.indent_char = ch.into();
        self
    }

    #[must_use]
    pub fn indent_first(mut self, indent_first: bool) -> Self {
        self.indent_first = indent_first;
        self
    }

    #[must_use]
    pub fn first_column(mut self, column: Option<usize>) -> Self {
        self.first_column = column;
        self
    }

    /// Set the newline detector pattern, or `None` to disable it.
    #[must_use]
    pub fn newline(mut self, pattern: Option<&str>) -> Self {
        self.newline = pattern.map(str::to_string);
        self
    }

    #[must_use]
    pub fn newline_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.newline_replacement = replacement.into();
        self
    }

    #[must_use]
    pub fn overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    #[must_use]
    pub fn ellipsis(mut self, ellipsis: impl Into<String>) -> Self {
        self.ellipsis = ellipsis.into();
        self
    }

    #[must_use]
    pub fn hyphen(mut self, hyphen: impl Into<String>) -> Self {
        self.hyphen = hyphen.into();
        self
    }

    #[must_use]
    pub fn locale(mut self, locale: Option<String>) -> Self {
        self.locale = locale;
        self
    }

    #[must_use]
    pub fn include_styling(mut self, include: bool) -> Self {
        self.include_styling = include;
        self
    }

    #[must_use]
    pub fn cjk(mut self, cjk: Option<bool>) -> Self {
        self.cjk = cjk;
        self
    }

    #[must_use]
    pub fn escape<F>(mut self, escape: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.escape = Some(Arc::new(escape));
        self
    }

    #[must_use]
    pub fn line_terminator(mut self, terminator: impl Into<String>) -> Self {
        self.line_terminator = terminator.into();
        self
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Receive every packing decision. Takes precedence over `verbose`.
    #[must_use]
    pub fn observer(mut self, observer: Arc<dyn PackObserver>) -> Self {
        self.observer = Some(observer);
        self
    }
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self::new(80)
    }
}

impl fmt::Debug for WrapOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrapOptions")
            .field("width", &self.width)
            .field("indent", &self.indent)
            .field("indent_char", &self.indent_char)
            .field("indent_first", &self.indent_first)
            .field("first_column", &self.first_column)
            .field("newline", &self.newline)
            .field("newline_replacement", &self.newline_replacement)
            .field("overflow", &self.overflow)
            .field("ellipsis", &self.ellipsis)
            .field("hyphen", &self.hyphen)
            .field("locale", &self.locale)
            .field("include_styling", &self.include_styling)
            .field("cjk", &self.cjk)
            .field("escape", &self.escape.is_some())
            .field("line_terminator", &self.line_terminator)
            .field("verbose", &self.verbose)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

/// Validated options with every derived measurement precomputed.
#[derive(Clone)]
pub struct Config {
    pub(crate) width: usize,
    pub(crate) indent: String,
    pub(crate) indent_width: usize,
    pub(crate) indent_first: bool,
    pub(crate) first_column: Option<usize>,
    pub(crate) first_indent: usize,
    pub(crate) working_width: usize,
    pub(crate) newline_replacement: String,
    pub(crate) replacement_width: usize,
    pub(crate) overflow: Overflow,
    pub(crate) ellipsis: String,
    pub(crate) ellipsis_width: usize,
    pub(crate) hyphen: String,
    pub(crate) hyphen_width: usize,
    pub(crate) measure: TextWidth,
    pub(crate) escape: Option<EscapeFn>,
    pub(crate) line_terminator: String,
    pub(crate) observer: Option<Arc<dyn PackObserver>>,
}

impl Config {
    /// Validate `opts`, reading the process environment for the locale.
    pub fn new(opts: &WrapOptions) -> Result<Self, ConfigError> {
        Self::with_env(opts, |key| std::env::var(key).ok())
    }

    /// Validate `opts` using a custom environment lookup.
    pub fn with_env<F>(opts: &WrapOptions, get_env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let locale = match &opts.locale {
            Some(locale) => locale.clone(),
            None => locale_from_env(&get_env).unwrap_or_default(),
        };
        let cjk = opts
            .cjk
            .unwrap_or_else(|| cjk_width_from_env(&locale, &get_env));
        let measure =
            TextWidth::new(WidthPolicy::for_cjk(cjk)).include_styling(opts.include_styling);

        let (indent, indent_width) = match &opts.indent {
            Indent::Columns(n) => (opts.indent_char.repeat(*n), *n),
            Indent::Text(s) => (s.clone(), measure.width(s)),
        };
        if opts.width <= indent_width {
            return Err(ConfigError::NoRoomToWrap {
                width: opts.width,
                indent_width,
            });
        }
        let working_width = opts.width - indent_width;

        let ellipsis_width = measure.width(&opts.ellipsis);
        if opts.overflow == Overflow::Clip {
            if let Some(first_column) = opts.first_column {
                let limit = opts.width.saturating_sub(ellipsis_width + 1);
                if first_column > limit {
                    return Err(ConfigError::FirstColumnTooWide {
                        first_column,
                        limit,
                    });
                }
            }
        }

        let first_indent = match opts.first_column {
            Some(column) if !opts.indent_first => column,
            _ => indent_width,
        };
        let observer = match (&opts.observer, opts.verbose) {
            (Some(observer), _) => Some(Arc::clone(observer)),
            (None, true) => Some(Arc::new(TraceObserver) as Arc<dyn PackObserver>),
            (None, false) => None,
        };

        tracing::debug!(
            width = opts.width,
            indent_width,
            working_width,
            overflow = %opts.overflow,
            locale = %locale,
            cjk,
            "line wrap configured"
        );

        Ok(Self {
            width: opts.width,
            indent,
            indent_width,
            indent_first: opts.indent_first,
            first_column: opts.first_column,
            first_indent,
            working_width,
            replacement_width: measure.width(&opts.newline_replacement),
            newline_replacement: opts.newline_replacement.clone(),
            overflow: opts.overflow,
            ellipsis: opts.ellipsis.clone(),
            ellipsis_width,
            hyphen_width: measure.width(&opts.hyphen),
            hyphen: opts.hyphen.clone(),
            measure,
            escape: opts.escape.clone(),
            line_terminator: opts.line_terminator.clone(),
            observer,
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn indent(&self) -> &str {
        &self.indent
    }

    #[must_use]
    pub fn indent_width(&self) -> usize {
        self.indent_width
    }

    /// Columns left after the indent.
    #[must_use]
    pub fn working_width(&self) -> usize {
        self.working_width
    }

    /// Column the first line starts at.
    #[must_use]
    pub fn first_indent(&self) -> usize {
        self.first_indent
    }

    #[must_use]
    pub fn overflow(&self) -> Overflow {
        self.overflow
    }

    #[must_use]
    pub fn measure(&self) -> TextWidth {
        self.measure
    }

    #[must_use]
    pub fn line_terminator(&self) -> &str {
        &self.line_terminator
    }

    /// The caller already occupies part of the first line.
    pub(crate) fn first_line_offset(&self) -> Option<usize> {
        if self.indent_first {
            None
        } else {
            self.first_column
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("width", &self.width)
            .field("indent", &self.indent)
            .field("indent_width", &self.indent_width)
            .field("first_indent", &self.first_indent)
            .field("working_width", &self.working_width)
            .field("overflow", &self.overflow)
            .field("measure", &self.measure)
            .finish_non_exhaustive()
    }
}
