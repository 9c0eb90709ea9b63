//! Command-line options for `wraps`.

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use lwrap_text::{ConfigError, Indent, Overflow, WrapOptions, html_escape};

/// Platform line ending, written after every wrapped chunk.
pub const EOL: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Width used when neither `--width` nor `COLUMNS` gives one.
pub const DEFAULT_WIDTH: usize = 80;

/// Wrap some text, either from files, stdin, or the command line.
///
/// Each chunk of text is wrapped independently and written to stdout (or
/// the output file). Chunks given with --text are processed before files.
#[derive(Parser, Debug, Clone)]
#[command(name = "wraps", version, about, long_about = None)]
pub struct Opts {
    /// Files to wrap and concatenate. Use "-" for stdin [default: -]
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,

    /// Wrap this chunk of text. If used, stdin is not read unless "-" is
    /// given explicitly. Can be repeated
    #[arg(short = 't', long = "text", value_name = "TEXT", allow_hyphen_values = true)]
    pub text: Vec<String>,

    /// Maximum line width [default: $COLUMNS, else 80]
    #[arg(short = 'w', long, value_name = "COLUMNS")]
    pub width: Option<usize>,

    /// Indent each line with this text. A number means that many spaces
    #[arg(short = 'i', long, value_name = "TEXT|N", default_value = "", allow_hyphen_values = true)]
    pub indent: String,

    /// Do not indent the first output line
    #[arg(long)]
    pub outdent_first: bool,

    /// Locale used for character widths [default: from the environment]
    #[arg(short = 'l', long, value_name = "TAG")]
    pub locale: Option<String>,

    /// What to do with words longer than the line: visible, clip, or anywhere
    #[arg(long, value_name = "STYLE", default_value = "visible")]
    pub overflow: String,

    /// Appended to clipped words
    #[arg(long, value_name = "TEXT", default_value = "\u{2026}")]
    pub ellipsis: String,

    /// Appended to each piece of a split word
    #[arg(long, value_name = "TEXT", default_value = "-", allow_hyphen_values = true)]
    pub hyphen: String,

    /// Escape output for HTML
    #[arg(long)]
    pub html: bool,

    /// Count styling escape sequences toward the width
    #[arg(long)]
    pub include_styling: bool,

    /// Write to a file instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub out_file: Option<PathBuf>,

    /// Trace every wrapping decision to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// One chunk of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    Text(&'a str),
    Stdin,
    File(&'a Path),
}

impl<'a> Input<'a> {
    /// Read the whole chunk.
    pub fn read(self) -> anyhow::Result<Cow<'a, str>> {
        match self {
            Self::Text(text) => Ok(Cow::Borrowed(text)),
            Self::Stdin => {
                let mut text = String::new();
                io::stdin()
                    .read_to_string(&mut text)
                    .context("reading stdin")?;
                Ok(Cow::Owned(text))
            }
            Self::File(path) => fs::read_to_string(path)
                .map(Cow::Owned)
                .with_context(|| format!("reading {}", path.display())),
        }
    }
}

impl fmt::Display for Input<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(_) => f.write_str("--text"),
            Self::Stdin => f.write_str("<stdin>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Opts {
    /// Inline text first, then files; stdin when neither is given.
    #[must_use]
    pub fn inputs(&self) -> Vec<Input<'_>> {
        let mut inputs: Vec<Input<'_>> = self.text.iter().map(|t| Input::Text(t)).collect();
        inputs.extend(self.files.iter().map(|f| match f.as_str() {
            "-" => Input::Stdin,
            path => Input::File(Path::new(path)),
        }));
        if inputs.is_empty() {
            inputs.push(Input::Stdin);
        }
        inputs
    }

    /// `--width`, else a positive `COLUMNS`, else [`DEFAULT_WIDTH`].
    pub fn resolved_width<F>(&self, get_env: F) -> usize
    where
        F: Fn(&str) -> Option<String>,
    {
        self.width
            .or_else(|| {
                get_env("COLUMNS")
                    .and_then(|c| c.trim().parse::<usize>().ok())
                    .filter(|&c| c > 0)
            })
            .unwrap_or(DEFAULT_WIDTH)
    }

    /// Library options for these flags.
    pub fn wrap_options<F>(&self, get_env: F) -> Result<WrapOptions, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let overflow: Overflow = self.overflow.parse()?;
        let mut opts = WrapOptions::new(self.resolved_width(get_env))
            .indent(Indent::parse(&self.indent))
            .indent_first(!self.outdent_first)
            .locale(self.locale.clone())
            .overflow(overflow)
            .ellipsis(self.ellipsis.clone())
            .hyphen(self.hyphen.clone())
            .include_styling(self.include_styling)
            .line_terminator(EOL)
            .verbose(self.verbose);
        if self.html {
            opts = opts.escape(|s| html_escape(s).into_owned());
        }
        Ok(opts)
    }
}
