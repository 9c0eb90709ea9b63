#![forbid(unsafe_code)]

//! Unicode-aware line wrapping.
//!
//! Text flows through four stages, each a pull iterator:
//!
//! 1. [`chunk`] splits the input into [`Break`]s: newline runs become the
//!    replacement string, valid URLs become single verbatim breaks, and
//!    everything else is cut at line-break opportunities by the
//!    whitespace-run aware [`SpaceBreaker`].
//! 2. [`fragment`] measures each break and applies the [`Overflow`] policy
//!    to ones that do not fit the line they start.
//! 3. [`pack`] places breaks greedily, holding whitespace back until the
//!    next word is known to fit. Escape sequences are never split.
//! 4. [`LineWrap`] ties it together and joins the lines.
//!
//! ```
//! use lwrap_text::{LineWrap, Overflow, WrapOptions};
//!
//! let lw = LineWrap::new(
//!     WrapOptions::new(8)
//!         .overflow(Overflow::Anywhere)
//!         .cjk(Some(false)),
//! )
//! .unwrap();
//! assert_eq!(lw.wrap("see abcdefghijkl"), "see\nabcdefg-\nhijkl");
//! ```

pub mod chunk;
pub mod fragment;
pub mod options;
pub mod pack;
pub mod space;
pub mod wrap;

pub use chunk::{Chunker, Chunks, is_valid_url};
pub use fragment::{Fragment, FragmentSizer, Fragments};
pub use options::{Config, ConfigError, DEFAULT_NEWLINE, EscapeFn, Indent, Overflow, WrapOptions};
pub use pack::{Lines, PackObserver, Placement, TraceObserver};
pub use space::{Break, SpaceBreaker, SpaceBreaks, SpaceRun};
pub use wrap::{LineWrap, html_escape, wrap};
