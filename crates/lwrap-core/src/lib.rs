#![forbid(unsafe_code)]

//! Core: display width measurement for lwrap.
//!
//! # Role in lwrap
//! `lwrap-core` is the measuring layer. Everything that needs to know how
//! many terminal cells a piece of text occupies goes through
//! [`text_width::TextWidth`], so chunk sizing and line packing in
//! `lwrap-text` agree on every column.
//!
//! # Primary responsibilities
//! - **Cell width**: grapheme-cluster aware widths, with an East Asian
//!   Ambiguous policy selected from the locale.
//! - **Escape sequences**: CSI/OSC/DCS sequences are zero-width and atomic
//!   unless styling is explicitly counted.
//! - **Slicing**: longest-prefix truncation and budgeted splitting that never
//!   cut through a cluster or an escape sequence.

pub mod escape;
pub mod text_width;

pub use text_width::{BreakAt, Cluster, Clusters, Slice, TextWidth, WidthPolicy};
