//! UAX #14 line-break classes.

use unicode_linebreak::{BreakClass, break_property};

/// Line-break class of a code point, using the UAX #14 abbreviations.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineClass {
    BK,
    CR,
    LF,
    CM,
    NL,
    SG,
    WJ,
    ZW,
    GL,
    SP,
    ZWJ,
    B2,
    BA,
    BB,
    HY,
    CB,
    CL,
    CP,
    EX,
    IN,
    NS,
    OP,
    QU,
    IS,
    NU,
    PO,
    PR,
    SY,
    AI,
    AL,
    CJ,
    EB,
    EM,
    H2,
    H3,
    HL,
    ID,
    JL,
    JV,
    JT,
    RI,
    SA,
    XX,
}

impl LineClass {
    /// Raw class of `ch` from the Unicode tables.
    #[inline]
    #[must_use]
    pub fn of(ch: char) -> Self {
        Self::from(break_property(ch as u32))
    }

    /// Class after LB1 resolution: AI, SG, XX and SA become AL; CJ becomes NS.
    #[inline]
    #[must_use]
    pub const fn resolved(self) -> Self {
        match self {
            Self::AI | Self::SG | Self::XX | Self::SA => Self::AL,
            Self::CJ => Self::NS,
            other => other,
        }
    }

    /// Hard line terminators (BK, CR, LF, NL).
    #[inline]
    #[must_use]
    pub const fn is_hard_break(self) -> bool {
        matches!(self, Self::BK | Self::CR | Self::LF | Self::NL)
    }

    /// Classes a following combining mark cannot attach to (LB9).
    #[inline]
    #[must_use]
    pub const fn rejects_combining(self) -> bool {
        self.is_hard_break() || matches!(self, Self::SP | Self::ZW)
    }
}

impl From<BreakClass> for LineClass {
    #[allow(unreachable_patterns)]
    fn from(class: BreakClass) -> Self {
        match class {
            BreakClass::Mandatory => Self::BK,
            BreakClass::CarriageReturn => Self::CR,
            BreakClass::LineFeed => Self::LF,
            BreakClass::CombiningMark => Self::CM,
            BreakClass::NextLine => Self::NL,
            BreakClass::Surrogate => Self::SG,
            BreakClass::WordJoiner => Self::WJ,
            BreakClass::ZeroWidthSpace => Self::ZW,
            BreakClass::NonBreakingGlue => Self::GL,
            BreakClass::Space => Self::SP,
            BreakClass::ZeroWidthJoiner => Self::ZWJ,
            BreakClass::BeforeAndAfter => Self::B2,
            BreakClass::After => Self::BA,
            BreakClass::Before => Self::BB,
            BreakClass::Hyphen => Self::HY,
            BreakClass::Contingent => Self::CB,
            BreakClass::ClosePunctuation => Self::CL,
            BreakClass::CloseParenthesis => Self::CP,
            BreakClass::Exclamation => Self::EX,
            BreakClass::Inseparable => Self::IN,
            BreakClass::NonStarter => Self::NS,
            BreakClass::OpenPunctuation => Self::OP,
            BreakClass::Quotation => Self::QU,
            BreakClass::InfixSeparator => Self::IS,
            BreakClass::Numeric => Self::NU,
            BreakClass::Postfix => Self::PO,
            BreakClass::Prefix => Self::PR,
            BreakClass::Symbol => Self::SY,
            BreakClass::Ambiguous => Self::AI,
            BreakClass::Alphabetic => Self::AL,
            BreakClass::ConditionalJapaneseStarter => Self::CJ,
            BreakClass::EmojiBase => Self::EB,
            BreakClass::EmojiModifier => Self::EM,
            BreakClass::HangulLvSyllable => Self::H2,
            BreakClass::HangulLvtSyllable => Self::H3,
            BreakClass::HebrewLetter => Self::HL,
            BreakClass::Ideographic => Self::ID,
            BreakClass::HangulLJamo => Self::JL,
            BreakClass::HangulVJamo => Self::JV,
            BreakClass::HangulTJamo => Self::JT,
            BreakClass::RegionalIndicator => Self::RI,
            BreakClass::ComplexContext => Self::SA,
            BreakClass::Unknown => Self::XX,
            _ => Self::XX,
        }
    }
}
