//! The ordered, editable rule table.
//!
//! Each rule is a plain function over [`BreakState`]. Evaluation asks the
//! rules in order and the first verdict other than [`Opportunity::Pass`]
//! decides the boundary. Overlays customize behavior by inserting rules in
//! front of a named rule or by replacing one, leaving the rest untouched.

use std::fmt;

use unicode_width::UnicodeWidthChar;

use crate::breaks::Breaks;
use crate::class::LineClass::{self, *};
use crate::state::{BreakState, Opportunity};

/// A single break rule.
pub type Rule<E> = fn(&mut BreakState<E>) -> Opportunity;

/// Errors from editing a rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// No rule with this name is registered.
    UnknownRule(String),
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRule(name) => write!(f, "unknown line-break rule '{name}'"),
        }
    }
}

impl std::error::Error for RuleError {}

/// Named rules in evaluation order.
pub struct Rules<E = ()> {
    table: Vec<(&'static str, Rule<E>)>,
}

impl<E> Clone for Rules<E> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<E> fmt::Debug for Rules<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rules").field("names", &self.names()).finish()
    }
}

impl<E> Default for Rules<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Rules<E> {
    /// The standard table.
    #[must_use]
    pub fn new() -> Self {
        Self { table: Vec::new() }
            .with("LB02", lb02)
            .with("LB03", lb03)
            .with("LB04", lb04)
            .with("LB05", lb05)
            .with("LB06", lb06)
            .with("LBspacesStop", lb_spaces_stop)
            .with("LB07", lb07)
            .with("LB08", lb08)
            .with("LB08a", lb08a)
            .with("LB09", lb09)
            .with("LB11", lb11)
            .with("LB12", lb12)
            .with("LB12a", lb12a)
            .with("LB13", lb13)
            .with("LB14", lb14)
            .with("LB15", lb15)
            .with("LB16", lb16)
            .with("LB17", lb17)
            .with("LB18", lb18)
            .with("LB19", lb19)
            .with("LB20", lb20)
            .with("LB21", lb21)
            .with("LB21a", lb21a)
            .with("LB21b", lb21b)
            .with("LB22", lb22)
            .with("LB23", lb23)
            .with("LB23a", lb23a)
            .with("LB24", lb24)
            .with("LB25", lb25)
            .with("LB26", lb26)
            .with("LB27", lb27)
            .with("LB28", lb28)
            .with("LB29", lb29)
            .with("LB30", lb30)
            .with("LB30a", lb30a)
            .with("LB30b", lb30b)
            .with("LB31", lb31)
    }

    fn with(mut self, name: &'static str, rule: Rule<E>) -> Self {
        self.table.push((name, rule));
        self
    }

    fn index_of(&self, name: &str) -> Result<usize, RuleError> {
        self.table
            .iter()
            .position(|(n, _)| *n == name)
            .ok_or_else(|| RuleError::UnknownRule(name.to_string()))
    }

    /// Insert `rule` under `name` directly in front of the rule `before`.
    pub fn insert_before(
        &mut self,
        before: &str,
        name: &'static str,
        rule: Rule<E>,
    ) -> Result<(), RuleError> {
        let idx = self.index_of(before)?;
        self.table.insert(idx, (name, rule));
        Ok(())
    }

    /// Swap the body of rule `name`, keeping its slot and name.
    pub fn replace(&mut self, name: &str, rule: Rule<E>) -> Result<(), RuleError> {
        let idx = self.index_of(name)?;
        self.table[idx].1 = rule;
        Ok(())
    }

    /// Rule names in evaluation order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.table.iter().map(|(n, _)| *n).collect()
    }

    /// Verdict for the boundary described by `state`.
    ///
    /// Falls back to a permitted break when every rule passes.
    pub fn evaluate(&self, state: &mut BreakState<E>) -> Opportunity {
        for (_, rule) in &self.table {
            let op = rule(state);
            if op != Opportunity::Pass {
                return op;
            }
        }
        Opportunity::MayBreak
    }

    /// Lazily find the break opportunities of `text`.
    pub fn breaks<'r, 'a>(&'r self, text: &'a str) -> Breaks<'r, 'a, E>
    where
        E: Default,
    {
        Breaks::new(self, text)
    }
}

use Opportunity::{MayBreak, MustBreak, NoBreak, Pass};

#[inline]
fn verdict(hit: bool, op: Opportunity) -> Opportunity {
    if hit { op } else { Pass }
}

#[inline]
fn pair_matches<E>(s: &BreakState<E>, f: impl Fn(LineClass, LineClass) -> bool) -> bool {
    s.pair().is_some_and(|(a, b)| f(a, b))
}

fn is_east_asian_wide(ch: char) -> bool {
    ch.width() == Some(2)
}

// LB2: × sot
fn lb02<E>(s: &mut BreakState<E>) -> Opportunity {
    verdict(s.cur.is_none(), NoBreak)
}

// LB3: ! eot
fn lb03<E>(s: &mut BreakState<E>) -> Opportunity {
    verdict(s.next.is_none(), MustBreak)
}

// LB4: BK !
fn lb04<E>(s: &mut BreakState<E>) -> Opportunity {
    verdict(s.cur_class() == Some(BK), MustBreak)
}

// LB5: CR × LF, (CR | LF | NL) !
fn lb05<E>(s: &mut BreakState<E>) -> Opportunity {
    match (s.cur_class(), s.next_class()) {
        (Some(CR), Some(LF)) => NoBreak,
        (Some(CR | LF | NL), _) => MustBreak,
        _ => Pass,
    }
}

// LB6: × (BK | CR | LF | NL)
fn lb06<E>(s: &mut BreakState<E>) -> Opportunity {
    verdict(s.next_class().is_some_and(LineClass::is_hard_break), NoBreak)
}

// Inside a transparent space run, hold until the run ends.
fn lb_spaces_stop<E>(s: &mut BreakState<E>) -> Opportunity {
    verdict(s.spaces && s.next_class() == Some(SP), NoBreak)
}

// LB7: × SP, × ZW
fn lb07<E>(s: &mut BreakState<E>) -> Opportunity {
    verdict(matches!(s.next_class(), Some(SP | ZW)), NoBreak)
}

// LB8: ZW SP* ÷
fn lb08<E>(s: &mut BreakState<E>) -> Opportunity {
    if s.cur_class() != Some(ZW) {
        return Pass;
    }
    if s.next_class() == Some(SP) { NoBreak } else { MayBreak }
}

// LB8a: ZWJ ×
fn lb08a<E>(s: &mut BreakState<E>) -> Opportunity {
    verdict(s.direct().is_some_and(|c| c.ch == '\u{200D}'), NoBreak)
}

// LB9: X (CM | ZWJ)* → X
fn lb09<E>(s: &mut BreakState<E>) -> Opportunity {
    verdict(matches!(s.next_class(), Some(CM | ZWJ)), NoBreak)
}

// LB11: × WJ, WJ ×
fn lb11<E>(s: &mut BreakState<E>) -> Opportunity {
    let hit = s.next_class() == Some(WJ) || s.direct().is_some_and(|c| c.cls == WJ);
    verdict(hit, NoBreak)
}

// LB12: GL ×
fn lb12<E>(s: &mut BreakState<E>) -> Opportunity {
    verdict(s.direct().is_some_and(|c| c.cls == GL), NoBreak)
}

// LB12a: [^SP BA HY] × GL
fn lb12a<E>(s: &mut BreakState<E>) -> Opportunity {
    if s.next_class() != Some(GL) || s.spaces {
        return Pass;
    }
    verdict(!matches!(s.cur_class(), Some(SP | BA | HY)), NoBreak)
}

// LB13: × CL, × CP, × EX, × IS, × SY
fn lb13<E>(s: &mut BreakState<E>) -> Opportunity {
    verdict(matches!(s.next_class(), Some(CL | CP | EX | IS | SY)), NoBreak)
}

// LB14: OP SP* ×
fn lb14<E>(s: &mut BreakState<E>) -> Opportunity {
    verdict(s.cur_class() == Some(OP), NoBreak)
}

// LB15: QU SP* × OP
fn lb15<E>(s: &mut BreakState<E>) -> Opportunity {
    let hit = s.cur_class() == Some(QU) && matches!(s.next_class(), Some(OP | SP));
    verdict(hit, NoBreak)
}

// LB16: (CL | CP) SP* × NS
fn lb16<E>(s: &mut BreakState<E>) -> Opportunity {
    let hit = matches!(s.cur_class(), Some(CL | CP)) && matches!(s.next_class(), Some(NS | SP));
    verdict(hit, NoBreak)
}

// LB17: B2 SP* × B2
fn lb17<E>(s: &mut BreakState<E>) -> Opportunity {
    let hit = s.cur_class() == Some(B2) && matches!(s.next_class(), Some(B2 | SP));
    verdict(hit, NoBreak)
}

// LB18: SP ÷
fn lb18<E>(s: &mut BreakState<E>) -> Opportunity {
    verdict(s.spaces || s.cur_class() == Some(SP), MayBreak)
}

// LB19: × QU, QU ×
fn lb19<E>(s: &mut BreakState<E>) -> Opportunity {
    verdict(pair_matches(s, |a, b| a == QU || b == QU), NoBreak)
}

// LB20: ÷ CB, CB ÷
fn lb20<E>(s: &mut BreakState<E>) -> Opportunity {
    verdict(pair_matches(s, |a, b| a == CB || b == CB), MayBreak)
}

// LB21: × BA, × HY, × NS, BB ×
fn lb21<E>(s: &mut BreakState<E>) -> Opportunity {
    let hit = pair_matches(s, |a, b| matches!(b, BA | HY | NS) || a == BB);
    verdict(hit, NoBreak)
}

// LB21a: HL (HY | BA) ×
fn lb21a<E>(s: &mut BreakState<E>) -> Opportunity {
    let hit = s.prev == Some(HL) && pair_matches(s, |a, _| matches!(a, HY | BA));
    verdict(hit, NoBreak)
}

// LB21b: SY × HL
fn lb21b<E>(s: &mut BreakState<E>) -> Opportunity {
    verdict(pair_matches(s, |a, b| a == SY && b == HL), NoBreak)
}

// LB22: × IN
fn lb22<E>(s: &mut BreakState<E>) -> Opportunity {
    verdict(pair_matches(s, |_, b| b == IN), NoBreak)
}

// LB23: (AL | HL) × NU, NU × (AL | HL)
fn lb23<E>(s: &mut BreakState<E>) -> Opportunity {
    let hit = pair_matches(s, |a, b| {
        matches!((a, b), (AL | HL, NU) | (NU, AL | HL))
    });
    verdict(hit, NoBreak)
}

// LB23a: PR × (ID | EB | EM), (ID | EB | EM) × PO
fn lb23a<E>(s: &mut BreakState<E>) -> Opportunity {
    let hit = pair_matches(s, |a, b| {
        matches!((a, b), (PR, ID | EB | EM) | (ID | EB | EM, PO))
    });
    verdict(hit, NoBreak)
}

// LB24: (PR | PO) × (AL | HL), (AL | HL) × (PR | PO)
fn lb24<E>(s: &mut BreakState<E>) -> Opportunity {
    let hit = pair_matches(s, |a, b| {
        matches!((a, b), (PR | PO, AL | HL) | (AL | HL, PR | PO))
    });
    verdict(hit, NoBreak)
}

// LB25, pairwise form.
fn lb25<E>(s: &mut BreakState<E>) -> Opportunity {
    let hit = pair_matches(s, |a, b| {
        matches!(
            (a, b),
            (CL | CP | NU, PO | PR) | (PO | PR, OP | NU) | (HY | IS | NU | SY, NU)
        )
    });
    verdict(hit, NoBreak)
}

// LB26: Korean syllable blocks.
fn lb26<E>(s: &mut BreakState<E>) -> Opportunity {
    let hit = pair_matches(s, |a, b| {
        matches!(
            (a, b),
            (JL, JL | JV | H2 | H3) | (JV | H2, JV | JT) | (JT | H3, JT)
        )
    });
    verdict(hit, NoBreak)
}

// LB27: Korean syllable blocks with prefix and postfix numerics.
fn lb27<E>(s: &mut BreakState<E>) -> Opportunity {
    let hit = pair_matches(s, |a, b| {
        matches!(
            (a, b),
            (JL | JV | JT | H2 | H3, PO) | (PR, JL | JV | JT | H2 | H3)
        )
    });
    verdict(hit, NoBreak)
}

// LB28: (AL | HL) × (AL | HL)
fn lb28<E>(s: &mut BreakState<E>) -> Opportunity {
    verdict(pair_matches(s, |a, b| matches!((a, b), (AL | HL, AL | HL))), NoBreak)
}

// LB29: IS × (AL | HL)
fn lb29<E>(s: &mut BreakState<E>) -> Opportunity {
    verdict(pair_matches(s, |a, b| a == IS && matches!(b, AL | HL)), NoBreak)
}

// LB30: (AL | HL | NU) × OP, CP × (AL | HL | NU), narrow brackets only.
fn lb30<E>(s: &mut BreakState<E>) -> Opportunity {
    let (Some(cur), Some(next)) = (s.direct(), s.next) else {
        return Pass;
    };
    let hit = match (cur.cls, next.cls) {
        (AL | HL | NU, OP) => !is_east_asian_wide(next.ch),
        (CP, AL | HL | NU) => !is_east_asian_wide(cur.ch),
        _ => false,
    };
    verdict(hit, NoBreak)
}

// LB30a: RI × RI, in pairs.
fn lb30a<E>(s: &mut BreakState<E>) -> Opportunity {
    let hit = pair_matches(s, |a, b| a == RI && b == RI) && s.ri_count % 2 == 1;
    verdict(hit, NoBreak)
}

// LB30b: EB × EM
fn lb30b<E>(s: &mut BreakState<E>) -> Opportunity {
    verdict(pair_matches(s, |a, b| a == EB && b == EM), NoBreak)
}

// LB31: ÷
fn lb31<E>(_s: &mut BreakState<E>) -> Opportunity {
    MayBreak
}
