//! Heuristic pattern tables.
//!
//! Every keyword heuristic the analyzer uses lives here as data: a label
//! mapped to a list of case-insensitive regexes. Control flow elsewhere only
//! asks "how many patterns of label X match this text".

use once_cell::sync::Lazy;
use regex::Regex;

use super::outcome::CallOutcome;
use super::phase::CallPhase;
use super::sentiment::Sentiment;

/// Label → compiled patterns.
#[derive(Debug)]
pub struct PatternTable<L> {
    entries: Vec<(L, Vec<Regex>)>,
}

impl<L: Copy + PartialEq> PatternTable<L> {
    /// Compiles a static table. Patterns are matched case-insensitively.
    ///
    /// # Panics
    ///
    /// Panics if a pattern is not a valid regex. Tables are compile-time
    /// literals, so this only fires on a programming error.
    pub fn compile(table: &[(L, &[&str])]) -> Self {
        let entries = table
            .iter()
            .map(|(label, patterns)| {
                let compiled = patterns
                    .iter()
                    .map(|p| Regex::new(&format!("(?i){}", p)).expect("static pattern compiles"))
                    .collect();
                (*label, compiled)
            })
            .collect();
        Self { entries }
    }

    /// Labels in table order.
    pub fn labels(&self) -> impl Iterator<Item = L> + '_ {
        self.entries.iter().map(|(label, _)| *label)
    }

    /// Number of distinct patterns under `label` that match `text`.
    pub fn count_matches(&self, label: L, text: &str) -> usize {
        self.entries
            .iter()
            .filter(|(l, _)| *l == label)
            .flat_map(|(_, patterns)| patterns.iter())
            .filter(|p| p.is_match(text))
            .count()
    }

    /// True if any pattern under `label` matches.
    pub fn matches(&self, label: L, text: &str) -> bool {
        self.count_matches(label, text) > 0
    }
}

/// Call-stage vocabulary. Table order doubles as the same-turn tie-break
/// priority (later entries win).
pub static PHASE_PATTERNS: Lazy<PatternTable<CallPhase>> = Lazy::new(|| {
    PatternTable::compile(&[
        (
            CallPhase::Rapport,
            &[
                r"\bhow are you\b",
                r"\bhow('s| is| was| has) (your|the) (day|week|weekend|morning|trip|vacation|holiday)",
                r"\bnice to (meet|talk|speak)\b",
                r"\bthanks for (taking|making) the time\b",
                r"\bgood (morning|afternoon|evening)\b",
            ],
        ),
        (
            CallPhase::Discovery,
            &[
                r"\bwhat (are|is) your (biggest |main |top )?(challenges?|priorit(y|ies)|goals?)\b",
                r"\btell me (more )?about\b",
                r"\bhow do you (currently|handle|manage)\b",
                r"\bwhat('s| is) (not )?working\b",
                r"\bpain points?\b",
                r"\bcurrently using\b",
            ],
        ),
        (
            CallPhase::Presentation,
            &[
                r"\bour (product|platform|solution|service)\b",
                r"\blet me (show|walk you through)\b",
                r"\bfeatures?\b",
                r"\bdemo\b",
                r"\bit (helps|allows|lets) you\b",
            ],
        ),
        (
            CallPhase::ObjectionHandling,
            &[
                r"\bconcerned about\b",
                r"\btoo expensive\b",
                r"\bnot sure (if|about|that)\b",
                r"\bworried\b",
                r"\bwe already (have|use)\b",
                r"\bout of (our )?budget\b",
            ],
        ),
        (
            CallPhase::Closing,
            &[
                r"\bsign(ed|ing)?\b",
                r"\bsend (over )?the contract\b",
                r"\bmove forward\b",
                r"\bnext steps?\b",
                r"\bget started\b",
                r"\bpurchase order\b",
            ],
        ),
    ])
});

/// Personal small talk, checked on both sides of a mirrored exchange.
pub static SMALL_TALK_PATTERNS: Lazy<PatternTable<()>> = Lazy::new(|| {
    PatternTable::compile(&[(
        (),
        &[
            r"\bhow are you\b",
            r"\bhow('s| is| was| has) (your|the) (day|week|weekend|morning|trip|vacation|holiday)",
            r"\bhow('s| has) it been going\b",
            r"\bhow about you\b",
            r"\band you\?",
            r"\bdoing (well|good|great|fine)\b",
            r"\b(good|great|lovely|relaxing) weekend\b",
        ],
    )])
});

/// Buyer signals that resolve the call.
pub static OUTCOME_PATTERNS: Lazy<PatternTable<CallOutcome>> = Lazy::new(|| {
    PatternTable::compile(&[
        (
            CallOutcome::Commit,
            &[
                r"\bsign(ed|ing)?\b",
                r"\bmove forward\b",
                r"\blet'?s do (it|this)\b",
                r"\bsend (me |us )?(over )?the (contract|paperwork|agreement)\b",
                r"\bready to (buy|purchase|sign|start|commit)\b",
                r"\bwe('re| are) in\b",
                r"\bit'?s a deal\b",
            ],
        ),
        (
            CallOutcome::FollowUp,
            &[
                r"\bfollow[- ]?up\b",
                r"\bsend me (some )?(more )?(info|information|details|a proposal)\b",
                r"\bcircle back\b",
                r"\b(talk|check) (to|with) my (team|boss|manager|partner|cfo)\b",
                r"\bnext (week|month|quarter)\b",
                r"\bschedule (a|another) (call|meeting|demo)\b",
                r"\bthink (it|this) over\b",
                r"\blet me think\b",
            ],
        ),
        (
            CallOutcome::NoFit,
            &[
                r"\bnot (a )?(good |great )?fit\b",
                r"\bnot interested\b",
                r"\bno,? thank(s| you)\b",
                r"\bdon'?t need\b",
                r"\bwe('ll| will) pass\b",
                r"\bnot for us\b",
                r"\bcan'?t afford\b",
            ],
        ),
    ])
});

/// Lexicon for coarse buyer sentiment.
pub static SENTIMENT_PATTERNS: Lazy<PatternTable<Sentiment>> = Lazy::new(|| {
    PatternTable::compile(&[
        (
            Sentiment::Positive,
            &[
                r"\bgreat\b",
                r"\blove\b",
                r"\bexcellent\b",
                r"\bperfect\b",
                r"\bhelpful\b",
                r"\binterest(ed|ing)\b",
                r"\bsounds good\b",
                r"\bthank(s| you)\b",
                r"\bexcit(ed|ing)\b",
            ],
        ),
        (
            Sentiment::Negative,
            &[
                r"\bnot interested\b",
                r"\btoo expensive\b",
                r"\bfrustrat",
                r"\bannoy",
                r"\bwast(e|ing)\b",
                r"\bdisappoint",
                r"\bdon'?t like\b",
                r"\bunhappy\b",
                r"\bconcern(ed|s)?\b",
            ],
        ),
    ])
});
