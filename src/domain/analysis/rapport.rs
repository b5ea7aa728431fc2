//! Rapport scoring from mirrored small talk.

use crate::domain::transcript::Speaker;

use super::patterns::SMALL_TALK_PATTERNS;

/// Upper bound of the rapport scale.
pub const MAX_RAPPORT: u8 = 5;

/// Rapport scoring functions.
pub struct RapportScorer;

impl RapportScorer {
    /// Counts mirrored small-talk exchanges in a sequence of turns.
    ///
    /// # Algorithm
    /// A user turn that matches the small-talk table arms the next
    /// counterpart turn. If that counterpart turn also matches, the exchange
    /// counts once. Any later user turn re-arms or disarms. Coach turns are
    /// ignored. The result is `prior` plus exchanges, clamped to
    /// `[0, MAX_RAPPORT]` and never below `prior`.
    pub fn score<'a, I>(turns: I, prior: u8) -> u8
    where
        I: IntoIterator<Item = (Speaker, &'a str)>,
    {
        let mut exchanges: u32 = 0;
        let mut armed = false;

        for (speaker, text) in turns {
            match speaker {
                Speaker::User => armed = SMALL_TALK_PATTERNS.matches((), text),
                Speaker::Counterpart => {
                    if armed && SMALL_TALK_PATTERNS.matches((), text) {
                        exchanges += 1;
                    }
                    armed = false;
                }
                Speaker::Coach => {}
            }
        }

        let floor = prior.min(MAX_RAPPORT);
        let total = exchanges.min(MAX_RAPPORT as u32) as u8;
        floor.max(total).min(MAX_RAPPORT)
    }

    /// Agreeableness multiplier for the simulated buyer.
    ///
    /// ≤1 → 0.6, 2–3 → 1.0, ≥4 → 1.4.
    pub fn cooperation_factor(score: u8) -> f64 {
        match score {
            0..=1 => 0.6,
            2..=3 => 1.0,
            _ => 1.4,
        }
    }
}
