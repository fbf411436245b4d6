//! The scoring engine for a single bowling game.
//!
//! A game is stored as one flat, append-only log of pin counts. Frame
//! boundaries, strike/spare status and bonus eligibility are recomputed from
//! that log on every query with a linear scan and bounded lookahead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pins standing at the start of a frame.
pub const PINS_PER_FRAME: u8 = 10;

/// Frames in a regulation game.
pub const FRAMES_PER_GAME: u8 = 10;

/// Roll index where tenth-frame validation takes over, i.e. after nine
/// two-roll frames.
const TENTH_FRAME_ROLL_INDEX: usize = 18;

/// Reasons a roll is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RollError {
    /// The pin count is outside `0..=10`.
    #[error("invalid number of pins: {0} (must be between 0 and 10)")]
    InvalidPinCount(i32),

    /// The game has already finished.
    #[error("game is already over")]
    GameAlreadyOver,

    /// The roll would knock down more pins than are standing in the frame,
    /// or is an extra tenth-frame roll that is not allowed.
    #[error("total pins in a frame cannot exceed 10 ({down} already down, {pins} rolled)")]
    FrameOverflow {
        /// Pins already down in the frame.
        down: u8,
        /// Pins in the refused roll.
        pins: u8,
    },
}

/// How a frame ended, as shown on a scorecard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameMark {
    /// All ten pins on the first delivery.
    Strike,
    /// All ten pins over two deliveries.
    Spare,
    /// Pins left standing after two deliveries.
    Open,
    /// Only the first delivery has been bowled.
    Incomplete,
}

/// One frame of a derived scorecard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameView {
    /// Frame number, `1..=10`.
    pub number: u8,
    /// Deliveries belonging to the frame. The tenth frame carries its bonus
    /// deliveries as well.
    pub rolls: Vec<u8>,
    /// How the frame ended so far.
    pub mark: FrameMark,
    /// Cumulative score through this frame, once it and every earlier frame
    /// can be scored.
    pub running_total: Option<u32>,
}

/// Flat roll log plus the rules that interpret it.
///
/// Serializes as `{ "rolls": [..] }`. Deserialization trusts the stored log
/// and does not replay it through [`ScoringEngine::record_roll`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringEngine {
    #[serde(default)]
    rolls: Vec<u8>,
}

impl ScoringEngine {
    /// Creates an engine with no rolls.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds an engine from a stored roll log without revalidating it.
    #[must_use]
    pub fn from_rolls(rolls: Vec<u8>) -> Self {
        Self { rolls }
    }

    /// The deliveries recorded so far, in order.
    #[must_use]
    pub fn rolls(&self) -> &[u8] {
        &self.rolls
    }

    /// Records one delivery.
    ///
    /// Checks run in a fixed order and the first failure wins; the roll log
    /// is untouched on failure.
    ///
    /// # Errors
    ///
    /// - `RollError::InvalidPinCount` if `pins` is outside `0..=10`.
    /// - `RollError::GameAlreadyOver` if the game has finished.
    /// - `RollError::FrameOverflow` if the frame cannot hold that many pins.
    pub fn record_roll(&mut self, pins: i32) -> Result<(), RollError> {
        let pins = u8::try_from(pins)
            .ok()
            .filter(|&p| p <= PINS_PER_FRAME)
            .ok_or(RollError::InvalidPinCount(pins))?;

        if self.is_game_over() {
            return Err(RollError::GameAlreadyOver);
        }

        self.check_pin_budget(pins)?;
        self.rolls.push(pins);
        Ok(())
    }

    /// Whether the tenth frame has received all of its deliveries.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        let Some(start) = self.tenth_frame_start() else {
            return false;
        };
        let tail = self.rolls.get(start..).unwrap_or(&[]);

        match tail {
            [] | [_] => false,
            [first, second, ..]
                if *first == PINS_PER_FRAME || first.saturating_add(*second) == PINS_PER_FRAME =>
            {
                tail.len() == 3
            }
            _ => tail.len() == 2,
        }
    }

    /// Total score of the frames bowled so far.
    ///
    /// Bonus deliveries that have not happened yet count as zero.
    #[must_use]
    pub fn score(&self) -> u32 {
        let mut total = 0;
        let mut index = 0;

        for _ in 0..FRAMES_PER_GAME {
            if index >= self.rolls.len() {
                break;
            }
            if self.rolls[index] == PINS_PER_FRAME {
                total += u32::from(PINS_PER_FRAME) + self.pins_at(index + 1) + self.pins_at(index + 2);
                index += 1;
            } else {
                let frame = self.pins_at(index) + self.pins_at(index + 1);
                total += frame;
                if frame == u32::from(PINS_PER_FRAME) {
                    total += self.pins_at(index + 2);
                }
                index += 2;
            }
        }

        total
    }

    /// Derives a per-frame scorecard from the roll log.
    #[must_use]
    pub fn frames(&self) -> Vec<FrameView> {
        let mut frames = Vec::with_capacity(usize::from(FRAMES_PER_GAME));
        let mut running = Some(0_u32);
        let mut index = 0;

        for number in 1..=FRAMES_PER_GAME {
            let Some(&first) = self.rolls.get(index) else {
                break;
            };

            // (deliveries in the frame, mark, deliveries that settle its score)
            let (width, mark, scored_by) = if first == PINS_PER_FRAME {
                (1, FrameMark::Strike, 3)
            } else {
                match self.rolls.get(index + 1) {
                    Some(&second) if first.saturating_add(second) == PINS_PER_FRAME => {
                        (2, FrameMark::Spare, 3)
                    }
                    Some(_) => (2, FrameMark::Open, 2),
                    None => (1, FrameMark::Incomplete, 2),
                }
            };

            let frame_score = self
                .rolls
                .get(index..index + scored_by)
                .map(|window| window.iter().copied().map(u32::from).sum::<u32>());
            running = running.zip(frame_score).map(|(sum, frame)| sum + frame);

            let end = if number == FRAMES_PER_GAME {
                self.rolls.len()
            } else {
                index + width
            };

            frames.push(FrameView {
                number,
                rolls: self.rolls[index..end].to_vec(),
                mark,
                running_total: running,
            });
            index += width;
        }

        frames
    }

    fn pins_at(&self, index: usize) -> u32 {
        self.rolls.get(index).copied().map_or(0, u32::from)
    }

    /// Index of the first tenth-frame delivery, if nine frames have started
    /// and been consumed. A strike consumes one delivery and every other
    /// frame two, complete or not.
    fn tenth_frame_start(&self) -> Option<usize> {
        let mut index = 0;
        for _ in 1..FRAMES_PER_GAME {
            let first = *self.rolls.get(index)?;
            index += if first == PINS_PER_FRAME { 1 } else { 2 };
        }
        Some(index)
    }

    /// The first delivery of the frame currently being bowled, if that frame
    /// has exactly one non-strike delivery so far.
    fn pending_first_roll(&self) -> Option<u8> {
        let mut index = 0;
        while let Some(&first) = self.rolls.get(index) {
            if first == PINS_PER_FRAME {
                index += 1;
            } else if index + 1 == self.rolls.len() {
                return Some(first);
            } else {
                index += 2;
            }
        }
        None
    }

    fn check_pin_budget(&self, pins: u8) -> Result<(), RollError> {
        let overflow = |down: u8| {
            if down.saturating_add(pins) > PINS_PER_FRAME {
                Err(RollError::FrameOverflow { down, pins })
            } else {
                Ok(())
            }
        };

        if self.rolls.len() < TENTH_FRAME_ROLL_INDEX {
            return self.pending_first_roll().map_or(Ok(()), overflow);
        }

        match self.rolls[TENTH_FRAME_ROLL_INDEX..] {
            [first] if first != PINS_PER_FRAME => overflow(first),
            [first, second] if first.saturating_add(second) < PINS_PER_FRAME && pins > 0 => {
                Err(RollError::FrameOverflow {
                    down: first + second,
                    pins,
                })
            }
            [PINS_PER_FRAME, second] if second != PINS_PER_FRAME => overflow(second),
            _ => Ok(()),
        }
    }
}
