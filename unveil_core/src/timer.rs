// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generation-tagged one-shot timers.
//!
//! The scheduler never owns a clock callback. Instead it asks the host to arm
//! a timer and receives a [`TimerToken`] back in an
//! [`Event::Timer`](crate::scheduler::Event::Timer) when it fires. Re-arming a
//! kind bumps its generation, so a firing that was already in flight when the
//! timer was restarted carries an old generation and is discarded. This is how
//! debouncing works even on hosts whose cancellation is racy.

/// The independent timers the scheduler may arm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerKind {
    /// Scroll debounce; firing ends the scroll state and resumes draining.
    ScrollQuiet,
    /// Wheel-gesture debounce.
    WheelQuiet,
    /// Spacing between consecutive reveal batches.
    BatchGap,
    /// Trailing parallax update after throttled scroll ticks.
    ParallaxTrailing,
}

impl TimerKind {
    /// All timer kinds.
    pub const ALL: [Self; 4] = [
        Self::ScrollQuiet,
        Self::WheelQuiet,
        Self::BatchGap,
        Self::ParallaxTrailing,
    ];

    const fn index(self) -> usize {
        match self {
            Self::ScrollQuiet => 0,
            Self::WheelQuiet => 1,
            Self::BatchGap => 2,
            Self::ParallaxTrailing => 3,
        }
    }

    const fn from_index(index: u64) -> Option<Self> {
        match index {
            0 => Some(Self::ScrollQuiet),
            1 => Some(Self::WheelQuiet),
            2 => Some(Self::BatchGap),
            3 => Some(Self::ParallaxTrailing),
            _ => None,
        }
    }
}

/// Identifies one arming of a timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerToken {
    /// Which timer.
    pub kind: TimerKind,
    /// Arming generation for `kind`.
    pub generation: u32,
}

impl TimerToken {
    /// Packs the token into an integer that survives a round trip through a
    /// JS number (kind in the high bits, generation in the low 32).
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        ((self.kind.index() as u64) << 32) | self.generation as u64
    }

    /// Unpacks a token produced by [`to_bits`](Self::to_bits).
    #[must_use]
    pub const fn from_bits(bits: u64) -> Option<Self> {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "masked to the low 32 bits"
        )]
        let generation = (bits & 0xFFFF_FFFF) as u32;
        match TimerKind::from_index(bits >> 32) {
            Some(kind) => Some(Self { kind, generation }),
            None => None,
        }
    }
}

/// Per-kind generation counters and armed flags.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct TimerSlots {
    generations: [u32; 4],
    armed: [bool; 4],
}

impl TimerSlots {
    /// Arms `kind`, returning the new token and the token it superseded (if
    /// that one was still armed).
    pub(crate) fn arm(&mut self, kind: TimerKind) -> (TimerToken, Option<TimerToken>) {
        let i = kind.index();
        let previous = self.armed[i].then_some(TimerToken {
            kind,
            generation: self.generations[i],
        });
        self.generations[i] = self.generations[i].wrapping_add(1);
        self.armed[i] = true;
        (
            TimerToken {
                kind,
                generation: self.generations[i],
            },
            previous,
        )
    }

    /// Returns `true` if `kind` is armed.
    pub(crate) fn is_armed(&self, kind: TimerKind) -> bool {
        self.armed[kind.index()]
    }

    /// Consumes a firing. Returns `true` if `token` is the live arming of its
    /// kind; stale firings return `false` and change nothing.
    pub(crate) fn settle(&mut self, token: TimerToken) -> bool {
        let i = token.kind.index();
        if self.armed[i] && self.generations[i] == token.generation {
            self.armed[i] = false;
            true
        } else {
            false
        }
    }

    /// Disarms `kind`, returning the token to cancel if it was armed.
    pub(crate) fn disarm(&mut self, kind: TimerKind) -> Option<TimerToken> {
        let i = kind.index();
        if !self.armed[i] {
            return None;
        }
        self.armed[i] = false;
        Some(TimerToken {
            kind,
            generation: self.generations[i],
        })
    }
}
