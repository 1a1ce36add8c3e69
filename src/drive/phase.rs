//! Phase sequencing for the 4-wire coil driver.
//!
//! A fixed cyclic table of energization patterns produces continuous rotation
//! when stepped through in order. One table entry transition is one
//! micro-step, the smallest unit of carriage motion.

/// Direction of carriage travel along the rail.
///
/// There is no "stopped" variant: phase advancement is only meaningful while
/// moving, so "no motion" is expressed as `Option::<Travel>::None` at the
/// control-state level and can never reach [`PhaseTable::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Travel {
    /// Away from the motor (positive position counts).
    Forward,
    /// Toward the motor (negative position counts).
    Backward,
}

impl Travel {
    /// Get the sign multiplier for position bookkeeping.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Travel::Forward => 1,
            Travel::Backward => -1,
        }
    }
}

/// One driver output pattern: the energization state of the four coil lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhasePattern(pub [bool; 4]);

impl PhasePattern {
    /// All coils de-energized.
    pub const RELEASED: Self = Self([false; 4]);

    /// Level for one coil line (IN1..IN4 order).
    #[inline]
    pub fn coil(self, index: usize) -> bool {
        self.0[index]
    }
}

/// The half-step phase table for a unipolar 4-wire driver (ULN2003 class).
///
/// Consecutive entries are one micro-step of rotation apart; walking the
/// table forward or backward with wrap-around yields continuous motion.
pub struct PhaseTable;

impl PhaseTable {
    /// Number of entries in the table.
    pub const LEN: usize = 8;

    /// Half-step energization sequence for IN1..IN4.
    const HALF_STEP: [PhasePattern; Self::LEN] = [
        PhasePattern([true, false, false, false]),
        PhasePattern([true, true, false, false]),
        PhasePattern([false, true, false, false]),
        PhasePattern([false, true, true, false]),
        PhasePattern([false, false, true, false]),
        PhasePattern([false, false, true, true]),
        PhasePattern([false, false, false, true]),
        PhasePattern([true, false, false, true]),
    ];

    /// Look up the pattern at a table index.
    #[inline]
    pub fn pattern(index: usize) -> PhasePattern {
        Self::HALF_STEP[index]
    }

    /// Advance the phase index one micro-step in the given direction.
    ///
    /// Returns the wrapped next index and the pattern to energize for *this*
    /// micro-step (the entry at `index`, before advancing). The caller writes
    /// the pattern to the driver and holds it for the configured dwell time
    /// before the next call; that dwell is the sole determinant of speed.
    #[inline]
    pub fn advance(index: usize, travel: Travel) -> (usize, PhasePattern) {
        debug_assert!(index < Self::LEN);
        let pattern = Self::HALF_STEP[index];
        let next = match travel {
            Travel::Forward => {
                if index + 1 >= Self::LEN {
                    0
                } else {
                    index + 1
                }
            }
            Travel::Backward => {
                if index == 0 {
                    Self::LEN - 1
                } else {
                    index - 1
                }
            }
        };
        (next, pattern)
    }
}
