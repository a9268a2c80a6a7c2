//! # Timelock Schedule
//!
//! Seven stage offsets relative to the escrow's deployment time.
//!
//! ## Stages
//!
//! | Stage | Opens |
//! |-------|-------|
//! | `SrcWithdrawal` | taker may claim the source escrow |
//! | `SrcPublicWithdrawal` | anyone may claim the source escrow |
//! | `SrcCancellation` | maker may cancel the source escrow |
//! | `SrcPublicCancellation` | anyone may cancel the source escrow |
//! | `DstWithdrawal` | taker may claim the destination escrow |
//! | `DstPublicWithdrawal` | anyone may claim the destination escrow |
//! | `DstCancellation` | taker may cancel the destination escrow |
//!
//! A stage is reached when `now >= deployed_at + offset`.
//!
//! ## Wire Format
//!
//! 32 bytes: seven big-endian `u32` offsets in stage order (bytes 0..28),
//! then the big-endian deployment time (bytes 28..32).

use serde::{Deserialize, Serialize};
use shared_types::EscrowSide;
use std::fmt;

use super::errors::EscrowError;

/// Number of timelock stages.
pub const STAGE_COUNT: usize = 7;

/// Packed schedule length in bytes.
pub const PACKED_TIMELOCKS_LEN: usize = 32;

/// Named time boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimelockStage {
    /// Private claim on the source escrow.
    SrcWithdrawal = 0,
    /// Public claim on the source escrow.
    SrcPublicWithdrawal = 1,
    /// Private cancel on the source escrow.
    SrcCancellation = 2,
    /// Public cancel on the source escrow.
    SrcPublicCancellation = 3,
    /// Private claim on the destination escrow.
    DstWithdrawal = 4,
    /// Public claim on the destination escrow.
    DstPublicWithdrawal = 5,
    /// Cancel on the destination escrow.
    DstCancellation = 6,
}

impl TimelockStage {
    /// All stages in packing order.
    pub const ALL: [TimelockStage; STAGE_COUNT] = [
        Self::SrcWithdrawal,
        Self::SrcPublicWithdrawal,
        Self::SrcCancellation,
        Self::SrcPublicCancellation,
        Self::DstWithdrawal,
        Self::DstPublicWithdrawal,
        Self::DstCancellation,
    ];

    /// Position in the packed schedule.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Private claim stage of `side`.
    pub fn withdrawal(side: EscrowSide) -> Self {
        match side {
            EscrowSide::Source => Self::SrcWithdrawal,
            EscrowSide::Destination => Self::DstWithdrawal,
        }
    }

    /// Public claim stage of `side`.
    pub fn public_withdrawal(side: EscrowSide) -> Self {
        match side {
            EscrowSide::Source => Self::SrcPublicWithdrawal,
            EscrowSide::Destination => Self::DstPublicWithdrawal,
        }
    }

    /// Cancellation stage of `side`. Ends both claim windows.
    pub fn cancellation(side: EscrowSide) -> Self {
        match side {
            EscrowSide::Source => Self::SrcCancellation,
            EscrowSide::Destination => Self::DstCancellation,
        }
    }
}

impl fmt::Display for TimelockStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Stage offsets plus the base time they are measured from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timelocks {
    /// Deployment time, set by the factory at creation.
    pub deployed_at: u32,
    offsets: [u32; STAGE_COUNT],
}

impl Timelocks {
    /// Schedule from offsets in stage order, not yet deployed.
    pub fn new(offsets: [u32; STAGE_COUNT]) -> Self {
        Self {
            deployed_at: 0,
            offsets,
        }
    }

    /// Default schedule spanning `window` seconds.
    ///
    /// Both sides open their private claim after `window / 8`. The
    /// destination cancels at `4/8`, one unit before the source does, so a
    /// resolver has `window / 8` seconds to open the destination escrow.
    pub fn from_window(window: u32) -> Result<Self, EscrowError> {
        let unit = window / 8;
        if unit == 0 {
            return Err(EscrowError::InvalidImmutables("timelock window too short"));
        }
        let schedule = Self::new([
            unit,
            3 * unit,
            5 * unit,
            6 * unit,
            unit,
            2 * unit,
            4 * unit,
        ]);
        schedule.validate_ordering()?;
        Ok(schedule)
    }

    /// Same schedule with a new deployment time.
    pub fn with_deployed_at(mut self, deployed_at: u32) -> Self {
        self.deployed_at = deployed_at;
        self
    }

    /// Same schedule with one stage offset replaced.
    pub fn with_offset(mut self, stage: TimelockStage, offset: u32) -> Self {
        self.offsets[stage.index()] = offset;
        self
    }

    /// Offset of `stage` in seconds.
    pub fn offset(&self, stage: TimelockStage) -> u32 {
        self.offsets[stage.index()]
    }

    /// Absolute time at which `stage` opens.
    pub fn get(&self, stage: TimelockStage) -> u64 {
        u64::from(self.deployed_at) + u64::from(self.offset(stage))
    }

    /// Whether `stage` has opened at `now`.
    pub fn is_reached(&self, stage: TimelockStage, now: u64) -> bool {
        now >= self.get(stage)
    }

    /// Largest stage offset.
    pub fn span(&self) -> u32 {
        self.offsets.iter().copied().max().unwrap_or(0)
    }

    /// Pack into the 32-byte wire form.
    pub fn pack(&self) -> [u8; PACKED_TIMELOCKS_LEN] {
        let mut out = [0u8; PACKED_TIMELOCKS_LEN];
        for (i, offset) in self.offsets.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(&offset.to_be_bytes());
        }
        out[28..32].copy_from_slice(&self.deployed_at.to_be_bytes());
        out
    }

    /// Unpack the 32-byte wire form.
    pub fn unpack(packed: &[u8; PACKED_TIMELOCKS_LEN]) -> Self {
        let word = |i: usize| u32::from_be_bytes([packed[i], packed[i + 1], packed[i + 2], packed[i + 3]]);
        let mut offsets = [0u32; STAGE_COUNT];
        for (i, offset) in offsets.iter_mut().enumerate() {
            *offset = word(i * 4);
        }
        Self {
            deployed_at: word(28),
            offsets,
        }
    }

    /// Check that each side's stages strictly increase and that the
    /// destination cancels no later than the source.
    ///
    /// Escrow creation does not call this; schedules built by the order
    /// coordinator do.
    pub fn validate_ordering(&self) -> Result<(), EscrowError> {
        use TimelockStage::*;

        let strict = [
            (SrcWithdrawal, SrcPublicWithdrawal),
            (SrcPublicWithdrawal, SrcCancellation),
            (SrcCancellation, SrcPublicCancellation),
            (DstWithdrawal, DstPublicWithdrawal),
            (DstPublicWithdrawal, DstCancellation),
        ];
        for (earlier, later) in strict {
            if self.offset(later) <= self.offset(earlier) {
                return Err(self.order_error(earlier, later));
            }
        }
        if self.offset(DstCancellation) > self.offset(SrcCancellation) {
            return Err(self.order_error(DstCancellation, SrcCancellation));
        }
        Ok(())
    }

    fn order_error(&self, earlier: TimelockStage, later: TimelockStage) -> EscrowError {
        EscrowError::TimelockOrder {
            earlier,
            earlier_offset: self.offset(earlier),
            later,
            later_offset: self.offset(later),
        }
    }
}
