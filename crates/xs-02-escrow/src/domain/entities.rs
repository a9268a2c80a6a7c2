//! # Escrow Record
//!
//! The per-leg state machine:
//!
//! ```text
//! Uninitialized -> Created -> Locked -> Claimed
//!                                   \-> Cancelled
//! ```
//!
//! Every transition mutates the record first and returns the value
//! movements as a [`Settlement`] for the caller to execute afterwards. A
//! caller that fails to execute a settlement restores its snapshot of the
//! record.

use serde::{Deserialize, Serialize};
use shared_bus::SwapEvent;
use shared_types::{Address, Amount, EscrowSide, NATIVE_TOKEN};
use std::fmt;

use super::errors::{EscrowError, Secret};
use super::immutables::Immutables;
use super::timelocks::TimelockStage;
use crate::algorithms::verify_secret;

/// Escrow lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EscrowState {
    /// Slot reserved, no immutables stored.
    #[default]
    Uninitialized,
    /// Immutables stored, no value moved.
    Created,
    /// Value held in custody.
    Locked,
    /// Secret revealed, value released to the counterparty.
    Claimed,
    /// Value returned to the depositor.
    Cancelled,
}

impl EscrowState {
    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Claimed | Self::Cancelled)
    }
}

impl fmt::Display for EscrowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One value movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Debited account.
    pub from: Address,
    /// Credited account.
    pub to: Address,
    /// Token moved (`NATIVE_TOKEN` for the native asset).
    pub token: Address,
    /// Amount moved.
    pub amount: Amount,
}

/// Effects of a transition, applied after the state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// Transfers to execute atomically.
    pub transfers: Vec<Transfer>,
    /// Notification to publish once the transfers succeed.
    pub event: SwapEvent,
}

fn push_transfer(out: &mut Vec<Transfer>, from: Address, to: Address, token: Address, amount: Amount) {
    if amount > 0 {
        out.push(Transfer {
            from,
            to,
            token,
            amount,
        });
    }
}

/// One escrow leg at its deterministic address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowRecord {
    /// Deterministic address; also the custody account in the ledger.
    pub address: Address,
    /// Fixed parameters.
    pub immutables: Immutables,
    /// Lifecycle state.
    pub state: EscrowState,
    /// Source leg when true.
    pub is_source: bool,
    /// Preimage, set on claim.
    pub revealed_secret: Option<Secret>,
    /// Safety deposit already moved in at creation.
    pub prefunded_deposit: Amount,
}

impl EscrowRecord {
    /// Empty record reserved at `address`.
    pub fn uninitialized(address: Address) -> Self {
        Self {
            address,
            immutables: Immutables::default(),
            state: EscrowState::Uninitialized,
            is_source: false,
            revealed_secret: None,
            prefunded_deposit: 0,
        }
    }

    /// Store the immutables. Allowed once.
    pub fn initialize(&mut self, immutables: Immutables, is_source: bool) -> Result<(), EscrowError> {
        if self.state != EscrowState::Uninitialized {
            return Err(EscrowError::AlreadyInitialized);
        }
        self.immutables = immutables;
        self.is_source = is_source;
        self.state = EscrowState::Created;
        Ok(())
    }

    /// Source or destination.
    pub fn side(&self) -> EscrowSide {
        if self.is_source {
            EscrowSide::Source
        } else {
            EscrowSide::Destination
        }
    }

    /// Account that funds the escrow and receives refunds.
    pub fn depositor(&self) -> Address {
        if self.is_source {
            self.immutables.maker
        } else {
            self.immutables.taker
        }
    }

    /// Account paid `amount` on claim.
    pub fn beneficiary(&self) -> Address {
        if self.is_source {
            self.immutables.taker
        } else {
            self.immutables.maker
        }
    }

    /// Native deposit held while locked.
    pub fn held_deposit(&self) -> Amount {
        if self.is_source {
            0
        } else {
            self.immutables.safety_deposit
        }
    }

    fn expect_state(&self, expected: EscrowState, operation: &'static str) -> Result<(), EscrowError> {
        if self.state != expected {
            return Err(EscrowError::InvalidState {
                state: self.state,
                operation,
            });
        }
        Ok(())
    }

    fn ensure_reached(&self, stage: TimelockStage, now: u64) -> Result<(), EscrowError> {
        let timelocks = &self.immutables.timelocks;
        if !timelocks.is_reached(stage, now) {
            return Err(EscrowError::TimelockNotReached {
                stage,
                opens_at: timelocks.get(stage),
            });
        }
        Ok(())
    }

    fn ensure_claim_window(&self, opens: TimelockStage, now: u64) -> Result<(), EscrowError> {
        self.ensure_reached(opens, now)?;
        let cancellation = TimelockStage::cancellation(self.side());
        if self.immutables.timelocks.is_reached(cancellation, now) {
            return Err(EscrowError::TimelockExpired {
                stage: cancellation,
                expired_at: self.immutables.timelocks.get(cancellation),
            });
        }
        Ok(())
    }

    /// Move funds into custody. Source: maker only. Destination: taker only.
    pub fn lock(&mut self, caller: &Address) -> Result<Settlement, EscrowError> {
        self.expect_state(EscrowState::Created, "lock")?;
        if *caller != self.depositor() {
            return Err(EscrowError::Unauthorized);
        }

        let imm = &self.immutables;
        let mut transfers = Vec::with_capacity(2);
        push_transfer(&mut transfers, *caller, self.address, imm.token, imm.amount);
        if !self.is_source {
            let top_up = imm.safety_deposit.saturating_sub(self.prefunded_deposit);
            push_transfer(&mut transfers, *caller, self.address, NATIVE_TOKEN, top_up);
        }

        let event = SwapEvent::EscrowLocked {
            order_hash: imm.order_hash,
            hashlock: imm.hashlock,
            amount: imm.amount,
        };
        self.state = EscrowState::Locked;
        Ok(Settlement { transfers, event })
    }

    fn release(&mut self, caller: &Address, secret: &Secret, deposit_to: Address) -> Result<Settlement, EscrowError> {
        if !verify_secret(secret, &self.immutables.hashlock) {
            return Err(EscrowError::InvalidSecret);
        }

        let imm = &self.immutables;
        let mut transfers = Vec::with_capacity(2);
        push_transfer(&mut transfers, self.address, self.beneficiary(), imm.token, imm.amount);
        push_transfer(&mut transfers, self.address, deposit_to, NATIVE_TOKEN, self.held_deposit());

        let event = SwapEvent::EscrowClaimed {
            order_hash: imm.order_hash,
            claimant: *caller,
            secret: *secret,
        };
        self.revealed_secret = Some(*secret);
        self.state = EscrowState::Claimed;
        Ok(Settlement { transfers, event })
    }

    /// Taker claims with the secret between withdrawal and cancellation.
    ///
    /// Destination: `amount` to the maker, deposit back to the taker.
    pub fn claim(&mut self, caller: &Address, secret: &Secret, now: u64) -> Result<Settlement, EscrowError> {
        self.expect_state(EscrowState::Locked, "claim")?;
        if *caller != self.immutables.taker {
            return Err(EscrowError::Unauthorized);
        }
        self.ensure_claim_window(TimelockStage::withdrawal(self.side()), now)?;
        let taker = self.immutables.taker;
        self.release(caller, secret, taker)
    }

    /// Anyone claims with the secret between public withdrawal and
    /// cancellation. The destination deposit goes to the caller.
    pub fn public_claim(&mut self, caller: &Address, secret: &Secret, now: u64) -> Result<Settlement, EscrowError> {
        self.expect_state(EscrowState::Locked, "public_claim")?;
        self.ensure_claim_window(TimelockStage::public_withdrawal(self.side()), now)?;
        self.release(caller, secret, *caller)
    }

    fn refund(&mut self) -> Settlement {
        let imm = &self.immutables;
        let depositor = self.depositor();
        let mut transfers = Vec::with_capacity(2);
        push_transfer(&mut transfers, self.address, depositor, imm.token, imm.amount);
        push_transfer(&mut transfers, self.address, depositor, NATIVE_TOKEN, self.held_deposit());

        let event = SwapEvent::EscrowCancelled {
            order_hash: imm.order_hash,
            depositor,
        };
        self.state = EscrowState::Cancelled;
        Settlement { transfers, event }
    }

    /// Depositor reclaims the full locked balance after cancellation.
    pub fn cancel(&mut self, caller: &Address, now: u64) -> Result<Settlement, EscrowError> {
        self.expect_state(EscrowState::Locked, "cancel")?;
        if *caller != self.depositor() {
            return Err(EscrowError::Unauthorized);
        }
        self.ensure_reached(TimelockStage::cancellation(self.side()), now)?;
        Ok(self.refund())
    }

    /// Anyone returns a source escrow to the maker after public cancellation.
    pub fn public_cancel(&mut self, _caller: &Address, now: u64) -> Result<Settlement, EscrowError> {
        if !self.is_source {
            return Err(EscrowError::NoPublicCancellation);
        }
        self.expect_state(EscrowState::Locked, "public_cancel")?;
        self.ensure_reached(TimelockStage::SrcPublicCancellation, now)?;
        Ok(self.refund())
    }
}
