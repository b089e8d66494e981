pub mod allocation;
pub mod calculator;
pub mod meter;
pub mod tier;
pub mod usage;

use crate::quantity::{cost::Cost, energy::KilowattHours};

/// Bad input to a public billing operation. The allocation arithmetic
/// assumes non-negative quantities and never sees them.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("the energy quantity must be non-negative, got {0}")]
    NegativeKwh(KilowattHours),

    #[error("the budget amount must be non-negative, got {0}")]
    NegativeAmount(Cost),

    #[error("the budget of {amount} does not cover the stamp duty of {stamp}")]
    BelowStamp { amount: Cost, stamp: Cost },
}
