use thiserror::Error;

use crate::types::PaidAction;

/// Rejections the player is told about (everything else is a silent no-op)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("not enough coins for {}: costs {cost}, balance {balance}", .action.as_str())]
    InsufficientCoins {
        action: PaidAction,
        cost: u32,
        balance: u32,
    },
}
