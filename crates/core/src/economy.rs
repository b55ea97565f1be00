//! Economy module - the coin wallet behind paid actions

use crate::error::ActionError;
use crate::types::{PaidAction, STARTING_COINS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wallet {
    coins: u32,
}

impl Wallet {
    pub fn new(coins: u32) -> Self {
        Self { coins }
    }

    pub fn balance(&self) -> u32 {
        self.coins
    }

    pub fn can_afford(&self, action: PaidAction) -> bool {
        self.coins >= action.cost()
    }

    /// Fail without touching the balance if the action is unaffordable
    pub fn check(&self, action: PaidAction) -> Result<(), ActionError> {
        if self.can_afford(action) {
            Ok(())
        } else {
            Err(ActionError::InsufficientCoins {
                action,
                cost: action.cost(),
                balance: self.coins,
            })
        }
    }

    pub fn try_spend(&mut self, action: PaidAction) -> Result<u32, ActionError> {
        self.check(action)?;
        self.coins -= action.cost();
        Ok(self.coins)
    }

    pub fn earn(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new(STARTING_COINS)
    }
}
