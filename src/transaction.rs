//! Transaction records carried by blocks and the pending pool.
//!
//! A transaction is just a transfer intent. Nothing here checks balances,
//! signatures or identities; the only requirement is that all three fields
//! are present.

use crate::error::{ChainError, Result};
use serde::{Deserialize, Serialize};

/// Sender id used for mining rewards.
pub const REWARD_SENDER: &str = "0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: f64) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }

    /// Reward paid to `recipient` for minting a block.
    pub fn reward(recipient: impl Into<String>, amount: f64) -> Self {
        Self::new(REWARD_SENDER, recipient, amount)
    }
}

/// Submission form of a transaction as it arrives from a client, before the
/// required fields have been checked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTransaction {
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub amount: Option<f64>,
}

impl NewTransaction {
    /// Checks that every field is present. The first missing one is reported.
    pub fn into_transaction(self) -> Result<Transaction> {
        let sender = self
            .sender
            .ok_or_else(|| ChainError::MissingField("sender".to_string()))?;
        let recipient = self
            .recipient
            .ok_or_else(|| ChainError::MissingField("recipient".to_string()))?;
        let amount = self
            .amount
            .ok_or_else(|| ChainError::MissingField("amount".to_string()))?;

        Ok(Transaction {
            sender,
            recipient,
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_transaction() {
        let tx = Transaction::reward("node-a", 1.0);
        assert_eq!(tx.sender, "0");
        assert_eq!(tx.recipient, "node-a");
        assert_eq!(tx.amount, 1.0);
    }

    #[test]
    fn test_new_transaction_complete() {
        let req: NewTransaction =
            serde_json::from_str(r#"{"sender":"A","recipient":"B","amount":5}"#).unwrap();
        let tx = req.into_transaction().unwrap();
        assert_eq!(tx, Transaction::new("A", "B", 5.0));
    }

    #[test]
    fn test_new_transaction_missing_fields() {
        let req: NewTransaction = serde_json::from_str(r#"{"sender":"A","amount":5}"#).unwrap();
        assert_eq!(
            req.into_transaction(),
            Err(ChainError::MissingField("recipient".to_string()))
        );

        let req: NewTransaction = serde_json::from_str(r#"{"sender":"A","recipient":"B"}"#).unwrap();
        assert_eq!(
            req.into_transaction(),
            Err(ChainError::MissingField("amount".to_string()))
        );

        assert_eq!(
            NewTransaction::default().into_transaction(),
            Err(ChainError::MissingField("sender".to_string()))
        );
    }
}
