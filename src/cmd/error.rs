// Copyright 2021 Provable Things Ltd.
// This file is part of ptoken-deployer.
//
// ptoken-deployer is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// ptoken-deployer is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with ptoken-deployer.  If not, see <http://www.gnu.org/licenses/>.

use alloy::primitives::{B256, U256};

/// Every way a command can fail. Errors travel unmodified up to `main`,
/// which prints them; no stage retries or recovers.
#[derive(Debug, thiserror::Error)]
pub enum ErrorVariant {
    /// Malformed user input, caught before any network call.
    #[error("Validation error: {0}")]
    Validation(String),
    /// Signature or argument mismatch while packing a call.
    #[error("Encoding error: {0}")]
    Encoding(#[from] ptoken_abi::Error),
    #[error("Insufficient token balance: balance is {balance} but {amount} is required")]
    InsufficientBalance { balance: U256, amount: U256 },
    /// The transaction could not be broadcast or its confirmation was lost.
    #[error("Transaction submission failed: {0}")]
    Submission(String),
    #[error(
        "Transaction reverted: {}{}",
        .reason.as_deref().unwrap_or("no reason given"),
        .tx_hash.map(|hash| format!(" (transaction {})", hash)).unwrap_or_default()
    )]
    Reverted {
        reason: Option<String>,
        tx_hash: Option<B256>,
    },
    /// A read-only request (balance, fees, `eth_call`) failed.
    #[error("RPC error: {0}")]
    Rpc(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ErrorVariant {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        ErrorVariant::Validation(message.into())
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        ErrorVariant::Config(message.into())
    }
}
