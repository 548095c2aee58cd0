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

//! The seam between the commands and an Ethereum node.
//!
//! Commands only talk to a [`ChainClient`]. The production implementation is
//! backed by an alloy HTTP provider, tests substitute an in-memory mock.

use super::ErrorVariant;
use alloy::{
    network::{EthereumWallet, ReceiptResponse, TransactionBuilder},
    primitives::{Address, Bytes, B256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    transports::{RpcError, TransportErrorKind},
};
use async_trait::async_trait;
use ptoken_abi::decode_revert_reason;

/// Fee suggestions of a node, all in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestedFees {
    pub gas_price: u128,
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

/// How a transaction is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeSettings {
    /// A user supplied gas price, sent as a legacy transaction.
    Legacy { gas_price: u128 },
    Eip1559 {
        max_fee_per_gas: u128,
        max_priority_fee_per_gas: u128,
    },
}

impl From<SuggestedFees> for FeeSettings {
    fn from(fees: SuggestedFees) -> Self {
        FeeSettings::Eip1559 {
            max_fee_per_gas: fees.max_fee_per_gas,
            max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
        }
    }
}

/// An unsigned transaction. `to` is `None` for a contract creation, in which
/// case `data` is the creation bytecode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub to: Option<Address>,
    pub data: Vec<u8>,
}

/// The parts of a mined receipt the tool reports on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    pub status: bool,
    pub gas_used: u64,
    pub contract_address: Option<Address>,
    pub logs: usize,
}

#[async_trait]
pub trait ChainClient: Send + Sync {
    /// The account transactions are sent from, if a signer is configured.
    fn sender(&self) -> Option<Address>;

    async fn suggested_fees(&self) -> Result<SuggestedFees, ErrorVariant>;

    /// Executes a read-only `eth_call` and returns the raw return data.
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, ErrorVariant>;

    /// Signs and broadcasts `tx`, then waits for one confirmation.
    ///
    /// There is no timeout on the confirmation wait and nothing is retried.
    async fn send(
        &self,
        tx: Transaction,
        fees: FeeSettings,
    ) -> Result<TransactionReceipt, ErrorVariant>;
}

/// A [`ChainClient`] talking JSON-RPC over HTTP.
pub struct AlloyClient {
    provider: DynProvider,
    sender: Option<Address>,
}

/// Connects to `url`. Without a signer only read-only calls succeed.
pub fn connect(url: &url::Url, signer: Option<PrivateKeySigner>) -> AlloyClient {
    log::debug!("connecting to {}", url);
    match signer {
        Some(signer) => {
            let sender = signer.address();
            let provider = ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer))
                .on_http(url.clone())
                .erased();
            AlloyClient {
                provider,
                sender: Some(sender),
            }
        }
        None => {
            let provider = ProviderBuilder::new().on_http(url.clone()).erased();
            AlloyClient {
                provider,
                sender: None,
            }
        }
    }
}

#[async_trait]
impl ChainClient for AlloyClient {
    fn sender(&self) -> Option<Address> {
        self.sender
    }

    async fn suggested_fees(&self) -> Result<SuggestedFees, ErrorVariant> {
        let gas_price = self.provider.get_gas_price().await.map_err(rpc_error)?;
        let estimation = self
            .provider
            .estimate_eip1559_fees()
            .await
            .map_err(rpc_error)?;
        log::debug!(
            "suggested fees: gas price {}, max fee {}, priority fee {}",
            gas_price,
            estimation.max_fee_per_gas,
            estimation.max_priority_fee_per_gas
        );
        Ok(SuggestedFees {
            gas_price,
            max_fee_per_gas: estimation.max_fee_per_gas,
            max_priority_fee_per_gas: estimation.max_priority_fee_per_gas,
        })
    }

    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, ErrorVariant> {
        let mut request = TransactionRequest::default()
            .with_to(to)
            .with_input(Bytes::from(data));
        if let Some(from) = self.sender {
            request = request.with_from(from);
        }
        match self.provider.call(request).await {
            Ok(output) => Ok(output.to_vec()),
            Err(err) => Err(revert_or(err, rpc_error)),
        }
    }

    async fn send(
        &self,
        tx: Transaction,
        fees: FeeSettings,
    ) -> Result<TransactionReceipt, ErrorVariant> {
        let from = self.sender.ok_or_else(|| {
            ErrorVariant::config("a private key is required to send transactions")
        })?;
        let mut request = TransactionRequest::default().with_from(from);
        request = match tx.to {
            Some(to) => request.with_to(to).with_input(Bytes::from(tx.data)),
            None => request.with_deploy_code(Bytes::from(tx.data)),
        };
        request = match fees {
            FeeSettings::Legacy { gas_price } => request.with_gas_price(gas_price),
            FeeSettings::Eip1559 {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            } => request
                .with_max_fee_per_gas(max_fee_per_gas)
                .with_max_priority_fee_per_gas(max_priority_fee_per_gas),
        };

        let pending = self
            .provider
            .send_transaction(request)
            .await
            .map_err(|err| revert_or(err, |err| ErrorVariant::Submission(err.to_string())))?;
        log::info!("transaction {} broadcast", pending.tx_hash());
        let receipt = pending
            .with_required_confirmations(1)
            .get_receipt()
            .await
            .map_err(|err| ErrorVariant::Submission(err.to_string()))?;

        Ok(TransactionReceipt {
            transaction_hash: receipt.transaction_hash(),
            block_number: receipt.block_number(),
            status: receipt.status(),
            gas_used: receipt.gas_used(),
            contract_address: receipt.contract_address(),
            logs: receipt.inner.logs().len(),
        })
    }
}

fn rpc_error(err: RpcError<TransportErrorKind>) -> ErrorVariant {
    ErrorVariant::Rpc(err.to_string())
}

/// Maps a node error carrying revert data to [`ErrorVariant::Reverted`],
/// anything else through `otherwise`.
fn revert_or<F>(err: RpcError<TransportErrorKind>, otherwise: F) -> ErrorVariant
where
    F: FnOnce(RpcError<TransportErrorKind>) -> ErrorVariant,
{
    let revert = err.as_error_resp().and_then(|payload| {
        match payload.as_revert_data() {
            Some(data) => Some(decode_revert_reason(&data)),
            None if payload.message.contains("revert") => Some(None),
            None => None,
        }
    });
    match revert {
        Some(reason) => ErrorVariant::Reverted {
            reason,
            tx_hash: None,
        },
        None => otherwise(err),
    }
}
