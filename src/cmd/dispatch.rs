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

use super::{
    client::{ChainClient, FeeSettings, Transaction, TransactionReceipt},
    ErrorVariant,
};
use alloy::primitives::Address;
use ptoken_abi::{encode, FunctionSignature, Token};

/// A deployed contract reachable through a client.
pub struct ContractHandle<'a> {
    pub address: Address,
    pub client: &'a dyn ChainClient,
}

impl<'a> ContractHandle<'a> {
    pub fn new(address: Address, client: &'a dyn ChainClient) -> Self {
        Self { address, client }
    }
}

/// Encodes a call to `signature`, submits it to `contract` and waits for it
/// to be mined.
///
/// Encoding happens before anything touches the network. Without a
/// `gas_price` override the node's fee suggestions are fetched first.
pub async fn dispatch(
    signature: &str,
    args: &[Token],
    gas_price: Option<u128>,
    contract: &ContractHandle<'_>,
) -> Result<TransactionReceipt, ErrorVariant> {
    let signature: FunctionSignature = signature.parse()?;
    let call_data = encode(&signature, args)?;
    log::info!(
        "calling {} on {} with {}",
        signature,
        contract.address,
        call_data
    );
    let fees = fee_settings(contract.client, gas_price).await?;
    let tx = Transaction {
        to: Some(contract.address),
        data: call_data.into_bytes(),
    };
    let receipt = contract.client.send(tx, fees).await?;
    ensure_success(receipt)
}

/// Submits a contract creation transaction carrying `bytecode`.
pub async fn deploy(
    client: &dyn ChainClient,
    bytecode: Vec<u8>,
    gas_price: Option<u128>,
) -> Result<TransactionReceipt, ErrorVariant> {
    if bytecode.is_empty() {
        return Err(ErrorVariant::validation("contract bytecode is empty"))
    }
    log::info!("deploying {} bytes of contract code", bytecode.len());
    let fees = fee_settings(client, gas_price).await?;
    let tx = Transaction {
        to: None,
        data: bytecode,
    };
    let receipt = ensure_success(client.send(tx, fees).await?)?;
    if receipt.contract_address.is_none() {
        return Err(ErrorVariant::Submission(format!(
            "receipt of {} carries no contract address",
            receipt.transaction_hash
        )))
    }
    Ok(receipt)
}

/// Executes `signature` as a read-only call and returns the raw return data.
pub async fn call(
    contract: &ContractHandle<'_>,
    signature: &str,
    args: &[Token],
) -> Result<Vec<u8>, ErrorVariant> {
    let signature: FunctionSignature = signature.parse()?;
    let call_data = encode(&signature, args)?;
    log::debug!("eth_call {} on {}", signature, contract.address);
    contract
        .client
        .call(contract.address, call_data.into_bytes())
        .await
}

async fn fee_settings(
    client: &dyn ChainClient,
    gas_price: Option<u128>,
) -> Result<FeeSettings, ErrorVariant> {
    match gas_price {
        Some(gas_price) => {
            log::debug!("using gas price override of {} wei", gas_price);
            Ok(FeeSettings::Legacy { gas_price })
        }
        None => client.suggested_fees().await.map(FeeSettings::from),
    }
}

fn ensure_success(receipt: TransactionReceipt) -> Result<TransactionReceipt, ErrorVariant> {
    if receipt.status {
        Ok(receipt)
    } else {
        Err(ErrorVariant::Reverted {
            reason: None,
            tx_hash: Some(receipt.transaction_hash),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::client::mock::{MockClient, Request, MOCK_FEES};
    use assert_matches::assert_matches;
    use async_std::task::block_on;
    use ptoken_abi::signatures;

    fn contract_address() -> Address {
        Address::repeat_byte(0x42)
    }

    #[test]
    fn dispatch_fetches_fees_without_override() {
        let client = MockClient::default();
        let contract = ContractHandle::new(contract_address(), &client);
        let minter = Token::from(Address::repeat_byte(0x01));

        let receipt = block_on(dispatch(
            signatures::GRANT_MINTER_ROLE,
            &[minter],
            None,
            &contract,
        ))
        .unwrap();

        assert!(receipt.status);
        let requests = client.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], Request::SuggestedFees);
        assert_matches!(
            &requests[1],
            Request::Send { tx, fees } if tx.to == Some(contract_address())
                && *fees == FeeSettings::from(MOCK_FEES)
                && tx.data[..4] == [0x3d, 0xd1, 0xeb, 0x61]
        );
    }

    #[test]
    fn dispatch_uses_gas_price_override() {
        let client = MockClient::default();
        let contract = ContractHandle::new(contract_address(), &client);
        let minter = Token::from(Address::repeat_byte(0x01));

        block_on(dispatch(
            signatures::REVOKE_MINTER_ROLE,
            &[minter],
            Some(5_000_000_000),
            &contract,
        ))
        .unwrap();

        let sends = client.sends();
        assert_eq!(client.requests().len(), 1);
        assert_eq!(
            sends[0].1,
            FeeSettings::Legacy {
                gas_price: 5_000_000_000
            }
        );
    }

    #[test]
    fn encoding_errors_never_reach_the_network() {
        let client = MockClient::default();
        let contract = ContractHandle::new(contract_address(), &client);

        let result = block_on(dispatch(
            signatures::MINT,
            &[Token::from(Address::ZERO)],
            None,
            &contract,
        ));

        assert_matches!(
            result,
            Err(ErrorVariant::Encoding(ptoken_abi::Error::ArgumentCount {
                expected: 2,
                actual: 1,
                ..
            }))
        );
        assert!(client.requests().is_empty());
    }

    #[test]
    fn failed_receipt_is_reported_as_revert() {
        let client = MockClient {
            revert_sends: true,
            ..MockClient::default()
        };
        let contract = ContractHandle::new(contract_address(), &client);

        let result = block_on(dispatch(
            signatures::MINT,
            &[Token::from(Address::ZERO), Token::from(1u64)],
            Some(1),
            &contract,
        ));

        assert_matches!(
            result,
            Err(ErrorVariant::Reverted {
                reason: None,
                tx_hash: Some(_)
            })
        );
    }

    /// There is no confirmation timeout and no double-submission guard: a
    /// dispatch broadcasts exactly once and waits on that one transaction,
    /// even when it reverts. Re-running a command sends a new transaction.
    #[test]
    fn dispatch_submits_once_and_never_retries() {
        let client = MockClient {
            revert_sends: true,
            ..MockClient::default()
        };
        let contract = ContractHandle::new(contract_address(), &client);

        let result = block_on(dispatch(
            signatures::GRANT_MINTER_ROLE,
            &[Token::from(Address::repeat_byte(0x01))],
            None,
            &contract,
        ));

        assert_matches!(result, Err(ErrorVariant::Reverted { .. }));
        let requests = client.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], Request::SuggestedFees);
        assert_matches!(&requests[1], Request::Send { .. });
        assert_eq!(client.sends().len(), 1);
    }

    #[test]
    fn deploy_returns_contract_address() {
        let client = MockClient::default();

        let receipt = block_on(deploy(&client, vec![0x60, 0x80, 0x60, 0x40], None)).unwrap();

        assert_eq!(receipt.contract_address, Some(Address::repeat_byte(0xcc)));
        assert_matches!(&client.sends()[0].0, Transaction { to: None, .. });
    }

    #[test]
    fn deploy_rejects_empty_bytecode() {
        let client = MockClient::default();

        let result = block_on(deploy(&client, Vec::new(), None));

        assert_matches!(result, Err(ErrorVariant::Validation(_)));
        assert!(client.requests().is_empty());
    }
}
