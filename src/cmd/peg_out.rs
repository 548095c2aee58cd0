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
    client::ChainClient,
    dispatch::{dispatch, ContractHandle},
    guard::{check_is_address, check_is_amount, check_is_hex, check_token_balance_is_sufficient},
    report::{ConsoleReporter, Reporter},
    ChainOpts, ErrorVariant,
};
use alloy::primitives::{Address, U256};
use anyhow::Result;
use ptoken_abi::{signatures, Token};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "pegOut",
    about = "Redeem <amount> pTokens at <deployedAddress> to <recipient> on the destination chain"
)]
pub struct PegOutCommand {
    /// The ETH address of the deployed pToken.
    #[structopt(name = "deployedAddress")]
    deployed_address: String,
    /// An amount in the most granular form of the token.
    amount: String,
    /// The recipient of the pegged out pTokens on the destination chain.
    recipient: String,
    /// Optional user data in hex format.
    #[structopt(long = "userData", default_value = "0x")]
    user_data: String,
    /// Chain id of the destination chain, as 4 bytes of hex.
    #[structopt(long = "destinationChainId", default_value = "0x00000000")]
    destination_chain_id: String,
    #[structopt(flatten)]
    chain: ChainOpts,
}

/// A peg out whose arguments passed every local check.
#[derive(Debug)]
pub struct PegOut {
    contract: Address,
    amount: U256,
    user_data: Token,
    recipient: String,
    destination_chain_id: Token,
}

impl PegOutCommand {
    pub fn run(&self) -> Result<()> {
        let peg_out = self.validate()?;
        let client = self.chain.signing_client()?;
        async_std::task::block_on(peg_out.exec(
            &client,
            self.chain.gas_price(),
            &mut ConsoleReporter,
        ))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<PegOut, ErrorVariant> {
        let user_data = Token::bytes(check_is_hex(&self.user_data)?)?;
        Ok(PegOut {
            contract: check_is_address(&self.deployed_address)?,
            amount: check_is_amount(&self.amount)?,
            user_data,
            recipient: self.recipient.clone(),
            destination_chain_id: Token::bytes4(&self.destination_chain_id)?,
        })
    }
}

impl PegOut {
    pub async fn exec(
        self,
        client: &dyn ChainClient,
        gas_price: Option<u128>,
        reporter: &mut dyn Reporter,
    ) -> Result<(), ErrorVariant> {
        let owner = client.sender().ok_or_else(|| {
            ErrorVariant::config("a private key is required to peg out")
        })?;
        let contract = ContractHandle::new(self.contract, client);
        check_token_balance_is_sufficient(&contract, owner, self.amount).await?;

        log::info!(
            "redeeming {} to {} via {}",
            self.amount,
            self.recipient,
            self.contract
        );
        let receipt = dispatch(
            signatures::REDEEM,
            &[
                Token::from(self.amount),
                self.user_data,
                Token::string(self.recipient),
                self.destination_chain_id,
            ],
            gas_price,
            &contract,
        )
        .await?;
        reporter.receipt(&receipt);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::{
        client::mock::{MockClient, Request},
        report::RecordingReporter,
    };
    use assert_matches::assert_matches;
    use async_std::task::block_on;
    use ptoken_abi::{decode, FunctionSignature};
    use structopt::StructOpt;

    const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
    const RECIPIENT: &str = "33L5hhKLhcNqN7oHfeW3evYXkr9VxyBRRi";

    fn command(args: &[&str]) -> PegOutCommand {
        let mut argv = vec!["pegOut", CONTRACT, "1337", RECIPIENT];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["--endpoint", "http://localhost:8545"]);
        PegOutCommand::from_iter(argv)
    }

    fn balance_word(balance: u64) -> Vec<u8> {
        U256::from(balance).to_be_bytes::<32>().to_vec()
    }

    #[test]
    fn malformed_user_data_fails_validation() {
        assert_matches!(
            command(&["--userData", "zz"]).validate(),
            Err(ErrorVariant::Validation(_))
        );
    }

    #[test]
    fn malformed_destination_chain_id_fails_encoding() {
        assert_matches!(
            command(&["--destinationChainId", "0x0102"]).validate(),
            Err(ErrorVariant::Encoding(ptoken_abi::Error::InvalidBytes4(_)))
        );
    }

    #[test]
    fn insufficient_balance_submits_nothing() {
        let client = MockClient::default().with_call_response(balance_word(1336));
        let peg_out = command(&[]).validate().unwrap();
        let mut reporter = RecordingReporter::default();

        let result = block_on(peg_out.exec(&client, None, &mut reporter));

        assert_matches!(result, Err(ErrorVariant::InsufficientBalance { .. }));
        assert!(client.sends().is_empty());
        assert!(!client.requests().contains(&Request::SuggestedFees));
        assert!(reporter.lines.is_empty());
    }

    #[test]
    fn redeem_is_sent_after_balance_check() {
        let client = MockClient::default().with_call_response(balance_word(1337));
        let peg_out = command(&["--userData", "0xc0ffee", "--destinationChainId", "0x00f34368"])
            .validate()
            .unwrap();
        let mut reporter = RecordingReporter::default();

        block_on(peg_out.exec(&client, None, &mut reporter)).unwrap();

        let requests = client.requests();
        assert_matches!(requests[0], Request::Call { .. });
        assert_eq!(requests[1], Request::SuggestedFees);
        let sends = client.sends();
        assert_eq!(sends.len(), 1);
        let signature: FunctionSignature = signatures::REDEEM.parse().unwrap();
        let args = decode(&signature, &sends[0].0.data).unwrap();
        assert_eq!(
            args,
            vec![
                Token::from(1337u64),
                Token::Bytes(vec![0xc0, 0xff, 0xee]),
                Token::string(RECIPIENT),
                Token::Bytes4([0x00, 0xf3, 0x43, 0x68]),
            ]
        );
        assert_eq!(reporter.lines[0], "✔ Success! Transaction receipt:");
    }
}
