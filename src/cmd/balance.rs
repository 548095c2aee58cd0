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
    dispatch::ContractHandle,
    guard::{check_is_address, token_balance},
    report::{ConsoleReporter, Reporter},
    ChainOpts, ErrorVariant,
};
use alloy::primitives::{Address, U256};
use anyhow::Result;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "getBalanceOf",
    about = "Get balance of <ethAddress> of pToken at <deployedAddress>"
)]
pub struct GetBalanceOfCommand {
    /// The ETH address of the deployed pToken.
    #[structopt(name = "deployedAddress")]
    deployed_address: String,
    /// A valid ETH address.
    #[structopt(name = "ethAddress")]
    eth_address: String,
    #[structopt(flatten)]
    chain: ChainOpts,
}

impl GetBalanceOfCommand {
    pub fn run(&self) -> Result<()> {
        let contract = check_is_address(&self.deployed_address)?;
        let owner = check_is_address(&self.eth_address)?;
        let client = self.chain.read_client()?;
        async_std::task::block_on(show_balance_of(
            &ContractHandle::new(contract, &client),
            owner,
            &mut ConsoleReporter,
        ))?;
        Ok(())
    }
}

pub async fn show_balance_of(
    contract: &ContractHandle<'_>,
    owner: Address,
    reporter: &mut dyn Reporter,
) -> Result<U256, ErrorVariant> {
    let balance = token_balance(contract, owner).await?;
    reporter.field("Balance", &balance);
    Ok(balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::{client::mock::MockClient, report::RecordingReporter};
    use assert_matches::assert_matches;
    use async_std::task::block_on;

    #[test]
    fn balance_is_reported_in_base_units() {
        let balance = U256::from(10).pow(U256::from(18));
        let client = MockClient::default().with_call_response(balance.to_be_bytes::<32>().to_vec());
        let contract = ContractHandle::new(Address::repeat_byte(0x42), &client);
        let mut reporter = RecordingReporter::default();

        let reported = block_on(show_balance_of(&contract, Address::ZERO, &mut reporter)).unwrap();

        assert_eq!(reported, balance);
        assert_eq!(reporter.field_value("Balance"), Some("1000000000000000000"));
    }

    #[test]
    fn short_return_data_is_an_error() {
        let client = MockClient::default().with_call_response(vec![0x01]);
        let contract = ContractHandle::new(Address::repeat_byte(0x42), &client);
        let mut reporter = RecordingReporter::default();

        let result = block_on(show_balance_of(&contract, Address::ZERO, &mut reporter));

        assert_matches!(result, Err(ErrorVariant::Encoding(_)));
        assert!(reporter.lines.is_empty());
    }
}
