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
    dispatch::{dispatch, ContractHandle},
    guard::{check_is_address, check_is_amount},
    report::{ConsoleReporter, Reporter},
    ChainOpts, ErrorVariant,
};
use alloy::primitives::{Address, U256};
use anyhow::Result;
use ptoken_abi::{signatures, Token};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "mint",
    about = "Mint <amount> pTokens at <deployedAddress> to <recipient>. Requires the minter role"
)]
pub struct MintCommand {
    /// The ETH address of the deployed pToken.
    #[structopt(name = "deployedAddress")]
    deployed_address: String,
    /// The ETH address receiving the minted tokens.
    recipient: String,
    /// An amount in the most granular form of the token.
    amount: String,
    #[structopt(flatten)]
    chain: ChainOpts,
}

impl MintCommand {
    pub fn run(&self) -> Result<()> {
        let contract = check_is_address(&self.deployed_address)?;
        let recipient = check_is_address(&self.recipient)?;
        let amount = check_is_amount(&self.amount)?;
        let client = self.chain.signing_client()?;
        async_std::task::block_on(mint(
            &ContractHandle::new(contract, &client),
            recipient,
            amount,
            self.chain.gas_price(),
            &mut ConsoleReporter,
        ))?;
        Ok(())
    }
}

pub async fn mint(
    contract: &ContractHandle<'_>,
    recipient: Address,
    amount: U256,
    gas_price: Option<u128>,
    reporter: &mut dyn Reporter,
) -> Result<(), ErrorVariant> {
    log::info!("minting {} to {}", amount, recipient);
    let receipt = dispatch(
        signatures::MINT,
        &[Token::from(recipient), Token::from(amount)],
        gas_price,
        contract,
    )
    .await?;
    reporter.receipt(&receipt);
    Ok(())
}
