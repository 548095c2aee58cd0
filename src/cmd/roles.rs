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

//! Administration of the minter role.

use super::{
    dispatch::{call, dispatch, ContractHandle},
    guard::check_is_address,
    report::{ConsoleReporter, Reporter},
    ChainOpts, ErrorVariant,
};
use alloy::primitives::Address;
use anyhow::Result;
use ptoken_abi::{decode_params, signatures, ParamType, Token};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct RoleArgs {
    /// The ETH address of the deployed pToken.
    #[structopt(name = "deployedAddress")]
    deployed_address: String,
    /// The account whose role is changed or queried.
    #[structopt(name = "ethAddress")]
    eth_address: String,
    #[structopt(flatten)]
    chain: ChainOpts,
}

impl RoleArgs {
    fn validate(&self) -> Result<(Address, Address), ErrorVariant> {
        Ok((
            check_is_address(&self.deployed_address)?,
            check_is_address(&self.eth_address)?,
        ))
    }
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "grantMinterRole",
    about = "Grant a minter role to <ethAddress> for pToken at <deployedAddress>"
)]
pub struct GrantMinterRoleCommand {
    #[structopt(flatten)]
    args: RoleArgs,
}

impl GrantMinterRoleCommand {
    pub fn run(&self) -> Result<()> {
        run_role_change(signatures::GRANT_MINTER_ROLE, &self.args)
    }
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "revokeMinterRole",
    about = "Revoke the minter role of <ethAddress> for pToken at <deployedAddress>"
)]
pub struct RevokeMinterRoleCommand {
    #[structopt(flatten)]
    args: RoleArgs,
}

impl RevokeMinterRoleCommand {
    pub fn run(&self) -> Result<()> {
        run_role_change(signatures::REVOKE_MINTER_ROLE, &self.args)
    }
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "hasMinterRole",
    about = "Check whether <ethAddress> is a minter of pToken at <deployedAddress>"
)]
pub struct HasMinterRoleCommand {
    #[structopt(flatten)]
    args: RoleArgs,
}

impl HasMinterRoleCommand {
    pub fn run(&self) -> Result<()> {
        let (contract, account) = self.args.validate()?;
        let client = self.args.chain.read_client()?;
        async_std::task::block_on(has_minter_role(
            &ContractHandle::new(contract, &client),
            account,
            &mut ConsoleReporter,
        ))?;
        Ok(())
    }
}

fn run_role_change(signature: &str, args: &RoleArgs) -> Result<()> {
    let (contract, account) = args.validate()?;
    let client = args.chain.signing_client()?;
    async_std::task::block_on(change_role(
        signature,
        &ContractHandle::new(contract, &client),
        account,
        args.chain.gas_price(),
        &mut ConsoleReporter,
    ))?;
    Ok(())
}

pub async fn change_role(
    signature: &str,
    contract: &ContractHandle<'_>,
    account: Address,
    gas_price: Option<u128>,
    reporter: &mut dyn Reporter,
) -> Result<(), ErrorVariant> {
    let receipt = dispatch(signature, &[Token::from(account)], gas_price, contract).await?;
    reporter.receipt(&receipt);
    Ok(())
}

pub async fn has_minter_role(
    contract: &ContractHandle<'_>,
    account: Address,
    reporter: &mut dyn Reporter,
) -> Result<bool, ErrorVariant> {
    let output = call(contract, signatures::HAS_MINTER_ROLE, &[Token::from(account)]).await?;
    let is_minter = decode_params(&[ParamType::Bool], &output)?
        .pop()
        .and_then(Token::into_bool)
        .ok_or_else(|| ErrorVariant::Rpc("hasMinterRole returned no bool".into()))?;
    reporter.field("Minter", &is_minter);
    Ok(is_minter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::{client::mock::MockClient, report::RecordingReporter};
    use alloy::primitives::U256;
    use async_std::task::block_on;
    use ptoken_abi::{decode, FunctionSignature};

    #[test]
    fn grant_sends_account_to_contract() {
        let client = MockClient::default();
        let contract = ContractHandle::new(Address::repeat_byte(0x42), &client);
        let account = Address::repeat_byte(0x07);
        let mut reporter = RecordingReporter::default();

        block_on(change_role(
            signatures::GRANT_MINTER_ROLE,
            &contract,
            account,
            None,
            &mut reporter,
        ))
        .unwrap();

        let sends = client.sends();
        assert_eq!(sends[0].0.to, Some(contract.address));
        let signature: FunctionSignature = signatures::GRANT_MINTER_ROLE.parse().unwrap();
        assert_eq!(
            decode(&signature, &sends[0].0.data).unwrap(),
            vec![Token::from(account)]
        );
    }

    #[test]
    fn has_minter_role_decodes_bool() {
        let client = MockClient::default()
            .with_call_response(U256::from(1).to_be_bytes::<32>().to_vec())
            .with_call_response(U256::ZERO.to_be_bytes::<32>().to_vec());
        let contract = ContractHandle::new(Address::repeat_byte(0x42), &client);
        let mut reporter = RecordingReporter::default();

        assert!(block_on(has_minter_role(&contract, Address::ZERO, &mut reporter)).unwrap());
        assert!(!block_on(has_minter_role(&contract, Address::ZERO, &mut reporter)).unwrap());
        assert_eq!(reporter.lines, vec!["Minter: true", "Minter: false"]);
        assert!(client.sends().is_empty());
    }
}
