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

use super::report::{ConsoleReporter, Reporter};
use anyhow::Result;
use ptoken_abi::{encoded_proxy_constructor_args, init_call_data};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "getEncodedInitArgs",
    about = "Calculate the initializer function arguments in ABI encoded format"
)]
pub struct GetEncodedInitArgsCommand {
    /// The name of the pToken.
    #[structopt(name = "tokenName")]
    token_name: String,
    /// The symbol of the pToken.
    #[structopt(name = "tokenSymbol")]
    token_symbol: String,
    /// The ETH address which administrates the pToken.
    #[structopt(name = "adminAddress")]
    admin_address: String,
    /// Chain id of the chain the pToken originates from, as 4 bytes of hex.
    #[structopt(long = "originChainId", default_value = "0x00000000")]
    origin_chain_id: String,
}

impl GetEncodedInitArgsCommand {
    pub fn run(&self) -> Result<()> {
        self.exec(&mut ConsoleReporter)
    }

    pub fn exec(&self, reporter: &mut dyn Reporter) -> Result<()> {
        let call_data = init_call_data(
            &self.token_name,
            &self.token_symbol,
            &self.admin_address,
            &self.origin_chain_id,
        )?;
        reporter.raw(&call_data);
        Ok(())
    }
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "getEncodedProxyConstructorArgs",
    about = "Calculate the proxy constructor arguments, as needed to verify a proxy"
)]
pub struct GetEncodedProxyConstructorArgsCommand {
    #[structopt(name = "tokenName")]
    token_name: String,
    #[structopt(name = "tokenSymbol")]
    token_symbol: String,
    /// The ETH address of the deployed pToken logic contract.
    #[structopt(name = "logicAddress")]
    logic_address: String,
    /// The ETH address which administrates the pToken.
    #[structopt(name = "adminAddress")]
    admin_address: String,
    /// The ETH address allowed to upgrade the proxy.
    #[structopt(name = "proxyAdminAddress")]
    proxy_admin_address: String,
    #[structopt(long = "originChainId", default_value = "0x00000000")]
    origin_chain_id: String,
}

impl GetEncodedProxyConstructorArgsCommand {
    pub fn run(&self) -> Result<()> {
        self.exec(&mut ConsoleReporter)
    }

    pub fn exec(&self, reporter: &mut dyn Reporter) -> Result<()> {
        let args = encoded_proxy_constructor_args(
            &self.token_name,
            &self.token_symbol,
            &self.logic_address,
            &self.admin_address,
            &self.proxy_admin_address,
            &self.origin_chain_id,
        )?;
        reporter.raw(&args);
        Ok(())
    }
}
