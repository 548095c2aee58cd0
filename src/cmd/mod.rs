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

pub mod balance;
pub mod client;
pub mod deploy;
pub mod dispatch;
pub mod encode;
mod error;
pub mod existing;
pub mod fees;
pub mod flatten;
pub mod guard;
pub mod mint;
pub mod peg_out;
pub mod report;
pub mod roles;
pub mod verify;

pub(crate) use self::{
    balance::GetBalanceOfCommand,
    deploy::DeployPTokenCommand,
    encode::{GetEncodedInitArgsCommand, GetEncodedProxyConstructorArgsCommand},
    existing::ShowExistingContractsCommand,
    fees::ShowSuggestedFeesCommand,
    flatten::FlattenContractCommand,
    mint::MintCommand,
    peg_out::PegOutCommand,
    roles::{GrantMinterRoleCommand, HasMinterRoleCommand, RevokeMinterRoleCommand},
    verify::VerifyPTokenCommand,
};
pub use self::error::ErrorVariant;

use crate::config::Config;
use alloy::signers::local::PrivateKeySigner;
use client::AlloyClient;
use ptoken_abi::util::strip_hex_prefix;
use std::path::PathBuf;
use structopt::StructOpt;

/// Where to find the configuration file and which of its networks to use.
#[derive(Debug, StructOpt)]
pub struct ConfigOpts {
    /// Path to the configuration file.
    #[structopt(long, parse(from_os_str), default_value = "ptoken-deployer.toml")]
    config: PathBuf,
    /// Network from the configuration file. Defaults to its `default_network`.
    #[structopt(long)]
    network: Option<String>,
}

impl ConfigOpts {
    pub fn load(&self) -> Result<Config, ErrorVariant> {
        Config::load(&self.config)
    }

    pub fn network(&self) -> Option<&str> {
        self.network.as_deref()
    }
}

/// Arguments required for connecting to a node and sending transactions.
#[derive(Debug, StructOpt)]
pub struct ChainOpts {
    /// HTTP url of an Ethereum node. Takes precedence over the network's `rpc_url`.
    #[structopt(name = "endpoint", long, env = "ENDPOINT", parse(try_from_str))]
    endpoint: Option<url::Url>,
    /// Hex encoded private key of the account signing transactions.
    #[structopt(long = "privateKey", env = "PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,
    /// Gas price in wei. Without it the node's fee suggestions are used.
    #[structopt(long = "gasPrice")]
    gas_price: Option<u128>,
    #[structopt(flatten)]
    config: ConfigOpts,
}

impl ChainOpts {
    pub fn config(&self) -> &ConfigOpts {
        &self.config
    }

    pub fn gas_price(&self) -> Option<u128> {
        self.gas_price
    }

    pub fn signer(&self) -> Result<PrivateKeySigner, ErrorVariant> {
        let key = self.private_key.as_deref().ok_or_else(|| {
            ErrorVariant::config("a private key is required, set PRIVATE_KEY or pass --privateKey")
        })?;
        strip_hex_prefix(key)
            .parse::<PrivateKeySigner>()
            .map_err(|err| ErrorVariant::config(format!("invalid private key: {}", err)))
    }

    pub fn endpoint(&self) -> Result<url::Url, ErrorVariant> {
        if let Some(endpoint) = &self.endpoint {
            return Ok(endpoint.clone())
        }
        let config = self.config.load()?;
        let (name, network) = config.network(self.config.network())?;
        log::debug!("using network {} (chain id {:?})", name, network.chain_id);
        Ok(network.rpc_url.clone())
    }

    /// A client able to sign and send transactions.
    pub fn signing_client(&self) -> Result<AlloyClient, ErrorVariant> {
        let signer = self.signer()?;
        log::info!("sending transactions from {}", signer.address());
        Ok(client::connect(&self.endpoint()?, Some(signer)))
    }

    /// A client for read-only calls. Uses the private key, if one is
    /// configured, as the `from` of the calls.
    pub fn read_client(&self) -> Result<AlloyClient, ErrorVariant> {
        let signer = match self.private_key {
            Some(_) => Some(self.signer()?),
            None => None,
        };
        Ok(client::connect(&self.endpoint()?, signer))
    }
}
