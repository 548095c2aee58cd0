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
    dispatch::deploy,
    report::{ConsoleReporter, Reporter},
    ChainOpts, ErrorVariant,
};
use anyhow::Result;
use ptoken_abi::util::decode_hex;
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "deployPToken", about = "Deploy the pToken logic contract")]
pub struct DeployPTokenCommand {
    /// Path to the compiled contract artifact, a hardhat or foundry JSON file.
    /// Defaults to `compiler.artifact` from the configuration file.
    #[structopt(long, parse(from_os_str))]
    artifact: Option<PathBuf>,
    #[structopt(flatten)]
    chain: ChainOpts,
}

impl DeployPTokenCommand {
    pub fn run(&self) -> Result<()> {
        let artifact = match &self.artifact {
            Some(artifact) => artifact.clone(),
            None => self.chain.config().load()?.compiler.artifact,
        };
        let bytecode = load_bytecode(&artifact)?;
        let client = self.chain.signing_client()?;
        async_std::task::block_on(deploy_ptoken(
            &client,
            bytecode,
            self.chain.gas_price(),
            &mut ConsoleReporter,
        ))?;
        Ok(())
    }
}

pub async fn deploy_ptoken(
    client: &dyn ChainClient,
    bytecode: Vec<u8>,
    gas_price: Option<u128>,
    reporter: &mut dyn Reporter,
) -> Result<(), ErrorVariant> {
    let receipt = deploy(client, bytecode, gas_price).await?;
    reporter.receipt(&receipt);
    Ok(())
}

/// Reads the creation bytecode out of a compiled artifact.
///
/// Hardhat artifacts carry it as a `bytecode` string, foundry ones as
/// `bytecode.object`.
pub fn load_bytecode(path: &Path) -> Result<Vec<u8>, ErrorVariant> {
    log::debug!("loading artifact {}", path.display());
    let contents = fs::read_to_string(path).map_err(|err| {
        ErrorVariant::config(format!("cannot read artifact {}: {}", path.display(), err))
    })?;
    let artifact: Value = serde_json::from_str(&contents)
        .map_err(|err| ErrorVariant::config(format!("{}: {}", path.display(), err)))?;
    let bytecode = match &artifact["bytecode"] {
        Value::String(bytecode) => bytecode.as_str(),
        Value::Object(object) => object
            .get("object")
            .and_then(Value::as_str)
            .unwrap_or_default(),
        _ => "",
    };
    if bytecode.contains("__") {
        return Err(ErrorVariant::config(format!(
            "{} has unlinked library references",
            path.display()
        )))
    }
    let bytecode = decode_hex(bytecode)?;
    if bytecode.is_empty() {
        return Err(ErrorVariant::config(format!(
            "{} contains no bytecode",
            path.display()
        )))
    }
    Ok(bytecode)
}
