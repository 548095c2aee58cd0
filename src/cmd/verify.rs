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

//! Source verification through an Etherscan compatible block explorer.

use super::{
    flatten::flatten,
    guard::check_is_address,
    report::{ConsoleReporter, Reporter},
    ErrorVariant,
};
use crate::config::{Compiler, Config, Network};
use alloy::primitives::Address;
use anyhow::Result;
use foundry_block_explorers::{
    verify::{CodeFormat, VerifyContract},
    Client, Response,
};
use std::{path::PathBuf, time::Duration};
use structopt::StructOpt;
use url::Url;

const MAX_STATUS_CHECKS: usize = 20;
const STATUS_CHECK_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, StructOpt)]
#[structopt(name = "verifyPToken", about = "Verify a deployed pToken logic contract")]
pub struct VerifyPTokenCommand {
    /// The ETH address of the deployed pToken.
    #[structopt(name = "deployedAddress")]
    deployed_address: String,
    /// Network the pToken is deployed on. It must exist in the configuration file.
    network: String,
    /// The Solidity source to verify. Defaults to `compiler.source` from the
    /// configuration file.
    #[structopt(long, parse(from_os_str))]
    contract: Option<PathBuf>,
    /// Explorer API key. When unset, the variable named by the network's
    /// `explorer_api_key_env` is read instead.
    #[structopt(long = "apiKey", env = "ETHERSCAN_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// Path to the configuration file.
    #[structopt(long, parse(from_os_str), default_value = "ptoken-deployer.toml")]
    config: PathBuf,
}

impl VerifyPTokenCommand {
    pub fn run(&self) -> Result<()> {
        let address = check_is_address(&self.deployed_address)?;
        let config = Config::load(&self.config)?;
        let (_, network) = config.network(Some(self.network.as_str()))?;
        let api_url = network.explorer_api_url.clone().ok_or_else(|| {
            ErrorVariant::config(format!(
                "network `{}` has no `explorer_api_url`",
                self.network
            ))
        })?;
        let api_key = self.api_key(network)?;
        let client = explorer_client(network, &api_url, &api_key)?;

        let source_path = self
            .contract
            .clone()
            .unwrap_or_else(|| config.compiler.source.clone());
        let source = flatten(&source_path, &std::env::current_dir()?)?;
        let request = verification_request(address, source, &config.compiler);

        log::info!("submitting source for verification to {}", api_url);
        async_std::task::block_on(verify(&client, &request, &mut ConsoleReporter))?;
        Ok(())
    }

    fn api_key(&self, network: &Network) -> Result<String, ErrorVariant> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone())
        }
        let key_env = network.explorer_api_key_env();
        std::env::var(key_env).map_err(|_| {
            ErrorVariant::config(format!(
                "pass --apiKey or set {} to verify on `{}`",
                key_env, self.network
            ))
        })
    }
}

/// Builds a client talking to the network's configured explorer API.
pub fn explorer_client(
    network: &Network,
    api_url: &Url,
    api_key: &str,
) -> Result<Client, ErrorVariant> {
    let mut builder = Client::builder().with_api_key(api_key);
    if let Some(chain_id) = network.chain_id {
        builder = builder.with_chain_id(chain_id.into());
    }
    // The browser url is only used for links, none are printed.
    builder
        .with_url(api_url.clone())
        .and_then(|builder| builder.with_api_url(api_url.clone()))
        .and_then(|builder| builder.build())
        .map_err(|err| ErrorVariant::config(format!("invalid explorer settings: {}", err)))
}

/// A single-file verification request carrying the compiler settings.
pub fn verification_request(
    address: Address,
    source: String,
    compiler: &Compiler,
) -> VerifyContract {
    let request = VerifyContract::new(
        address,
        compiler.contract_name.clone(),
        source,
        compiler.version.clone(),
    )
    .code_format(CodeFormat::SingleFile);
    let request = match compiler.optimizer_runs {
        Some(runs) => request.optimization(true).runs(runs),
        None => request.optimization(false),
    };
    match &compiler.evm_version {
        Some(evm_version) => request.evm_version(evm_version.clone()),
        None => request,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Queued, poll with this id.
    Guid(String),
    AlreadyVerified,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationStatus {
    Pending,
    Verified,
    Failed(String),
}

impl Submission {
    pub fn from_response(response: Response<String>) -> Result<Self, ErrorVariant> {
        match response.message.as_str() {
            "OK" => Ok(Submission::Guid(response.result)),
            _ if response.result == "Contract source code already verified" => {
                Ok(Submission::AlreadyVerified)
            }
            _ => Err(ErrorVariant::Submission(format!(
                "explorer rejected the verification request: {}",
                response.result
            ))),
        }
    }
}

impl From<Response<String>> for VerificationStatus {
    fn from(response: Response<String>) -> Self {
        match (response.message.as_str(), response.result.as_str()) {
            (_, "Pending in queue") => VerificationStatus::Pending,
            ("OK", _) | (_, "Already Verified") => VerificationStatus::Verified,
            _ => VerificationStatus::Failed(response.result),
        }
    }
}

async fn verify(
    client: &Client,
    request: &VerifyContract,
    reporter: &mut dyn Reporter,
) -> Result<(), ErrorVariant> {
    let response = client
        .submit_contract_verification(request)
        .await
        .map_err(|err| ErrorVariant::Submission(err.to_string()))?;

    let guid = match Submission::from_response(response)? {
        Submission::AlreadyVerified => {
            reporter.success("Contract is already verified");
            return Ok(())
        }
        Submission::Guid(guid) => guid,
    };
    reporter.field("Verification", &guid);

    for _ in 0..MAX_STATUS_CHECKS {
        async_std::task::sleep(STATUS_CHECK_INTERVAL).await;
        let response = client
            .check_contract_verification_status(&guid)
            .await
            .map_err(|err| ErrorVariant::Rpc(err.to_string()))?;
        match VerificationStatus::from(response) {
            VerificationStatus::Pending => log::info!("verification {} pending", guid),
            VerificationStatus::Verified => {
                reporter.success("Contract verified");
                return Ok(())
            }
            VerificationStatus::Failed(reason) => {
                return Err(ErrorVariant::Submission(format!(
                    "verification failed: {}",
                    reason
                )))
            }
        }
    }
    Err(ErrorVariant::Submission(format!(
        "verification {} still pending after {} checks",
        guid, MAX_STATUS_CHECKS
    )))
}
