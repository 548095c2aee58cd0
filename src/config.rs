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

//! The `ptoken-deployer.toml` configuration file.
//!
//! ```toml
//! default_network = "ropsten"
//!
//! [networks.ropsten]
//! rpc_url = "https://ropsten.infura.io/v3/<key>"
//! chain_id = 3
//! explorer_api_url = "https://api-ropsten.etherscan.io/api"
//!
//! [compiler]
//! version = "v0.6.2+commit.bacdbe57"
//!
//! [[existing_contracts]]
//! network = "ropsten"
//! address = "0x..."
//! ```

use crate::cmd::ErrorVariant;
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fs,
    io,
    path::{Path, PathBuf},
};
use url::Url;

const DEFAULT_API_KEY_ENV: &str = "ETHERSCAN_API_KEY";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub default_network: Option<String>,
    #[serde(default)]
    pub networks: BTreeMap<String, Network>,
    #[serde(default)]
    pub compiler: Compiler,
    #[serde(default)]
    pub existing_contracts: Vec<ExistingContract>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Network {
    pub rpc_url: Url,
    pub chain_id: Option<u64>,
    /// Etherscan compatible API of the network's block explorer.
    pub explorer_api_url: Option<Url>,
    /// Name of the environment variable holding the explorer API key.
    pub explorer_api_key_env: Option<String>,
}

impl Network {
    pub fn explorer_api_key_env(&self) -> &str {
        self.explorer_api_key_env
            .as_deref()
            .unwrap_or(DEFAULT_API_KEY_ENV)
    }
}

/// Compiler settings the logic contract was built with, needed for
/// source verification.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Compiler {
    pub version: String,
    pub optimizer_runs: Option<u32>,
    pub evm_version: Option<String>,
    pub contract_name: String,
    pub source: PathBuf,
    pub artifact: PathBuf,
}

impl Default for Compiler {
    fn default() -> Self {
        Compiler {
            version: "v0.6.2+commit.bacdbe57".into(),
            optimizer_runs: Some(200),
            evm_version: None,
            contract_name: "PToken".into(),
            source: PathBuf::from("contracts/PToken.sol"),
            artifact: PathBuf::from("artifacts/contracts/PToken.sol/PToken.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExistingContract {
    pub network: String,
    pub address: String,
    pub description: Option<String>,
}

impl Config {
    /// Loads the config at `path`. A missing file yields the default config,
    /// any other problem is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ErrorVariant> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("no config file at {}, using defaults", path.display());
                return Ok(Config::default())
            }
            Err(err) => return Err(err.into()),
        };
        Self::parse(&contents)
            .map_err(|err| ErrorVariant::config(format!("{}: {}", path.display(), err)))
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Looks up `name`, or the default network when `name` is `None`.
    pub fn network(&self, name: Option<&str>) -> Result<(&str, &Network), ErrorVariant> {
        let name = name
            .or(self.default_network.as_deref())
            .ok_or_else(|| {
                ErrorVariant::config("no network given and no `default_network` configured")
            })?;
        self.networks
            .get_key_value(name)
            .map(|(name, network)| (name.as_str(), network))
            .ok_or_else(|| ErrorVariant::config(format!("unknown network `{}`", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    const CONFIG: &str = r#"
        default_network = "ropsten"

        [networks.ropsten]
        rpc_url = "https://ropsten.example.org/"
        chain_id = 3
        explorer_api_url = "https://api-ropsten.etherscan.io/api"

        [networks.bsc]
        rpc_url = "https://bsc.example.org/"
        explorer_api_key_env = "BSCSCAN_API_KEY"

        [compiler]
        version = "v0.6.2+commit.bacdbe57"
        optimizer_runs = 200
        contract_name = "PToken"
        source = "contracts/PToken.sol"
        artifact = "artifacts/PToken.json"

        [[existing_contracts]]
        network = "ropsten"
        address = "0x4b62d8b8e7a8b6e2f4e0e4f6a4b8f0c8b0e1a2c3"
    "#;

    #[test]
    fn parses_networks_and_contracts() {
        let config = Config::parse(CONFIG).unwrap();

        let (name, network) = config.network(None).unwrap();
        assert_eq!(name, "ropsten");
        assert_eq!(network.chain_id, Some(3));
        assert_eq!(network.explorer_api_key_env(), "ETHERSCAN_API_KEY");

        let (_, bsc) = config.network(Some("bsc")).unwrap();
        assert_eq!(bsc.explorer_api_key_env(), "BSCSCAN_API_KEY");

        assert_eq!(config.existing_contracts.len(), 1);
        assert_eq!(config.compiler.artifact, PathBuf::from("artifacts/PToken.json"));
    }

    #[test]
    fn unknown_network_is_an_error() {
        let config = Config::parse(CONFIG).unwrap();
        assert_matches!(config.network(Some("mainnet")), Err(ErrorVariant::Config(_)));
        assert_matches!(
            Config::default().network(None),
            Err(ErrorVariant::Config(_))
        );
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("ptoken-deployer.toml")).unwrap();
        assert!(config.networks.is_empty());
        assert_eq!(config.compiler.contract_name, "PToken");
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ptoken-deployer.toml");
        fs::write(&path, "networks = 3").unwrap();
        assert_matches!(Config::load(&path), Err(ErrorVariant::Config(_)));
    }
}
