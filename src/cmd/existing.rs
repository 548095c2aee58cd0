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
    report::{ConsoleReporter, Reporter},
    ConfigOpts,
};
use crate::config::Config;
use anyhow::Result;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "showExistingContracts",
    about = "Show list of existing pToken logic contract addresses on various blockchains"
)]
pub struct ShowExistingContractsCommand {
    #[structopt(flatten)]
    config: ConfigOpts,
}

impl ShowExistingContractsCommand {
    pub fn run(&self) -> Result<()> {
        let config = self.config.load()?;
        show_existing_contracts(&config, self.config.network(), &mut ConsoleReporter);
        Ok(())
    }
}

/// Lists the configured logic contracts, all of them unless `network` is given.
pub fn show_existing_contracts(
    config: &Config,
    network: Option<&str>,
    reporter: &mut dyn Reporter,
) -> usize {
    let contracts: Vec<_> = config
        .existing_contracts
        .iter()
        .filter(|contract| network.map_or(true, |network| contract.network == network))
        .collect();
    if contracts.is_empty() {
        log::warn!("no existing contracts configured");
    }
    for contract in &contracts {
        match &contract.description {
            Some(description) => reporter.field(
                &contract.network,
                &format!("{} ({})", contract.address, description),
            ),
            None => reporter.field(&contract.network, &contract.address),
        }
    }
    contracts.len()
}
