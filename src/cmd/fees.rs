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
    report::{ConsoleReporter, Reporter},
    ChainOpts, ErrorVariant,
};
use anyhow::Result;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "showSuggestedFees", about = "Show the node's suggested fees")]
pub struct ShowSuggestedFeesCommand {
    #[structopt(flatten)]
    chain: ChainOpts,
}

impl ShowSuggestedFeesCommand {
    pub fn run(&self) -> Result<()> {
        let client = self.chain.read_client()?;
        async_std::task::block_on(show_suggested_fees(&client, &mut ConsoleReporter))?;
        Ok(())
    }
}

pub async fn show_suggested_fees(
    client: &dyn ChainClient,
    reporter: &mut dyn Reporter,
) -> Result<(), ErrorVariant> {
    let fees = client.suggested_fees().await?;
    reporter.field("gasPrice", &fees.gas_price);
    reporter.field("maxFeePerGas", &fees.max_fee_per_gas);
    reporter.field("maxPriorityFeePerGas", &fees.max_priority_fee_per_gas);
    Ok(())
}
