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

mod cmd;
mod config;
mod util;

use self::cmd::{
    DeployPTokenCommand, FlattenContractCommand, GetBalanceOfCommand, GetEncodedInitArgsCommand,
    GetEncodedProxyConstructorArgsCommand, GrantMinterRoleCommand, HasMinterRoleCommand,
    MintCommand, PegOutCommand, RevokeMinterRoleCommand, ShowExistingContractsCommand,
    ShowSuggestedFeesCommand, VerifyPTokenCommand,
};

use anyhow::Result;
use colored::Colorize;
use structopt::{clap, StructOpt};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "ptoken-deployer",
    about = "A tool to aid with deployments of the upgradeable pToken ERC777 logic contract."
)]
#[structopt(setting = clap::AppSettings::UnifiedHelpMessage)]
#[structopt(setting = clap::AppSettings::DeriveDisplayOrder)]
#[structopt(setting = clap::AppSettings::DontCollapseArgsInUsage)]
#[structopt(setting = clap::AppSettings::SubcommandRequiredElseHelp)]
pub(crate) struct Opts {
    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Deploy the pToken logic contract.
    #[structopt(name = "deployPToken")]
    DeployPToken(DeployPTokenCommand),
    /// Verify a deployed pToken logic contract.
    #[structopt(name = "verifyPToken")]
    VerifyPToken(VerifyPTokenCommand),
    /// Calculate the initializer function arguments in ABI encoded format.
    #[structopt(name = "getEncodedInitArgs")]
    GetEncodedInitArgs(GetEncodedInitArgsCommand),
    /// Calculate the proxy constructor arguments in ABI encoded format.
    #[structopt(name = "getEncodedProxyConstructorArgs")]
    GetEncodedProxyConstructorArgs(GetEncodedProxyConstructorArgsCommand),
    /// Show the node's suggested fees.
    #[structopt(name = "showSuggestedFees")]
    ShowSuggestedFees(ShowSuggestedFeesCommand),
    /// Flatten the pToken contract in case manual verification is required.
    #[structopt(name = "flattenContract")]
    FlattenContract(FlattenContractCommand),
    /// Show existing pToken logic contract addresses on various blockchains.
    #[structopt(name = "showExistingContracts")]
    ShowExistingContracts(ShowExistingContractsCommand),
    /// Grant a minter role to <ethAddress> for pToken at <deployedAddress>.
    #[structopt(name = "grantMinterRole")]
    GrantMinterRole(GrantMinterRoleCommand),
    /// Revoke the minter role of <ethAddress> for pToken at <deployedAddress>.
    #[structopt(name = "revokeMinterRole")]
    RevokeMinterRole(RevokeMinterRoleCommand),
    /// Check whether <ethAddress> is a minter of pToken at <deployedAddress>.
    #[structopt(name = "hasMinterRole")]
    HasMinterRole(HasMinterRoleCommand),
    /// Mint <amount> pTokens at <deployedAddress> to <recipient>.
    #[structopt(name = "mint")]
    Mint(MintCommand),
    /// Get balance of <ethAddress> of pToken at <deployedAddress>.
    #[structopt(name = "getBalanceOf")]
    GetBalanceOf(GetBalanceOfCommand),
    /// Redeem <amount> at <deployedAddress> with optional user data.
    #[structopt(name = "pegOut")]
    PegOut(PegOutCommand),
}

fn main() {
    env_logger::init();
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            log::warn!("failed to load .env: {}", err);
        }
    }

    let Opts { cmd } = Opts::from_args();
    match exec(cmd) {
        Ok(()) => {}
        Err(err) => {
            eprintln!("{} {}", "✘".bright_red().bold(), format!("{:#}", err).bright_red());
            std::process::exit(1);
        }
    }
}

fn exec(cmd: Command) -> Result<()> {
    match &cmd {
        Command::DeployPToken(deploy) => deploy.run(),
        Command::VerifyPToken(verify) => verify.run(),
        Command::GetEncodedInitArgs(encode) => encode.run(),
        Command::GetEncodedProxyConstructorArgs(encode) => encode.run(),
        Command::ShowSuggestedFees(fees) => fees.run(),
        Command::FlattenContract(flatten) => flatten.run(),
        Command::ShowExistingContracts(existing) => existing.run(),
        Command::GrantMinterRole(grant) => grant.run(),
        Command::RevokeMinterRole(revoke) => revoke.run(),
        Command::HasMinterRole(has_role) => has_role.run(),
        Command::Mint(mint) => mint.run(),
        Command::GetBalanceOf(balance) => balance.run(),
        Command::PegOut(peg_out) => peg_out.run(),
    }
}
