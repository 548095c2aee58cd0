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

use super::client::TransactionReceipt;
use colored::Colorize;
use std::fmt::Display;

pub const DEFAULT_KEY_COL_WIDTH: usize = 16;

/// Where commands send their human readable results.
pub trait Reporter {
    /// A headline announcing that the command succeeded.
    fn success(&mut self, message: &str);

    /// A single named value.
    fn field(&mut self, name: &str, value: &dyn Display);

    /// Raw output meant to be piped somewhere else, printed without decoration.
    fn raw(&mut self, value: &dyn Display);

    fn receipt(&mut self, receipt: &TransactionReceipt) {
        self.success("Success! Transaction receipt:");
        self.field("Transaction", &receipt.transaction_hash);
        if let Some(block) = receipt.block_number {
            self.field("Block", &block);
        }
        self.field("Status", &if receipt.status { "success" } else { "failed" });
        self.field("Gas used", &receipt.gas_used);
        if let Some(address) = receipt.contract_address {
            self.field("Contract", &address);
        }
        self.field("Logs", &receipt.logs);
    }
}

/// Prints to stdout.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn success(&mut self, message: &str) {
        println!("{} {}", "✔".bright_green().bold(), message.bold());
    }

    fn field(&mut self, name: &str, value: &dyn Display) {
        println!(
            "{:>width$} {}",
            name.bright_purple().bold(),
            value,
            width = DEFAULT_KEY_COL_WIDTH
        );
    }

    fn raw(&mut self, value: &dyn Display) {
        println!("{}", value);
    }
}

/// Keeps every line, for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub lines: Vec<String>,
}

#[cfg(test)]
impl RecordingReporter {
    pub fn field_value(&self, name: &str) -> Option<&str> {
        let prefix = format!("{}: ", name);
        self.lines
            .iter()
            .find_map(|line| line.strip_prefix(prefix.as_str()))
    }
}

#[cfg(test)]
impl Reporter for RecordingReporter {
    fn success(&mut self, message: &str) {
        self.lines.push(format!("✔ {}", message));
    }

    fn field(&mut self, name: &str, value: &dyn Display) {
        self.lines.push(format!("{}: {}", name, value));
    }

    fn raw(&mut self, value: &dyn Display) {
        self.lines.push(value.to_string());
    }
}
