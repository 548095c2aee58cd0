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

//! Inlines every import of a Solidity source into a single file, as block
//! explorers expect for single file verification.

use super::{
    report::{ConsoleReporter, Reporter},
    ConfigOpts, ErrorVariant,
};
use crate::util::display_relative;
use anyhow::Result;
use regex::Regex;
use std::{
    collections::HashSet,
    fs,
    io,
    path::{Path, PathBuf},
};
use structopt::StructOpt;

const IMPORT_PATTERN: &str = r#"(?m)^\s*import\s+[^;]*?["']([^"']+)["'][^;]*;"#;
const SPDX_PATTERN: &str = r"^\s*//\s*SPDX-License-Identifier:";
const SOLIDITY_PRAGMA_PATTERN: &str = r"^\s*pragma\s+solidity\b";

#[derive(Debug, StructOpt)]
#[structopt(
    name = "flattenContract",
    about = "Flatten the pToken contract in case manual verification is required"
)]
pub struct FlattenContractCommand {
    /// The Solidity source to flatten. Defaults to `compiler.source` from the
    /// configuration file.
    #[structopt(long, parse(from_os_str))]
    contract: Option<PathBuf>,
    /// Where to write the flattened source.
    #[structopt(long, parse(from_os_str), default_value = "flattened.sol")]
    output: PathBuf,
    #[structopt(flatten)]
    config: ConfigOpts,
}

impl FlattenContractCommand {
    pub fn run(&self) -> Result<()> {
        let contract = match &self.contract {
            Some(contract) => contract.clone(),
            None => self.config.load()?.compiler.source,
        };
        let project_root = std::env::current_dir()?;
        let flattened = flatten(&contract, &project_root)?;
        write_flattened(&self.output, &flattened)?;
        ConsoleReporter.success(&format!(
            "Flattened contract written to {}",
            self.output.display()
        ));
        Ok(())
    }
}

pub fn write_flattened(output: &Path, flattened: &str) -> Result<(), ErrorVariant> {
    if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, flattened)?;
    Ok(())
}

/// Flattens `entry`. Non-relative imports are looked up in `project_root`
/// and then in its `node_modules`.
pub fn flatten(entry: &Path, project_root: &Path) -> Result<String, ErrorVariant> {
    let mut flattener = Flattener::new(project_root)?;
    let mut flattened = String::from("// Sources flattened with ptoken-deployer\n");
    flattener.visit(entry, &mut flattened)?;
    Ok(flattened)
}

struct Flattener {
    base: PathBuf,
    roots: Vec<PathBuf>,
    visited: HashSet<PathBuf>,
    import: Regex,
    spdx: Regex,
    solidity_pragma: Regex,
    license_seen: bool,
    solidity_pragma_seen: bool,
    pragmas: HashSet<String>,
}

impl Flattener {
    fn new(project_root: &Path) -> Result<Self, ErrorVariant> {
        let regex = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|err| ErrorVariant::validation(format!("invalid pattern: {}", err)))
        };
        let base = project_root
            .canonicalize()
            .unwrap_or_else(|_| project_root.to_path_buf());
        Ok(Flattener {
            roots: vec![base.clone(), base.join("node_modules")],
            base,
            visited: HashSet::new(),
            import: regex(IMPORT_PATTERN)?,
            spdx: regex(SPDX_PATTERN)?,
            solidity_pragma: regex(SOLIDITY_PRAGMA_PATTERN)?,
            license_seen: false,
            solidity_pragma_seen: false,
            pragmas: HashSet::new(),
        })
    }

    /// Appends the dependencies of `path` and then `path` itself. Files are
    /// emitted once, so import cycles terminate.
    fn visit(&mut self, path: &Path, out: &mut String) -> Result<(), ErrorVariant> {
        let path = path.canonicalize().map_err(|err| {
            io::Error::new(err.kind(), format!("{}: {}", path.display(), err))
        })?;
        if !self.visited.insert(path.clone()) {
            return Ok(())
        }
        log::debug!("flattening {}", path.display());
        let source = fs::read_to_string(&path)?;
        let dir = path.parent().unwrap_or(&self.base).to_path_buf();

        let imports: Vec<String> = self
            .import
            .captures_iter(&source)
            .map(|captures| captures[1].to_string())
            .collect();
        for import in imports {
            let resolved = self.resolve(&import, &dir)?;
            self.visit(&resolved, out)?;
        }

        out.push_str(&format!(
            "\n// File: {}\n\n",
            display_relative(&path, &self.base)
        ));
        let without_imports = self.import.replace_all(&source, "");
        for line in without_imports.lines() {
            if self.keep_line(line) {
                out.push_str(line);
                out.push('\n');
            }
        }
        Ok(())
    }

    /// Keeps the first license identifier and solidity version pragma, and
    /// each distinct other pragma once.
    fn keep_line(&mut self, line: &str) -> bool {
        if self.spdx.is_match(line) {
            return !std::mem::replace(&mut self.license_seen, true)
        }
        if self.solidity_pragma.is_match(line) {
            return !std::mem::replace(&mut self.solidity_pragma_seen, true)
        }
        let trimmed = line.trim();
        if trimmed.starts_with("pragma ") {
            return self.pragmas.insert(trimmed.to_string())
        }
        true
    }

    fn resolve(&self, import: &str, from: &Path) -> Result<PathBuf, ErrorVariant> {
        let candidates: Vec<PathBuf> = if import.starts_with("./") || import.starts_with("../") {
            vec![from.join(import)]
        } else {
            self.roots.iter().map(|root| root.join(import)).collect()
        };
        candidates
            .into_iter()
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!(
                        "cannot resolve import `{}` from {}",
                        import,
                        display_relative(from, &self.base)
                    ),
                )
                .into()
            })
    }
}
