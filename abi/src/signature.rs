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

use crate::{Error, ParamType, Result};
use alloy_primitives::keccak256;
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// A function name with its ordered parameter types, e.g.
/// `redeem(uint256,bytes,string,bytes4)`.
///
/// Human readable fragments are accepted too and reduced to their canonical
/// form, so `function mint(address to, uint256 amount)` parses to
/// `mint(address,uint256)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    name: String,
    inputs: Vec<ParamType>,
}

impl FunctionSignature {
    pub fn new<S: Into<String>>(name: S, inputs: Vec<ParamType>) -> Self {
        Self {
            name: name.into(),
            inputs,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[ParamType] {
        &self.inputs
    }

    /// First four bytes of the keccak256 hash of the canonical signature.
    pub fn selector(&self) -> [u8; 4] {
        let hash = keccak256(self.to_string().as_bytes());
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&hash[..4]);
        selector
    }
}

impl FromStr for FunctionSignature {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let malformed = |reason: &str| {
            Error::MalformedSignature {
                signature: input.to_string(),
                reason: reason.to_string(),
            }
        };
        let trimmed = input.trim();
        let trimmed = trimmed.strip_prefix("function ").unwrap_or(trimmed).trim();

        let open = trimmed.find('(').ok_or_else(|| malformed("missing `(`"))?;
        let body = trimmed[open + 1..]
            .strip_suffix(')')
            .ok_or_else(|| malformed("missing closing `)`"))?;
        let name = trimmed[..open].trim();

        let valid_name = name
            .chars()
            .next()
            .map_or(false, |c| c.is_ascii_alphabetic() || c == '_' || c == '$')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
        if !valid_name {
            return Err(malformed("invalid function name"))
        }
        if body.contains(|c: char| c == '(' || c == ')') {
            return Err(malformed("tuple parameters are not supported"))
        }

        let inputs = if body.trim().is_empty() {
            Vec::new()
        } else {
            body.split(',')
                .map(|param| {
                    // the first word is the type, anything after it is a parameter name
                    let ty = param
                        .split_whitespace()
                        .next()
                        .ok_or_else(|| malformed("empty parameter"))?;
                    ty.parse::<ParamType>()
                })
                .collect::<Result<Vec<_>>>()?
        };

        Ok(Self {
            name: name.to_string(),
            inputs,
        })
    }
}

impl Display for FunctionSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let inputs = self
            .inputs
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "{}({})", self.name, inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn canonical_signature_round_trips() {
        let signature: FunctionSignature =
            "redeem(uint256,bytes,string,bytes4)".parse().unwrap();
        assert_eq!(signature.name(), "redeem");
        assert_eq!(
            signature.inputs(),
            &[
                ParamType::Uint256,
                ParamType::Bytes,
                ParamType::String,
                ParamType::Bytes4
            ]
        );
        assert_eq!(signature.to_string(), "redeem(uint256,bytes,string,bytes4)");
    }

    #[test]
    fn human_readable_fragment_is_canonicalised() {
        let signature: FunctionSignature = "function initialize(string tokenName, string tokenSymbol, address defaultAdmin, bytes4 originChainId)"
            .parse()
            .unwrap();
        assert_eq!(
            signature.to_string(),
            "initialize(string,string,address,bytes4)"
        );
    }

    #[test]
    fn known_selectors() {
        let selector = |s: &str| s.parse::<FunctionSignature>().unwrap().selector();
        assert_eq!(selector("redeem(uint256,string,bytes4)"), [0xcd, 0x61, 0xf0, 0xb6]);
        // ERC20 `balanceOf(address)`
        assert_eq!(selector("balanceOf(address)"), [0x70, 0xa0, 0x82, 0x31]);
        // Solidity `Error(string)` revert payload
        assert_eq!(selector("Error(string)"), [0x08, 0xc3, 0x79, 0xa0]);
        // `uint` is an alias of `uint256` and hashes identically
        assert_eq!(selector("balanceOf(uint)"), selector("balanceOf(uint256)"));
    }

    #[test]
    fn empty_parameter_list() {
        let signature: FunctionSignature = "ORIGIN_CHAIN_ID()".parse().unwrap();
        assert!(signature.inputs().is_empty());
        assert_eq!(signature.to_string(), "ORIGIN_CHAIN_ID()");
    }

    #[test]
    fn malformed_signatures_are_rejected() {
        assert_matches!(
            "redeem".parse::<FunctionSignature>(),
            Err(Error::MalformedSignature { .. })
        );
        assert_matches!(
            "redeem(uint256".parse::<FunctionSignature>(),
            Err(Error::MalformedSignature { .. })
        );
        assert_matches!(
            "(uint256)".parse::<FunctionSignature>(),
            Err(Error::MalformedSignature { .. })
        );
        assert_matches!(
            "redeem(uint256,)".parse::<FunctionSignature>(),
            Err(Error::MalformedSignature { .. })
        );
        assert_matches!(
            "redeem(uint8)".parse::<FunctionSignature>(),
            Err(Error::UnsupportedType(_))
        );
    }
}
