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

use crate::{
    util::{decode_hex, strip_hex_prefix},
    Error, Result,
};
use alloy_primitives::{Address, U256};
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

const ADDRESS_LEN: usize = 20;

/// The parameter types understood by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    Address,
    Uint256,
    Bool,
    Bytes,
    Bytes4,
    String,
}

impl ParamType {
    /// Dynamic types are written as an offset in the head and a
    /// length-prefixed payload in the tail.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, ParamType::Bytes | ParamType::String)
    }
}

impl FromStr for ParamType {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        match input {
            "address" => Ok(ParamType::Address),
            "uint256" | "uint" => Ok(ParamType::Uint256),
            "bool" => Ok(ParamType::Bool),
            "bytes" => Ok(ParamType::Bytes),
            "bytes4" => Ok(ParamType::Bytes4),
            "string" => Ok(ParamType::String),
            other => Err(Error::UnsupportedType(other.to_string())),
        }
    }
}

impl Display for ParamType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamType::Address => "address",
            ParamType::Uint256 => "uint256",
            ParamType::Bool => "bool",
            ParamType::Bytes => "bytes",
            ParamType::Bytes4 => "bytes4",
            ParamType::String => "string",
        };
        f.write_str(name)
    }
}

/// A typed argument value.
///
/// The constructors validate their input so that a `Token` always satisfies
/// the domain of its type; encoding a token can then only fail on a type
/// mismatch with the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Address(Address),
    Uint256(U256),
    Bool(bool),
    Bytes(Vec<u8>),
    Bytes4([u8; 4]),
    String(String),
}

impl Token {
    /// 20 bytes of hex, with or without `0x`. Checksums are not enforced.
    pub fn address(input: &str) -> Result<Self> {
        let bytes = decode_hex(input)?;
        if bytes.len() != ADDRESS_LEN {
            return Err(Error::InvalidAddress(input.to_string()))
        }
        Ok(Token::Address(Address::from_slice(&bytes)))
    }

    /// Decimal text, or hex text with a `0x` prefix.
    pub fn uint256(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = |reason: String| {
            Error::InvalidUint {
                value: input.to_string(),
                reason,
            }
        };
        if trimmed.is_empty() {
            return Err(invalid("empty value".into()))
        }
        if trimmed.starts_with('-') {
            return Err(invalid("negative values are out of range".into()))
        }
        let parsed = if trimmed.starts_with("0x") {
            U256::from_str_radix(strip_hex_prefix(trimmed), 16)
        } else {
            U256::from_str_radix(trimmed, 10)
        };
        parsed.map(Token::Uint256).map_err(|e| invalid(e.to_string()))
    }

    /// Arbitrary length hex, with or without `0x`. `0x` alone is empty bytes.
    pub fn bytes(input: &str) -> Result<Self> {
        decode_hex(input).map(Token::Bytes)
    }

    /// Exactly 4 bytes of hex, with or without `0x`.
    pub fn bytes4(input: &str) -> Result<Self> {
        let bytes = decode_hex(input)?;
        let fixed: [u8; 4] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| Error::InvalidBytes4(input.to_string()))?;
        Ok(Token::Bytes4(fixed))
    }

    pub fn string<S: Into<String>>(input: S) -> Self {
        Token::String(input.into())
    }

    pub fn boolean(input: &str) -> Result<Self> {
        match input {
            "true" => Ok(Token::Bool(true)),
            "false" => Ok(Token::Bool(false)),
            other => Err(Error::InvalidData(format!("`{}` is not a bool", other))),
        }
    }

    /// Parse raw text, e.g. from the command line, as a value of `ty`.
    pub fn parse(ty: ParamType, input: &str) -> Result<Self> {
        log::debug!("Parsing `{}` as `{}`", input, ty);
        match ty {
            ParamType::Address => Token::address(input),
            ParamType::Uint256 => Token::uint256(input),
            ParamType::Bool => Token::boolean(input),
            ParamType::Bytes => Token::bytes(input),
            ParamType::Bytes4 => Token::bytes4(input),
            ParamType::String => Ok(Token::string(input)),
        }
    }

    pub fn param_type(&self) -> ParamType {
        match self {
            Token::Address(_) => ParamType::Address,
            Token::Uint256(_) => ParamType::Uint256,
            Token::Bool(_) => ParamType::Bool,
            Token::Bytes(_) => ParamType::Bytes,
            Token::Bytes4(_) => ParamType::Bytes4,
            Token::String(_) => ParamType::String,
        }
    }

    pub fn into_uint256(self) -> Option<U256> {
        match self {
            Token::Uint256(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_bool(self) -> Option<bool> {
        match self {
            Token::Bool(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            Token::String(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Address> for Token {
    fn from(address: Address) -> Self {
        Token::Address(address)
    }
}

impl From<U256> for Token {
    fn from(value: U256) -> Self {
        Token::Uint256(value)
    }
}

impl From<u64> for Token {
    fn from(value: u64) -> Self {
        Token::Uint256(U256::from(value))
    }
}

impl From<bool> for Token {
    fn from(value: bool) -> Self {
        Token::Bool(value)
    }
}

impl From<[u8; 4]> for Token {
    fn from(value: [u8; 4]) -> Self {
        Token::Bytes4(value)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Token::Address(address) => write!(f, "{}", address),
            Token::Uint256(value) => write!(f, "{}", value),
            Token::Bool(value) => write!(f, "{}", value),
            Token::Bytes(bytes) => write!(f, "0x{}", hex::encode(bytes)),
            Token::Bytes4(bytes) => write!(f, "0x{}", hex::encode(bytes)),
            Token::String(value) => write!(f, "{:?}", value),
        }
    }
}
