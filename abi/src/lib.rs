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

//! Encoding and decoding of the calls the pToken tooling makes.
//!
//! This is not a general purpose ABI codec. Only the closed set of parameter
//! types used by the pToken logic contract, its proxy constructor and the
//! `Error(string)` revert payload are supported:
//! `address`, `uint256`, `bool`, `bytes`, `bytes4` and `string`.
//!
//! ```
//! use ptoken_abi::{encode, FunctionSignature, Token};
//!
//! let signature: FunctionSignature = "grantMinterRole(address)".parse().unwrap();
//! let minter = Token::address("0xedB86cd455ef3ca43f0e227e00469C3bDFA40628").unwrap();
//! let call_data = encode(&signature, &[minter]).unwrap();
//! assert_eq!(call_data.as_bytes().len(), 4 + 32);
//! ```

mod decode;
mod encode;
mod init_args;
mod signature;
mod token;
pub mod util;

pub use self::{
    decode::{decode, decode_params, decode_revert_reason},
    encode::{encode, encode_params, EncodedCallData},
    init_args::{
        encoded_proxy_constructor_args, init_call_data, proxy_constructor_args,
    },
    signature::FunctionSignature,
    token::{ParamType, Token},
};

pub use alloy_primitives::{Address, U256};

/// Signatures of the pToken logic contract functions used by the tooling.
pub mod signatures {
    pub const INITIALIZE: &str = "initialize(string,string,address,bytes4)";
    pub const REDEEM: &str = "redeem(uint256,bytes,string,bytes4)";
    pub const MINT: &str = "mint(address,uint256)";
    pub const GRANT_MINTER_ROLE: &str = "grantMinterRole(address)";
    pub const REVOKE_MINTER_ROLE: &str = "revokeMinterRole(address)";
    pub const HAS_MINTER_ROLE: &str = "hasMinterRole(address)";
    pub const BALANCE_OF: &str = "balanceOf(address)";
    /// Solidity's built in revert payload, `Error(string)`.
    pub const REVERT_ERROR: &str = "Error(string)";
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failures while encoding or decoding. Never caused by the network.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Malformed function signature `{signature}`: {reason}")]
    MalformedSignature { signature: String, reason: String },
    #[error("Unsupported parameter type `{0}`")]
    UnsupportedType(String),
    #[error("`{signature}` expects {expected} argument(s) but {actual} were given")]
    ArgumentCount {
        signature: String,
        expected: usize,
        actual: usize,
    },
    #[error("Argument {index} should be of type `{expected}` but is `{actual}`")]
    TypeMismatch {
        index: usize,
        expected: ParamType,
        actual: ParamType,
    },
    #[error("Invalid hex `{value}`: {reason}")]
    InvalidHex { value: String, reason: String },
    #[error("Invalid address `{0}`: expected 20 bytes")]
    InvalidAddress(String),
    #[error("Invalid bytes4 `{0}`: expected exactly 4 bytes")]
    InvalidBytes4(String),
    #[error("Invalid uint256 `{value}`: {reason}")]
    InvalidUint { value: String, reason: String },
    #[error("Selector mismatch: expected 0x{expected}, found 0x{found}")]
    SelectorMismatch { expected: String, found: String },
    #[error("Invalid ABI data: {0}")]
    InvalidData(String),
}
