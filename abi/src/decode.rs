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
    encode::{padding_len, WORD},
    signatures, Error, FunctionSignature, ParamType, Result, Token,
};
use alloy_primitives::{Address, U256};

/// Decode call data produced for `signature` back into its arguments.
pub fn decode(signature: &FunctionSignature, data: &[u8]) -> Result<Vec<Token>> {
    if data.len() < 4 {
        return Err(Error::InvalidData(format!(
            "call data of {} byte(s) is too short to hold a selector",
            data.len()
        )))
    }
    let (selector, params) = data.split_at(4);
    if selector != signature.selector() {
        return Err(Error::SelectorMismatch {
            expected: hex::encode(signature.selector()),
            found: hex::encode(selector),
        })
    }
    decode_params(signature.inputs(), params)
}

/// Decode a tuple of `types`, e.g. the return data of an `eth_call`.
pub fn decode_params(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>> {
    let head_len = WORD * types.len();
    if data.len() < head_len {
        return Err(Error::InvalidData(format!(
            "expected at least {} bytes for the head of {} value(s), got {}",
            head_len,
            types.len(),
            data.len()
        )))
    }
    types
        .iter()
        .enumerate()
        .map(|(index, ty)| {
            let word = &data[index * WORD..(index + 1) * WORD];
            if ty.is_dynamic() {
                let payload = read_dynamic(data, read_usize(word)?)?;
                match ty {
                    ParamType::Bytes => Ok(Token::Bytes(payload.to_vec())),
                    _ => {
                        String::from_utf8(payload.to_vec())
                            .map(Token::String)
                            .map_err(|e| Error::InvalidData(e.to_string()))
                    }
                }
            } else {
                decode_static(*ty, word)
            }
        })
        .collect()
}

/// Extract the message of a Solidity `Error(string)` revert payload.
///
/// Returns `None` for empty data, custom errors and panics.
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    let signature: FunctionSignature = signatures::REVERT_ERROR.parse().ok()?;
    match decode(&signature, data) {
        Ok(tokens) => tokens.into_iter().next().and_then(Token::into_string),
        Err(err) => {
            log::debug!("Revert data is not an `Error(string)`: {}", err);
            None
        }
    }
}

fn decode_static(ty: ParamType, word: &[u8]) -> Result<Token> {
    match ty {
        ParamType::Address => {
            ensure_zero(&word[..WORD - 20], "address padding")?;
            Ok(Token::Address(Address::from_slice(&word[WORD - 20..])))
        }
        ParamType::Uint256 => Ok(Token::Uint256(U256::from_be_slice(word))),
        ParamType::Bool => {
            ensure_zero(&word[..WORD - 1], "bool padding")?;
            match word[WORD - 1] {
                0 => Ok(Token::Bool(false)),
                1 => Ok(Token::Bool(true)),
                other => Err(Error::InvalidData(format!("{} is not a bool", other))),
            }
        }
        ParamType::Bytes4 => {
            ensure_zero(&word[4..], "bytes4 padding")?;
            let mut bytes = [0u8; 4];
            bytes.copy_from_slice(&word[..4]);
            Ok(Token::Bytes4(bytes))
        }
        ParamType::Bytes | ParamType::String => {
            unreachable!("dynamic types are read from the tail")
        }
    }
}

fn read_dynamic(data: &[u8], offset: usize) -> Result<&[u8]> {
    let len_end = offset
        .checked_add(WORD)
        .filter(|end| *end <= data.len())
        .ok_or_else(|| {
            Error::InvalidData(format!("offset {} is out of bounds", offset))
        })?;
    let len = read_usize(&data[offset..len_end])?;
    let end = len_end
        .checked_add(len)
        .filter(|end| *end <= data.len())
        .ok_or_else(|| {
            Error::InvalidData(format!("length {} at offset {} is out of bounds", len, offset))
        })?;
    let padded_end = end + padding_len(len);
    if padded_end <= data.len() {
        ensure_zero(&data[end..padded_end], "dynamic value padding")?;
    }
    Ok(&data[len_end..end])
}

fn read_usize(word: &[u8]) -> Result<usize> {
    ensure_zero(&word[..WORD - 8], "offset or length")?;
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&word[WORD - 8..]);
    usize::try_from(u64::from_be_bytes(bytes))
        .map_err(|_| Error::InvalidData("offset or length overflows usize".into()))
}

fn ensure_zero(bytes: &[u8], what: &str) -> Result<()> {
    if bytes.iter().all(|b| *b == 0) {
        Ok(())
    } else {
        Err(Error::InvalidData(format!("non-zero {}", what)))
    }
}
