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
    util::with_hex_prefix, Error, FunctionSignature, ParamType, Result, Token,
};
use alloy_primitives::U256;
use std::fmt::{self, Display, Formatter};

pub(crate) const WORD: usize = 32;

/// Selector followed by the ABI encoded arguments. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCallData(Vec<u8>);

impl EncodedCallData {
    pub fn selector(&self) -> [u8; 4] {
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&self.0[..4]);
        selector
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for EncodedCallData {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Always rendered with a `0x` prefix.
impl Display for EncodedCallData {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&with_hex_prefix(&self.0))
    }
}

/// Encode a call of `signature` with `args`, in order.
pub fn encode(signature: &FunctionSignature, args: &[Token]) -> Result<EncodedCallData> {
    if signature.inputs().len() != args.len() {
        return Err(Error::ArgumentCount {
            signature: signature.to_string(),
            expected: signature.inputs().len(),
            actual: args.len(),
        })
    }
    log::debug!("Encoding call to `{}` with {:?}", signature, args);
    let mut encoded = signature.selector().to_vec();
    encoded.append(&mut encode_params(signature.inputs(), args)?);
    Ok(EncodedCallData(encoded))
}

/// Encode `args` as a tuple of `types`, without a selector. This is the
/// layout of constructor arguments.
pub fn encode_params(types: &[ParamType], args: &[Token]) -> Result<Vec<u8>> {
    if types.len() != args.len() {
        return Err(Error::ArgumentCount {
            signature: tuple_name(types),
            expected: types.len(),
            actual: args.len(),
        })
    }
    for (index, (expected, arg)) in types.iter().zip(args).enumerate() {
        if *expected != arg.param_type() {
            return Err(Error::TypeMismatch {
                index,
                expected: *expected,
                actual: arg.param_type(),
            })
        }
    }

    let head_len = WORD * args.len();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for arg in args {
        match arg {
            Token::Bytes(bytes) => {
                head.extend_from_slice(&uint_word(U256::from(head_len + tail.len())));
                encode_dynamic(bytes, &mut tail);
            }
            Token::String(string) => {
                head.extend_from_slice(&uint_word(U256::from(head_len + tail.len())));
                encode_dynamic(string.as_bytes(), &mut tail);
            }
            static_arg => head.extend_from_slice(&static_word(static_arg)),
        }
    }
    head.append(&mut tail);
    Ok(head)
}

fn static_word(token: &Token) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    match token {
        Token::Address(address) => word[WORD - 20..].copy_from_slice(address.as_slice()),
        Token::Uint256(value) => word = uint_word(*value),
        Token::Bool(value) => word[WORD - 1] = u8::from(*value),
        Token::Bytes4(bytes) => word[..4].copy_from_slice(bytes),
        Token::Bytes(_) | Token::String(_) => {
            unreachable!("dynamic tokens are encoded in the tail")
        }
    }
    word
}

fn uint_word(value: U256) -> [u8; WORD] {
    value.to_be_bytes::<WORD>()
}

/// Length word followed by the data, right padded to a word boundary.
fn encode_dynamic(data: &[u8], output: &mut Vec<u8>) {
    output.extend_from_slice(&uint_word(U256::from(data.len())));
    output.extend_from_slice(data);
    output.resize(output.len() + padding_len(data.len()), 0);
}

pub(crate) fn padding_len(len: usize) -> usize {
    (WORD - len % WORD) % WORD
}

fn tuple_name(types: &[ParamType]) -> String {
    let types = types.iter().map(ToString::to_string).collect::<Vec<_>>();
    format!("({})", types.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    const REDEEM_ADDRESS: &str = "33L5hhKLhcNqN7oHfeW3evYXkr9VxyBRRi";
    const DESTINATION_CHAIN_ID: &str = "0x00f34368";

    fn signature(s: &str) -> FunctionSignature {
        s.parse().expect("signature must parse")
    }

    fn redeem_args() -> Vec<Token> {
        vec![
            Token::from(1337u64),
            Token::string(REDEEM_ADDRESS),
            Token::bytes4(DESTINATION_CHAIN_ID).unwrap(),
        ]
    }

    #[test]
    fn redeem_call_data_matches_contract_fixture() {
        let expected = concat!(
            "0xcd61f0b6",
            "0000000000000000000000000000000000000000000000000000000000000539",
            "0000000000000000000000000000000000000000000000000000000000000060",
            "00f3436800000000000000000000000000000000000000000000000000000000",
            "0000000000000000000000000000000000000000000000000000000000000022",
            "33334c3568684b4c68634e714e376f4866655733657659586b72395678794252",
            "5269000000000000000000000000000000000000000000000000000000000000",
        );
        let encoded = encode(&signature("redeem(uint256,string,bytes4)"), &redeem_args())
            .unwrap();

        assert_eq!(encoded.selector(), [0xcd, 0x61, 0xf0, 0xb6]);
        assert_eq!(encoded.to_string(), expected);
    }

    #[test]
    fn encoding_is_deterministic() {
        let sig = signature("redeem(uint256,string,bytes4)");
        let first = encode(&sig, &redeem_args()).unwrap();
        let second = encode(&sig, &redeem_args()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn dynamic_tails_follow_argument_order() {
        let sig = signature("redeem(uint256,bytes,string,bytes4)");
        let args = vec![
            Token::from(666u64),
            Token::bytes("0xdead").unwrap(),
            Token::string("an address"),
            Token::bytes4("0xc0ffee00").unwrap(),
        ];
        let encoded = encode(&sig, &args).unwrap().into_bytes();
        let params = &encoded[4..];

        // head: amount, offset(bytes), offset(string), bytes4
        assert_eq!(params[2 * WORD - 1], 0x80, "bytes tail starts after the 4 word head");
        assert_eq!(params[3 * WORD - 1], 0xc0, "string tail starts after the bytes tail");
        assert_eq!(&params[3 * WORD..3 * WORD + 4], &[0xc0, 0xff, 0xee, 0x00]);
        // bytes tail: length 2, data right padded
        assert_eq!(params[5 * WORD - 1], 2);
        assert_eq!(&params[5 * WORD..5 * WORD + 2], &[0xde, 0xad]);
        // string tail: length 10
        assert_eq!(params[7 * WORD - 1], 10);
        assert_eq!(&params[7 * WORD..7 * WORD + 10], b"an address");
        assert_eq!(params.len(), 8 * WORD);
    }

    #[test]
    fn empty_bytes_encode_as_zero_length() {
        let encoded = encode_params(&[ParamType::Bytes], &[Token::bytes("0x").unwrap()])
            .unwrap();
        let mut expected = uint_word(U256::from(WORD)).to_vec();
        expected.extend_from_slice(&[0u8; WORD]);
        assert_eq!(encoded, expected);
    }

    #[test]
    fn address_is_left_padded() {
        let address = "0xedB86cd455ef3ca43f0e227e00469C3bDFA40628";
        let encoded = encode(
            &signature("grantMinterRole(address)"),
            &[Token::address(address).unwrap()],
        )
        .unwrap();
        assert_eq!(
            hex::encode(&encoded.as_bytes()[4..]),
            "000000000000000000000000edb86cd455ef3ca43f0e227e00469c3bdfa40628"
        );
    }

    #[test]
    fn argument_count_must_match() {
        assert_matches!(
            encode(&signature("mint(address,uint256)"), &[Token::from(1u64)]),
            Err(Error::ArgumentCount {
                expected: 2,
                actual: 1,
                ..
            })
        );
    }

    #[test]
    fn argument_types_must_match() {
        let result = encode(
            &signature("mint(address,uint256)"),
            &[Token::from(1u64), Token::from(1u64)],
        );
        assert_eq!(
            result,
            Err(Error::TypeMismatch {
                index: 0,
                expected: ParamType::Address,
                actual: ParamType::Uint256,
            })
        );
    }
}
