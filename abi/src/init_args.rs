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

//! The two stage computation of a pToken proxy's constructor arguments.
//!
//! Stage one encodes the `initialize` call the proxy forwards to the logic
//! contract, stage two wraps it with the logic and proxy admin addresses.

use crate::{
    encode, encode_params, signatures, EncodedCallData,
    FunctionSignature, ParamType, Result, Token,
};

const PROXY_CONSTRUCTOR_PARAMS: [ParamType; 3] =
    [ParamType::Address, ParamType::Address, ParamType::Bytes];

/// Call data of `initialize(tokenName, tokenSymbol, defaultAdmin, originChainId)`.
///
/// Always `0x` prefixed when displayed.
pub fn init_call_data(
    token_name: &str,
    token_symbol: &str,
    admin_address: &str,
    origin_chain_id: &str,
) -> Result<EncodedCallData> {
    log::info!("Encoding pToken initialization arguments");
    let signature: FunctionSignature = signatures::INITIALIZE.parse()?;
    encode(
        &signature,
        &[
            Token::string(token_name),
            Token::string(token_symbol),
            Token::address(admin_address)?,
            Token::bytes4(origin_chain_id)?,
        ],
    )
}

/// ABI encoded `(address logic, address admin, bytes data)` as expected by the
/// proxy constructor, as hex WITHOUT a `0x` prefix. This is the format block
/// explorers ask for when verifying the proxy.
pub fn proxy_constructor_args(
    logic_address: &str,
    proxy_admin_address: &str,
    init_call_data: &EncodedCallData,
) -> Result<String> {
    let encoded = encode_params(
        &PROXY_CONSTRUCTOR_PARAMS,
        &[
            Token::address(logic_address)?,
            Token::address(proxy_admin_address)?,
            Token::Bytes(init_call_data.as_bytes().to_vec()),
        ],
    )?;
    Ok(hex::encode(encoded))
}

/// Stage one then stage two. Stage two only runs when stage one succeeds.
pub fn encoded_proxy_constructor_args(
    token_name: &str,
    token_symbol: &str,
    logic_address: &str,
    admin_address: &str,
    proxy_admin_address: &str,
    origin_chain_id: &str,
) -> Result<String> {
    let init = init_call_data(token_name, token_symbol, admin_address, origin_chain_id)?;
    proxy_constructor_args(logic_address, proxy_admin_address, &init)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode_params, encode::WORD, Error};
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    const ADMIN: &str = "0xedB86cd455ef3ca43f0e227e00469C3bDFA40628";
    const LOGIC: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
    const PROXY_ADMIN: &str = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512";

    #[test]
    fn init_call_data_is_prefixed() {
        let init = init_call_data("Test", "TST", ADMIN, "0x00000001").unwrap();
        assert!(init.to_string().starts_with("0x"));
        assert_eq!(
            init.selector(),
            signatures::INITIALIZE
                .parse::<FunctionSignature>()
                .unwrap()
                .selector()
        );
        // selector, 4 head words, two short strings with one data word each
        assert_eq!(init.as_bytes().len(), 4 + 4 * WORD + 2 * 2 * WORD);
    }

    #[test]
    fn proxy_constructor_args_are_not_prefixed() {
        let args = encoded_proxy_constructor_args(
            "Test",
            "TST",
            LOGIC,
            ADMIN,
            PROXY_ADMIN,
            "0x00000001",
        )
        .unwrap();
        assert!(!args.starts_with("0x"));
    }

    #[test]
    fn proxy_constructor_args_wrap_the_init_call_data() {
        let init = init_call_data("Test", "TST", ADMIN, "0x00000001").unwrap();
        let args = proxy_constructor_args(LOGIC, PROXY_ADMIN, &init).unwrap();

        // two address words, the offset word, the length word, then the
        // init call data right padded to a word boundary
        let padded_init_len = (init.as_bytes().len() + WORD - 1) / WORD * WORD;
        assert_eq!(args.len(), 2 * (3 * WORD + WORD + padded_init_len));

        let decoded =
            decode_params(&PROXY_CONSTRUCTOR_PARAMS, &hex::decode(&args).unwrap()).unwrap();
        assert_eq!(decoded, vec![
            Token::address(LOGIC).unwrap(),
            Token::address(PROXY_ADMIN).unwrap(),
            Token::Bytes(init.into_bytes()),
        ]);
    }

    #[test]
    fn stage_two_does_not_run_when_stage_one_fails() {
        // the logic address is invalid too, but the admin address fails first
        let result = encoded_proxy_constructor_args(
            "Test",
            "TST",
            "not an address",
            "0xdead",
            PROXY_ADMIN,
            "0x00000001",
        );
        assert_matches!(result, Err(Error::InvalidAddress(address)) if address == "0xdead");
    }

    #[test]
    fn origin_chain_id_must_be_four_bytes() {
        assert_matches!(
            init_call_data("Test", "TST", ADMIN, "0x01"),
            Err(Error::InvalidBytes4(_))
        );
    }
}
