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

//! Checks that run before any transaction is built.

use super::{
    dispatch::{call, ContractHandle},
    ErrorVariant,
};
use alloy::primitives::{Address, U256};
use ptoken_abi::{decode_params, signatures, util::strip_hex_prefix, ParamType, Token};

/// Passes `value` through if it is well formed hex, with or without `0x`.
/// The empty string is valid and means "no bytes".
pub fn check_is_hex(value: &str) -> Result<&str, ErrorVariant> {
    let digits = strip_hex_prefix(value);
    if digits.len() % 2 != 0 {
        return Err(ErrorVariant::validation(format!(
            "`{}` is not valid hex: odd number of digits",
            value
        )))
    }
    if let Some(c) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ErrorVariant::validation(format!(
            "`{}` is not valid hex: unexpected character `{}`",
            value, c
        )))
    }
    Ok(value)
}

pub fn check_is_address(value: &str) -> Result<Address, ErrorVariant> {
    value
        .parse::<Address>()
        .map_err(|err| ErrorVariant::validation(format!("`{}` is not an address: {}", value, err)))
}

/// Parses a token amount in the most granular unit, decimal or `0x` hex.
pub fn check_is_amount(value: &str) -> Result<U256, ErrorVariant> {
    Token::uint256(value)?
        .into_uint256()
        .ok_or_else(|| ErrorVariant::validation(format!("`{}` is not an amount", value)))
}

/// Reads the token balance of `owner`.
pub async fn token_balance(
    contract: &ContractHandle<'_>,
    owner: Address,
) -> Result<U256, ErrorVariant> {
    let output = call(contract, signatures::BALANCE_OF, &[Token::from(owner)]).await?;
    decode_params(&[ParamType::Uint256], &output)?
        .pop()
        .and_then(Token::into_uint256)
        .ok_or_else(|| ErrorVariant::Rpc("balanceOf returned no uint256".into()))
}

/// Fails with [`ErrorVariant::InsufficientBalance`] unless `owner` holds at
/// least `amount` tokens. Returns the contract address on success.
pub async fn check_token_balance_is_sufficient(
    contract: &ContractHandle<'_>,
    owner: Address,
    amount: U256,
) -> Result<Address, ErrorVariant> {
    let balance = token_balance(contract, owner).await?;
    log::debug!("balance of {} is {}, {} required", owner, balance, amount);
    if balance < amount {
        return Err(ErrorVariant::InsufficientBalance { balance, amount })
    }
    Ok(contract.address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::client::mock::{MockClient, Request};
    use assert_matches::assert_matches;
    use async_std::task::block_on;

    fn balance_word(balance: u64) -> Vec<u8> {
        U256::from(balance).to_be_bytes::<32>().to_vec()
    }

    #[test]
    fn hex_values_pass_through() {
        assert_eq!(check_is_hex("0xdead").unwrap(), "0xdead");
        assert_eq!(check_is_hex("dead").unwrap(), "dead");
        assert_eq!(
            strip_hex_prefix(check_is_hex("0xdead").unwrap()),
            strip_hex_prefix(check_is_hex("dead").unwrap())
        );
        assert_eq!(check_is_hex("0x").unwrap(), "0x");
        assert_eq!(check_is_hex("").unwrap(), "");
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert_matches!(check_is_hex("zz"), Err(ErrorVariant::Validation(_)));
        assert_matches!(check_is_hex("0xabc"), Err(ErrorVariant::Validation(_)));
        assert_matches!(check_is_hex("0x0g"), Err(ErrorVariant::Validation(_)));
    }

    #[test]
    fn addresses_are_validated() {
        assert!(check_is_address("0xedB86cd455ef3ca43f0e227e00469C3bDFA40628").is_ok());
        assert_matches!(check_is_address("0x1234"), Err(ErrorVariant::Validation(_)));
        assert_matches!(check_is_address("vitalik"), Err(ErrorVariant::Validation(_)));
    }

    #[test]
    fn amounts_are_parsed() {
        assert_eq!(check_is_amount("1337").unwrap(), U256::from(1337));
        assert_eq!(check_is_amount("0x539").unwrap(), U256::from(1337));
        assert_matches!(check_is_amount("-1"), Err(ErrorVariant::Encoding(_)));
        assert_matches!(check_is_amount("1.5"), Err(ErrorVariant::Encoding(_)));
    }

    #[test]
    fn sufficient_balance_returns_contract() {
        let client = MockClient::default().with_call_response(balance_word(1337));
        let contract = ContractHandle::new(Address::repeat_byte(0x42), &client);

        let address = block_on(check_token_balance_is_sufficient(
            &contract,
            Address::repeat_byte(0x01),
            U256::from(1337),
        ))
        .unwrap();

        assert_eq!(address, contract.address);
        assert_matches!(&client.requests()[0], Request::Call { data, .. } if data[..4] == [0x70, 0xa0, 0x82, 0x31]);
    }

    #[test]
    fn insufficient_balance_is_reported() {
        let client = MockClient::default().with_call_response(balance_word(10));
        let contract = ContractHandle::new(Address::repeat_byte(0x42), &client);

        let result = block_on(check_token_balance_is_sufficient(
            &contract,
            Address::repeat_byte(0x01),
            U256::from(11),
        ));

        assert_matches!(
            result,
            Err(ErrorVariant::InsufficientBalance { balance, amount })
                if balance == U256::from(10) && amount == U256::from(11)
        );
    }
}
