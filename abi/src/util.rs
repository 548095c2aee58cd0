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

use crate::{Error, Result};

/// Removes a leading `0x` if present. Idempotent and never fails; it does not
/// check that the remainder is hex.
pub fn strip_hex_prefix(input: &str) -> &str {
    input.strip_prefix("0x").unwrap_or(input)
}

/// Decode hex string with or without 0x prefix
pub fn decode_hex(input: &str) -> Result<Vec<u8>> {
    hex::decode(strip_hex_prefix(input)).map_err(|err| Error::InvalidHex {
        value: input.to_string(),
        reason: err.to_string(),
    })
}

/// Lowercase hex with a `0x` prefix.
pub fn with_hex_prefix<B: AsRef<[u8]>>(bytes: B) -> String {
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn strip_hex_prefix_is_idempotent() {
        assert_eq!(strip_hex_prefix("0xdead"), "dead");
        assert_eq!(strip_hex_prefix(strip_hex_prefix("0xdead")), "dead");
        assert_eq!(strip_hex_prefix("dead"), "dead");
        assert_eq!(strip_hex_prefix(""), "");
        assert_eq!(strip_hex_prefix("0x"), "");
    }

    #[test]
    fn decode_hex_with_and_without_prefix() {
        assert_eq!(decode_hex("0xdead").unwrap(), vec![0xde, 0xad]);
        assert_eq!(decode_hex("dead").unwrap(), vec![0xde, 0xad]);
        assert_eq!(decode_hex("0x").unwrap(), Vec::<u8>::new());
        assert_matches!(decode_hex("0xzz"), Err(Error::InvalidHex { .. }));
        assert_matches!(decode_hex("abc"), Err(Error::InvalidHex { .. }));
    }

    #[test]
    fn with_hex_prefix_is_lowercase() {
        assert_eq!(with_hex_prefix([0xDE, 0xAD]), "0xdead");
        assert_eq!(with_hex_prefix([]), "0x");
    }
}
