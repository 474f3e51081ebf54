//! Serde helpers that encode [`U256`] as a decimal string.
//!
//! JSON numbers lose precision past 2^53, and primitive-types' own serde
//! support uses hex, which is unreadable for balances.

use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
    let s = String::deserialize(deserializer)?;
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(serde::de::Error::custom(format!(
            "invalid decimal amount '{}'",
            s
        )));
    }
    U256::from_dec_str(&s)
        .map_err(|_| serde::de::Error::custom(format!("amount '{}' does not fit in 256 bits", s)))
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "crate::types::decimal")]
        value: U256,
    }

    #[test]
    fn test_large_values_keep_precision() {
        let w = Wrapper {
            value: U256::from(10).pow(U256::from(30)),
        };
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, r#"{"value":"1000000000000000000000000000000"}"#);
        assert_eq!(serde_json::from_str::<Wrapper>(&json).unwrap(), w);
    }

    #[test]
    fn test_rejects_non_decimal() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"value":"0x10"}"#).is_err());
        assert!(serde_json::from_str::<Wrapper>(r#"{"value":""}"#).is_err());
    }
}
