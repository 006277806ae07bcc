use ethers::types::{Address, U256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 代币信息（从链上实时读取，不做缓存）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub address: Address,
    pub symbol: String,
    /// JSON 中以十进制字符串表示（`"18"`）
    #[serde(with = "decimals_as_string")]
    pub decimals: u8,
}

mod decimals_as_string {
    use super::*;

    pub fn serialize<S: Serializer>(decimals: &u8, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(decimals)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// 交易对储备量（最小单位，十进制字符串）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reserves {
    pub reserve0: String,
    pub reserve1: String,
}

impl Reserves {
    pub fn new(reserve0: U256, reserve1: U256) -> Self {
        Self {
            reserve0: reserve0.to_string(),
            reserve1: reserve1.to_string(),
        }
    }
}

/// 流动性池快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub pair_address: Address,
    pub token0: TokenInfo,
    pub token1: TokenInfo,
    pub reserves: Reserves,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_serialization() {
        let pool = Pool {
            pair_address: Address::from_low_u64_be(0x10),
            token0: TokenInfo {
                address: Address::from_low_u64_be(1),
                symbol: "WSEI".to_string(),
                decimals: 18,
            },
            token1: TokenInfo {
                address: Address::from_low_u64_be(2),
                symbol: "USDC".to_string(),
                decimals: 6,
            },
            reserves: Reserves::new(
                U256::from_dec_str("1000000000000000000000").unwrap(),
                U256::from(250_000_000u64),
            ),
        };

        let json = serde_json::to_string(&pool).unwrap();
        assert!(json.contains("\"pairAddress\""));
        assert!(json.contains("\"reserve0\":\"1000000000000000000000\""));
        assert!(json.contains("\"reserve1\":\"250000000\""));
        assert!(json.contains("USDC"));
        assert!(json.contains("\"decimals\":\"18\""));
        assert!(json.contains("\"decimals\":\"6\""));

        let deserialized: Pool = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, pool);
    }

    #[test]
    fn test_token_decimals_must_be_string() {
        let json = r#"{"address":"0x0000000000000000000000000000000000000001","symbol":"WSEI","decimals":18}"#;
        assert!(serde_json::from_str::<TokenInfo>(json).is_err());

        let json = r#"{"address":"0x0000000000000000000000000000000000000001","symbol":"WSEI","decimals":"18"}"#;
        let token: TokenInfo = serde_json::from_str(json).unwrap();
        assert_eq!(token.decimals, 18);
    }
}
