use super::{check_amount, json_success, parse_address, tool_error};
use crate::chain::DexChain;
use crate::dragonswap::DragonSwapService;
use rmcp::{model::CallToolResult, ErrorData as McpError};
use serde::{Deserialize, Serialize};
use tracing::info;

/// 查询报价请求参数
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetQuoteRequest {
    /// 输入代币合约地址
    pub token_in: String,
    /// 输出代币合约地址
    pub token_out: String,
    /// 输入数量（代币单位，不是 wei），如 "1.5"
    pub amount_in: String,
}

/// 报价响应
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub token_in: String,
    pub token_out: String,
    pub amount_in: String,
    /// 预估输出数量（已按输出代币精度格式化）
    pub amount_out: String,
    pub summary: String,
}

/// 通过 Router 的 getAmountsOut 查询兑换报价
pub async fn get_quote<C: DexChain>(
    service: &DragonSwapService<C>,
    request: GetQuoteRequest,
) -> Result<CallToolResult, McpError> {
    let token_in = parse_address("tokenIn", &request.token_in)?;
    let token_out = parse_address("tokenOut", &request.token_out)?;
    check_amount("amountIn", &request.amount_in)?;

    info!(
        token_in = %request.token_in,
        token_out = %request.token_out,
        amount_in = %request.amount_in,
        "收到 get_quote 请求"
    );

    let amount_out = match service
        .get_quote(token_in, token_out, &request.amount_in)
        .await
    {
        Ok(amount_out) => amount_out,
        Err(e) => return Ok(tool_error(e)),
    };

    let summary = format!(
        "报价: {} 个 {} 约可兑换 {} 个 {}",
        request.amount_in, request.token_in, amount_out, request.token_out
    );

    json_success(&QuoteResponse {
        token_in: request.token_in,
        token_out: request.token_out,
        amount_in: request.amount_in,
        amount_out,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Network, NetworkConfig};
    use crate::testing::{addr, MockChain};
    use crate::tools::text_of;
    use ethers::types::U256;
    use std::sync::Arc;

    fn request(token_in: &str, token_out: &str, amount_in: &str) -> GetQuoteRequest {
        GetQuoteRequest {
            token_in: token_in.to_string(),
            token_out: token_out.to_string(),
            amount_in: amount_in.to_string(),
        }
    }

    fn quote_service() -> DragonSwapService<MockChain> {
        let chain = MockChain::new()
            .with_token(addr(0xa), "TOKA", 18)
            .with_token(addr(0xb), "TOKB", 6)
            .with_amounts_out(vec![
                U256::from_dec_str("10000000000000000000").unwrap(),
                U256::from(25_000_000u64),
            ]);
        DragonSwapService::new(
            Arc::new(chain),
            NetworkConfig::preset(Network::Testnet).unwrap(),
            None,
        )
    }

    #[test]
    fn test_quote_request_uses_camel_case() {
        let json = r#"{"tokenIn": "0xa", "tokenOut": "0xb", "amountIn": "10"}"#;
        let request: GetQuoteRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.token_in, "0xa");
        assert_eq!(request.amount_in, "10");
    }

    #[tokio::test]
    async fn test_get_quote_success_payload() {
        let service = quote_service();
        let token_in = format!("{:?}", addr(0xa));
        let token_out = format!("{:?}", addr(0xb));

        let result = get_quote(&service, request(&token_in, &token_out, "10"))
            .await
            .unwrap();

        let response: QuoteResponse = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(response.amount_out, "25.0");
        assert_eq!(response.amount_in, "10");
    }

    #[tokio::test]
    async fn test_get_quote_rejects_bad_arguments() {
        let service = quote_service();
        let token = format!("{:?}", addr(0xa));

        assert!(get_quote(&service, request("TOKA", &token, "1")).await.is_err());
        assert!(get_quote(&service, request(&token, &token, "-1")).await.is_err());
    }

    #[tokio::test]
    async fn test_get_quote_unknown_token_is_error_envelope() {
        let service = quote_service();
        let token_in = format!("{:?}", addr(0xc));
        let token_out = format!("{:?}", addr(0xb));

        let result = get_quote(&service, request(&token_in, &token_out, "1"))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).contains("execution reverted"));
    }
}
