use super::{check_amount, json_success, parse_address, tool_error};
use crate::chain::DexChain;
use crate::dragonswap::DragonSwapService;
use rmcp::{model::CallToolResult, ErrorData as McpError};
use serde::{Deserialize, Serialize};
use tracing::info;

/// 执行兑换请求参数
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteSwapRequest {
    /// 输入代币合约地址
    pub token_in: String,
    /// 输出代币合约地址
    pub token_out: String,
    /// 输入数量（代币单位，不是 wei）
    pub amount_in: String,
}

/// 兑换结果
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponse {
    pub token_in: String,
    pub token_out: String,
    pub amount_in: String,
    pub tx_hash: String,
    pub summary: String,
}

/// 在 DragonSwap V1 上执行兑换
///
/// 先授权 Router 使用输入代币，再以 1% 滑点、20 分钟截止时间提交
/// swapExactTokensForTokens，收款地址为签名者自身。
pub async fn execute_swap<C: DexChain>(
    service: &DragonSwapService<C>,
    request: ExecuteSwapRequest,
) -> Result<CallToolResult, McpError> {
    let token_in = parse_address("tokenIn", &request.token_in)?;
    let token_out = parse_address("tokenOut", &request.token_out)?;
    check_amount("amountIn", &request.amount_in)?;

    info!(
        from = %request.token_in,
        to = %request.token_out,
        amount = %request.amount_in,
        "收到 execute_swap 请求"
    );

    let tx_hash = match service
        .execute_swap(token_in, token_out, &request.amount_in)
        .await
    {
        Ok(tx_hash) => format!("{:?}", tx_hash),
        Err(e) => return Ok(tool_error(e)),
    };

    info!(tx_hash = %tx_hash, "成功返回兑换结果");

    json_success(&SwapResponse {
        summary: format!("兑换已执行，交易哈希: {}", tx_hash),
        token_in: request.token_in,
        token_out: request.token_out,
        amount_in: request.amount_in,
        tx_hash,
    })
}
