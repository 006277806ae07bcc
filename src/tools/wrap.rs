use super::{check_amount, json_success, tool_error};
use crate::chain::DexChain;
use crate::dragonswap::DragonSwapService;
use rmcp::{model::CallToolResult, ErrorData as McpError};
use serde::{Deserialize, Serialize};
use tracing::info;

/// 包装 SEI 请求参数
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct WrapSeiRequest {
    /// 要包装的 SEI 数量（SEI 单位，不是 wei）
    pub amount: String,
}

/// 授权 wSEI 请求参数
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ApproveWseiRequest {
    /// 授权 Router 使用的 wSEI 数量
    pub amount: String,
}

/// 单笔交易的执行结果
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub action: String,
    pub amount: String,
    pub tx_hash: String,
    pub summary: String,
}

/// 把原生 SEI 包装为 wSEI
pub async fn wrap_sei<C: DexChain>(
    service: &DragonSwapService<C>,
    request: WrapSeiRequest,
) -> Result<CallToolResult, McpError> {
    check_amount("amount", &request.amount)?;

    info!(amount = %request.amount, "收到 wrap_sei 请求");

    match service.wrap_sei(&request.amount).await {
        Ok(tx_hash) => {
            let tx_hash = format!("{:?}", tx_hash);
            json_success(&TransactionResponse {
                action: "wrap_sei".to_string(),
                summary: format!("已包装 {} SEI，交易哈希: {}", request.amount, tx_hash),
                amount: request.amount,
                tx_hash,
            })
        }
        Err(e) => Ok(tool_error(e)),
    }
}

/// 授权 DragonSwap Router 使用 wSEI
pub async fn approve_wsei<C: DexChain>(
    service: &DragonSwapService<C>,
    request: ApproveWseiRequest,
) -> Result<CallToolResult, McpError> {
    check_amount("amount", &request.amount)?;

    info!(amount = %request.amount, "收到 approve_wsei 请求");

    match service.approve_wsei(&request.amount).await {
        Ok(tx_hash) => {
            let tx_hash = format!("{:?}", tx_hash);
            json_success(&TransactionResponse {
                action: "approve_wsei".to_string(),
                summary: format!(
                    "已授权 Router 使用 {} wSEI，交易哈希: {}",
                    request.amount, tx_hash
                ),
                amount: request.amount,
                tx_hash,
            })
        }
        Err(e) => Ok(tool_error(e)),
    }
}
