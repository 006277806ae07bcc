use super::{json_success, tool_error};
use crate::chain::DexChain;
use crate::dragonswap::DragonSwapService;
use rmcp::{model::CallToolResult, ErrorData as McpError};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const MIN_POOL_LIMIT: u32 = 1;
pub const MAX_POOL_LIMIT: u32 = 200;

/// 列出交易对请求参数
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListPoolsRequest {
    /// 返回的最大交易对数量（1-200，默认 50）
    #[serde(default = "default_limit")]
    #[schemars(range(min = 1, max = 200))]
    pub limit: u32,
}

fn default_limit() -> u32 {
    50
}

impl ListPoolsRequest {
    fn validate(&self) -> Result<(), McpError> {
        if !(MIN_POOL_LIMIT..=MAX_POOL_LIMIT).contains(&self.limit) {
            return Err(McpError::invalid_params(
                format!(
                    "limit 参数无效: {} (必须在 {}-{} 之间)",
                    self.limit, MIN_POOL_LIMIT, MAX_POOL_LIMIT
                ),
                None,
            ));
        }
        Ok(())
    }
}

/// 列出 DragonSwap V1 的流动性池
///
/// 总是从链上读取全部交易对，再截断到 `limit` 条。
pub async fn list_pools<C: DexChain>(
    service: &DragonSwapService<C>,
    request: ListPoolsRequest,
) -> Result<CallToolResult, McpError> {
    request.validate()?;

    info!(limit = request.limit, "收到 list_pools 请求");

    match service.list_pools().await {
        Ok(mut pools) => {
            pools.truncate(request.limit as usize);
            json_success(&pools)
        }
        Err(e) => Ok(tool_error(e)),
    }
}
