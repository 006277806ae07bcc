/// DragonSwap V1 MCP 工具模块
///
/// 本模块包含五个工具：
/// - `pools`: 列出流动性池
/// - `quote`: 查询兑换报价
/// - `swap`: 执行代币兑换（approve + swap）
/// - `wrap`: 包装 SEI 为 wSEI、授权 Router 使用 wSEI

pub mod pools;
pub mod quote;
pub mod swap;
pub mod wrap;

use crate::error::DexError;
use crate::units::check_decimal;
use ethers::types::Address;
use rmcp::{
    model::{CallToolResult, Content},
    ErrorData as McpError,
};
use serde::Serialize;
use tracing::warn;

// 重新导出主要类型，方便外部使用
pub use pools::{list_pools, ListPoolsRequest};
pub use quote::{get_quote, GetQuoteRequest};
pub use swap::{execute_swap, ExecuteSwapRequest};
pub use wrap::{approve_wsei, wrap_sei, ApproveWseiRequest, WrapSeiRequest};

/// 解析地址参数，格式错误时作为参数错误拒绝
pub(crate) fn parse_address(field: &str, value: &str) -> Result<Address, McpError> {
    value.trim().parse::<Address>().map_err(|_| {
        McpError::invalid_params(format!("无效的地址参数 {}: {}", field, value), None)
    })
}

/// 校验金额参数是非负十进制字符串（精度在服务层按代币 decimals 校验）
pub(crate) fn check_amount(field: &str, value: &str) -> Result<(), McpError> {
    check_decimal(value).map_err(|e| McpError::invalid_params(format!("{}: {}", field, e), None))
}

/// 成功结果：格式化 JSON 文本
pub(crate) fn json_success<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// 服务层错误：设置 is_error 并原样携带底层错误信息（不带错误类别前缀）
pub(crate) fn tool_error(err: DexError) -> CallToolResult {
    warn!(error = %err, "工具调用失败");
    CallToolResult::error(vec![Content::text(err.message())])
}

#[cfg(test)]
pub(crate) fn text_of(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|c| c.as_text().map(|t| t.text.clone()))
        .collect::<Vec<_>>()
        .join("\n")
}
