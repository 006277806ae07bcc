use ethers::prelude::*;

/// DragonSwap 服务错误类型
///
/// 每个变体对应一类失败来源，调用方可以按类型分支处理，
/// 同时保留底层错误的原始信息。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DexError {
    /// 私钥缺失或格式错误、网络预设无效等（发生在任何网络调用之前）
    #[error("配置错误: {0}")]
    Config(String),

    /// 金额格式错误或精度超过代币支持的小数位
    #[error("参数错误: {0}")]
    Validation(String),

    /// RPC 节点不可达或返回了无法解析的响应
    #[error("网络错误: {0}")]
    Network(String),

    /// 合约调用 revert，或交易回执显示执行失败
    #[error("链上执行失败: {0}")]
    Reverted(String),

    /// 列出交易对时单个交易对的数据获取失败
    #[error("交易对数据获取失败: {0}")]
    PartialFetch(String),
}

impl DexError {
    /// 将合约调用错误归类为链上 revert 或网络错误
    pub fn from_contract<M: Middleware>(err: ContractError<M>) -> Self {
        let message = err.to_string();
        if matches!(err, ContractError::Revert(_)) || is_revert_message(&message) {
            DexError::Reverted(message)
        } else {
            DexError::Network(message)
        }
    }

    /// 底层错误信息（不含类别前缀）
    pub fn message(&self) -> &str {
        match self {
            DexError::Config(message)
            | DexError::Validation(message)
            | DexError::Network(message)
            | DexError::Reverted(message)
            | DexError::PartialFetch(message) => message,
        }
    }

    /// 是否为配置类错误
    pub fn is_config(&self) -> bool {
        matches!(self, DexError::Config(_))
    }
}

impl From<ProviderError> for DexError {
    fn from(err: ProviderError) -> Self {
        let message = err.to_string();
        if is_revert_message(&message) {
            DexError::Reverted(message)
        } else {
            DexError::Network(message)
        }
    }
}

/// 节点返回的错误信息中常见的 revert 标记
fn is_revert_message(message: &str) -> bool {
    const MARKERS: [&str; 5] = [
        "execution reverted",
        "TRANSFER_FROM_FAILED",
        "INSUFFICIENT_OUTPUT_AMOUNT",
        "INSUFFICIENT_LIQUIDITY",
        "EXPIRED",
    ];
    MARKERS.iter().any(|marker| message.contains(marker))
}
