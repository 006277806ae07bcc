use rmcp::{
    handler::server::{
        router::tool::ToolRouter,
        wrapper::Parameters,
        ServerHandler,
    },
    model::{CallToolResult, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    transport::stdio,
    ErrorData as McpError, ServiceExt,
};
use std::sync::Arc;

mod chain;
mod config;
mod contracts;
mod dragonswap;
mod error;
mod logging;
#[cfg(test)]
mod testing;
mod tools;
mod types;
mod units;

use chain::EthChain;
use config::Config;
use dragonswap::DragonSwapService;
use tools::{
    ApproveWseiRequest, ExecuteSwapRequest, GetQuoteRequest, ListPoolsRequest, WrapSeiRequest,
};

/// DragonSwap V1 MCP Server
/// 提供 SEI 链上 DragonSwap V1 的查询与交易工具
#[derive(Clone)]
pub struct DragonSwapServer {
    tool_router: ToolRouter<Self>,
    service: Arc<DragonSwapService<EthChain>>,
    implementation: Implementation,
}

#[tool_router]
impl DragonSwapServer {
    /// 创建新的服务器实例
    ///
    /// `name` / `version` 即握手时上报给客户端的服务器身份。
    pub fn new(
        service: Arc<DragonSwapService<EthChain>>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            tool_router: Self::tool_router(),
            service,
            implementation: Implementation {
                name: name.into(),
                version: version.into(),
                ..Implementation::from_build_env()
            },
        }
    }

    // ==================== 只读工具 ====================

    #[tool(description = "列出 DragonSwap V1 上的流动性池，包括两个代币的地址、符号、精度以及当前储备量。limit 取值 1-200，默认 50。")]
    async fn list_pools(
        &self,
        Parameters(request): Parameters<ListPoolsRequest>,
    ) -> Result<CallToolResult, McpError> {
        tools::list_pools(&self.service, request).await
    }

    #[tool(description = "查询在 DragonSwap V1 上用 amountIn 个 tokenIn 兑换 tokenOut 的报价。数量使用代币单位（不是 wei）。")]
    async fn get_quote(
        &self,
        Parameters(request): Parameters<GetQuoteRequest>,
    ) -> Result<CallToolResult, McpError> {
        tools::get_quote(&self.service, request).await
    }

    // ==================== 交易工具（需要私钥） ====================

    #[tool(description = "在 DragonSwap V1 上执行兑换：先授权 Router 使用 tokenIn，再以 1% 滑点提交兑换，返回交易哈希。需要配置私钥。")]
    async fn execute_swap(
        &self,
        Parameters(request): Parameters<ExecuteSwapRequest>,
    ) -> Result<CallToolResult, McpError> {
        tools::execute_swap(&self.service, request).await
    }

    #[tool(description = "把原生 SEI 包装为 wSEI，返回交易哈希。需要配置私钥。")]
    async fn wrap_sei(
        &self,
        Parameters(request): Parameters<WrapSeiRequest>,
    ) -> Result<CallToolResult, McpError> {
        tools::wrap_sei(&self.service, request).await
    }

    #[tool(description = "授权 DragonSwap Router 使用你的 wSEI，返回交易哈希。需要配置私钥。")]
    async fn approve_wsei(
        &self,
        Parameters(request): Parameters<ApproveWseiRequest>,
    ) -> Result<CallToolResult, McpError> {
        tools::approve_wsei(&self.service, request).await
    }
}

/// 实现 ServerHandler trait 以处理 MCP 协议
#[tool_handler]
impl ServerHandler for DragonSwapServer {
    fn get_info(&self) -> ServerInfo {
        let network = self.service.network();
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: self.implementation.clone(),
            instructions: Some(format!(
                "与 SEI {} (chain id {}) 上的 DragonSwap V1 交互：list_pools、get_quote 只读；\
                 execute_swap、wrap_sei、approve_wsei 需要配置 SEI_PRIVATE_KEY。",
                network.network, network.chain_id
            )),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    config.validate()?;

    // 持有 guard 直到进程退出
    let _log_guard = logging::init_logging(
        &config.server.log_level,
        config.server.log_json_format,
        config.server.log_file.as_deref(),
    )?;

    config.print_info();

    tracing::info!(
        name = %config.server.name,
        version = %config.server.version,
        "🚀 启动 DragonSwap MCP Server..."
    );

    let chain = EthChain::connect(
        &config.network.rpc_url,
        config.performance.tx_poll_interval(),
    )?;
    chain.probe(config.network.chain_id).await;

    let service = DragonSwapService::new(
        Arc::new(chain),
        config.network.clone(),
        config.private_key.clone(),
    )
    .with_max_concurrency(config.performance.max_concurrent_requests);

    let server = DragonSwapServer::new(
        Arc::new(service),
        config.server.name.clone(),
        config.server.version.clone(),
    );

    // 创建 stdio 传输层
    let transport = stdio();

    tracing::info!("✅ MCP Server 已就绪，等待客户端连接...");
    tracing::info!("📋 可用工具: list_pools, get_quote, execute_swap, wrap_sei, approve_wsei");

    let service = server.serve(transport).await?;

    // 等待服务器关闭
    let quit_reason = service.waiting().await?;
    tracing::info!("👋 MCP Server 关闭，原因: {:?}", quit_reason);

    Ok(())
}
