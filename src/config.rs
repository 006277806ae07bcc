use ethers::types::Address;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// 服务器配置结构体
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 服务器名称
    pub name: String,
    /// 服务器版本
    pub version: String,
    /// 日志级别
    pub log_level: String,
    /// 是否启用 JSON 格式日志
    pub log_json_format: bool,
    /// 日志文件路径（可选，stdout 留给 MCP 协议）
    pub log_file: Option<String>,
}

/// SEI 网络预设
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    /// pacific-1 主网
    Mainnet,
    /// atlantic-2 测试网
    Testnet,
}

impl FromStr for Network {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" | "pacific-1" | "production" => Ok(Network::Mainnet),
            "testnet" | "atlantic-2" | "test" => Ok(Network::Testnet),
            other => anyhow::bail!("未知的网络预设 '{}'，可选值: mainnet, testnet", other),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "pacific-1"),
            Network::Testnet => write!(f, "atlantic-2"),
        }
    }
}

/// DragonSwap V1 网络配置
///
/// 启动时从预设构造，服务实例生命周期内不可变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub network: Network,
    /// Factory 合约地址
    pub factory: Address,
    /// Router 合约地址
    pub router: Address,
    /// wSEI 合约地址
    pub wrapped_native: Address,
    /// RPC 节点地址
    pub rpc_url: String,
    /// Chain ID
    pub chain_id: u64,
}

impl NetworkConfig {
    /// 按预设构造网络配置
    pub fn preset(network: Network) -> anyhow::Result<Self> {
        let (factory, router, wrapped_native, rpc_url, chain_id) = match network {
            Network::Mainnet => (
                "0x71f6b49ae1558357bBb5A6074f1143c46cBcA03d",
                "0xa4cF2F53D1195aDDdE9e4D3aCa54f556895712f2",
                "0x027D2E627209f1cebA52ADc8A5aFE9318459b44B",
                "https://evm-rpc.sei-apis.com",
                1329,
            ),
            Network::Testnet => (
                "0xeE6Ad607238f8d2C63767245d78520F06c303D31",
                "0x527b42CA5e11370259EcaE68561C14dA415477C8",
                "0xF8EB55EC97B59d91fe9E91A1d61147e0d2A7b6F7",
                "https://evm-rpc.atlantic-2.seinetwork.io",
                713715,
            ),
        };

        Ok(Self {
            network,
            factory: factory.parse()?,
            router: router.parse()?,
            wrapped_native: wrapped_native.parse()?,
            rpc_url: rpc_url.to_string(),
            chain_id,
        })
    }
}

/// 性能配置
#[derive(Debug, Clone)]
pub struct PerformanceConfig {
    /// 列出交易对时的最大并发数
    pub max_concurrent_requests: usize,
    /// 等待交易回执的轮询间隔（毫秒）
    pub tx_poll_interval_ms: u64,
}

impl PerformanceConfig {
    pub fn tx_poll_interval(&self) -> Duration {
        Duration::from_millis(self.tx_poll_interval_ms)
    }
}

/// 完整配置
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub network: NetworkConfig,
    /// 私钥（用于签名交易，未配置时只能使用只读工具）
    pub private_key: Option<String>,
    pub performance: PerformanceConfig,
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> anyhow::Result<Self> {
        // 尝试加载 .env 文件（如果存在）
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源加载配置
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let server = ServerConfig {
            name: var("SERVER_NAME").unwrap_or_else(|| "dragonswap-mcp-server".to_string()),
            version: var("SERVER_VERSION")
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_json_format: var("LOG_JSON_FORMAT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
            log_file: var("LOG_FILE"),
        };

        let network: Network = match var("DRAGONSWAP_NETWORK") {
            Some(name) => name.parse()?,
            None => Network::Testnet,
        };

        let performance = PerformanceConfig {
            max_concurrent_requests: var("MAX_CONCURRENT_REQUESTS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(8),
            tx_poll_interval_ms: var("TX_POLL_INTERVAL_MS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1000),
        };

        Ok(Config {
            server,
            network: NetworkConfig::preset(network)?,
            private_key: var("SEI_PRIVATE_KEY"),
            performance,
        })
    }

    /// 验证配置的有效性
    ///
    /// 私钥格式错误不会阻止启动，只在写操作时报配置错误。
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.performance.max_concurrent_requests == 0 {
            anyhow::bail!("MAX_CONCURRENT_REQUESTS 必须大于 0");
        }

        if self.performance.tx_poll_interval_ms == 0 {
            anyhow::bail!("TX_POLL_INTERVAL_MS 必须大于 0");
        }

        if let Some(ref key) = self.private_key {
            let hex = key.strip_prefix("0x").unwrap_or(key);
            if hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                eprintln!("⚠️  警告: SEI_PRIVATE_KEY 不是 64 位十六进制字符串，写操作将失败");
            }
        }

        Ok(())
    }

    /// 打印配置信息（隐藏敏感信息）
    pub fn print_info(&self) {
        eprintln!("📋 配置信息:");
        eprintln!("  服务器名称: {}", self.server.name);
        eprintln!("  服务器版本: {}", self.server.version);
        eprintln!("  日志级别: {}", self.server.log_level);
        eprintln!("  JSON 日志: {}", self.server.log_json_format);
        if let Some(ref path) = self.server.log_file {
            eprintln!("  日志文件: {}", path);
        }

        eprintln!("\n🌐 SEI 网络: {}", self.network.network);
        eprintln!("  RPC 节点: {}", self.network.rpc_url);
        eprintln!("  Chain ID: {}", self.network.chain_id);

        if self.private_key.is_some() {
            eprintln!("  私钥: ✅ 已配置");
        } else {
            eprintln!("  私钥: ❌ 未配置（只读模式）");
        }

        eprintln!("\n🐉 DragonSwap V1:");
        eprintln!("  Factory: {:?}", self.network.factory);
        eprintln!("  Router: {:?}", self.network.router);
        eprintln!("  wSEI: {:?}", self.network.wrapped_native);

        eprintln!("\n⚡ 性能:");
        eprintln!("  并发请求: {}", self.performance.max_concurrent_requests);
        eprintln!("  回执轮询: {}ms", self.performance.tx_poll_interval_ms);
    }
}
