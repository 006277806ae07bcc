use crate::chain::{DexChain, SwapOrder};
use crate::config::NetworkConfig;
use crate::error::DexError;
use crate::types::{Pool, Reserves, TokenInfo};
use crate::units::{format_units, parse_units};
use ethers::prelude::*;
use futures::stream::{self, StreamExt};
use std::sync::{Arc, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, instrument, warn};

/// 交易截止时间：提交时刻 + 20 分钟
pub const SWAP_DEADLINE_SECS: u64 = 20 * 60;

/// 固定 1% 滑点：最小输出 = 报价 * 99 / 100
pub const SLIPPAGE_NUMERATOR: u64 = 99;
pub const SLIPPAGE_DENOMINATOR: u64 = 100;

/// `wrap_sei` 使用的固定精度
///
/// 不查询 wSEI 合约的 decimals；`approve_wsei` 则使用链上的真实精度。
/// 两者不一致，但这里保持原有行为，由测试固定下来。
pub const WRAP_ASSUMED_DECIMALS: u8 = 6;

/// DragonSwap V1 服务
///
/// 把工具调用编排为对 Factory / Pair / ERC-20 / Router / wSEI 合约的
/// 读写调用。签名者在首次写操作时惰性创建，之后复用。
pub struct DragonSwapService<C> {
    chain: Arc<C>,
    network: NetworkConfig,
    private_key: Option<String>,
    signer: OnceLock<LocalWallet>,
    max_concurrency: usize,
}

impl<C: DexChain> DragonSwapService<C> {
    /// 创建服务实例
    ///
    /// # 参数
    /// - `chain`: 链客户端
    /// - `network`: 网络配置（之后不可变）
    /// - `private_key`: 可选的签名私钥，缺失时所有写操作直接失败
    pub fn new(chain: Arc<C>, network: NetworkConfig, private_key: Option<String>) -> Self {
        Self {
            chain,
            network,
            private_key,
            signer: OnceLock::new(),
            max_concurrency: 8,
        }
    }

    /// 设置列出交易对时的并发数（至少为 1）
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// 获取签名者，首次调用时从私钥创建
    ///
    /// 私钥缺失或不是 64 位十六进制时返回 `DexError::Config`，不发起任何网络请求。
    fn signer(&self) -> Result<&LocalWallet, DexError> {
        if let Some(wallet) = self.signer.get() {
            return Ok(wallet);
        }

        let key = self.private_key.as_deref().ok_or_else(|| {
            DexError::Config("未配置私钥，请在会话配置中提供 SEI_PRIVATE_KEY".to_string())
        })?;

        let hex = key.strip_prefix("0x").unwrap_or(key);
        if hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DexError::Config(
                "私钥必须是 64 位十六进制字符串".to_string(),
            ));
        }

        let wallet = hex
            .parse::<LocalWallet>()
            .map_err(|e| DexError::Config(format!("无法解析私钥: {}", e)))?
            .with_chain_id(self.network.chain_id);

        info!(address = ?wallet.address(), "签名者已创建");

        // 并发首次调用时以先写入者为准，两者由同一私钥派生
        Ok(self.signer.get_or_init(|| wallet))
    }

    // ==================== 只读操作 ====================

    /// 列出 Factory 中的全部交易对
    ///
    /// 单个交易对读取失败只记录警告并跳过；结果保持 Factory 索引顺序。
    #[instrument(skip(self))]
    pub async fn list_pools(&self) -> Result<Vec<Pool>, DexError> {
        let factory = self.network.factory;
        let count = self.chain.all_pairs_length(factory).await?;
        let count = u64::try_from(count)
            .map_err(|_| DexError::Network(format!("allPairsLength 返回值异常: {}", count)))?;

        info!(pair_count = count, "开始读取交易对");

        let results: Vec<(u64, Result<Option<Pool>, DexError>)> = stream::iter(0..count)
            .map(|index| async move { (index, self.fetch_pool(index).await) })
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let pools: Vec<Pool> = results
            .into_iter()
            .filter_map(|(index, result)| match result {
                Ok(pool) => pool,
                Err(e) => {
                    let err = DexError::PartialFetch(format!("index {}: {}", index, e));
                    warn!(index = index, error = %err, "跳过读取失败的交易对");
                    None
                }
            })
            .collect();

        info!(pool_count = pools.len(), "交易对读取完成");

        Ok(pools)
    }

    /// 读取单个交易对，零地址返回 `None`
    async fn fetch_pool(&self, index: u64) -> Result<Option<Pool>, DexError> {
        let pair = self
            .chain
            .all_pairs(self.network.factory, U256::from(index))
            .await?;

        if pair == Address::zero() {
            debug!(index = index, "跳过零地址交易对");
            return Ok(None);
        }

        let (token0, token1, (reserve0, reserve1)) = tokio::try_join!(
            self.chain.token0(pair),
            self.chain.token1(pair),
            self.chain.get_reserves(pair),
        )?;

        let (symbol0, symbol1, decimals0, decimals1) = tokio::try_join!(
            self.chain.symbol(token0),
            self.chain.symbol(token1),
            self.chain.decimals(token0),
            self.chain.decimals(token1),
        )?;

        Ok(Some(Pool {
            pair_address: pair,
            token0: TokenInfo {
                address: token0,
                symbol: symbol0,
                decimals: decimals0,
            },
            token1: TokenInfo {
                address: token1,
                symbol: symbol1,
                decimals: decimals1,
            },
            reserves: Reserves::new(reserve0, reserve1),
        }))
    }

    /// 查询 `token_in -> token_out` 的报价，返回格式化后的输出数量
    #[instrument(skip(self))]
    pub async fn get_quote(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: &str,
    ) -> Result<String, DexError> {
        let decimals_in = self.chain.decimals(token_in).await?;
        let amount_in_raw = parse_units(amount_in, decimals_in)?;

        let amount_out = self.quote_raw(token_in, token_out, amount_in_raw).await?;

        let decimals_out = self.chain.decimals(token_out).await?;
        let formatted = format_units(amount_out, decimals_out);

        debug!(
            amount_in_raw = %amount_in_raw,
            amount_out_raw = %amount_out,
            amount_out = %formatted,
            "报价完成"
        );

        Ok(formatted)
    }

    /// 通过 Router 的 getAmountsOut 查询路径 [token_in, token_out] 的输出
    async fn quote_raw(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
    ) -> Result<U256, DexError> {
        let amounts = self
            .chain
            .get_amounts_out(self.network.router, amount_in, vec![token_in, token_out])
            .await?;

        amounts.get(1).copied().ok_or_else(|| {
            DexError::Network(format!(
                "getAmountsOut 返回了 {} 个元素，期望 2 个",
                amounts.len()
            ))
        })
    }

    // ==================== 写操作 ====================

    /// 执行兑换：approve -> 重新报价 -> swapExactTokensForTokens
    ///
    /// 任一步失败即中止。已确认的 approve 不会回滚，授权仍然有效。
    #[instrument(skip(self))]
    pub async fn execute_swap(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: &str,
    ) -> Result<TxHash, DexError> {
        let signer = self.signer()?;
        let router = self.network.router;

        let decimals_in = self.chain.decimals(token_in).await?;
        let amount_in_raw = parse_units(amount_in, decimals_in)?;

        let approve_tx = self
            .chain
            .approve(signer, token_in, router, amount_in_raw)
            .await?;
        info!(tx_hash = ?approve_tx, amount = %amount_in_raw, "Router 授权已确认");

        let quoted = self.quote_raw(token_in, token_out, amount_in_raw).await?;
        let amount_out_min = minimum_output(quoted);

        let order = SwapOrder {
            amount_in: amount_in_raw,
            amount_out_min,
            path: vec![token_in, token_out],
            to: signer.address(),
            deadline: U256::from(deadline_from_now()?),
        };

        info!(
            quoted = %quoted,
            amount_out_min = %amount_out_min,
            deadline = %order.deadline,
            "提交兑换交易"
        );

        let swap_tx = self
            .chain
            .swap_exact_tokens_for_tokens(signer, router, order)
            .await?;

        info!(tx_hash = ?swap_tx, "兑换交易已确认");

        Ok(swap_tx)
    }

    /// 把原生 SEI 包装为 wSEI（按固定 6 位精度换算）
    #[instrument(skip(self))]
    pub async fn wrap_sei(&self, amount: &str) -> Result<TxHash, DexError> {
        let signer = self.signer()?;
        let value = parse_units(amount, WRAP_ASSUMED_DECIMALS)?;

        info!(
            value = %value,
            wsei = ?self.network.wrapped_native,
            signer = ?signer.address(),
            "包装 SEI"
        );

        self.chain
            .deposit(signer, self.network.wrapped_native, value)
            .await
    }

    /// 授权 Router 使用 wSEI（按链上 decimals 换算）
    #[instrument(skip(self))]
    pub async fn approve_wsei(&self, amount: &str) -> Result<TxHash, DexError> {
        let signer = self.signer()?;
        let wsei = self.network.wrapped_native;

        let decimals = self.chain.decimals(wsei).await?;
        let value = parse_units(amount, decimals)?;

        self.chain
            .approve(signer, wsei, self.network.router, value)
            .await
    }
}

/// 最小可接受输出（向下取整）
pub fn minimum_output(quoted: U256) -> U256 {
    quoted * U256::from(SLIPPAGE_NUMERATOR) / U256::from(SLIPPAGE_DENOMINATOR)
}

/// 当前 Unix 时间 + 20 分钟
fn deadline_from_now() -> Result<u64, DexError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| DexError::Config(format!("系统时间早于 Unix 纪元: {}", e)))?;
    Ok(now.as_secs() + SWAP_DEADLINE_SECS)
}
