use crate::contracts::{DragonswapFactory, DragonswapPair, DragonswapRouter, Erc20Token, WrappedSei};
use crate::error::DexError;
use async_trait::async_trait;
use ethers::abi::Detokenize;
use ethers::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// 带签名能力的客户端
type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// `swapExactTokensForTokens` 的参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOrder {
    pub amount_in: U256,
    pub amount_out_min: U256,
    pub path: Vec<Address>,
    pub to: Address,
    /// Unix 时间戳（秒）
    pub deadline: U256,
}

/// DragonSwap 相关合约的链上调用接口
///
/// 每个方法对应一个实际使用到的合约函数。只读方法走 `eth_call`；
/// 写方法使用传入的签名者发送交易，并等待交易被打包后返回交易哈希。
#[async_trait]
pub trait DexChain: Send + Sync {
    // ---- Factory ----
    async fn all_pairs_length(&self, factory: Address) -> Result<U256, DexError>;
    async fn all_pairs(&self, factory: Address, index: U256) -> Result<Address, DexError>;

    // ---- Pair ----
    async fn token0(&self, pair: Address) -> Result<Address, DexError>;
    async fn token1(&self, pair: Address) -> Result<Address, DexError>;
    async fn get_reserves(&self, pair: Address) -> Result<(U256, U256), DexError>;

    // ---- ERC-20 ----
    async fn symbol(&self, token: Address) -> Result<String, DexError>;
    async fn decimals(&self, token: Address) -> Result<u8, DexError>;
    async fn approve(
        &self,
        signer: &LocalWallet,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash, DexError>;

    // ---- Router ----
    async fn get_amounts_out(
        &self,
        router: Address,
        amount_in: U256,
        path: Vec<Address>,
    ) -> Result<Vec<U256>, DexError>;
    async fn swap_exact_tokens_for_tokens(
        &self,
        signer: &LocalWallet,
        router: Address,
        order: SwapOrder,
    ) -> Result<TxHash, DexError>;

    // ---- Wrapped native ----
    async fn deposit(
        &self,
        signer: &LocalWallet,
        wrapped: Address,
        value: U256,
    ) -> Result<TxHash, DexError>;
}

/// 基于 JSON-RPC (HTTP) 的链客户端
#[derive(Clone)]
pub struct EthChain {
    provider: Arc<Provider<Http>>,
}

impl EthChain {
    /// 创建链客户端（不发起网络请求）
    ///
    /// # 参数
    /// - `rpc_url`: RPC 节点地址
    /// - `poll_interval`: 等待交易回执时的轮询间隔
    pub fn connect(rpc_url: &str, poll_interval: Duration) -> Result<Self, DexError> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| DexError::Config(format!("无效的 RPC URL '{}': {}", rpc_url, e)))?
            .interval(poll_interval);

        info!(rpc_url = %rpc_url, "初始化 SEI EVM 客户端");

        Ok(Self {
            provider: Arc::new(provider),
        })
    }

    /// 探测节点并比较 Chain ID
    ///
    /// 只记录日志，不会让启动失败：节点暂时不可达时各个工具调用会各自报错。
    #[instrument(skip(self))]
    pub async fn probe(&self, expected_chain_id: u64) -> Option<u64> {
        match self.provider.get_chainid().await {
            Ok(chain_id) => {
                let chain_id = chain_id.as_u64();
                if chain_id != expected_chain_id {
                    warn!(
                        expected = expected_chain_id,
                        actual = chain_id,
                        "提供的 Chain ID 与节点返回值不一致"
                    );
                } else {
                    info!(chain_id = chain_id, "成功连接到 SEI EVM 节点");
                }
                Some(chain_id)
            }
            Err(e) => {
                warn!(error = %e, "无法连接到 RPC 节点，工具调用将在请求时报错");
                None
            }
        }
    }

    fn signer_client(&self, signer: &LocalWallet) -> Arc<SignerClient> {
        Arc::new(SignerMiddleware::new(
            self.provider.as_ref().clone(),
            signer.clone(),
        ))
    }
}

/// 发送交易并等待打包
///
/// 回执缺失（交易被丢弃）或 status 为 0 都视为链上执行失败。
async fn send_and_confirm<D: Detokenize>(
    call: ContractCall<SignerClient, D>,
    action: &'static str,
) -> Result<TxHash, DexError> {
    let pending = call.send().await.map_err(DexError::from_contract)?;
    let tx_hash = pending.tx_hash();

    info!(action = action, tx_hash = ?tx_hash, "交易已发送，等待确认");

    let receipt = pending
        .await?
        .ok_or_else(|| DexError::Reverted(format!("交易 {:?} 已被节点丢弃", tx_hash)))?;

    if receipt.status != Some(U64::from(1u64)) {
        return Err(DexError::Reverted(format!(
            "交易 {:?} 执行失败 (status = {:?})",
            tx_hash, receipt.status
        )));
    }

    info!(
        action = action,
        tx_hash = ?tx_hash,
        block = ?receipt.block_number,
        "交易已确认"
    );

    Ok(tx_hash)
}

#[async_trait]
impl DexChain for EthChain {
    #[instrument(skip(self))]
    async fn all_pairs_length(&self, factory: Address) -> Result<U256, DexError> {
        DragonswapFactory::new(factory, self.provider.clone())
            .all_pairs_length()
            .call()
            .await
            .map_err(DexError::from_contract)
    }

    #[instrument(skip(self))]
    async fn all_pairs(&self, factory: Address, index: U256) -> Result<Address, DexError> {
        DragonswapFactory::new(factory, self.provider.clone())
            .all_pairs(index)
            .call()
            .await
            .map_err(DexError::from_contract)
    }

    async fn token0(&self, pair: Address) -> Result<Address, DexError> {
        DragonswapPair::new(pair, self.provider.clone())
            .token_0()
            .call()
            .await
            .map_err(DexError::from_contract)
    }

    async fn token1(&self, pair: Address) -> Result<Address, DexError> {
        DragonswapPair::new(pair, self.provider.clone())
            .token_1()
            .call()
            .await
            .map_err(DexError::from_contract)
    }

    async fn get_reserves(&self, pair: Address) -> Result<(U256, U256), DexError> {
        let (reserve0, reserve1, _block_timestamp_last) =
            DragonswapPair::new(pair, self.provider.clone())
                .get_reserves()
                .call()
                .await
                .map_err(DexError::from_contract)?;

        debug!(pair = %pair, reserve0 = %reserve0, reserve1 = %reserve1, "获取到储备量");

        Ok((U256::from(reserve0), U256::from(reserve1)))
    }

    async fn symbol(&self, token: Address) -> Result<String, DexError> {
        Erc20Token::new(token, self.provider.clone())
            .symbol()
            .call()
            .await
            .map_err(DexError::from_contract)
    }

    async fn decimals(&self, token: Address) -> Result<u8, DexError> {
        Erc20Token::new(token, self.provider.clone())
            .decimals()
            .call()
            .await
            .map_err(DexError::from_contract)
    }

    #[instrument(skip(self, signer))]
    async fn approve(
        &self,
        signer: &LocalWallet,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash, DexError> {
        let contract = Erc20Token::new(token, self.signer_client(signer));
        send_and_confirm(contract.approve(spender, amount), "approve").await
    }

    #[instrument(skip(self))]
    async fn get_amounts_out(
        &self,
        router: Address,
        amount_in: U256,
        path: Vec<Address>,
    ) -> Result<Vec<U256>, DexError> {
        DragonswapRouter::new(router, self.provider.clone())
            .get_amounts_out(amount_in, path)
            .call()
            .await
            .map_err(DexError::from_contract)
    }

    #[instrument(skip(self, signer))]
    async fn swap_exact_tokens_for_tokens(
        &self,
        signer: &LocalWallet,
        router: Address,
        order: SwapOrder,
    ) -> Result<TxHash, DexError> {
        let contract = DragonswapRouter::new(router, self.signer_client(signer));
        let call = contract.swap_exact_tokens_for_tokens(
            order.amount_in,
            order.amount_out_min,
            order.path,
            order.to,
            order.deadline,
        );
        send_and_confirm(call, "swapExactTokensForTokens").await
    }

    #[instrument(skip(self, signer))]
    async fn deposit(
        &self,
        signer: &LocalWallet,
        wrapped: Address,
        value: U256,
    ) -> Result<TxHash, DexError> {
        let contract = WrappedSei::new(wrapped, self.signer_client(signer));
        send_and_confirm(contract.deposit().value(value), "deposit").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_rejects_invalid_url() {
        let result = EthChain::connect("not a url", Duration::from_millis(500));
        assert!(matches!(result, Err(DexError::Config(_))));
    }

    #[test]
    fn test_connect_does_not_touch_network() {
        // 构造客户端只解析 URL，不会请求节点
        let chain = EthChain::connect("http://127.0.0.1:1", Duration::from_millis(500));
        assert!(chain.is_ok());
    }

    #[tokio::test]
    async fn test_probe_unreachable_node() {
        let chain = EthChain::connect("http://127.0.0.1:1", Duration::from_millis(500)).unwrap();
        assert_eq!(chain.probe(713715).await, None);
    }

    #[tokio::test]
    async fn test_read_against_unreachable_node_is_network_error() {
        let chain = EthChain::connect("http://127.0.0.1:1", Duration::from_millis(500)).unwrap();
        let result = chain.decimals(Address::zero()).await;
        assert!(matches!(result, Err(DexError::Network(_))));
    }
}
