//! 测试用的内存链客户端
//!
//! `MockChain` 按构造时登记的交易对、代币和报价应答调用，并记录每一次调用，
//! 供服务层和工具层的测试断言调用顺序与参数。

use crate::chain::{DexChain, SwapOrder};
use crate::error::DexError;
use async_trait::async_trait;
use ethers::prelude::*;
use std::collections::HashMap;
use std::sync::Mutex;

/// anvil 默认账户 #0 的私钥（不带 0x）
pub const TEST_PRIVATE_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// `TEST_PRIVATE_KEY` 对应的地址
pub const TEST_SIGNER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

pub fn addr(n: u64) -> Address {
    Address::from_low_u64_be(n)
}

/// 记录下来的链上调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainCall {
    AllPairsLength,
    AllPairs(U256),
    Token0(Address),
    Token1(Address),
    GetReserves(Address),
    Symbol(Address),
    Decimals(Address),
    GetAmountsOut {
        router: Address,
        amount_in: U256,
        path: Vec<Address>,
    },
    Approve {
        token: Address,
        spender: Address,
        amount: U256,
    },
    Swap {
        router: Address,
        order: SwapOrder,
    },
    Deposit {
        wrapped: Address,
        value: U256,
    },
}

struct PairState {
    token0: Address,
    token1: Address,
    reserve0: U256,
    reserve1: U256,
}

#[derive(Default)]
pub struct MockChain {
    pairs: Vec<Address>,
    pair_state: HashMap<Address, PairState>,
    tokens: HashMap<Address, (String, u8)>,
    amounts_out: Vec<U256>,
    fail_pair_count: bool,
    fail_quote: bool,
    fail_swap: bool,
    calls: Mutex<Vec<ChainCall>>,
    tx_counter: Mutex<u64>,
}

fn reverted(what: &str) -> DexError {
    DexError::Reverted(format!("execution reverted: {}", what))
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: Address, symbol: &str, decimals: u8) -> Self {
        self.tokens.insert(token, (symbol.to_string(), decimals));
        self
    }

    pub fn with_pair(
        mut self,
        pair: Address,
        token0: Address,
        token1: Address,
        reserve0: u64,
        reserve1: u64,
    ) -> Self {
        self.pairs.push(pair);
        self.pair_state.insert(
            pair,
            PairState {
                token0,
                token1,
                reserve0: U256::from(reserve0),
                reserve1: U256::from(reserve1),
            },
        );
        self
    }

    /// 在 Factory 列表中追加一个零地址槽位
    pub fn with_zero_pair(mut self) -> Self {
        self.pairs.push(Address::zero());
        self
    }

    pub fn with_amounts_out(mut self, amounts: Vec<U256>) -> Self {
        self.amounts_out = amounts;
        self
    }

    pub fn failing_pair_count(mut self) -> Self {
        self.fail_pair_count = true;
        self
    }

    pub fn failing_quote(mut self) -> Self {
        self.fail_quote = true;
        self
    }

    pub fn failing_swap(mut self) -> Self {
        self.fail_swap = true;
        self
    }

    pub fn calls(&self) -> Vec<ChainCall> {
        self.calls.lock().unwrap().clone()
    }

    /// 最近一次写操作返回的交易哈希
    pub fn last_tx_hash(&self) -> TxHash {
        TxHash::from_low_u64_be(*self.tx_counter.lock().unwrap())
    }

    fn record(&self, call: ChainCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_tx_hash(&self) -> TxHash {
        let mut counter = self.tx_counter.lock().unwrap();
        *counter += 1;
        TxHash::from_low_u64_be(*counter)
    }

    fn pair(&self, pair: Address) -> Result<&PairState, DexError> {
        self.pair_state.get(&pair).ok_or_else(|| reverted("not a pair"))
    }

    fn token(&self, token: Address) -> Result<&(String, u8), DexError> {
        self.tokens.get(&token).ok_or_else(|| reverted("not a token"))
    }
}

#[async_trait]
impl DexChain for MockChain {
    async fn all_pairs_length(&self, _factory: Address) -> Result<U256, DexError> {
        self.record(ChainCall::AllPairsLength);
        if self.fail_pair_count {
            return Err(DexError::Network("connection refused".to_string()));
        }
        Ok(U256::from(self.pairs.len()))
    }

    async fn all_pairs(&self, _factory: Address, index: U256) -> Result<Address, DexError> {
        self.record(ChainCall::AllPairs(index));
        self.pairs
            .get(index.as_usize())
            .copied()
            .ok_or_else(|| reverted("index out of range"))
    }

    async fn token0(&self, pair: Address) -> Result<Address, DexError> {
        self.record(ChainCall::Token0(pair));
        Ok(self.pair(pair)?.token0)
    }

    async fn token1(&self, pair: Address) -> Result<Address, DexError> {
        self.record(ChainCall::Token1(pair));
        Ok(self.pair(pair)?.token1)
    }

    async fn get_reserves(&self, pair: Address) -> Result<(U256, U256), DexError> {
        self.record(ChainCall::GetReserves(pair));
        let state = self.pair(pair)?;
        Ok((state.reserve0, state.reserve1))
    }

    async fn symbol(&self, token: Address) -> Result<String, DexError> {
        self.record(ChainCall::Symbol(token));
        Ok(self.token(token)?.0.clone())
    }

    async fn decimals(&self, token: Address) -> Result<u8, DexError> {
        self.record(ChainCall::Decimals(token));
        Ok(self.token(token)?.1)
    }

    async fn approve(
        &self,
        _signer: &LocalWallet,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash, DexError> {
        self.record(ChainCall::Approve {
            token,
            spender,
            amount,
        });
        Ok(self.next_tx_hash())
    }

    async fn get_amounts_out(
        &self,
        router: Address,
        amount_in: U256,
        path: Vec<Address>,
    ) -> Result<Vec<U256>, DexError> {
        self.record(ChainCall::GetAmountsOut {
            router,
            amount_in,
            path,
        });
        if self.fail_quote {
            return Err(reverted("DragonswapLibrary: INSUFFICIENT_LIQUIDITY"));
        }
        Ok(self.amounts_out.clone())
    }

    async fn swap_exact_tokens_for_tokens(
        &self,
        _signer: &LocalWallet,
        router: Address,
        order: SwapOrder,
    ) -> Result<TxHash, DexError> {
        self.record(ChainCall::Swap { router, order });
        if self.fail_swap {
            return Err(reverted("DragonswapRouter: INSUFFICIENT_OUTPUT_AMOUNT"));
        }
        Ok(self.next_tx_hash())
    }

    async fn deposit(
        &self,
        _signer: &LocalWallet,
        wrapped: Address,
        value: U256,
    ) -> Result<TxHash, DexError> {
        self.record(ChainCall::Deposit { wrapped, value });
        Ok(self.next_tx_hash())
    }
}
