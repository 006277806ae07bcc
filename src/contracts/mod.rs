// DragonSwap V1 合约绑定（仅包含实际调用到的函数）

pub mod erc20;
pub mod factory;
pub mod pair;
pub mod router;
pub mod wsei;

pub use erc20::Erc20Token;
pub use factory::DragonswapFactory;
pub use pair::DragonswapPair;
pub use router::DragonswapRouter;
pub use wsei::WrappedSei;
