use ethers::prelude::abigen;

// approve/decimals 走 ERC-20 绑定
abigen!(
    WrappedSei,
    r#"[
        function deposit() external payable
    ]"#
);
