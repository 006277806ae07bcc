use ethers::prelude::abigen;

abigen!(
    Erc20Token,
    r#"[
        function symbol() external view returns (string)
        function decimals() external view returns (uint8)
        function approve(address spender, uint256 amount) external returns (bool)
    ]"#
);
