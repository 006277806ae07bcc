use ethers::prelude::abigen;

abigen!(
    DragonswapFactory,
    r#"[
        function allPairs(uint256) external view returns (address pair)
        function allPairsLength() external view returns (uint256)
    ]"#
);
