use crate::error::DexError;
use ethers::types::U256;

/// 格式化代币金额
///
/// 与 ethers 的 `formatUnits` 保持一致：整数部分后总是带小数点，
/// 小数部分去掉末尾的 0，但至少保留一位（`25000000` @ 6 位 -> `"25.0"`）。
pub fn format_units(amount: U256, decimals: u8) -> String {
    if decimals == 0 {
        return format!("{}.0", amount);
    }

    // 10^decimals 超出 U256 时，金额必然全部落在小数部分
    let (integer_part, fractional_part) =
        match U256::from(10u8).checked_pow(U256::from(decimals)) {
            Some(divisor) => (amount / divisor, amount % divisor),
            None => (U256::zero(), amount),
        };

    let frac_str = format!("{:0width$}", fractional_part, width = decimals as usize);
    let frac_trimmed = frac_str.trim_end_matches('0');
    if frac_trimmed.is_empty() {
        format!("{}.0", integer_part)
    } else {
        format!("{}.{}", integer_part, frac_trimmed)
    }
}

/// 解析代币金额
///
/// 输入为十进制字符串（如 `"1.5"`），按 `decimals` 缩放为最小单位整数。
/// 直接在字符串上拆分整数和小数部分，不经过浮点或定长小数，任意精度都不会被舍入。
/// 负数、科学计数法、无法解析的字符串以及超过代币精度的小数位都返回 `DexError::Validation`。
pub fn parse_units(amount_str: &str, decimals: u8) -> Result<U256, DexError> {
    let (integer_part, fractional_part) = split_decimal(amount_str)?;

    // 末尾的 0 不计入精度
    let fractional_part = fractional_part.trim_end_matches('0');
    if fractional_part.len() > decimals as usize {
        return Err(DexError::Validation(format!(
            "金额 '{}' 的精度超过了代币支持的 {} 位小数",
            amount_str.trim(),
            decimals
        )));
    }

    let padding_zeros = decimals as usize - fractional_part.len();
    let digits = format!("{}{}{}", integer_part, fractional_part, "0".repeat(padding_zeros));
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::zero());
    }

    U256::from_dec_str(digits)
        .map_err(|e| DexError::Validation(format!("金额过大，无法转换: {}", e)))
}

/// 校验金额字符串是一个非负十进制数（不涉及代币精度）
pub fn check_decimal(amount_str: &str) -> Result<(), DexError> {
    split_decimal(amount_str).map(|_| ())
}

/// 按 `整数[.小数]` 拆分金额字符串
///
/// 只接受 ASCII 数字和至多一个小数点，整数和小数部分至少一侧非空（`".5"`、`"1."` 可以）。
fn split_decimal(amount_str: &str) -> Result<(&str, &str), DexError> {
    let trimmed = amount_str.trim();

    if trimmed.starts_with('-') {
        return Err(DexError::Validation(format!(
            "金额不能为负数: {}",
            trimmed
        )));
    }

    let (integer_part, fractional_part) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

    if (integer_part.is_empty() && fractional_part.is_empty())
        || !all_digits(integer_part)
        || !all_digits(fractional_part)
    {
        return Err(DexError::Validation(format!(
            "无法解析金额 '{}': 需要十进制数字，如 1.5",
            trimmed
        )));
    }

    Ok((integer_part, fractional_part))
}
