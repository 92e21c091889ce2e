// ==========================================
// 商品目录批量对账系统 - 价格解析器
// ==========================================
// 职责: 文本金额 → 最小货币单位整数（points，1 镑 = 100 points）
// 红线: 下游只使用整数 points，不经过浮点
// ==========================================

use crate::importer::error::PriceParseError;

/// 每个货币单位对应的 points 数
pub const POINTS_PER_UNIT: i64 = 100;

/// 小数位上限
const MAX_FRACTION_DIGITS: usize = 2;

pub struct PriceParser;

impl PriceParser {
    /// 解析镑金额为 points
    ///
    /// # 接受的格式
    /// - 可选首尾空白、可选前导 `£`
    /// - 整数部分（至少一位数字）+ 可选的 `.` 与 1~2 位小数
    ///
    /// # 返回
    /// - Ok(i64): points
    /// - Err(PriceParseError): 空串 / 负数 / 非法字符 / 小数点格式错误 / 精度超限 / 溢出
    pub fn parse_points(&self, raw: &str) -> Result<i64, PriceParseError> {
        let trimmed = raw.trim();
        let value = trimmed.strip_prefix('£').unwrap_or(trimmed).trim();

        if value.is_empty() {
            return Err(PriceParseError::Empty);
        }
        if value.starts_with('-') {
            return Err(PriceParseError::Negative(value.to_string()));
        }
        if let Some(ch) = value.chars().find(|c| !c.is_ascii_digit() && *c != '.') {
            return Err(PriceParseError::InvalidCharacter {
                value: value.to_string(),
                ch,
            });
        }

        let mut parts = value.split('.');
        let int_part = parts.next().unwrap_or("");
        let frac_part = parts.next();
        if parts.next().is_some() || int_part.is_empty() || frac_part == Some("") {
            return Err(PriceParseError::MalformedDecimal(value.to_string()));
        }

        let frac = frac_part.unwrap_or("");
        if frac.len() > MAX_FRACTION_DIGITS {
            return Err(PriceParseError::TooPrecise(value.to_string()));
        }

        let overflow = || PriceParseError::Overflow(value.to_string());

        let units = digits_to_i64(int_part).ok_or_else(overflow)?;
        // 小数右侧补零到两位（"5" → 50）
        let cents = digits_to_i64(frac).ok_or_else(overflow)?
            * 10_i64.pow((MAX_FRACTION_DIGITS - frac.len()) as u32);

        units
            .checked_mul(POINTS_PER_UNIT)
            .and_then(|p| p.checked_add(cents))
            .ok_or_else(overflow)
    }
}

/// 纯 ASCII 数字串 → i64（溢出返回 None；空串为 0）
fn digits_to_i64(digits: &str) -> Option<i64> {
    digits.bytes().try_fold(0_i64, |acc, b| {
        acc.checked_mul(10)?.checked_add(i64::from(b - b'0'))
    })
}
