// ==========================================
// 商品目录批量对账系统 - 名称规范化
// ==========================================
// 职责:
// - 空白规范化（落库 / 比较使用的 name）
// - 停用词剥离规范化（随行携带的 clean_name，不参与匹配）
// - 字符分类（字母 / 数字 / 符号，含阿拉伯文码位区间表）
// 约束: 两种规范化均幂等
// ==========================================

use std::collections::HashSet;
use std::sync::OnceLock;

/// 字符类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharType {
    Letter,
    Number,
    Symbol,
}

/// 阿拉伯文码位区间（闭区间，升序）
const ARABIC_RANGES: &[(u32, u32)] = &[
    (0x0600, 0x06FF), // Arabic
    (0x0750, 0x077F), // Arabic Supplement
    (0x08A0, 0x08FF), // Arabic Extended-A
    (0xFB50, 0xFDFF), // Arabic Presentation Forms-A
    (0xFE70, 0xFEFF), // Arabic Presentation Forms-B
];

/// 阿拉伯文区间内的标点与符号（其余码位均按字母处理）
const ARABIC_SYMBOL_RANGES: &[(u32, u32)] = &[
    (0x0600, 0x060F), // 数字符号、根号、逗号、日期分隔符等
    (0x061B, 0x061B), // 分号
    (0x061D, 0x061F), // 句末符号、问号
    (0x066A, 0x066D), // 百分号、小数点、千位分隔符、星号
    (0x06D4, 0x06D4), // 句号
    (0x06DD, 0x06DE), // 经节结束符
    (0x06E9, 0x06E9), // 叩头符
    (0x08E2, 0x08E2), // 争议经节结束符
    (0xFD3E, 0xFD3F), // 装饰括号
    (0xFDFC, 0xFDFD), // 里亚尔符号、太斯米
];

/// 剂型 / 包装 / 单位 / 尺寸等填充词（整词精确匹配）
const STOPWORDS: &[&str] = &[
    // 剂型
    "اقراص", "قرص", "كبسول", "كبسولة", "شراب", "شرب", "لبوس", "حقن", "للحقن", "مرهم",
    "جل", "جيل", "كريم", "محلول", "بودرة", "بودره", "قطرة", "قطره", "نقط", "بخاخ",
    "سبراى", "اسبراي", "شرائط", "شريط", "لصقة", "فيال", "امبول", "امبولات", "اكياس",
    "كيس", "فوار", "حبيبات", "سولوستار", "شامبو", "غرغرة", "لوسيون", "لوشن", "زيت",
    "استنشاق", "زجاجه", "سعر",
    // 单位 / 数量
    "وحدة", "دولية", "دوليه", "جرام", "جم", "مجم", "ملجم", "مل", "ملل", "مللى", "لتر",
    "صابون", "لبن",
    // 尺寸 / 状态
    "كبير", "صغير", "جديد", "قديم", "سائل",
    // 单字母缩写
    "م", "ج", "ق", "س",
    // 拉丁写法
    "tab", "tablet", "cap", "capsule",
];

fn stopwords() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOPWORDS.iter().copied().collect())
}

/// 是否位于阿拉伯文码位区间内
pub fn is_arabic(ch: char) -> bool {
    in_ranges(ARABIC_RANGES, ch)
}

fn in_ranges(ranges: &[(u32, u32)], ch: char) -> bool {
    let cp = ch as u32;
    ranges.iter().any(|&(lo, hi)| (lo..=hi).contains(&cp))
}

/// 阿拉伯文变音符号与延长符（规范化时丢弃）
fn is_arabic_diacritic(ch: char) -> bool {
    matches!(ch, '\u{064B}'..='\u{065F}' | '\u{0670}' | '\u{0640}')
}

/// 单码位分类
///
/// 阿拉伯文区间内：数字 → Number，标点符号表 → Symbol，其余（字母、
/// 变音符号、古兰经注记等组合标记）→ Letter，保证组合标记不会把词拆开。
pub fn classify_char(ch: char) -> CharType {
    if ch.is_numeric() {
        CharType::Number
    } else if is_arabic(ch) {
        if in_ranges(ARABIC_SYMBOL_RANGES, ch) {
            CharType::Symbol
        } else {
            CharType::Letter
        }
    } else if ch.is_alphabetic() {
        CharType::Letter
    } else {
        CharType::Symbol
    }
}

// ==========================================
// TextNormalizer
// ==========================================
pub struct TextNormalizer;

impl TextNormalizer {
    /// 空白规范化：连续空白折叠为单个空格，去除首尾空白
    pub fn normalize_whitespace(&self, raw: &str) -> String {
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// 停用词剥离规范化
    ///
    /// # 规则
    /// 1. 小写化；丢弃阿拉伯文变音符号
    /// 2. 字母与数字相接处断词（"500mg" → "500 mg"）
    /// 3. 符号视为分隔符；两个数字之间的 `.` `,` `/` 保留（"0.5"）
    /// 4. 移除停用词整词，折叠空白
    pub fn clean(&self, raw: &str) -> String {
        let chars: Vec<char> = raw
            .to_lowercase()
            .chars()
            .filter(|c| !is_arabic_diacritic(*c))
            .collect();

        let mut spaced = String::with_capacity(raw.len());
        let mut prev: Option<CharType> = None;

        for (idx, &ch) in chars.iter().enumerate() {
            if ch.is_whitespace() {
                spaced.push(' ');
                prev = None;
                continue;
            }

            match classify_char(ch) {
                CharType::Symbol => {
                    let between_digits = matches!(ch, '.' | ',' | '/')
                        && prev == Some(CharType::Number)
                        && chars
                            .get(idx + 1)
                            .is_some_and(|next| classify_char(*next) == CharType::Number);
                    if between_digits {
                        spaced.push(ch);
                    } else {
                        spaced.push(' ');
                        prev = None;
                    }
                }
                kind => {
                    if prev.is_some_and(|p| p != kind) {
                        spaced.push(' ');
                    }
                    spaced.push(ch);
                    prev = Some(kind);
                }
            }
        }

        let words = stopwords();
        spaced
            .split_whitespace()
            .filter(|token| !words.contains(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
