use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// 折叠为比较用的键
///
/// 去掉首尾空白、转小写、去除变音符号（NFD 分解后丢弃组合字符，`đ` 单独映射为 `d`），
/// 并移除内部的空白、下划线和连字符。
pub fn fold_key(raw: &str) -> String {
    raw.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| if c == 'đ' { 'd' } else { c })
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .collect()
}

/// 角色字符串归一化，"Giảng Viên"、"GIANGVIEN"、"giang_vien" 得到同一个值
pub fn normalize_role(raw: &str) -> String {
    fold_key(raw)
}

/// 判断角色是否在白名单中（白名单元素须已归一化）
pub fn is_privileged_role(raw: &str, privileged: &[String]) -> bool {
    let role = normalize_role(raw);
    !role.is_empty() && privileged.iter().any(|allowed| *allowed == role)
}
