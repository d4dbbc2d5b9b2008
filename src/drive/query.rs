//! Drive 查询语言的过滤条件构造。

use super::FOLDER_MIME_TYPE;

/// 转义字符串字面量中的 `\` 与 `'`。
fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '\'') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// 查找父目录下指定名称且未删除的文件夹。
pub(super) fn folder_lookup_query(folder_name: &str, parent_id: &str) -> String {
    format!(
        "'{}' in parents and name = '{}' and mimeType = '{}' and trashed = false",
        escape_literal(parent_id),
        escape_literal(folder_name),
        FOLDER_MIME_TYPE
    )
}
