//! 外部接口的原始记录与宽松解析。

use serde::Deserialize;
use serde_json::{Map, Value};

pub use domain::login::{integer_field, text_field};

/// 通行接口返回的单条记录（未做时间修正）。
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PassageEntry {
    pub date: String,
    #[serde(rename = "mechanizmaDescription", default)]
    pub mechanizma_description: Option<String>,
    #[serde(default)]
    pub event: Option<Value>,
}

impl PassageEntry {
    pub fn event_code(&self) -> Option<i64> {
        match self.event.as_ref()? {
            Value::Number(number) => number.as_i64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }
}

/// 读取布尔字段；接受 bool、0/1 与 "true"/"false"。
pub fn bool_field(object: &Map<String, Value>, key: &str) -> Option<bool> {
    match object.get(key)? {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_i64().map(|value| value != 0),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// 把顶层数组拆成对象列表，非对象元素忽略。
pub fn object_rows(value: &Value) -> Vec<&Map<String, Value>> {
    match value {
        Value::Array(items) => items.iter().filter_map(Value::as_object).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bool_field_accepts_loose_values() {
        let object = json!({"a": true, "b": 0, "c": "true", "d": "maybe"});
        let object = object.as_object().expect("object");
        assert_eq!(bool_field(object, "a"), Some(true));
        assert_eq!(bool_field(object, "b"), Some(false));
        assert_eq!(bool_field(object, "c"), Some(true));
        assert_eq!(bool_field(object, "d"), None);
        assert_eq!(bool_field(object, "missing"), None);
    }

    #[test]
    fn event_code_reads_numbers_and_strings() {
        let entry: PassageEntry =
            serde_json::from_value(json!({"date": "2025-06-01 10:00:00", "event": "3"}))
                .expect("entry");
        assert_eq!(entry.event_code(), Some(3));
        assert_eq!(entry.mechanizma_description, None);
    }
}
