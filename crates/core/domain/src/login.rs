//! 缓存中的 `login:*` 文档。

use serde_json::{Map, Value};

/// 缓存登录文档中已建模的字段。
///
/// 上游字段类型不稳定（数字可能以字符串存储），统一在 `from_value` 中宽松解析。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginDocument {
    pub login: String,
    pub uuid: Option<String>,
    pub uuid2: Option<String>,
    pub flat_id: Option<i64>,
    pub rbt: Option<bool>,
    pub mac: Option<String>,
    pub vlan: Option<i64>,
    pub gmt: Option<String>,
    pub ip_addr: Option<String>,
    pub onu_mac: Option<String>,
    pub password: Option<String>,
    pub service_cats: Map<String, Value>,
    /// 未建模的其余字段（不含密码）。
    pub extra: Map<String, Value>,
}

const MODELED_KEYS: [&str; 11] = [
    "UUID",
    "UUID2",
    "flatId",
    "rbt",
    "mac",
    "vlan",
    "GMT",
    "ip_addr",
    "onu_mac",
    "password",
    "servicecats",
];

impl LoginDocument {
    pub fn from_value(login: impl Into<String>, value: Value) -> Self {
        let login = login.into();
        let Value::Object(mut object) = value else {
            return Self {
                login,
                ..Self::default()
            };
        };
        let service_cats = match object.get("servicecats") {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };
        let document = Self {
            login,
            uuid: text_field(&object, "UUID"),
            uuid2: text_field(&object, "UUID2"),
            flat_id: integer_field(&object, "flatId"),
            rbt: object.get("rbt").and_then(Value::as_bool),
            mac: text_field(&object, "mac"),
            vlan: integer_field(&object, "vlan"),
            gmt: text_field(&object, "GMT"),
            ip_addr: text_field(&object, "ip_addr"),
            onu_mac: text_field(&object, "onu_mac"),
            password: text_field(&object, "password"),
            service_cats,
            extra: Map::new(),
        };
        for key in MODELED_KEYS {
            object.remove(key);
        }
        Self {
            extra: object,
            ..document
        }
    }

    /// 非零 flatId。
    pub fn flat_id(&self) -> Option<i64> {
        self.flat_id.filter(|id| *id != 0)
    }

    /// 服务类别的 `timeto` 原始值。
    pub fn category_expiry(&self, category: &str) -> Option<&Value> {
        self.service_cats
            .get(category)
            .and_then(Value::as_object)
            .and_then(|entry| entry.get("timeto"))
            .filter(|value| !value.is_null())
    }

    /// 缓存明确关闭了 RBT 集成。
    pub fn rbt_disabled(&self) -> bool {
        self.rbt == Some(false)
    }
}

/// 读取文本字段；数字转为字符串，空串视为缺失。
pub fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// 读取整数字段；接受数字或数字字符串。
pub fn integer_field(object: &Map<String, Value>, key: &str) -> Option<i64> {
    match object.get(key)? {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|value| value as i64)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_strings_are_accepted() {
        let document = LoginDocument::from_value(
            "100200",
            json!({"flatId": "42", "vlan": "0", "GMT": 5, "rbt": true, "password": "p"}),
        );
        assert_eq!(document.flat_id(), Some(42));
        assert_eq!(document.vlan, Some(0));
        assert_eq!(document.gmt.as_deref(), Some("5"));
        assert!(!document.rbt_disabled());
    }

    #[test]
    fn zero_flat_id_is_absent_and_extras_drop_password() {
        let document = LoginDocument::from_value(
            "100200",
            json!({"flatId": 0, "password": "secret", "contract": "A-1"}),
        );
        assert_eq!(document.flat_id(), None);
        assert_eq!(document.extra.get("contract"), Some(&json!("A-1")));
        assert!(!document.extra.contains_key("password"));
    }

    #[test]
    fn category_expiry_reads_nested_timeto() {
        let document = LoginDocument::from_value(
            "100200",
            json!({"servicecats": {"intercom": {"timeto": 1748718000}, "barrier": {}}}),
        );
        assert_eq!(document.category_expiry("intercom"), Some(&json!(1748718000)));
        assert_eq!(document.category_expiry("barrier"), None);
    }

    #[test]
    fn non_object_yields_empty_document() {
        let document = LoginDocument::from_value("x", json!([1, 2]));
        assert_eq!(document.login, "x");
        assert!(document.service_cats.is_empty());
    }
}
