//! Redis 缓存文档读取实现（RedisJSON + RediSearch）

use crate::error::StorageError;
use crate::models::{CameraScope, in_scope};
use crate::traits::CacheStore;
use crate::validation::{camera_query, login_key};
use domain::camera::CameraRecord;
use domain::login::{integer_field, text_field};
use domain::LoginDocument;
use serde_json::{Map, Value};
use tracing::warn;

/// 摄像头全文索引名。
pub const CAMERA_INDEX: &str = "idx:camera";
/// 单次检索返回的最大文档数。
const SEARCH_LIMIT: usize = 1000;

/// Redis 缓存文档存储
pub struct RedisCacheStore {
    client: redis::Client,
}

impl RedisCacheStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    pub fn connect(redis_url: &str) -> Result<Self, StorageError> {
        let client =
            redis::Client::open(redis_url).map_err(|err| StorageError::new(err.to_string()))?;
        Ok(Self::new(client))
    }
}

#[async_trait::async_trait]
impl CacheStore for RedisCacheStore {
    async fn login_document(&self, login: &str) -> Result<Option<LoginDocument>, StorageError> {
        let key = login_key(login)?;
        let mut connection = self
            .client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|err| StorageError::new(err.to_string()))?;
        let data: Option<String> = redis::cmd("JSON.GET")
            .arg(&key)
            .query_async(&mut connection)
            .await
            .map_err(|err| StorageError::new(err.to_string()))?;
        let Some(data) = data else {
            return Ok(None);
        };
        let value: Value = serde_json::from_str(&data)?;
        Ok(Some(LoginDocument::from_value(login.trim(), value)))
    }

    async fn personal_cameras(
        &self,
        scope: CameraScope,
    ) -> Result<Vec<CameraRecord>, StorageError> {
        let mut connection = self
            .client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|err| StorageError::new(err.to_string()))?;
        let reply: redis::Value = redis::cmd("FT.SEARCH")
            .arg(CAMERA_INDEX)
            .arg(camera_query(scope))
            .arg("LIMIT")
            .arg(0)
            .arg(SEARCH_LIMIT)
            .query_async(&mut connection)
            .await
            .map_err(|err| StorageError::new(err.to_string()))?;
        let mut cameras = Vec::new();
        for document in search_documents(reply)? {
            match camera_from_document(&document) {
                Some((camera, flat_ids)) => {
                    if in_scope(camera.house_ids.as_deref(), &flat_ids, scope) {
                        cameras.push(camera);
                    }
                }
                None => warn!(target: "diag.storage", "camera_document_skipped"),
            }
        }
        Ok(cameras)
    }
}

/// 解析 FT.SEARCH 回复：`[total, key, [field, value, ...], ...]`。
///
/// JSON 索引的文档体位于 `$` 字段。
pub fn search_documents(reply: redis::Value) -> Result<Vec<Value>, StorageError> {
    let redis::Value::Bulk(items) = reply else {
        return Err(StorageError::new("unexpected FT.SEARCH reply"));
    };
    let mut documents = Vec::new();
    for item in items.into_iter().skip(1) {
        let redis::Value::Bulk(fields) = item else {
            continue;
        };
        for pair in fields.chunks(2) {
            if let [redis::Value::Data(name), redis::Value::Data(body)] = pair {
                if name.as_slice() == b"$" {
                    documents.push(serde_json::from_slice(body)?);
                }
            }
        }
    }
    Ok(documents)
}

/// 缓存摄像头文档转为记录，同时返回其 flatIds。
pub fn camera_from_document(document: &Value) -> Option<(CameraRecord, Vec<i64>)> {
    let object = document.as_object()?;
    let id = integer_field(object, "Id")?;
    let name = text_field(object, "Name")?;
    let camera = CameraRecord {
        id,
        name,
        ip_address: text_field(object, "IP"),
        available: object.get("available").and_then(truthy),
        host: text_field(object, "Host"),
        stream_path: text_field(object, "URL"),
        house_ids: integer_list(object, "houseIds"),
        model: text_field(object, "Model"),
        ..CameraRecord::default()
    };
    let flat_ids = integer_list(object, "flatIds").unwrap_or_default();
    Some((camera, flat_ids))
}

fn integer_list(object: &Map<String, Value>, key: &str) -> Option<Vec<i64>> {
    let items = object.get(key)?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| match item {
                Value::Number(number) => number.as_i64(),
                Value::String(text) => text.trim().parse().ok(),
                _ => None,
            })
            .collect(),
    )
}

fn truthy(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_i64().map(|n| n != 0),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_reply_yields_json_bodies() {
        let reply = redis::Value::Bulk(vec![
            redis::Value::Int(1),
            redis::Value::Data(b"camera:7".to_vec()),
            redis::Value::Bulk(vec![
                redis::Value::Data(b"$".to_vec()),
                redis::Value::Data(br#"{"Id":7,"Name":"Porch"}"#.to_vec()),
            ]),
        ]);
        let documents = search_documents(reply).expect("documents");
        assert_eq!(documents, vec![json!({"Id": 7, "Name": "Porch"})]);
    }

    #[test]
    fn non_bulk_reply_is_rejected() {
        assert!(search_documents(redis::Value::Okay).is_err());
    }

    #[test]
    fn camera_document_maps_fields() {
        let document = json!({
            "Id": "7", "Name": "Porch", "IP": "10.0.0.7", "Host": "video-krd.example",
            "URL": "cam7", "available": 1, "houseIds": [100200], "flatIds": [42], "Model": "X"
        });
        let (camera, flat_ids) = camera_from_document(&document).expect("camera");
        assert_eq!(camera.id, 7);
        assert_eq!(camera.available, Some(true));
        assert_eq!(camera.stream_path.as_deref(), Some("cam7"));
        assert_eq!(camera.house_ids, Some(vec![100200]));
        assert_eq!(flat_ids, vec![42]);
    }

    #[test]
    fn camera_document_without_id_is_skipped() {
        assert!(camera_from_document(&json!({"Name": "Porch"})).is_none());
    }
}
