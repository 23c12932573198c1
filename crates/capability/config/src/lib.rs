//! 应用运行配置加载。

use std::collections::BTreeMap;
use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 外部服务凭据（原始值，由 sources 组装为 TokenTable）。
#[derive(Debug, Clone, Default)]
pub struct TokenConfig {
    /// 视频服务主机 -> Bearer token。
    pub video_hosts: BTreeMap<String, String>,
    pub tv24: Option<String>,
    pub tv24_krd: Option<String>,
    /// TVIP 的 Basic 凭据（已编码）。
    pub tvip: Option<String>,
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub redis_url: String,
    pub radius_database_url: String,
    pub rbt_database_url: String,
    pub erp_base_url: String,
    pub tv24_api_url: String,
    pub tvip_api_url: String,
    pub rbt_api_url: String,
    pub rbt_web_url: String,
    pub tv_fix_url: String,
    pub camera_timeout_seconds: u64,
    pub camera_retries: u64,
    pub external_api_timeout_seconds: u64,
    pub tv_fix_timeout_seconds: u64,
    pub passage_days: u64,
    pub radius_utc_offset_hours: i32,
    pub tokens: TokenConfig,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let radius_database_url = read_required("DIAG_RADIUS_DATABASE_URL")?;
        let rbt_database_url = read_required("DIAG_RBT_DATABASE_URL")?;
        let tv_fix_url = read_required("DIAG_TV_FIX_URL")?;
        let http_addr =
            env::var("DIAG_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let redis_url =
            env::var("DIAG_REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let erp_base_url = env::var("DIAG_ERP_BASE_URL")
            .unwrap_or_else(|_| "http://server1c.freedom1.ru/UNF_CRM_WS/hs".to_string());
        let tv24_api_url =
            env::var("DIAG_TV24_API_URL").unwrap_or_else(|_| "https://api.24h.tv".to_string());
        let tvip_api_url = env::var("DIAG_TVIP_API_URL")
            .unwrap_or_else(|_| "https://my.tvip.media".to_string());
        let rbt_api_url = env::var("DIAG_RBT_API_URL")
            .unwrap_or_else(|_| "https://rbt.freedom1.ru/mobile".to_string());
        let rbt_web_url =
            env::var("DIAG_RBT_WEB_URL").unwrap_or_else(|_| "https://rbt.freedom1.ru".to_string());
        let camera_timeout_seconds = read_u64_with_default("DIAG_CAMERA_TIMEOUT_SECONDS", 3)?;
        let camera_retries = read_u64_with_default("DIAG_CAMERA_RETRIES", 2)?;
        let external_api_timeout_seconds =
            read_u64_with_default("DIAG_EXTERNAL_API_TIMEOUT_SECONDS", 30)?;
        let tv_fix_timeout_seconds = read_u64_with_default("DIAG_TV_FIX_TIMEOUT_SECONDS", 10)?;
        let passage_days = read_u64_with_default("DIAG_PASSAGE_DAYS", 5)?;
        let radius_utc_offset_hours = read_i32_with_default("DIAG_RADIUS_UTC_OFFSET_HOURS", 5)?;
        if !(-12..=14).contains(&radius_utc_offset_hours) {
            return Err(ConfigError::Invalid(
                "DIAG_RADIUS_UTC_OFFSET_HOURS".to_string(),
                radius_utc_offset_hours.to_string(),
            ));
        }
        let tokens = TokenConfig {
            video_hosts: read_host_tokens("DIAG_VIDEO_HOST_TOKENS")?,
            tv24: read_optional("DIAG_TV24_TOKEN"),
            tv24_krd: read_optional("DIAG_TV24_KRD_TOKEN"),
            tvip: read_optional("DIAG_TVIP_TOKEN"),
        };

        Ok(Self {
            http_addr,
            redis_url,
            radius_database_url,
            rbt_database_url,
            erp_base_url: trim_base(erp_base_url),
            tv24_api_url: trim_base(tv24_api_url),
            tvip_api_url: trim_base(tvip_api_url),
            rbt_api_url: trim_base(rbt_api_url),
            rbt_web_url: trim_base(rbt_web_url),
            tv_fix_url,
            camera_timeout_seconds,
            camera_retries,
            external_api_timeout_seconds,
            tv_fix_timeout_seconds,
            passage_days,
            radius_utc_offset_hours,
            tokens,
        })
    }
}

fn trim_base(value: String) -> String {
    value.trim_end_matches('/').to_string()
}

fn read_required(key: &str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key.to_string())),
    }
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_i32_with_default(key: &str, default: i32) -> Result<i32, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<i32>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

/// 解析 `host=token,host=token` 形式的主机凭据表。
fn read_host_tokens(key: &str) -> Result<BTreeMap<String, String>, ConfigError> {
    let Some(raw) = read_optional(key) else {
        return Ok(BTreeMap::new());
    };
    parse_host_tokens(&raw).map_err(|entry| ConfigError::Invalid(key.to_string(), entry))
}

fn parse_host_tokens(raw: &str) -> Result<BTreeMap<String, String>, String> {
    let mut tokens = BTreeMap::new();
    for entry in raw.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let Some((host, token)) = entry.split_once('=') else {
            return Err(entry.to_string());
        };
        let host = host.trim();
        let token = token.trim();
        if host.is_empty() || token.is_empty() {
            return Err(entry.to_string());
        }
        tokens.insert(host.to_string(), token.to_string());
    }
    Ok(tokens)
}
