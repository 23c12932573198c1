//! 外部服务凭据表。
//!
//! 由配置注入，查找失败返回 `SourceError::TokenNotFound`，不返回空凭据。

use crate::error::SourceError;
use diag_config::TokenConfig;
use domain::TvOperator;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct TokenTable {
    video_hosts: BTreeMap<String, String>,
    tv24: Option<String>,
    tv24_krd: Option<String>,
    tvip: Option<String>,
}

impl TokenTable {
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            video_hosts: config.video_hosts.clone(),
            tv24: config.tv24.clone(),
            tv24_krd: config.tv24_krd.clone(),
            tvip: config.tvip.clone(),
        }
    }

    pub fn with_video_host(mut self, host: impl Into<String>, token: impl Into<String>) -> Self {
        self.video_hosts.insert(host.into(), token.into());
        self
    }

    pub fn with_tv24(mut self, token: impl Into<String>, krd_token: impl Into<String>) -> Self {
        self.tv24 = Some(token.into());
        self.tv24_krd = Some(krd_token.into());
        self
    }

    pub fn with_tvip(mut self, token: impl Into<String>) -> Self {
        self.tvip = Some(token.into());
        self
    }

    /// 视频服务主机的 Bearer token。
    pub fn video_host(&self, host: &str) -> Result<&str, SourceError> {
        self.video_hosts
            .get(host)
            .map(String::as_str)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| SourceError::TokenNotFound(format!("video host {host}")))
    }

    /// TV24 区域变体对应的 token。
    pub fn tv24(&self, operator: TvOperator) -> Result<&str, SourceError> {
        let token = match operator {
            TvOperator::Tv24 => self.tv24.as_deref(),
            TvOperator::Tv24Krd => self.tv24_krd.as_deref(),
            _ => None,
        };
        token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| SourceError::TokenNotFound(format!("operator {operator}")))
    }

    pub fn tvip(&self) -> Result<&str, SourceError> {
        self.tvip
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| SourceError::TokenNotFound("operator ТВИП".to_string()))
    }
}
