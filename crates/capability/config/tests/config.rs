use diag_config::{AppConfig, ConfigError};

// 环境变量是进程级状态，所有断言放在同一个测试里顺序执行。
#[test]
fn load_config_from_env() {
    // Rust 2024 中 set_var 需要显式标注 unsafe（测试进程内可控）。
    unsafe {
        std::env::remove_var("DIAG_RADIUS_DATABASE_URL");
        std::env::set_var("DIAG_RBT_DATABASE_URL", "postgres://rbt@localhost/rbt");
        std::env::set_var("DIAG_TV_FIX_URL", "http://localhost/hs/mwapi/correctTV");
    }
    let err = AppConfig::from_env().expect_err("radius url required");
    assert!(matches!(err, ConfigError::Missing(key) if key == "DIAG_RADIUS_DATABASE_URL"));

    unsafe {
        std::env::set_var("DIAG_RADIUS_DATABASE_URL", "mysql://radius@localhost/radius");
        std::env::set_var("DIAG_HTTP_ADDR", "127.0.0.1:8081");
        std::env::set_var("DIAG_ERP_BASE_URL", "http://erp.local/hs/");
        std::env::set_var("DIAG_PASSAGE_DAYS", "7");
        std::env::set_var(
            "DIAG_VIDEO_HOST_TOKENS",
            "video-krd.example=krd-token,video-sib.example=sib-token",
        );
        std::env::set_var("DIAG_TV24_TOKEN", "tv24");
        std::env::remove_var("DIAG_TV24_KRD_TOKEN");
    }

    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.http_addr, "127.0.0.1:8081");
    assert_eq!(config.erp_base_url, "http://erp.local/hs");
    assert_eq!(config.camera_timeout_seconds, 3);
    assert_eq!(config.camera_retries, 2);
    assert_eq!(config.passage_days, 7);
    assert_eq!(config.radius_utc_offset_hours, 5);
    assert_eq!(config.tokens.video_hosts.len(), 2);
    assert_eq!(config.tokens.tv24.as_deref(), Some("tv24"));
    assert!(config.tokens.tv24_krd.is_none());

    unsafe {
        std::env::set_var("DIAG_CAMERA_RETRIES", "many");
    }
    let err = AppConfig::from_env().expect_err("invalid retries");
    assert!(matches!(err, ConfigError::Invalid(key, _) if key == "DIAG_CAMERA_RETRIES"));

    unsafe {
        std::env::remove_var("DIAG_CAMERA_RETRIES");
        std::env::set_var("DIAG_VIDEO_HOST_TOKENS", "broken");
    }
    let err = AppConfig::from_env().expect_err("invalid host tokens");
    assert!(matches!(err, ConfigError::Invalid(key, _) if key == "DIAG_VIDEO_HOST_TOKENS"));
}
