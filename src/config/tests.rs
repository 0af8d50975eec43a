use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_shortlist_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("SHORTLIST_PORT");
        env::remove_var("SHORTLIST_BIND_ADDR");
        env::remove_var("SHORTLIST_RESULTS_PATH");
        env::remove_var("SHORTLIST_ENCODER_PATH");
        env::remove_var("SHORTLIST_RERANKER_PATH");
        env::remove_var("SHORTLIST_QDRANT_URL");
        env::remove_var("SHORTLIST_COLLECTION");
        env::remove_var("SHORTLIST_GITHUB_TOKEN");
        env::remove_var("SHORTLIST_REPUTATION_TIMEOUT_MS");
        env::remove_var("SHORTLIST_REPUTATION_CONCURRENCY");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8080);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert_eq!(config.results_path, Some(PathBuf::from("./.data/results")));
    assert!(config.encoder_path.is_none());
    assert!(config.reranker_path.is_none());
    assert!(config.qdrant_url.is_none());
    assert_eq!(config.collection, "resume_index");
    assert_eq!(config.reputation_timeout_ms, 5000);
    assert_eq!(config.reputation_concurrency, 4);
}

#[test]
fn test_socket_addr() {
    let config = Config::default();
    assert_eq!(config.socket_addr(), "127.0.0.1:8080");

    let config = Config {
        port: 3000,
        bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
        ..Default::default()
    };
    assert_eq!(config.socket_addr(), "0.0.0.0:3000");
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_shortlist_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.port, 8080);
    assert_eq!(config.results_path, Some(PathBuf::from(DEFAULT_RESULTS_PATH)));
    assert!(config.qdrant_url.is_none());
}

#[test]
#[serial]
fn test_from_env_custom_port() {
    clear_shortlist_env();

    with_env_vars(&[("SHORTLIST_PORT", "3000")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.port, 3000);
    });
}

#[test]
#[serial]
fn test_from_env_ipv6_bind_addr() {
    clear_shortlist_env();

    with_env_vars(&[("SHORTLIST_BIND_ADDR", "::1")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(
            config.bind_addr,
            IpAddr::V6(std::net::Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1))
        );
    });
}

#[test]
#[serial]
fn test_empty_results_path_disables_store() {
    clear_shortlist_env();

    with_env_vars(&[("SHORTLIST_RESULTS_PATH", "")], || {
        let config = Config::from_env().expect("should parse");
        assert!(config.results_path.is_none());
    });
}

#[test]
#[serial]
fn test_full_config_parse() {
    clear_shortlist_env();

    with_env_vars(
        &[
            ("SHORTLIST_PORT", "9090"),
            ("SHORTLIST_BIND_ADDR", "0.0.0.0"),
            ("SHORTLIST_RESULTS_PATH", "/var/lib/shortlist"),
            ("SHORTLIST_ENCODER_PATH", "/models/all-MiniLM-L6-v2"),
            ("SHORTLIST_RERANKER_PATH", "/models/ms-marco-MiniLM-L-6-v2"),
            ("SHORTLIST_QDRANT_URL", "http://qdrant.cluster:6334"),
            ("SHORTLIST_COLLECTION", "resumes_v2"),
            ("SHORTLIST_GITHUB_TOKEN", "ghp_test"),
            ("SHORTLIST_REPUTATION_TIMEOUT_MS", "1500"),
            ("SHORTLIST_REPUTATION_CONCURRENCY", "8"),
        ],
        || {
            let config = Config::from_env().expect("should parse full config");

            assert_eq!(config.socket_addr(), "0.0.0.0:9090");
            assert_eq!(config.results_path, Some(PathBuf::from("/var/lib/shortlist")));
            assert_eq!(
                config.encoder_path,
                Some(PathBuf::from("/models/all-MiniLM-L6-v2"))
            );
            assert_eq!(
                config.reranker_path,
                Some(PathBuf::from("/models/ms-marco-MiniLM-L-6-v2"))
            );
            assert_eq!(
                config.qdrant_url.as_deref(),
                Some("http://qdrant.cluster:6334")
            );
            assert_eq!(config.collection, "resumes_v2");
            assert_eq!(config.github_token.as_deref(), Some("ghp_test"));
            assert_eq!(config.reputation_timeout_ms, 1500);
            assert_eq!(config.reputation_concurrency, 8);
        },
    );
}

#[test]
#[serial]
fn test_concurrency_clamped_to_one() {
    clear_shortlist_env();

    with_env_vars(&[("SHORTLIST_REPUTATION_CONCURRENCY", "0")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.reputation_concurrency, 1);
    });
}

#[test]
#[serial]
fn test_invalid_timeout_uses_default() {
    clear_shortlist_env();

    with_env_vars(&[("SHORTLIST_REPUTATION_TIMEOUT_MS", "soon")], || {
        let config = Config::from_env().expect("should parse with fallback");
        assert_eq!(config.reputation_timeout_ms, 5000);
    });
}

#[test]
#[serial]
fn test_invalid_port_zero() {
    clear_shortlist_env();

    with_env_vars(&[("SHORTLIST_PORT", "0")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
        assert!(err.to_string().contains("invalid port"));
    });
}

#[test]
#[serial]
fn test_invalid_port_not_number() {
    clear_shortlist_env();

    with_env_vars(&[("SHORTLIST_PORT", "not_a_port")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::PortParseError { .. }));
    });
}

#[test]
#[serial]
fn test_invalid_bind_addr() {
    clear_shortlist_env();

    with_env_vars(&[("SHORTLIST_BIND_ADDR", "not.an.ip.address")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
    });
}

#[test]
fn test_validate_success_with_defaults() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_validate_nonexistent_encoder_path() {
    let config = Config {
        encoder_path: Some(PathBuf::from("/nonexistent/encoder")),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::PathNotFound {
            name: "SHORTLIST_ENCODER_PATH",
            ..
        })
    ));
}

#[test]
fn test_validate_model_path_is_file() {
    let config = Config {
        reranker_path: Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml")),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotADirectory { .. })
    ));
}

#[test]
fn test_validate_results_path_is_file() {
    let config = Config {
        results_path: Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml")),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotADirectory { .. })
    ));
}

#[test]
fn test_validate_success_with_valid_paths() {
    let src = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src");
    let config = Config {
        results_path: Some(src.clone()),
        encoder_path: Some(src.clone()),
        reranker_path: Some(src),
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_zero_timeout() {
    let config = Config {
        reputation_timeout_ms: 0,
        ..Default::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("SHORTLIST_REPUTATION_TIMEOUT_MS"));
}

#[test]
fn test_sub_configs() {
    let config = Config {
        encoder_path: Some(PathBuf::from("/models/enc")),
        github_token: Some("tok".to_string()),
        reputation_timeout_ms: 250,
        reputation_concurrency: 2,
        ..Default::default()
    };

    assert!(!config.encoder_config().is_stub());
    assert!(config.reranker_config().model_path.is_none());

    let reputation = config.reputation_config();
    assert_eq!(reputation.timeout_ms(), 250);
    assert_eq!(reputation.concurrency, 2);
    assert_eq!(reputation.github_token.as_deref(), Some("tok"));
}

#[test]
fn test_error_messages_are_descriptive() {
    let err = ConfigError::InvalidPort {
        value: "0".to_string(),
    };
    assert!(err.to_string().contains("1 and 65535"));

    let err = ConfigError::PathNotFound {
        name: "SHORTLIST_ENCODER_PATH",
        path: PathBuf::from("/some/path"),
    };
    assert!(err.to_string().contains("/some/path"));
    assert!(err.to_string().starts_with("SHORTLIST_ENCODER_PATH"));
}
