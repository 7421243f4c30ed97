use super::*;
use serial_test::serial;
use std::env;

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

#[test]
#[serial]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.qdrant_url, DEFAULT_QDRANT_URL);
    assert_eq!(config.collection_name, DEFAULT_COLLECTION_NAME);
    assert_eq!(config.embedding_dim, 768);
    assert!(config.embedding_api_key.is_none());
    assert_eq!(config.similarity_threshold, 0.5);
    assert_eq!(config.rerank_batch_size, 10);
    assert!(!config.skip_filter_pass);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    let config = with_env_vars(
        &[
            ("TALENTRANK_QDRANT_URL", "http://qdrant:6334"),
            ("TALENTRANK_EMBEDDING_DIM", "1536"),
            ("TALENTRANK_SIMILARITY_THRESHOLD", "0.35"),
            ("TALENTRANK_SKIP_FILTER_PASS", "true"),
            ("TALENTRANK_RERANK_PARALLELISM", "8"),
        ],
        || Config::from_env().expect("config should load"),
    );

    assert_eq!(config.qdrant_url, "http://qdrant:6334");
    assert_eq!(config.embedding_dim, 1536);
    assert_eq!(config.similarity_threshold, 0.35);
    assert!(config.skip_filter_pass);
    assert_eq!(config.rerank_parallelism, 8);
}

#[test]
#[serial]
fn test_from_env_rejects_bad_number() {
    let result = with_env_vars(&[("TALENTRANK_EMBEDDING_DIM", "not-a-number")], Config::from_env);

    assert!(matches!(
        result,
        Err(ConfigError::InvalidNumber {
            var: "TALENTRANK_EMBEDDING_DIM",
            ..
        })
    ));
}

#[test]
#[serial]
fn test_validate_rejects_zero_dim() {
    let config = Config {
        embedding_dim: 0,
        ..Config::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::ZeroValue { .. })));
}

#[test]
#[serial]
fn test_validate_rejects_out_of_range_threshold() {
    let config = Config {
        similarity_threshold: 1.5,
        ..Config::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidThreshold { value }) if value == 1.5
    ));
}

#[test]
#[serial]
fn test_empty_env_string_falls_back_to_default() {
    let config = with_env_vars(&[("TALENTRANK_QDRANT_URL", "  ")], || {
        Config::from_env().expect("config should load")
    });
    assert_eq!(config.qdrant_url, DEFAULT_QDRANT_URL);
}
