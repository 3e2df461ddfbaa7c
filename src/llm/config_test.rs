use super::*;

/// # Safety
/// Tests must run with `--test-threads=1` to avoid env races.
unsafe fn clear_llm_env() {
    unsafe {
        std::env::remove_var("LLM_BASE_URL");
        std::env::remove_var("LLM_MODEL");
        std::env::remove_var("LLM_API_KEY_ENV");
        std::env::remove_var("LLM_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("LLM_CONNECT_TIMEOUT_SECS");
        std::env::remove_var("PIZZA_GEN_TEST_KEY");
    }
}

#[test]
fn env_scenarios() {
    // One test body so the env mutations never interleave.
    unsafe { clear_llm_env() };
    let cfg = LlmConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, DEFAULT_LLM_BASE_URL);
    assert_eq!(cfg.model, DEFAULT_LLM_MODEL);
    assert_eq!(cfg.api_key, None);
    assert_eq!(cfg.timeouts, LlmTimeouts::default());

    unsafe {
        clear_llm_env();
        std::env::set_var("LLM_BASE_URL", "https://example.test/v1/");
        std::env::set_var("LLM_MODEL", "gpt-4o-mini");
        std::env::set_var("LLM_API_KEY_ENV", "PIZZA_GEN_TEST_KEY");
        std::env::set_var("PIZZA_GEN_TEST_KEY", "sk-test");
        std::env::set_var("LLM_REQUEST_TIMEOUT_SECS", "42");
        std::env::set_var("LLM_CONNECT_TIMEOUT_SECS", "7");
    }
    let cfg = LlmConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "https://example.test/v1");
    assert_eq!(cfg.model, "gpt-4o-mini");
    assert_eq!(cfg.api_key.as_deref(), Some("sk-test"));
    assert_eq!(cfg.timeouts, LlmTimeouts { request_secs: 42, connect_secs: 7 });

    unsafe {
        clear_llm_env();
        std::env::set_var("LLM_API_KEY_ENV", "PIZZA_GEN_TEST_KEY");
    }
    let err = LlmConfig::from_env().unwrap_err();
    assert!(matches!(err, LlmError::MissingApiKey { ref var } if var == "PIZZA_GEN_TEST_KEY"));

    unsafe {
        clear_llm_env();
        std::env::set_var("LLM_REQUEST_TIMEOUT_SECS", "soon");
    }
    let err = LlmConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("LLM_REQUEST_TIMEOUT_SECS"));

    unsafe { clear_llm_env() };
}

#[test]
fn overrides_replace_and_normalize() {
    let cfg = LlmConfig {
        base_url: DEFAULT_LLM_BASE_URL.into(),
        model: DEFAULT_LLM_MODEL.into(),
        api_key: None,
        timeouts: LlmTimeouts::default(),
    };
    let cfg = cfg.with_overrides(Some(" http://gpu-box:11434/v1/ "), Some("llama3.1:8b"));
    assert_eq!(cfg.base_url, "http://gpu-box:11434/v1");
    assert_eq!(cfg.model, "llama3.1:8b");
}

#[test]
fn overrides_none_keeps_values() {
    let cfg = LlmConfig {
        base_url: "http://a/v1".into(),
        model: "m".into(),
        api_key: Some("k".into()),
        timeouts: LlmTimeouts::default(),
    };
    let same = cfg.clone().with_overrides(None, None);
    assert_eq!(same, cfg);
}
