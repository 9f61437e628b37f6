use super::*;

#[test]
fn defaults_are_valid() {
    let settings = Settings::default();
    settings.validate().unwrap();
    assert_eq!(settings.editor.font_size, 14);
    assert_eq!(settings.ai.autocomplete.model, "mistralai/codestral-2501");
    assert_eq!(settings.ai.agent.model, "github-copilot/gpt-4.1");
}

#[test]
fn partial_toml_is_merged_over_defaults() {
    let settings: Settings = toml::from_str(
        r#"
        [editor]
        theme_mode = "dark"

        [ai.autocomplete]
        api_key = "secret"
        "#,
    )
    .unwrap();

    assert_eq!(settings.editor.theme_mode, ThemeMode::Dark);
    assert_eq!(settings.editor.font_size, 14);
    assert_eq!(settings.ai.autocomplete.api_key, "secret");
    assert_eq!(settings.ai.autocomplete.base_url, "https://openrouter.ai/api/v1");
    assert!(settings.ai.agent.enabled);
}

#[test]
fn unknown_theme_is_rejected() {
    let mut settings = Settings::default();
    settings.editor.dark_theme = "neon".to_string();
    let err = settings.validate().unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Invalid {
            field: "editor.dark_theme",
            ..
        }
    ));
}

#[test]
fn non_http_base_url_is_rejected() {
    let mut settings = Settings::default();
    settings.ai.autocomplete.base_url = "ftp://example.com".to_string();
    assert!(settings.validate().is_err());

    settings.ai.autocomplete.base_url = "not a url".to_string();
    assert!(settings.validate().is_err());
}

#[test]
fn effective_theme_follows_mode() {
    let mut settings = Settings::default();
    assert_eq!(settings.effective_theme(true), "houston");
    assert_eq!(settings.effective_theme(false), "min-light");

    settings.editor.theme_mode = ThemeMode::Light;
    assert_eq!(settings.effective_theme(true), "min-light");

    settings.editor.theme_mode = ThemeMode::Dark;
    assert_eq!(settings.effective_theme(false), "houston");
}
