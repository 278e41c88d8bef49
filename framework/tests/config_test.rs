use courier::config::{load_layered, EnvConfig};
use courier::mail::MailConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
struct SmtpEnv {
    smtp_host: String,
    smtp_port: u16,
    mail_enable: bool,
}

#[test]
fn env_config_loads_from_environment() {
    std::env::set_var("SMTP_HOST", "mail.example.com");
    std::env::set_var("SMTP_PORT", "2525");
    std::env::set_var("MAIL_ENABLE", "true");

    let config = SmtpEnv::from_env().unwrap();

    assert_eq!(config.smtp_host, "mail.example.com");
    assert_eq!(config.smtp_port, 2525);
    assert!(config.mail_enable);

    std::env::remove_var("SMTP_HOST");
    std::env::remove_var("SMTP_PORT");
    std::env::remove_var("MAIL_ENABLE");
}

#[test]
fn env_config_with_prefix() {
    std::env::set_var("CFGTEST_SMTP_HOST", "relay.example.com");
    std::env::set_var("CFGTEST_SMTP_PORT", "465");
    std::env::set_var("CFGTEST_MAIL_ENABLE", "false");

    let config = SmtpEnv::from_env_with_prefix("CFGTEST").unwrap();

    assert_eq!(config.smtp_host, "relay.example.com");
    assert_eq!(config.smtp_port, 465);
    assert!(!config.mail_enable);

    std::env::remove_var("CFGTEST_SMTP_HOST");
    std::env::remove_var("CFGTEST_SMTP_PORT");
    std::env::remove_var("CFGTEST_MAIL_ENABLE");
}

#[derive(Debug, Deserialize)]
struct Settings {
    profile: String,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    mail: MailConfig,
}

#[test]
fn layered_files_profile_overrides_default() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("default.toml"),
        r#"
port = 8080

[mail]
enable = true
from = "noreply@example.com"

[mail.smtp]
host = "smtp.example.com"
"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("prod.toml"),
        r#"
[mail.smtp]
host = "smtp.prod.example.com"
port = 465
tls = "tls"
"#,
    )
    .unwrap();

    let settings: Settings = load_layered(dir.path(), "prod", "LAYERTEST").unwrap();

    assert_eq!(settings.profile, "prod");
    assert_eq!(settings.port, Some(8080));
    assert!(settings.mail.enable);
    assert_eq!(settings.mail.from.as_deref(), Some("noreply@example.com"));
    assert_eq!(settings.mail.smtp.host, "smtp.prod.example.com");
    assert_eq!(settings.mail.smtp.port, 465);
    assert_eq!(settings.mail.smtp.tls, "tls");
    assert_eq!(settings.mail.smtp.timeout, 10);
    assert_eq!(settings.mail.templates.extension, ".hbs");
}

#[test]
fn layered_env_overrides_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("default.toml"),
        "[mail]\nfrom = \"noreply@example.com\"\n",
    )
    .unwrap();
    std::env::set_var("ENVLAYER_MAIL__FROM", "ops@example.com");
    std::env::set_var("ENVLAYER_MAIL__SMTP__PORT", "2525");

    let settings: Settings = load_layered(dir.path(), "default", "ENVLAYER").unwrap();

    assert_eq!(settings.mail.from.as_deref(), Some("ops@example.com"));
    assert_eq!(settings.mail.smtp.port, 2525);
    assert!(!settings.mail.enable);

    std::env::remove_var("ENVLAYER_MAIL__FROM");
    std::env::remove_var("ENVLAYER_MAIL__SMTP__PORT");
}

#[test]
fn layered_without_files_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let settings: Settings = load_layered(dir.path(), "dev", "NOFILES").unwrap();

    assert_eq!(settings.profile, "dev");
    assert_eq!(settings.port, None);
    assert!(!settings.mail.enable);
    assert_eq!(settings.mail.smtp.host, "localhost");
}
