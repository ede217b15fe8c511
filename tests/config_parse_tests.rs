use serde::Deserialize;

#[derive(Deserialize, Default)]
struct StorageConfig {
    data_dir: Option<String>,
}

#[derive(Deserialize, Default)]
struct Config {
    #[serde(default)]
    storage: StorageConfig,
}

#[test]
fn parses_data_dir() {
    let toml = r#"
[storage]
data_dir = "/var/lib/books"
"#;
    let cfg: Config = toml::from_str(toml).unwrap();
    assert_eq!(cfg.storage.data_dir.as_deref(), Some("/var/lib/books"));
}

#[test]
fn storage_section_is_optional() {
    let cfg: Config = toml::from_str("").unwrap();
    assert_eq!(cfg.storage.data_dir, None);
}

#[test]
fn data_dir_is_optional_inside_the_section() {
    let toml = "[storage]\n";
    let cfg: Config = toml::from_str(toml).unwrap();
    assert_eq!(cfg.storage.data_dir, None);
}
