use modwire_kernel::config::{ConfigError, ListKind, ModuleConfigLoader, ModuleSource, load_config};
use modwire_kernel::domain::Environment;
use modwire_kernel::domain::config::DiscoveryConfig;
use std::collections::HashMap;
use std::fs;

#[test]
fn settings_file_overrides_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("discovery.toml");
    fs::write(&path, "cache_capacity = 42\ncache_ttl_ms = 500\n")?;

    let cfg: DiscoveryConfig = load_config(Some(&path), "MODWIRE_KERNEL_TEST")?;
    assert_eq!(cfg.cache_capacity, 42);
    assert_eq!(cfg.cache_ttl_ms, 500);
    assert_eq!(cfg.env_prefix, "MODWIRE");
    Ok(())
}

#[test]
fn missing_settings_file_yields_defaults() -> Result<(), ConfigError> {
    let cfg: DiscoveryConfig = load_config(Some("/no/such/discovery.toml"), "MODWIRE_KERNEL_TEST")?;
    assert_eq!(cfg.cache_capacity, 1000);
    Ok(())
}

#[test]
fn malformed_settings_file_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("discovery.toml");
    fs::write(&path, "cache_capacity = \"many\"\n")?;

    let err = load_config::<DiscoveryConfig>(Some(&path), "MODWIRE_KERNEL_TEST")
        .expect_err("string capacity must not deserialize");
    assert!(err.to_string().contains("Failed to deserialize config"));
    Ok(())
}

#[test]
fn module_file_and_overlay_combine() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("modwire-modules.toml");
    fs::write(
        &path,
        r#"
        [all]
        filter = ["(?i).*dummy.*", "ToFilter1", "ToFilter2"]

        [test]
        static = ["app::modules::Fixture"]
        "#,
    )?;

    let vars = HashMap::from([("APP__PROD__FILTER".to_owned(), "(?i).*dummy.*".to_owned())]);
    let source = ModuleConfigLoader::new().file(&path).env_prefix("APP").env_vars(vars).load();

    let ModuleSource::Loaded(table) = source else {
        panic!("expected loaded module configuration");
    };
    assert_eq!(table.get(Environment::All, ListKind::Filter).len(), 3);
    assert_eq!(table.get(Environment::Prod, ListKind::Filter), ["(?i).*dummy.*"]);
    assert_eq!(table.get(Environment::Test, ListKind::Static), ["app::modules::Fixture"]);
    assert!(table.get(Environment::Prod, ListKind::Static).is_empty());
    Ok(())
}
