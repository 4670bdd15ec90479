use modwire::domain::config::{DiscoveryConfig, DiscoveryConfigInner};
use modwire::kernel::config::{ListKind, ModuleConfigLoader};
use modwire::reflect::{MarkerId, ScanError, TypeName, TypeScanner, TypeSet};
use modwire::{Environment, Modwire, ModwireError, modwire_module};
use std::collections::HashMap;
use std::fs;
use std::time::Duration;

#[modwire_module(All)]
#[derive(Default)]
struct AuditModule;

#[modwire_module(Prod)]
#[derive(Default)]
struct DummyMetricsModule;

#[modwire_module(Prod)]
#[derive(Default)]
struct MetricsModule;

#[modwire_module(Test)]
#[derive(Default)]
struct FixtureModule;

fn isolated(path: &std::path::Path) -> ModuleConfigLoader {
    ModuleConfigLoader::new().file(path).env_vars(HashMap::new())
}

fn names(modules: &[std::sync::Arc<dyn modwire::Module>]) -> Vec<&'static str> {
    modules.iter().map(|m| m.name()).collect()
}

#[test]
fn test_defaults_without_any_configuration() -> Result<(), ModwireError> {
    let wiring = Modwire::builder()
        .module_config(isolated("/no/such/modwire-modules.toml".as_ref()))
        .register_all([AuditModule::DESCRIPTOR, MetricsModule::DESCRIPTOR, FixtureModule::DESCRIPTOR])
        .build()?;

    assert_eq!(wiring.settings().cache_capacity, 1000);
    assert_eq!(wiring.cache().time_to_live(), Duration::from_millis(100_000));

    assert_eq!(wiring.resolve_all(Environment::Prod)?.len(), 2);
    assert_eq!(wiring.resolve_all(Environment::Test)?.len(), 2);
    assert_eq!(
        names(&wiring.resolve_all(Environment::All)?),
        [AuditModule::DESCRIPTOR.name()]
    );
    Ok(())
}

#[test]
fn test_settings_and_module_file_drive_the_wiring() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let modules = dir.path().join("modules.toml");
    fs::write(&modules, "[Prod]\nfilter = [\"(?i).*dummy.*\"]\n")?;

    let settings = dir.path().join("discovery.toml");
    fs::write(
        &settings,
        format!("cache_capacity = 16\ncache_ttl_ms = 2500\nmodule_config = {:?}\n", modules.display().to_string()),
    )?;

    let wiring = Modwire::builder()
        .settings_file(&settings)
        .register_all([
            AuditModule::DESCRIPTOR,
            DummyMetricsModule::DESCRIPTOR,
            MetricsModule::DESCRIPTOR,
        ])
        .build()?;

    assert_eq!(wiring.cache().max_capacity(), 16);
    assert_eq!(wiring.cache().time_to_live(), Duration::from_millis(2500));

    let prod = wiring.resolve_all(Environment::Prod)?;
    assert_eq!(names(&prod), [AuditModule::DESCRIPTOR.name(), MetricsModule::DESCRIPTOR.name()]);
    Ok(())
}

#[test]
fn test_zero_capacity_is_rejected() {
    let settings = DiscoveryConfig::from(DiscoveryConfigInner { cache_capacity: 0, ..Default::default() });
    let err = Modwire::builder().settings(settings).build().unwrap_err();
    assert!(matches!(err, ModwireError::Reflect { .. }));
}

/// Fails every scan.
#[derive(Debug)]
struct OfflineScanner;

impl TypeScanner for OfflineScanner {
    fn types_annotated_with(&self, _scope: &str, _marker: &MarkerId) -> Result<TypeSet, ScanError> {
        Err(ScanError::Failed { message: "type index offline".into(), context: None })
    }

    fn subtypes_of(&self, _scope: &str, _supertype: &TypeName) -> Result<TypeSet, ScanError> {
        Err(ScanError::Failed { message: "type index offline".into(), context: None })
    }
}

#[test]
fn test_static_modules_bypass_the_scanner() -> Result<(), ModwireError> {
    let loader = isolated("/no/such/modwire-modules.toml".as_ref())
        .set(Environment::Test, ListKind::Static, [FixtureModule::DESCRIPTOR.name()]);

    let wiring = Modwire::builder()
        .scanner(OfflineScanner)
        .module_config(loader)
        .register_all([AuditModule::DESCRIPTOR, FixtureModule::DESCRIPTOR])
        .build()?;

    let test = wiring.resolve_all(Environment::Test)?;
    assert_eq!(names(&test), [FixtureModule::DESCRIPTOR.name()]);

    let err = wiring.resolve_all(Environment::Prod).unwrap_err();
    assert!(err.to_string().contains("type index offline"), "{err}");
    Ok(())
}
