use modwire_inject::*;
use modwire_kernel::config::{ListKind, ModuleConfigLoader};
use modwire_kernel::domain::constants::MODULE_MARKER;
use modwire_reflect::{MarkerId, ScanError, TypeName, TypeQueryCache, TypeScanner, TypeSet};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

mod fixtures {
    use modwire_inject::{InjectError, modwire_module};

    #[modwire_module(All)]
    #[derive(Default)]
    pub struct CoreModule;

    #[modwire_module(Test)]
    #[derive(Default)]
    pub struct FixtureModule;

    #[modwire_module(Prod)]
    #[derive(Default)]
    pub struct MetricsModule;

    #[modwire_module(Prod, Test)]
    #[derive(Default)]
    pub struct ToFilterModule;

    #[modwire_module(Prod, factory = BrokenModule::connect)]
    pub struct BrokenModule {
        #[allow(dead_code)]
        endpoint: String,
    }

    impl BrokenModule {
        fn connect() -> Result<Self, InjectError> {
            Err(InjectError::Instantiation { message: "endpoint unreachable".into(), context: None })
        }
    }

    #[modwire_module(Test, factory = Seeded::seeded)]
    pub struct Seeded {
        pub seed: u64,
    }

    impl Seeded {
        fn seeded() -> Result<Self, InjectError> {
            Ok(Self { seed: 7 })
        }
    }
}

use fixtures::*;

fn core_registry() -> ModuleRegistry {
    ModuleRegistry::builder()
        .register(CoreModule::DESCRIPTOR)
        .register(FixtureModule::DESCRIPTOR)
        .register(MetricsModule::DESCRIPTOR)
        .build()
}

fn loader() -> ModuleConfigLoader {
    ModuleConfigLoader::new().file("/definitely/not/here.toml").env_vars(HashMap::new())
}

fn resolver_with(registry: ModuleRegistry, loader: ModuleConfigLoader) -> ModuleResolver {
    let source = loader.load();
    let cache = TypeQueryCache::builder().scanner(registry.catalog()).build().unwrap();
    ModuleResolver::new(
        cache,
        registry,
        FilterConfiguration::from(source.clone()),
        StaticModuleConfiguration::from(source),
    )
}

fn names(modules: &[Arc<dyn Module>]) -> Vec<&'static str> {
    modules.iter().map(|m| m.name()).collect()
}

#[test]
fn test_resolution_per_environment() {
    let resolver = resolver_with(core_registry(), loader());

    let prod = resolver.resolve_all(Environment::Prod).unwrap();
    assert_eq!(names(&prod), [CoreModule::DESCRIPTOR.name(), MetricsModule::DESCRIPTOR.name()]);

    assert_eq!(resolver.resolve_all(Environment::Test).unwrap().len(), 2);

    let all = resolver.resolve_all(Environment::All).unwrap();
    assert_eq!(names(&all), [CoreModule::DESCRIPTOR.name()]);
}

#[test]
fn test_descriptor_names_are_fully_qualified() {
    assert_eq!(MetricsModule::DESCRIPTOR.name(), "resolve::fixtures::MetricsModule");
    assert_eq!(ToFilterModule::DESCRIPTOR.environments(), [Environment::Prod, Environment::Test]);
}

#[test]
fn test_repeated_resolution_is_stable() {
    let resolver = resolver_with(core_registry(), loader());
    let first = names(&resolver.resolve_all(Environment::Test).unwrap());
    let second = names(&resolver.resolve_all(Environment::Test).unwrap());
    assert_eq!(first, second);
}

#[test]
fn test_scope_narrows_discovery() {
    let resolver = resolver_with(core_registry(), loader());
    let scoped = resolver.resolve(Environment::Prod, "resolve::fixtures::Metrics").unwrap();
    assert_eq!(names(&scoped), [MetricsModule::DESCRIPTOR.name()]);

    assert!(resolver.resolve(Environment::Prod, "nowhere::").unwrap().is_empty());
}

#[test]
fn test_clones_share_configuration_and_cache() {
    let resolver = resolver_with(
        core_registry(),
        loader()
            .set(Environment::Prod, ListKind::Filter, ["(?i).*metrics.*"])
            .set(Environment::Test, ListKind::Static, [CoreModule::DESCRIPTOR.name()]),
    );
    let clone = resolver.clone();

    assert_eq!(clone.registry().len(), 3);
    assert!(clone.filters().filters_for(Environment::Prod).contains("(?i).*metrics.*"));
    assert!(clone.statics().modules_for(Environment::Test).contains(CoreModule::DESCRIPTOR.name()));

    resolver.resolve_all(Environment::Prod).unwrap();
    clone.cache().run_pending_tasks();
    assert_eq!(clone.cache().entry_count(), 1);
}

#[test]
fn test_exclusion_patterns_apply_after_eligibility() {
    let registry = ModuleRegistry::builder()
        .register(CoreModule::DESCRIPTOR)
        .register(ToFilterModule::DESCRIPTOR)
        .build();

    let unfiltered = resolver_with(registry.clone(), loader());
    assert_eq!(unfiltered.resolve_all(Environment::Prod).unwrap().len(), 2);

    let filtered = resolver_with(
        registry,
        loader().set(Environment::All, ListKind::Filter, ["(?i).*tofilter.*"]),
    );
    let prod = filtered.resolve_all(Environment::Prod).unwrap();
    assert_eq!(names(&prod), [CoreModule::DESCRIPTOR.name()]);
}

#[test]
fn test_filters_from_other_tier_do_not_apply() {
    let registry = ModuleRegistry::builder().register(ToFilterModule::DESCRIPTOR).build();
    let resolver =
        resolver_with(registry, loader().set(Environment::Test, ListKind::Filter, [".*ToFilter.*"]));

    assert_eq!(resolver.resolve_all(Environment::Prod).unwrap().len(), 1);
    assert!(resolver.resolve_all(Environment::Test).unwrap().is_empty());
}

#[test]
fn test_invalid_exclusion_pattern_aborts() {
    let resolver =
        resolver_with(core_registry(), loader().set(Environment::Prod, ListKind::Filter, ["(unclosed"]));
    let err = resolver.resolve_all(Environment::Prod).unwrap_err();
    assert!(matches!(err, InjectError::Pattern { .. }));
}

/// Delegates to a catalog and counts every scan.
#[derive(Debug)]
struct CountingScanner {
    inner: modwire_reflect::TypeCatalog,
    scans: Arc<AtomicUsize>,
}

impl TypeScanner for CountingScanner {
    fn types_annotated_with(&self, scope: &str, marker: &MarkerId) -> Result<TypeSet, ScanError> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        self.inner.types_annotated_with(scope, marker)
    }

    fn subtypes_of(&self, scope: &str, supertype: &TypeName) -> Result<TypeSet, ScanError> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        self.inner.subtypes_of(scope, supertype)
    }
}

fn counting_resolver(loader: ModuleConfigLoader, scans: &Arc<AtomicUsize>) -> ModuleResolver {
    let registry = ModuleRegistry::builder()
        .register_all([
            CoreModule::DESCRIPTOR,
            FixtureModule::DESCRIPTOR,
            MetricsModule::DESCRIPTOR,
            Seeded::DESCRIPTOR,
        ])
        .build();
    let scanner = CountingScanner { inner: registry.catalog(), scans: Arc::clone(scans) };
    let cache = TypeQueryCache::builder().scanner(scanner).build().unwrap();
    let source = loader.load();
    ModuleResolver::new(cache, registry, source.clone().into(), source.into())
}

#[test]
fn test_static_list_replaces_scanning() {
    let scans = Arc::new(AtomicUsize::new(0));
    let seeded = Seeded::DESCRIPTOR.name();
    let resolver = counting_resolver(
        loader().set(Environment::Test, ListKind::Static, [seeded, MetricsModule::DESCRIPTOR.name()]),
        &scans,
    );

    let test = resolver.resolve_all(Environment::Test).unwrap();
    assert_eq!(names(&test), [seeded]);
    assert_eq!(test[0].downcast_ref::<Seeded>().map(|s| s.seed), Some(7));
    assert_eq!(scans.load(Ordering::SeqCst), 0);

    // No static list for Prod, so it scans once and then hits the cache.
    resolver.resolve_all(Environment::Prod).unwrap();
    resolver.resolve_all(Environment::Prod).unwrap();
    assert_eq!(scans.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unknown_static_module_is_fatal() {
    let scans = Arc::new(AtomicUsize::new(0));
    let resolver = counting_resolver(
        loader().set(Environment::All, ListKind::Static, ["app::modules::Missing"]),
        &scans,
    );

    let err = resolver.resolve_all(Environment::Prod).unwrap_err();
    assert!(matches!(err, InjectError::UnknownModule { .. }));
    assert!(err.to_string().contains("app::modules::Missing"));
}

#[test]
fn test_failing_factory_is_fatal() {
    let registry = ModuleRegistry::builder()
        .register(CoreModule::DESCRIPTOR)
        .register(BrokenModule::DESCRIPTOR)
        .build();
    let resolver = resolver_with(registry, loader());

    let err = resolver.resolve_all(Environment::Prod).unwrap_err();
    let text = err.to_string();
    assert!(text.contains("BrokenModule"), "{text}");
    assert!(text.contains("endpoint unreachable"), "{text}");

    // Not eligible for Test, so its factory never runs there.
    assert_eq!(resolver.resolve_all(Environment::Test).unwrap().len(), 1);
}

#[test]
fn test_scanned_name_without_descriptor_is_fatal() {
    let catalog = modwire_reflect::TypeCatalog::new()
        .with(modwire_reflect::TypeInfo::new("app::Unregistered").marker(MODULE_MARKER));
    let cache = TypeQueryCache::builder().scanner(catalog).build().unwrap();
    let resolver = ModuleResolver::new(
        cache,
        ModuleRegistry::default(),
        FilterConfiguration::default(),
        StaticModuleConfiguration::default(),
    );

    let err = resolver.resolve_all(Environment::Prod).unwrap_err();
    assert!(matches!(err, InjectError::UnknownModule { .. }));
}
