//! Sample wiring used by the `modwire-inspect` binary.

use modwire_inject::{InjectError, ModuleDescriptor, modwire_module};

#[modwire_module(All)]
#[derive(Default)]
pub struct AuditTrail;

#[modwire_module(Prod)]
#[derive(Default)]
pub struct MetricsExporter;

#[modwire_module(Prod)]
#[derive(Default)]
pub struct DummyMailer;

#[modwire_module(Test, factory = FixtureStore::seeded)]
pub struct FixtureStore {
    pub records: usize,
}

impl FixtureStore {
    const SEED_RECORDS: usize = 16;

    fn seeded() -> Result<Self, InjectError> {
        Ok(Self { records: Self::SEED_RECORDS })
    }
}

/// Every sample module, in registration order.
#[must_use]
pub const fn sample_modules() -> [ModuleDescriptor; 4] {
    [AuditTrail::DESCRIPTOR, MetricsExporter::DESCRIPTOR, DummyMailer::DESCRIPTOR, FixtureStore::DESCRIPTOR]
}
