#![no_main]

use libfuzzer_sys::fuzz_target;
use storepulse_report::{AgentNameResolver, ResolutionSource, UNASSIGNED_STORE};

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let resolver = AgentNameResolver::default();
    let resolution = resolver.resolve(&raw);

    assert!(!resolution.identity.store.trim().is_empty());
    match resolution.source {
        ResolutionSource::EmptyName | ResolutionSource::Unmatched => {
            assert_eq!(resolution.identity.store, UNASSIGNED_STORE);
        }
        ResolutionSource::Pattern => {
            assert!(resolution.identity.role.rank() <= 6);
            assert_eq!(
                resolution.identity.store,
                resolution.identity.store.to_uppercase()
            );
        }
        ResolutionSource::Override => {
            assert!(resolver.overrides().lookup(&raw).is_some());
        }
    }
    assert_eq!(resolver.resolve(&raw), resolution);
});
