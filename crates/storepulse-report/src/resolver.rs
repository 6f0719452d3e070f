//! Agent Identity Resolver: free-text agent name -> `(store, role, person)`.

use std::sync::LazyLock;

use regex::Regex;

use crate::identity::{AgentIdentity, RoleCode, NO_NAME_PERSON};
use crate::overrides::IdentityOverrideTable;

/// `<StoreCode> <RoleToken>[-] <PersonName>`, e.g. `R11 VD- Maria Lopez`.
/// Alternation order matters: `VD` must be tried before `V`. Store and role
/// tokens fold case in ASCII only.
static AGENT_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^((?-u:[A-Z])[0-9]+)\s+((?-u:VD|SUP|TR|J|C|V))\s*-?\s+(.+)$")
        .expect("agent name pattern is a valid regex")
});

/// How a [`Resolution`] was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    EmptyName,
    Override,
    Pattern,
    Unmatched,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub identity: AgentIdentity,
    pub source: ResolutionSource,
}

impl Resolution {
    pub fn is_unmatched(&self) -> bool {
        self.source == ResolutionSource::Unmatched
    }
}

/// Pure, total resolver. Overrides win over the structured pattern; anything
/// else lands in the `Unassigned`/`Otro` bucket with the raw text kept as the
/// person name.
#[derive(Debug, Clone, Default)]
pub struct AgentNameResolver {
    overrides: IdentityOverrideTable,
}

impl AgentNameResolver {
    pub fn new(overrides: IdentityOverrideTable) -> Self {
        Self { overrides }
    }

    pub fn overrides(&self) -> &IdentityOverrideTable {
        &self.overrides
    }

    pub fn resolve(&self, raw_name: &str) -> Resolution {
        if raw_name.is_empty() {
            return Resolution {
                identity: AgentIdentity::unassigned(NO_NAME_PERSON),
                source: ResolutionSource::EmptyName,
            };
        }

        if let Some(entry) = self.overrides.lookup(raw_name) {
            return Resolution {
                identity: AgentIdentity::new(entry.store.clone(), entry.role, raw_name.trim()),
                source: ResolutionSource::Override,
            };
        }

        if let Some(identity) = parse_structured_agent_name(raw_name) {
            return Resolution {
                identity,
                source: ResolutionSource::Pattern,
            };
        }

        Resolution {
            identity: AgentIdentity::unassigned(raw_name),
            source: ResolutionSource::Unmatched,
        }
    }
}

fn parse_structured_agent_name(raw_name: &str) -> Option<AgentIdentity> {
    let captures = AGENT_NAME_PATTERN.captures(raw_name.trim_end())?;
    let store = captures.get(1)?.as_str().to_uppercase();
    let role = RoleCode::from_name_token(captures.get(2)?.as_str())?;
    let person = captures.get(3)?.as_str().trim();
    Some(AgentIdentity::new(store, role, person))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::UNASSIGNED_STORE;
    use crate::overrides::IdentityOverride;
    use proptest::prelude::*;

    fn resolver() -> AgentNameResolver {
        AgentNameResolver::new(IdentityOverrideTable::builtin())
    }

    #[test]
    fn unit_resolve_parses_store_role_and_person() {
        let resolution = resolver().resolve("R3 V Juan Perez");
        assert_eq!(resolution.source, ResolutionSource::Pattern);
        assert_eq!(
            resolution.identity,
            AgentIdentity::new("R3", RoleCode::Vendedor, "Juan Perez")
        );
    }

    #[test]
    fn unit_resolve_accepts_dash_separator_and_extra_spacing() {
        let resolution = resolver().resolve("R11 VD- Maria Lopez");
        assert_eq!(
            resolution.identity,
            AgentIdentity::new("R11", RoleCode::VendedorDigital, "Maria Lopez")
        );

        let spaced = resolver().resolve("r7   tr  -   Pedro Soto  ");
        assert_eq!(
            spaced.identity,
            AgentIdentity::new("R7", RoleCode::Transferencia, "Pedro Soto")
        );
    }

    #[test]
    fn unit_resolve_preserves_person_case() {
        let resolution = resolver().resolve("r2 c maría JOSÉ");
        assert_eq!(
            resolution.identity,
            AgentIdentity::new("R2", RoleCode::Coordinador, "maría JOSÉ")
        );
    }

    #[test]
    fn unit_resolve_accepts_supervisor_token_in_pattern() {
        let resolution = resolver().resolve("R5 SUP Carla");
        assert_eq!(resolution.identity.role, RoleCode::Supervisor);
        assert_eq!(resolution.identity.person, "Carla");
    }

    #[test]
    fn functional_overrides_take_precedence_over_pattern() {
        let resolution = resolver().resolve("  camila ");
        assert_eq!(resolution.source, ResolutionSource::Override);
        assert_eq!(
            resolution.identity,
            AgentIdentity::new("Canal Digital", RoleCode::Jefe, "camila")
        );

        let custom = AgentNameResolver::new(
            IdentityOverrideTable::from_entries(vec![IdentityOverride::new(
                "R3 V Juan Perez",
                "Supervision",
                RoleCode::Supervisor,
            )])
            .expect("table"),
        );
        assert_eq!(
            custom.resolve("R3 V JUAN PEREZ").identity.store,
            "Supervision"
        );
    }

    #[test]
    fn unit_resolve_routes_unmatched_text_to_unassigned() {
        let resolution = resolver().resolve("Unmatchable Text");
        assert!(resolution.is_unmatched());
        assert_eq!(
            resolution.identity,
            AgentIdentity::new(UNASSIGNED_STORE, RoleCode::Otro, "Unmatchable Text")
        );
    }

    #[test]
    fn regression_resolve_requires_whitespace_after_role_token() {
        assert!(resolver().resolve("R3 V-Juan").is_unmatched());
        assert!(resolver().resolve("R3 V").is_unmatched());
        // Store code must be a single letter followed by digits.
        assert!(resolver().resolve("RX3 V Juan").is_unmatched());
        assert!(resolver().resolve("Santiago").is_unmatched());
    }

    #[test]
    fn regression_resolve_ignores_trailing_line_breaks() {
        for raw in ["R3 V Juan Perez\n", "R3 V Juan Perez\r\n", "R3 V Juan Perez \t"] {
            let resolution = resolver().resolve(raw);
            assert_eq!(resolution.source, ResolutionSource::Pattern);
            assert_eq!(
                resolution.identity,
                AgentIdentity::new("R3", RoleCode::Vendedor, "Juan Perez")
            );
        }
        let unmatched = resolver().resolve("Santiago\n");
        assert!(unmatched.is_unmatched());
        assert_eq!(unmatched.identity.person, "Santiago\n");
    }

    #[test]
    fn regression_store_and_role_tokens_are_ascii_only() {
        // U+212A KELVIN SIGN and U+017F LATIN SMALL LETTER LONG S fold to K and S.
        assert!(resolver().resolve("\u{212A}1 V Ana").is_unmatched());
        assert!(resolver().resolve("R1 \u{17F}UP Ana").is_unmatched());
        assert_eq!(resolver().resolve("k1 v Ana").identity.store, "K1");
    }

    #[test]
    fn unit_resolve_handles_empty_name() {
        let resolution = resolver().resolve("");
        assert_eq!(resolution.source, ResolutionSource::EmptyName);
        assert_eq!(
            resolution.identity,
            AgentIdentity::new(UNASSIGNED_STORE, RoleCode::Otro, NO_NAME_PERSON)
        );
    }

    proptest! {
        #[test]
        fn property_resolve_is_total_and_deterministic(raw in any::<String>()) {
            let resolver = resolver();
            let first = resolver.resolve(&raw);
            let second = resolver.resolve(&raw);
            prop_assert_eq!(&first, &second);
            prop_assert!(!first.identity.store.is_empty());
            if first.source == ResolutionSource::Unmatched {
                prop_assert_eq!(first.identity.person, raw);
            }
        }

        #[test]
        fn property_structured_names_round_trip(
            store in 1u32..500,
            role in prop::sample::select(vec!["J", "SUP", "C", "V", "VD", "TR"]),
            person in "[A-Za-z][A-Za-z ]{0,20}[A-Za-z]",
        ) {
            let raw = format!("R{store} {role} {person}");
            let resolution = resolver().resolve(&raw);
            prop_assume!(resolution.source == ResolutionSource::Pattern);
            prop_assert_eq!(resolution.identity.store, format!("R{store}"));
            prop_assert_eq!(resolution.identity.role.as_str(), role);
            prop_assert_eq!(resolution.identity.person, person.trim().to_string());
        }
    }
}
