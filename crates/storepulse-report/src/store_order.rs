//! Domain store ordering shared by every report view.
//!
//! Tiers, ascending: store codes (`R2` before `R10`), special groups in
//! override-table order, other named stores alphabetically, `Unassigned` last.

use std::cmp::Ordering;

use crate::identity::UNASSIGNED_STORE;
use crate::overrides::IdentityOverrideTable;

/// Sort key for one store name. Variant order is tier order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum StoreSortKey<'a> {
    /// Digits compared numerically without overflow: shorter (after leading
    /// zeros are dropped) is smaller, equal lengths compare as text.
    Code {
        digit_count: usize,
        digits: &'a str,
        code: &'a str,
    },
    SpecialGroup(usize),
    Named(&'a str),
    Unassigned,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreOrdering {
    special_groups: Vec<String>,
}

impl StoreOrdering {
    pub fn new(special_groups: Vec<String>) -> Self {
        Self { special_groups }
    }

    pub fn from_overrides(overrides: &IdentityOverrideTable) -> Self {
        Self::new(overrides.special_groups())
    }

    pub fn sort_key<'a>(&self, store: &'a str) -> StoreSortKey<'a> {
        if store == UNASSIGNED_STORE {
            return StoreSortKey::Unassigned;
        }
        if let Some(key) = store_code_key(store) {
            return key;
        }
        if let Some(position) = self
            .special_groups
            .iter()
            .position(|group| group == store)
        {
            return StoreSortKey::SpecialGroup(position);
        }
        StoreSortKey::Named(store)
    }

    pub fn compare(&self, left: &str, right: &str) -> Ordering {
        self.sort_key(left).cmp(&self.sort_key(right))
    }

    pub fn sort<S: AsRef<str>>(&self, stores: &mut [S]) {
        stores.sort_by(|left, right| self.compare(left.as_ref(), right.as_ref()));
    }
}

fn store_code_key(store: &str) -> Option<StoreSortKey<'_>> {
    let mut chars = store.chars();
    let prefix = chars.next()?;
    if !prefix.is_ascii_alphabetic() {
        return None;
    }
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    let significant = digits.trim_start_matches('0');
    Some(StoreSortKey::Code {
        digit_count: significant.len(),
        digits: significant,
        code: store,
    })
}
