use rand::Rng;
use uuid::Uuid;

use crate::demo::model::EntryId;

/// Mints the identifiers a demo session needs.
///
/// Injected so the panel stays deterministic under test; the app uses the
/// random source, tests use the sequential one.
pub trait IdentifierSource {
    fn next_entry_id(&mut self) -> EntryId;
    /// Per-panel-lifetime correlation key, generated once.
    fn customer_id(&mut self) -> String;
}

/// Production source: v4 entry ids and a `cust_{n}` customer id with a
/// random numeric suffix below 10000.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdentifiers;

impl IdentifierSource for RandomIdentifiers {
    fn next_entry_id(&mut self) -> EntryId {
        EntryId::new(Uuid::new_v4())
    }

    fn customer_id(&mut self) -> String {
        format!("cust_{}", rand::thread_rng().gen_range(0..10_000))
    }
}

/// Deterministic source for tests and previews.
#[derive(Debug, Clone)]
pub struct SequentialIdentifiers {
    next: u128,
}

impl SequentialIdentifiers {
    pub fn new() -> Self {
        Self { next: 1 }
    }
}

impl Default for SequentialIdentifiers {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifierSource for SequentialIdentifiers {
    fn next_entry_id(&mut self) -> EntryId {
        let id = EntryId::new(Uuid::from_u128(self.next));
        self.next += 1;
        id
    }

    fn customer_id(&mut self) -> String {
        "cust_4242".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_are_unique_and_stable() {
        let mut identifiers = SequentialIdentifiers::new();
        let first = identifiers.next_entry_id();
        let second = identifiers.next_entry_id();

        assert_ne!(first, second);
        assert_eq!(first, EntryId::new(Uuid::from_u128(1)));
        assert_eq!(identifiers.customer_id(), "cust_4242");
    }

    #[test]
    fn random_customer_id_keeps_the_widget_prefix_and_range() {
        let mut identifiers = RandomIdentifiers;
        let customer_id = identifiers.customer_id();

        let suffix = customer_id.strip_prefix("cust_").unwrap();
        let value: u32 = suffix.parse().unwrap();
        assert!(value < 10_000);
    }
}
