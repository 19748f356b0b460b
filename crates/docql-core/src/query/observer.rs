/// Name observers
///
/// Hook between the names written in a query and the names the storage
/// engine uses. Every entity and field name passes through the observer
/// during translation.

/// Maps raw entity and field names to storage-resolved names
pub trait NameObserver {
    fn fire_entity(&self, entity: &str) -> String {
        entity.to_string()
    }

    /// `_entity` is the already-resolved entity name
    fn fire_field(&self, _entity: &str, field: &str) -> String {
        field.to_string()
    }
}

/// Observer that returns every name unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughObserver;

impl NameObserver for PassThroughObserver {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl NameObserver for Upper {
        fn fire_field(&self, entity: &str, field: &str) -> String {
            format!("{}.{}", entity, field.to_uppercase())
        }
    }

    #[test]
    fn test_pass_through() {
        let observer = PassThroughObserver;
        assert_eq!(observer.fire_entity("God"), "God");
        assert_eq!(observer.fire_field("God", "name"), "name");
    }

    #[test]
    fn test_override_one_hook() {
        let observer = Upper;
        assert_eq!(observer.fire_entity("God"), "God");
        assert_eq!(observer.fire_field("God", "name"), "God.NAME");
    }
}
