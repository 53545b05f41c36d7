use uuid::Uuid;

/// Concepts and activities are identified by a name, for reporting, and an
/// id, for referencing them from conditions and logs.  Ids that are not
/// configured explicitly are random UUIDs.
pub trait Identifiable {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(new_id(), new_id());
        assert_eq!(new_id().len(), 36);
    }
}
