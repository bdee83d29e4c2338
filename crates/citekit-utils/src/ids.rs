//! Deterministic identifiers.
//!
//! Every generator derives a UUIDv5 in the DNS namespace from a label, so the
//! same inputs always give the same id.

use chrono::Local;
use uuid::Uuid;

use crate::UtilsError;

fn id_from_label(label: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, label.as_bytes())
}

/// Id derived from `label`, or from a fresh random label when `None`.
pub fn generate_id(label: Option<&str>) -> Uuid {
    match label {
        Some(label) => id_from_label(label),
        None => id_from_label(&Uuid::new_v4().to_string()),
    }
}

/// Document id from a filename and its owner. Slashes in the filename are
/// replaced by `_`.
pub fn generate_document_id(filename: &str, user_id: Uuid) -> Uuid {
    let safe_filename = filename.replace('/', "_");
    id_from_label(&format!("{}-{}", safe_filename, user_id))
}

pub fn generate_extraction_id(document_id: Uuid, iteration: u32, version: &str) -> Uuid {
    id_from_label(&format!("{}-{}-{}", document_id, iteration, version))
}

pub fn generate_default_user_collection_id(user_id: Uuid) -> Uuid {
    id_from_label(&user_id.to_string())
}

pub fn generate_user_id(email: &str) -> Uuid {
    id_from_label(email)
}

pub fn generate_default_prompt_id(prompt_name: &str) -> Uuid {
    id_from_label(prompt_name)
}

/// Id for a document that carries entities inserted into a graph. Labeled by
/// the current local time, so two calls rarely collide.
pub fn generate_entity_document_id() -> Uuid {
    let generation_time = Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S%.6f");
    id_from_label(&format!("entity-{}", generation_time))
}

/// Parse a UUID string.
pub fn validate_uuid(value: &str) -> Result<Uuid, UtilsError> {
    Uuid::parse_str(value).map_err(|e| UtilsError::InvalidUuid {
        value: value.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_uuid5_value() {
        assert_eq!(
            generate_user_id("python.org").to_string(),
            "886313e1-3b8a-5372-9b90-0c9aee199e5d"
        );
    }

    #[test]
    fn test_generate_id_is_deterministic_with_label() {
        assert_eq!(generate_id(Some("run")), generate_id(Some("run")));
        assert_ne!(generate_id(None), generate_id(None));
    }

    #[test]
    fn test_document_id_ignores_slash_vs_underscore() {
        let user = Uuid::from_u128(7);
        assert_eq!(
            generate_document_id("docs/a.pdf", user),
            generate_document_id("docs_a.pdf", user)
        );
        assert_ne!(
            generate_document_id("docs/a.pdf", user),
            generate_document_id("docs/a.pdf", Uuid::from_u128(8))
        );
    }

    #[test]
    fn test_extraction_id_depends_on_iteration_and_version() {
        let doc = Uuid::from_u128(1);
        let base = generate_extraction_id(doc, 0, "0");
        assert_ne!(base, generate_extraction_id(doc, 1, "0"));
        assert_ne!(base, generate_extraction_id(doc, 0, "v1"));
        assert_eq!(base, id_from_label(&format!("{}-0-0", doc)));
    }

    #[test]
    fn test_collection_and_prompt_ids() {
        let user = Uuid::from_u128(3);
        assert_eq!(generate_default_user_collection_id(user), id_from_label(&user.to_string()));
        assert_eq!(generate_default_prompt_id("rag"), generate_id(Some("rag")));
    }

    #[test]
    fn test_entity_document_id_is_v5() {
        assert_eq!(generate_entity_document_id().get_version_num(), 5);
    }

    #[test]
    fn test_validate_uuid() {
        let id = Uuid::from_u128(99);
        assert_eq!(validate_uuid(&id.to_string()).unwrap(), id);
        assert!(matches!(
            validate_uuid("not-a-uuid"),
            Err(UtilsError::InvalidUuid { .. })
        ));
    }
}
