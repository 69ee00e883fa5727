use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Gift record: an open document stored as JSONB, keyed by a string id.
/// The stored document always mirrors the key in its `id` field.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Gift {
    pub id: String,
    pub data: Value,
    pub created_at: OffsetDateTime,
}

/// Ensures the document carries an `id`, generating one when the caller
/// supplies none. Numeric ids are accepted and keyed by their decimal form.
pub fn normalize_document(mut doc: Map<String, Value>) -> (String, Value) {
    let id = match doc.get("id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            let id = Uuid::new_v4().to_string();
            doc.insert("id".into(), Value::String(id.clone()));
            id
        }
    };
    (id, Value::Object(doc))
}

impl Gift {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Gift>> {
        let rows = sqlx::query_as::<_, Gift>(
            r#"
            SELECT id, data, created_at
            FROM gifts
            ORDER BY created_at
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: &str) -> anyhow::Result<Option<Gift>> {
        let gift = sqlx::query_as::<_, Gift>(
            r#"
            SELECT id, data, created_at
            FROM gifts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(gift)
    }

    /// Insert a caller-supplied document verbatim. No schema validation.
    pub async fn insert(db: &PgPool, doc: Map<String, Value>) -> anyhow::Result<Gift> {
        let (id, data) = normalize_document(doc);
        let gift = sqlx::query_as::<_, Gift>(
            r#"
            INSERT INTO gifts (id, data)
            VALUES ($1, $2)
            RETURNING id, data, created_at
            "#,
        )
        .bind(&id)
        .bind(&data)
        .fetch_one(db)
        .await?;
        Ok(gift)
    }

    /// Criteria pass-through: containment of the supplied object over the
    /// stored documents.
    pub async fn search(db: &PgPool, criteria: &Value) -> anyhow::Result<Vec<Gift>> {
        let rows = sqlx::query_as::<_, Gift>(
            r#"
            SELECT id, data, created_at
            FROM gifts
            WHERE data @> $1
            ORDER BY created_at
            "#,
        )
        .bind(criteria.clone())
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn keeps_a_supplied_string_id() {
        let (id, data) = normalize_document(as_map(json!({"id": "42", "name": "Lamp"})));
        assert_eq!(id, "42");
        assert_eq!(data["id"], "42");
        assert_eq!(data["name"], "Lamp");
    }

    #[test]
    fn keys_a_numeric_id_by_its_decimal_form() {
        let (id, data) = normalize_document(as_map(json!({"id": 7, "name": "Chair"})));
        assert_eq!(id, "7");
        // the submitted field is left untouched
        assert_eq!(data["id"], 7);
    }

    #[test]
    fn generates_an_id_when_none_is_supplied() {
        let (id, data) = normalize_document(as_map(json!({"name": "Sofa"})));
        assert!(!id.is_empty());
        assert_eq!(data["id"], Value::String(id.clone()));
        assert_eq!(data["name"], "Sofa");
    }

    #[test]
    fn submitted_fields_survive_normalization() {
        let doc = json!({
            "name": "Bookshelf",
            "category": "Furniture",
            "condition": "Like New",
            "age_years": 2,
            "image": "/images/bookshelf.jpg"
        });
        let (_, data) = normalize_document(as_map(doc.clone()));
        for (k, v) in doc.as_object().unwrap() {
            assert_eq!(&data[k], v);
        }
    }
}
