//! User record service
//!
//! Orchestrates asset intake, field coercion, and the repository for every
//! operation, and owns the merge semantics: single update is a full replace
//! of every field slot, bulk update is a true partial merge of only the
//! fields present per entry. That asymmetry is observable contract behavior
//! and is preserved deliberately.

use serde_json::{Map, Value};
use tracing::info;

use crate::assets::{AssetStore, AssetUpload};
use crate::coerce::{self, NumericKind};
use crate::db::{FieldValue, NewUser, UserRecord, UserRepository};
use crate::error::{map_db_error, Result, ServiceError};

/// Raw field map as assembled by the transport layer
pub type FieldMap = Map<String, Value>;

/// Updatable columns, paired with their inbound field names
///
/// `id` is deliberately absent: it is repository-assigned on create and
/// only ever used as a lookup key.
const TEXT_FIELDS: &[(&str, &str)] = &[
    ("name", "name"),
    ("email", "email"),
    ("password", "password"),
    ("description", "description"),
    ("specialty", "specialty"),
    ("profilePhoto", "profile_photo"),
];

/// Service over user profile records
///
/// Constructed once at startup with its collaborators; handlers clone the
/// handle (pool and paths inside are cheap to clone).
#[derive(Debug, Clone)]
pub struct UserService {
    repo: UserRepository,
    assets: AssetStore,
}

impl UserService {
    pub fn new(repo: UserRepository, assets: AssetStore) -> Self {
        Self { repo, assets }
    }

    /// Fetch one record by its (string-form) id
    pub async fn get(&self, id: &str) -> Result<UserRecord> {
        let id = parse_id(id)?;
        self.repo
            .get(id)
            .await
            .map_err(map_db_error)?
            .ok_or(ServiceError::RecordNotFound(id))
    }

    /// Every record; no filtering, no pagination
    pub async fn list(&self) -> Result<Vec<UserRecord>> {
        self.repo.list().await.map_err(map_db_error)
    }

    /// Create one record, storing the attached photo first (if any)
    ///
    /// A rejected upload fails the whole create before anything persists.
    /// The photo reference comes solely from the upload: a `profilePhoto`
    /// body field is ignored on create, so a record never points at an
    /// asset this service did not store.
    pub async fn create(
        &self,
        fields: FieldMap,
        upload: Option<AssetUpload>,
    ) -> Result<UserRecord> {
        let photo = match upload {
            Some(upload) => Some(self.assets.store(upload).await?),
            None => None,
        };
        let user = full_field_set(&fields, photo);

        let created = self.repo.insert(&user).await.map_err(map_db_error)?;
        info!("Created user {}", created.id);
        Ok(created)
    }

    /// Create a batch of records in one repository call
    ///
    /// No attachments in bulk, so every created record starts without a
    /// photo reference; atomicity is the repository transaction's.
    /// Returns the count created, not the records.
    pub async fn create_bulk(&self, body: Value) -> Result<u64> {
        let entries = as_batch(&body)?;
        if entries.is_empty() {
            return Err(ServiceError::InvalidBatch("empty batch".to_string()));
        }

        let users: Vec<NewUser> = entries
            .iter()
            .map(|fields| full_field_set(fields, None))
            .collect();

        let count = self.repo.insert_many(&users).await.map_err(map_db_error)?;
        info!("Created {} users in bulk", count);
        Ok(count)
    }

    /// Full-replace update of one record
    ///
    /// Every field slot is overwritten: absent text fields become NULL,
    /// absent numeric fields their coerced zero default. An attached photo
    /// (stored first) wins over any `profilePhoto` field value.
    pub async fn update(
        &self,
        id: &str,
        fields: FieldMap,
        upload: Option<AssetUpload>,
    ) -> Result<UserRecord> {
        let id = parse_id(id)?;
        let photo = self.intake(upload, &fields).await?;
        let user = full_field_set(&fields, photo);

        self.repo
            .update_full(id, &user)
            .await
            .map_err(map_db_error)?
            .ok_or(ServiceError::RecordNotFound(id))
    }

    /// Partial-merge update of a batch, strictly in input order
    ///
    /// Every entry must carry an id; a missing one aborts the whole batch
    /// at that entry. Already-applied entries stay committed; there is no
    /// rollback across entries.
    pub async fn update_bulk(&self, body: Value) -> Result<Vec<UserRecord>> {
        let entries = as_batch(&body)?;

        let mut updated = Vec::with_capacity(entries.len());
        for (index, fields) in entries.iter().enumerate() {
            let id = match fields.get("id") {
                Some(value) => parse_entry_id(value, index)?,
                None => return Err(ServiceError::MissingIdentifier { index }),
            };

            let changes = present_field_set(fields);
            let record = self
                .repo
                .update_partial(id, &changes)
                .await
                .map_err(map_db_error)?
                .ok_or(ServiceError::RecordNotFound(id))?;
            updated.push(record);
        }

        info!("Updated {} users in bulk", updated.len());
        Ok(updated)
    }

    /// Delete one record, returning a confirmation plus its last snapshot
    pub async fn delete(&self, id: &str) -> Result<(String, UserRecord)> {
        let id = parse_id(id)?;
        let record = self
            .repo
            .delete(id)
            .await
            .map_err(map_db_error)?
            .ok_or(ServiceError::RecordNotFound(id))?;

        info!("Deleted user {}", id);
        Ok((format!("User {} deleted", id), record))
    }

    /// Resolve the full-replace photo slot: stored upload wins, else the
    /// `profilePhoto` body field passes through (update-only behavior; a
    /// create ignores the body field)
    async fn intake(
        &self,
        upload: Option<AssetUpload>,
        fields: &FieldMap,
    ) -> Result<Option<String>> {
        match upload {
            Some(upload) => Ok(Some(self.assets.store(upload).await?)),
            None => Ok(coerce::text_or_none(fields.get("profilePhoto"))),
        }
    }
}

/// Parse a path identifier; failure is a client error, not a lookup miss
fn parse_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ServiceError::InvalidIdentifier(raw.to_string()))
}

/// Parse the id carried by a bulk-update entry (number or numeric string)
fn parse_entry_id(value: &Value, index: usize) -> Result<i64> {
    match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| {
            ServiceError::InvalidIdentifier(format!("entry at index {}: {}", index, n))
        }),
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| {
            ServiceError::InvalidIdentifier(format!("entry at index {}: {}", index, s))
        }),
        _ => Err(ServiceError::MissingIdentifier { index }),
    }
}

/// A bulk body must be an array of objects
fn as_batch(body: &Value) -> Result<Vec<FieldMap>> {
    let items = body
        .as_array()
        .ok_or_else(|| ServiceError::InvalidBatch("expected an array".to_string()))?;

    items
        .iter()
        .map(|item| {
            item.as_object().cloned().ok_or_else(|| {
                ServiceError::InvalidBatch("batch entries must be objects".to_string())
            })
        })
        .collect()
}

/// Coerce a field map into the full slot set (create / full-replace update)
fn full_field_set(fields: &FieldMap, photo: Option<String>) -> NewUser {
    NewUser {
        name: coerce::text_or_none(fields.get("name")),
        email: coerce::text_or_none(fields.get("email")),
        password: coerce::text_or_none(fields.get("password")),
        description: coerce::text_or_none(fields.get("description")),
        specialty: coerce::text_or_none(fields.get("specialty")),
        profile_photo: photo,
        likes: coerce::int_or_default(fields.get("likes")),
        reviews: coerce::int_or_default(fields.get("reviews")),
        stars: coerce::float_or_default(fields.get("stars")),
    }
}

/// Collect only the fields present in a bulk-update entry
///
/// Unknown keys are ignored; numeric fields go through the coercion policy
/// even when present with garbage values.
fn present_field_set(fields: &FieldMap) -> Vec<(&'static str, FieldValue)> {
    let mut changes = Vec::new();

    for (input_name, column) in TEXT_FIELDS {
        if let Some(value) = fields.get(*input_name) {
            let change = match coerce::text_or_none(Some(value)) {
                Some(text) => FieldValue::Text(text),
                None => FieldValue::Null,
            };
            changes.push((*column, change));
        }
    }

    for (field, kind) in coerce::NUMERIC_POLICY {
        if let Some(value) = fields.get(*field) {
            let change = match kind {
                NumericKind::Integer => FieldValue::Int(coerce::int_or_default(Some(value))),
                NumericKind::Float => FieldValue::Real(coerce::float_or_default(Some(value))),
            };
            changes.push((*field, change));
        }
    }

    changes
}
