//! Database models for the key-value table.

use chrono::NaiveDateTime;
use derive_new::new;
use diesel::prelude::*;

use crate::store::schema;

/// Insertable row; also used as the upsert payload.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::kv_entries)]
pub struct NewKvEntry<'a> {
    key: &'a str,
    value: &'a str,
    updated_at: NaiveDateTime,
}
