/// Server-assigned integer primary keys.
pub type DbId = i64;
