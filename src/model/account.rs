use crate::schema::{admins, students};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Student {
    pub id: i32,
    /// Opaque identifier issued by the external identity provider.
    pub clerk_user_id: String,
    pub email: String,
    pub name: String,
    pub auth_provider: String,
    pub grade_level: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Deserialize, Debug, Clone)]
#[diesel(table_name = students)]
pub struct NewStudent {
    pub clerk_user_id: String,
    pub email: String,
    pub name: String,
    pub auth_provider: String,
    pub grade_level: i32,
    // created_at has a DB default (CURRENT_TIMESTAMP)
}

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = admins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Admin {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Deserialize, Debug, Clone)]
#[diesel(table_name = admins)]
pub struct NewAdmin {
    pub email: String,
    pub name: String,
}
