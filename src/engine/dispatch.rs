//! Explicit dispatch table from (entity kind, operation) to client calls.
//!
//! The table is total over the four entity kinds the document can declare
//! sections for; the match below is checked exhaustively at compile time, so
//! an unknown combination cannot reach a runtime lookup failure.

use crate::client::ArtifactoryApi;
use crate::config::Payload;
use crate::error::Result;
use crate::engine::result::EntityKind;
use serde_json::Value;

/// The entity kinds driven through the generic section processor, in the
/// order their sections are reconciled.
pub const ENTITY_KINDS: [EntityKind; 4] = [
    EntityKind::User,
    EntityKind::Group,
    EntityKind::Repository,
    EntityKind::PermissionTarget,
];

/// CRUD handlers for one entity kind, bound to a client.
pub struct KindOps<'a> {
    pub kind: EntityKind,
    pub list: Box<dyn Fn(Option<&str>) -> Result<Value> + 'a>,
    pub detail: Box<dyn Fn(&str) -> Result<Value> + 'a>,
    pub create: Box<dyn Fn(&str, &Payload) -> Result<u16> + 'a>,
    pub update: Box<dyn Fn(&str, &Payload) -> Result<u16> + 'a>,
    pub delete: Box<dyn Fn(&str) -> Result<u16> + 'a>,
}

/// Build the handler record for one entity kind.
///
/// # Panics
/// Panics if called for a kind without a CRUD section (`Instance`,
/// `License`); those are driven by dedicated section processors.
#[must_use]
pub fn kind_ops(api: &dyn ArtifactoryApi, kind: EntityKind) -> KindOps<'_> {
    match kind {
        EntityKind::User => KindOps {
            kind,
            list: Box::new(move |_| api.user_list()),
            detail: Box::new(move |name| api.user_detail(name)),
            create: Box::new(move |name, payload| api.user_create(name, payload)),
            update: Box::new(move |name, payload| api.user_update(name, payload)),
            delete: Box::new(move |name| api.user_delete(name)),
        },
        EntityKind::Group => KindOps {
            kind,
            list: Box::new(move |_| api.group_list()),
            detail: Box::new(move |name| api.group_detail(name)),
            create: Box::new(move |name, payload| api.group_create(name, payload)),
            update: Box::new(move |name, payload| api.group_update(name, payload)),
            delete: Box::new(move |name| api.group_delete(name)),
        },
        EntityKind::Repository => KindOps {
            kind,
            // the only kind whose list accepts a type filter
            list: Box::new(move |repo_type| api.repository_list(repo_type)),
            detail: Box::new(move |key| api.repository_detail(key)),
            create: Box::new(move |key, payload| api.repository_create(key, payload)),
            update: Box::new(move |key, payload| api.repository_update(key, payload)),
            delete: Box::new(move |key| api.repository_delete(key)),
        },
        EntityKind::PermissionTarget => KindOps {
            kind,
            list: Box::new(move |_| api.permission_list()),
            detail: Box::new(move |name| api.permission_detail(name)),
            create: Box::new(move |name, payload| api.permission_create(name, payload)),
            update: Box::new(move |name, payload| api.permission_update(name, payload)),
            delete: Box::new(move |name| api.permission_delete(name)),
        },
        EntityKind::Instance | EntityKind::License => {
            unreachable!("{kind} has no CRUD dispatch entry")
        }
    }
}
