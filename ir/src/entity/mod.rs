//! Entities: the named kinds of operation a port instantiates.
//!
//! Entities are immutable once registered. They are compared by [`EntityId`]
//! only, so two `Arc<Entity>` built from the same declaration are
//! interchangeable.

pub mod standard;

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use snafu::ensure;

use crate::error::{DuplicateEntitySnafu, Result, UnknownEntitySnafu};

/// Domain-qualified entity identifier, written `Domain.Label` (e.g. `Std.Add`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[display("{_0}")]
pub struct EntityId(Cow<'static, str>);

impl EntityId {
    pub const fn from_static(qualified: &'static str) -> Self {
        Self(Cow::Borrowed(qualified))
    }

    pub fn new(domain: &str, label: &str) -> Self {
        Self(Cow::Owned(format!("{domain}.{label}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Domain part (`Std` for `Std.Add`); empty when unqualified.
    pub fn domain(&self) -> &str {
        self.0.rsplit_once('.').map_or("", |(domain, _)| domain)
    }

    /// Label part (`Add` for `Std.Add`).
    pub fn label(&self) -> &str {
        self.0.rsplit_once('.').map_or(&self.0, |(_, label)| label)
    }
}

/// How an entity's symbol is placed relative to its operands when displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Fixity {
    Prefix,
    Infix,
    Postfix,
}

/// Number of inputs an entity accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "exactly {n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// A registered kind of operation.
#[derive(Debug, Clone, bon::Builder)]
pub struct Entity {
    pub id: EntityId,
    #[builder(into)]
    pub name: String,
    #[builder(into)]
    pub symbol: String,
    #[builder(default = Fixity::Prefix)]
    pub fixity: Fixity,
    pub inputs: Arity,
    #[builder(default = 1)]
    pub outputs: usize,
    #[builder(default = 0)]
    pub buses: usize,
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Entity {}

/// Registry of entities, looked up by id or by display symbol.
#[derive(Debug, Default, Clone)]
pub struct EntityTable {
    by_id: HashMap<EntityId, Arc<Entity>>,
    by_symbol: HashMap<String, Arc<Entity>>,
    order: Vec<EntityId>,
}

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity. Each id may be registered once.
    ///
    /// When two entities share a symbol the first registration keeps it.
    pub fn register(&mut self, entity: Entity) -> Result<Arc<Entity>> {
        ensure!(!self.by_id.contains_key(&entity.id), DuplicateEntitySnafu { entity: entity.id.clone() });
        let entity = Arc::new(entity);
        tracing::debug!(entity = %entity.id, symbol = %entity.symbol, "entity registered");
        self.by_symbol.entry(entity.symbol.clone()).or_insert_with(|| entity.clone());
        self.by_id.insert(entity.id.clone(), entity.clone());
        self.order.push(entity.id.clone());
        Ok(entity)
    }

    pub fn get(&self, id: &EntityId) -> Result<Arc<Entity>> {
        self.by_id.get(id).cloned().ok_or_else(|| UnknownEntitySnafu { entity: id.clone() }.build())
    }

    pub fn by_symbol(&self, symbol: &str) -> Option<Arc<Entity>> {
        self.by_symbol.get(symbol).cloned()
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Entities in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Entity>> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
