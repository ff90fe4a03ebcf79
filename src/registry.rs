//! # Caster Registry Module
//!
//! Decides which single [`Caster`] (if any) handles a parameter.
//!
//! ## Resolution Order
//!
//! [`CasterRegistry::resolve`] evaluates, first match wins:
//!
//! 1. **Explicit override** - the descriptor names a caster id
//!    (`#[dto(caster = "...")]`). It is used unconditionally; an id nobody
//!    registered is an error ([`BuildError::UnknownCaster`]), never a silent
//!    fallback.
//! 2. **Bound type** - a caster registered for the exact declared type
//!    (`DateTime`, `Uuid`, an object or an enum). O(1) lookup by `TypeId`.
//!    Primitive types can never be bound.
//! 3. **Capability scan** - registered casters in registration order; the
//!    first whose [`Caster::supports`] accepts the descriptor.
//! 4. **None** - the raw value passes through unchanged.
//!
//! ## Default Order
//!
//! [`CasterRegistry::with_defaults`] registers, in this order:
//!
//! | # | Caster | Id |
//! |---|---|---|
//! | 1 | [`ScalarCaster`] | `scalar` |
//! | 2 | [`DateTimeCaster`] | `datetime` |
//! | 3 | [`UuidCaster`] | `uuid` |
//! | 4 | [`EnumCaster`] | `enum` |
//! | 5 | [`NestedObjectCaster`] | `object` |
//! | 6 | [`CollectionCaster`] | `collection` |
//!
//! This order is part of the public contract. Casters registered later are
//! scanned after the built-ins; to take precedence over a built-in for one
//! type, bind the caster to that type instead.
//!
//! ## Thread Safety
//!
//! Registration takes `&mut self`: build the registry at startup, then share it
//! (the builder holds it in an `Arc`). Resolution is read-only.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut registry = CasterRegistry::with_defaults();
//! registry.bind::<Money>(MoneyCaster)?;
//! registry.define(LegacyDateCaster);
//! let builder = ObjectBuilder::new(registry);
//! ```

use crate::caster::{
    Caster, CollectionCaster, DateTimeCaster, EnumCaster, NestedObjectCaster, ScalarCaster,
    UuidCaster,
};
use crate::descriptor::TypeDescriptor;
use crate::dto::FieldType;
use crate::error::{BuildError, BuildResult};
use crate::types::TypeTag;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Ordered casters, type bindings and the id table used by explicit overrides.
#[derive(Default)]
pub struct CasterRegistry {
    casters: Vec<Arc<dyn Caster>>,
    bound: HashMap<TypeId, Arc<dyn Caster>>,
    named: HashMap<String, Arc<dyn Caster>>,
}

impl CasterRegistry {
    /// Empty registry: every parameter passes through raw.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the six built-in casters in their documented order.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.push(Arc::new(ScalarCaster));
        registry.push(Arc::new(DateTimeCaster));
        registry.push(Arc::new(UuidCaster));
        registry.push(Arc::new(EnumCaster));
        registry.push(Arc::new(NestedObjectCaster));
        registry.push(Arc::new(CollectionCaster));
        registry
    }

    /// Register `caster`.
    ///
    /// Without `for_type` the caster joins the capability scan, after every
    /// caster registered before it. With `for_type` it is bound to that exact
    /// type and consulted before the scan; binding a primitive type fails with
    /// [`BuildError::PrimitiveBinding`].
    ///
    /// Either way the caster becomes addressable by its id for explicit
    /// overrides.
    pub fn register<C: Caster + 'static>(
        &mut self,
        caster: C,
        for_type: Option<&TypeTag>,
    ) -> BuildResult<&mut Self> {
        let caster: Arc<dyn Caster> = Arc::new(caster);
        match for_type {
            None => self.push(caster),
            Some(tag) => {
                let Some(type_id) = tag.type_id().filter(|_| !tag.is_primitive()) else {
                    return Err(BuildError::PrimitiveBinding {
                        caster: caster.id().to_string(),
                        type_name: tag.name().to_string(),
                    });
                };
                info!(
                    caster = caster.id(),
                    type_name = tag.name(),
                    "Caster bound to type"
                );
                self.name(Arc::clone(&caster));
                self.bound.insert(type_id, caster);
            }
        }
        Ok(self)
    }

    /// Bind `caster` to the Rust type `T`.
    pub fn bind<T: FieldType>(&mut self, caster: impl Caster + 'static) -> BuildResult<&mut Self> {
        self.register(caster, Some(&T::type_tag()))
    }

    /// Make `caster` available to explicit overrides only. It never takes part
    /// in bound-type lookup or the capability scan.
    pub fn define(&mut self, caster: impl Caster + 'static) -> &mut Self {
        self.name(Arc::new(caster));
        self
    }

    /// Pick the caster for `descriptor`, or `None` for raw pass-through.
    pub fn resolve(&self, descriptor: &TypeDescriptor) -> BuildResult<Option<Arc<dyn Caster>>> {
        if let Some(id) = descriptor.explicit_caster() {
            let caster = self.named.get(id).ok_or_else(|| BuildError::UnknownCaster {
                parameter: format!("{}::{}", descriptor.owner(), descriptor.name()),
                caster: id.to_string(),
            })?;
            debug!(parameter = descriptor.name(), caster = id, "Explicit caster override");
            return Ok(Some(Arc::clone(caster)));
        }

        let declared = descriptor.declared_type();
        if !declared.is_primitive() {
            if let Some(caster) = declared.type_id().and_then(|id| self.bound.get(&id)) {
                debug!(
                    parameter = descriptor.name(),
                    caster = caster.id(),
                    type_name = declared.name(),
                    "Bound caster"
                );
                return Ok(Some(Arc::clone(caster)));
            }
        }

        let found = self.casters.iter().find(|c| c.supports(descriptor)).cloned();
        debug!(
            parameter = descriptor.name(),
            type_name = declared.name(),
            caster = found.as_ref().map_or("none", |c| c.id()),
            "Caster resolved by scan"
        );
        Ok(found)
    }

    /// Caster registered under `id`, whichever way it was registered.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<dyn Caster>> {
        self.named.get(id).cloned()
    }

    /// Ids of the scanned casters, in scan order.
    #[must_use]
    pub fn scan_order(&self) -> Vec<&str> {
        self.casters.iter().map(|c| c.id()).collect()
    }

    /// Number of casters taking part in the scan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.casters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.casters.is_empty()
    }

    fn push(&mut self, caster: Arc<dyn Caster>) {
        debug!(
            caster = caster.id(),
            position = self.casters.len(),
            "Caster registered"
        );
        self.name(Arc::clone(&caster));
        self.casters.push(caster);
    }

    fn name(&mut self, caster: Arc<dyn Caster>) {
        let id = caster.id().to_string();
        if self.named.insert(id.clone(), caster).is_some() {
            warn!(caster = %id, "Replaced caster with the same id");
        }
    }
}

impl fmt::Debug for CasterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut named: Vec<&str> = self.named.keys().map(String::as_str).collect();
        named.sort_unstable();
        f.debug_struct("CasterRegistry")
            .field("scan_order", &self.scan_order())
            .field("bound", &self.bound.len())
            .field("named", &named)
            .finish()
    }
}
