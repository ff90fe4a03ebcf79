use crate::cache::MetadataCache;
use crate::caster::{cast_failed, CastContext};
use crate::descriptor::TypeDescriptor;
use crate::dto::Dto;
use crate::error::{BuildError, BuildResult};
use crate::registry::CasterRegistry;
use crate::runtime_config::RuntimeConfig;
use crate::types::ObjectRef;
use crate::value::{Instance, Map, Value};
use anyhow::anyhow;
use std::sync::Arc;
use tracing::debug;

/// Builds target objects from input maps.
#[derive(Debug, Clone)]
pub struct ObjectBuilder {
    registry: Arc<CasterRegistry>,
    cache: Arc<MetadataCache>,
    config: RuntimeConfig,
}

/// Built-in casters, limits from [`RuntimeConfig::from_env`].
impl Default for ObjectBuilder {
    fn default() -> Self {
        Self::new(CasterRegistry::with_defaults()).with_config(RuntimeConfig::from_env())
    }
}

impl ObjectBuilder {
    /// Builder owning `registry`, with a fresh metadata cache and no limits.
    /// Use [`ObjectBuilder::with_config`] or `Default` for bounded builds.
    #[must_use]
    pub fn new(registry: CasterRegistry) -> Self {
        Self::shared(Arc::new(registry), Arc::new(MetadataCache::new()))
    }

    /// Builder over an already shared registry and cache.
    #[must_use]
    pub fn shared(registry: Arc<CasterRegistry>, cache: Arc<MetadataCache>) -> Self {
        ObjectBuilder {
            registry,
            cache,
            config: RuntimeConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &CasterRegistry {
        &self.registry
    }

    #[inline]
    #[must_use]
    pub fn cache(&self) -> &Arc<MetadataCache> {
        &self.cache
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Construct a `T` from `input`.
    pub fn build<T: Dto>(&self, input: Map) -> BuildResult<T> {
        let instance = self.build_instance(&ObjectRef::of::<T>(), input)?;
        instance.downcast::<T>().map_err(|other| {
            BuildError::instantiation(
                T::NAME,
                anyhow!("constructor produced a `{}`", other.type_name()),
            )
        })
    }

    /// Construct a `T` from a decoded JSON body. Anything but a JSON object is
    /// a cast failure.
    pub fn build_json<T: Dto>(&self, json: serde_json::Value) -> BuildResult<T> {
        match Value::from(json) {
            Value::Map(input) => self.build(input),
            other => Err(cast_failed(T::NAME, &other, "expected a JSON object")),
        }
    }

    /// Construct the type behind a class reference.
    pub fn build_instance(&self, target: &ObjectRef, input: Map) -> BuildResult<Instance> {
        self.build_at(target, input, 0)
    }

    /// Construct a type known only by its registered name.
    pub fn build_named(&self, name: &str, input: Map) -> BuildResult<Instance> {
        let target = self.cache.object_ref(name)?;
        self.build_instance(&target, input)
    }

    /// Cast one raw value for `descriptor` as if it were a root parameter.
    pub fn cast(&self, descriptor: &TypeDescriptor, value: Value) -> BuildResult<Value> {
        self.cast_with(descriptor, value, &CastContext::new(self, 0))
    }

    pub(crate) fn build_at(&self, target: &ObjectRef, mut input: Map, depth: usize) -> BuildResult<Instance> {
        self.config.check_depth(depth)?;
        let metadata = self.cache.parameters_of(target);
        metadata.ensure_constructible()?;

        debug!(
            type_name = target.name(),
            depth = depth,
            parameters = metadata.parameters().len(),
            input_keys = input.len(),
            "Building object"
        );

        let ctx = CastContext::new(self, depth);
        let mut args = Vec::with_capacity(metadata.parameters().len());
        for descriptor in metadata.parameters() {
            let value = match input.remove(descriptor.name()) {
                Some(raw) => self.cast_with(descriptor, raw, &ctx)?,
                None => match descriptor.default_value() {
                    Some(default) => {
                        debug!(
                            type_name = target.name(),
                            parameter = descriptor.name(),
                            "Default substituted"
                        );
                        default.clone()
                    }
                    None => {
                        return Err(BuildError::MissingRequiredParameter {
                            type_name: target.name().to_string(),
                            parameter: descriptor.name().to_string(),
                        })
                    }
                },
            };
            args.push((descriptor.name().to_string(), value));
        }

        metadata.instantiate(args)
    }

    pub(crate) fn cast_with(
        &self,
        descriptor: &TypeDescriptor,
        value: Value,
        ctx: &CastContext<'_>,
    ) -> BuildResult<Value> {
        let descriptor = self.cache.resolve_element(descriptor)?;
        match self.registry.resolve(&descriptor)? {
            Some(caster) => caster.cast(value, &descriptor, ctx),
            None => Ok(value),
        }
    }
}
