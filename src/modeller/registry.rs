use super::transformers::{Scope, Transformer};
use crate::compiled::BindingData;
use crate::error::ValidationError;
use crate::source::RawNode;
use crate::source::raw::get_ignore_case;
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use once_cell::sync::Lazy;
use tracing::{debug, trace};

static GLOBAL_REGISTRY: Lazy<TransformerRegistry> =
    Lazy::new(|| TransformerRegistry::new(Transformer::ALL));

/// Scope groups whose keywords are validated together.
const VALIDATION_GROUPS: &[&[Scope]] = &[
    &[Scope::BeforeExecutable, Scope::AfterExecutable],
    &[Scope::Action],
    &[Scope::BeforeTask, Scope::AfterTask],
];

/// The transformers legal in `scope`, in their declaration order.
pub fn partition(all: &[Transformer], scope: Scope) -> Vec<Transformer> {
    all.iter().copied().filter(|t| t.is_in_scope(scope)).collect()
}

/// Transformers partitioned by scope, computed once.
#[derive(Debug)]
pub struct TransformerRegistry {
    scoped: AHashMap<Scope, Vec<Transformer>>,
}

impl TransformerRegistry {
    /// Partitions `all` by scope.
    ///
    /// # Panics
    ///
    /// If two transformers of one validation group resolve to the same
    /// keyword; one would silently shadow the other.
    pub fn new(all: &[Transformer]) -> Self {
        let scoped: AHashMap<Scope, Vec<Transformer>> = [
            Scope::BeforeExecutable,
            Scope::AfterExecutable,
            Scope::Action,
            Scope::BeforeTask,
            Scope::AfterTask,
        ]
        .into_iter()
        .map(|scope| (scope, partition(all, scope)))
        .collect();

        let registry = Self { scoped };
        for group in VALIDATION_GROUPS {
            let duplicates: Vec<String> = all
                .iter()
                .filter(|t| group.iter().any(|scope| t.is_in_scope(*scope)))
                .map(Transformer::keyword)
                .duplicates()
                .collect();
            assert!(
                duplicates.is_empty(),
                "transformer keywords {:?} are declared twice in scopes {:?}",
                duplicates,
                group
            );
        }

        debug!(
            before_executable = registry.scoped(Scope::BeforeExecutable).len(),
            after_executable = registry.scoped(Scope::AfterExecutable).len(),
            action = registry.scoped(Scope::Action).len(),
            before_task = registry.scoped(Scope::BeforeTask).len(),
            after_task = registry.scoped(Scope::AfterTask).len(),
            "transformer registry initialized"
        );
        registry
    }

    /// The process-wide registry over every known transformer.
    pub fn global() -> &'static TransformerRegistry {
        &GLOBAL_REGISTRY
    }

    pub fn scoped(&self, scope: Scope) -> &[Transformer] {
        self.scoped.get(&scope).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Transformers legal in any of `scopes`, without repeats.
    pub fn union(&self, scopes: &[Scope]) -> Vec<Transformer> {
        scopes
            .iter()
            .flat_map(|scope| self.scoped(*scope).iter().copied())
            .unique()
            .collect()
    }
}

/// Rejects any key of `raw` that is neither the keyword of a legal
/// transformer nor one of `extra_keywords`. Comparison ignores case.
pub fn validate_keywords(
    raw: &RawNode,
    legal: &[Transformer],
    extra_keywords: &[String],
    context: &str,
) -> Result<(), ValidationError> {
    let valid: AHashSet<String> = legal
        .iter()
        .map(Transformer::keyword)
        .chain(extra_keywords.iter().map(|k| k.to_lowercase()))
        .collect();

    match raw.keys().find(|key| !valid.contains(&key.to_lowercase())) {
        Some(key) => Err(ValidationError::UnknownKeyword {
            key: key.clone(),
            context: context.to_string(),
        }),
        None => Ok(()),
    }
}

/// Applies every transformer in `transformers` to its keyword's value in `raw`.
pub fn run_transformers(
    raw: &RawNode,
    transformers: &[Transformer],
) -> Result<BindingData, ValidationError> {
    let mut data = BindingData::new();
    for transformer in transformers {
        let keyword = transformer.keyword();
        trace!(keyword = %keyword, transformer = %transformer, "applying transformer");
        if let Some(value) = transformer.transform(&keyword, get_ignore_case(raw, &keyword))? {
            data.insert(keyword, value);
        }
    }
    Ok(data)
}
