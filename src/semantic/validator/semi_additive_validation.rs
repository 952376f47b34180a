//! Semi-additive measure validation.
//!
//! A semi-additive measure names the relationships (or degenerate dimension
//! levels) it must not aggregate across. The names are interpreted by each
//! model that exposes the measure, so most checks run once per owner found in
//! the registry.

use std::collections::{HashMap, HashSet};

use smol_str::SmolStr;

use super::relationship_validation::known_relationships;
use super::resolver::Resolver;
use crate::model::{DegenerateLevelRef, Measure, RelationshipChain, SemiAdditive};
use crate::registry::{MetricOwner, ObjectRegistry};
use crate::semantic::diag::{SmlDiagBuilder, SmlDiagKind};
use crate::diag::DiagSeverity;

const MAX_CHAIN_LEN: usize = 2;

/// Relationships and degenerate dimensions visible to one model or
/// composite model.
struct OwnerScope<'a> {
    name: &'a SmolStr,
    relationships: HashMap<&'a str, Option<&'a SmolStr>>,
    dimensions: HashSet<&'a str>,
}

impl<'a> OwnerScope<'a> {
    fn new(registry: &ObjectRegistry<'a>, owner: MetricOwner<'a>) -> Self {
        let mut scope = Self {
            name: owner.unique_name(),
            relationships: HashMap::new(),
            dimensions: HashSet::new(),
        };
        match owner {
            MetricOwner::Model(model) => {
                scope.relationships = known_relationships(registry, model);
                scope.dimensions = model.dimensions.iter().map(SmolStr::as_str).collect();
            }
            MetricOwner::Composite(composite) => {
                for model in composite
                    .models
                    .iter()
                    .filter_map(|name| registry.get(name))
                    .filter_map(|object| object.as_model())
                {
                    for (name, target) in known_relationships(registry, model) {
                        scope.relationships.entry(name).or_insert(target);
                    }
                    scope
                        .dimensions
                        .extend(model.dimensions.iter().map(SmolStr::as_str));
                }
            }
        }
        scope
    }
}

pub(super) fn validate_semi_additive(
    resolver: &mut Resolver<'_, '_>,
    measure: &Measure,
    semi_additive: &SemiAdditive,
) {
    if semi_additive.relationships.is_empty() && semi_additive.degenerate_dimensions.is_empty() {
        resolver.report(SmlDiagBuilder::new(
            SmlDiagKind::SemiAdditive,
            format!(
                "semi-additive metric \"{}\" must define relationships or degenerate_dimensions",
                measure.unique_name
            ),
        ));
        return;
    }

    for chain in &semi_additive.relationships {
        let length = chain.names().len();
        if length == 0 || length > MAX_CHAIN_LEN {
            resolver.report(SmlDiagBuilder::new(
                SmlDiagKind::SemiAdditive,
                format!(
                    "relationship chain [{}] of semi-additive metric \"{}\" must have 1 to {MAX_CHAIN_LEN} elements",
                    chain.names().join(", "),
                    measure.unique_name
                ),
            ));
        }
    }

    let registry = resolver.registry();
    let scopes: Vec<OwnerScope<'_>> = registry
        .metric_owners(&measure.unique_name)
        .into_iter()
        .map(|owner| OwnerScope::new(registry, owner))
        .collect();

    check_unknown_relationships(resolver, measure, semi_additive, &scopes);
    let valid_levels = check_degenerate_levels(resolver, &semi_additive.degenerate_dimensions);

    for scope in &scopes {
        let by_relationship = semi_additive
            .relationships
            .iter()
            .any(|chain| chain_satisfied(resolver, scope, chain));
        let by_degenerate = valid_levels
            .iter()
            .any(|level| scope.dimensions.contains(level.name.as_str()));
        if !by_relationship && !by_degenerate {
            resolver.report(SmlDiagBuilder::new(
                SmlDiagKind::SemiAdditive,
                format!(
                    "semi-additive metric \"{}\" has no semi-additive relationship or degenerate dimension in \"{}\"",
                    measure.unique_name, scope.name
                ),
            ));
        }
    }
}

fn check_unknown_relationships(
    resolver: &mut Resolver<'_, '_>,
    measure: &Measure,
    semi_additive: &SemiAdditive,
    scopes: &[OwnerScope<'_>],
) {
    let embedded: HashSet<&str> = resolver
        .registry()
        .dimensions()
        .flat_map(|d| d.embedded_relationships())
        .map(|r| r.unique_name.as_str())
        .collect();

    let mut reported = HashSet::new();
    for name in semi_additive
        .relationships
        .iter()
        .flat_map(RelationshipChain::names)
    {
        let known = embedded.contains(name.as_str())
            || scopes
                .iter()
                .any(|scope| scope.relationships.contains_key(name.as_str()));
        if !known && reported.insert(name) {
            resolver.report(
                SmlDiagBuilder::new(
                    SmlDiagKind::SemiAdditive,
                    format!(
                        "semi-additive relationship \"{name}\" of metric \"{}\" is not defined in any model using it",
                        measure.unique_name
                    ),
                )
                .with_severity(DiagSeverity::Warning),
            );
        }
    }
}

/// Reports each distinct unknown `(dimension, level)` pair once and returns
/// the pairs that resolve.
fn check_degenerate_levels<'m>(
    resolver: &mut Resolver<'_, '_>,
    levels: &'m [DegenerateLevelRef],
) -> Vec<&'m DegenerateLevelRef> {
    let mut seen = HashSet::new();
    let mut valid = Vec::new();
    for level in levels {
        if !seen.insert(level) {
            continue;
        }
        let Some(dimension) = resolver.dimension(&level.name) else {
            continue;
        };
        if dimension.level_attribute(&level.level).is_some() {
            valid.push(level);
        } else {
            resolver.report(SmlDiagBuilder::unknown_member(
                "level",
                &level.level,
                &dimension.unique_name,
            ));
        }
    }
    valid
}

/// A single name must be visible to the owner. A pair names an owner
/// relationship followed by a relationship of the dimension it reaches.
fn chain_satisfied(resolver: &Resolver<'_, '_>, scope: &OwnerScope<'_>, chain: &RelationshipChain) -> bool {
    match chain.names() {
        [single] => scope.relationships.contains_key(single.as_str()),
        [first, second] => scope
            .relationships
            .get(first.as_str())
            .copied()
            .flatten()
            .and_then(|target| resolver.peek_dimension(target))
            .is_some_and(|dimension| {
                dimension
                    .relationships
                    .iter()
                    .any(|r| r.unique_name == *second)
            }),
        _ => false,
    }
}
