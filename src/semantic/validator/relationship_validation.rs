//! Relationship validation for dimensions and models.
//!
//! Checks each relationship's endpoints, its join-key arity against the target
//! level, duplicate definitions, embedded-relationship hierarchies, and the
//! degenerate flag of dimensions reached through model relationships.

use std::collections::{HashMap, HashSet};

use smol_str::SmolStr;

use super::duplicate_groups;
use super::resolver::Resolver;
use crate::diag::DiagSeverity;
use crate::model::{Dimension, LevelAttribute, Model, Relationship, RelationshipTo};
use crate::registry::ObjectRegistry;
use crate::semantic::diag::{SmlDiagBuilder, SmlDiagKind};

/// How a relationship joins, derived from its owner and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RelationshipKind {
    /// Model dataset to a dimension level.
    Regular,
    /// Dimension to another dimension.
    Embedded,
    /// Dimension to one of its own levels.
    Snowflake,
    /// Dataset to a row security object.
    Security,
}

impl RelationshipKind {
    fn of_dimension(dimension: &Dimension, relationship: &Relationship) -> Self {
        match &relationship.to {
            RelationshipTo::RowSecurity { .. } => RelationshipKind::Security,
            RelationshipTo::Level { dimension: target, .. } if *target == dimension.unique_name => {
                RelationshipKind::Snowflake
            }
            RelationshipTo::Level { .. } => RelationshipKind::Embedded,
        }
    }

    fn of_model(relationship: &Relationship) -> Self {
        if relationship.is_security() {
            RelationshipKind::Security
        } else {
            RelationshipKind::Regular
        }
    }
}

pub(super) fn validate_dimension_relationships(
    resolver: &mut Resolver<'_, '_>,
    dimension: &Dimension,
) {
    for relationship in &dimension.relationships {
        let kind = RelationshipKind::of_dimension(dimension, relationship);
        validate_relationship(resolver, relationship, kind, Some(dimension));
        if kind == RelationshipKind::Embedded {
            check_embedded_hierarchy(resolver, dimension, relationship);
        }
    }
    check_duplicate_relationships(resolver, &dimension.relationships);
}

pub(super) fn validate_model_relationships(resolver: &mut Resolver<'_, '_>, model: &Model) {
    for relationship in &model.relationships {
        let kind = RelationshipKind::of_model(relationship);
        validate_relationship(resolver, relationship, kind, None);
    }
    check_duplicate_relationships(resolver, &model.relationships);
}

fn validate_relationship(
    resolver: &mut Resolver<'_, '_>,
    relationship: &Relationship,
    kind: RelationshipKind,
    owner: Option<&Dimension>,
) {
    let name = &relationship.unique_name;

    if relationship.from.dataset.is_empty() {
        resolver.report(detached(name, "dataset"));
    }
    if relationship.to.is_detached() {
        resolver.report(detached(name, "target"));
    }
    if relationship.is_detached() {
        return;
    }

    let dataset = resolver.dataset(&relationship.from.dataset);
    if let Some(dataset) = dataset {
        for column in &relationship.from.join_columns {
            if !dataset.has_column(column) {
                resolver.report(SmlDiagBuilder::missing_column(column, &dataset.unique_name));
            }
        }
    }

    let target_level = match (&relationship.to, kind) {
        (RelationshipTo::RowSecurity { row_security }, _) => {
            resolver.row_security(row_security);
            None
        }
        (RelationshipTo::Level { level, .. }, RelationshipKind::Snowflake) => match owner {
            Some(own) => find_level(resolver, own, level),
            None => None,
        },
        (RelationshipTo::Level { dimension, level }, _) => {
            let target = resolver.dimension(dimension);
            if let Some(target) = target
                && kind == RelationshipKind::Regular
                && target.is_degenerate
            {
                resolver.report(SmlDiagBuilder::new(
                    SmlDiagKind::DegenerateMismatch,
                    format!(
                        "dimension \"{}\" is reached through relationship \"{name}\" and must not be degenerate; degenerate dimensions belong in the model's dimensions list",
                        target.unique_name
                    ),
                ));
            }
            target.and_then(|target| find_level(resolver, target, level))
        }
    };

    if let (Some(_), Some(level)) = (dataset, target_level) {
        let joined = relationship.from.join_columns.len();
        let keys = level.key_arity();
        if joined != keys {
            resolver.report(SmlDiagBuilder::new(
                SmlDiagKind::KeyArityMismatch,
                format!(
                    "relationship \"{name}\" joins on {joined} column(s) but level \"{}\" has {keys} key column(s)",
                    level.unique_name
                ),
            ));
        }
    }
}

fn find_level<'d>(
    resolver: &mut Resolver<'_, '_>,
    dimension: &'d Dimension,
    level: &str,
) -> Option<&'d LevelAttribute> {
    let found = dimension.level_attribute(level);
    if found.is_none() {
        resolver.report(SmlDiagBuilder::unknown_member(
            "level",
            level,
            &dimension.unique_name,
        ));
    }
    found
}

fn detached(name: &str, side: &str) -> SmlDiagBuilder {
    SmlDiagBuilder::new(
        SmlDiagKind::DetachedRelationship,
        format!("detached relationship \"{name}\": {side} is not set"),
    )
    .with_severity(DiagSeverity::Warning)
}

fn check_embedded_hierarchy(
    resolver: &mut Resolver<'_, '_>,
    dimension: &Dimension,
    relationship: &Relationship,
) {
    let name = &relationship.unique_name;
    let Some(hierarchy_name) = &relationship.from.hierarchy else {
        resolver.report(SmlDiagBuilder::new(
            SmlDiagKind::UnknownMember,
            format!("embedded relationship \"{name}\" must name a hierarchy of dimension \"{}\"", dimension.unique_name),
        ));
        return;
    };
    let Some(hierarchy) = dimension.hierarchy(hierarchy_name) else {
        resolver.report(SmlDiagBuilder::unknown_member(
            "hierarchy",
            hierarchy_name,
            &dimension.unique_name,
        ));
        return;
    };
    if let Some(level) = &relationship.from.level
        && hierarchy.level(level).is_none()
    {
        resolver.report(SmlDiagBuilder::unknown_member(
            "level",
            level,
            &hierarchy.unique_name,
        ));
    }
}

fn check_duplicate_relationships(resolver: &mut Resolver<'_, '_>, relationships: &[Relationship]) {
    let by_signature =
        duplicate_groups(relationships.iter().map(|r| ((&r.from, &r.to), r)));
    for (representative, count) in by_signature {
        resolver.report(SmlDiagBuilder::duplicate("relationship", count, representative));
    }

    let by_name = duplicate_groups(
        relationships
            .iter()
            .filter(|r| !r.unique_name.is_empty())
            .map(|r| (&r.unique_name, r)),
    );
    for (representative, count) in by_name {
        resolver.report(SmlDiagBuilder::duplicate(
            "relationship unique_name",
            count,
            format!("\"{}\"", representative.unique_name),
        ));
    }
}

/// Relationship names visible from a model, mapped to the dimension they
/// target: the model's own relationships plus the embedded relationships of
/// every dimension those relationships reach.
pub(super) fn known_relationships<'a>(
    registry: &ObjectRegistry<'a>,
    model: &'a Model,
) -> HashMap<&'a str, Option<&'a SmolStr>> {
    let mut known = HashMap::new();
    let mut visited = HashSet::new();
    for relationship in &model.relationships {
        known.insert(relationship.unique_name.as_str(), relationship.target_dimension());
        if let Some(dimension) = relationship.target_dimension()
            && visited.insert(dimension.as_str())
            && let Some(dimension) = registry.get(dimension).and_then(|o| o.as_dimension())
        {
            for embedded in dimension.embedded_relationships() {
                known
                    .entry(embedded.unique_name.as_str())
                    .or_insert_with(|| embedded.target_dimension());
            }
        }
    }
    known
}
