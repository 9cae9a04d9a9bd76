//! Rule compilation and change resolution

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use super::error::{MappingError, MappingResult};
use super::rule::MappingRule;
use super::table::RuleTable;
use super::types::MappingStats;
use crate::field::FieldId;
use crate::schema::FlattenedSchema;

/// Compiled mapping from source-field changes to destination fields
///
/// Built once by [`Mapper::compile`] and immutable afterwards.
///
/// Resolution semantics:
/// - a field with rules of its own uses the first rule registered for it;
///   later rules for the same field are never consulted
/// - a field without rules falls back to its nearest ancestor that has one
/// - destinations are reported once, in first-seen order
#[derive(Debug, Clone)]
pub struct Mapper<S, D> {
    groups: HashMap<FieldId<S>, Vec<Vec<FieldId<D>>>>,
    parents: Vec<u32>,
    unmapped: Vec<FieldId<S>>,
    shadowed: Vec<FieldId<S>>,
    stats: MappingStats,
}

impl<S, D> Mapper<S, D> {
    /// Compile `rules` between a source and a destination schema
    ///
    /// Rules are grouped by exact source field in registration order.
    /// Registering the same destination twice for the same source field as a
    /// single-destination rule fails with
    /// [`MappingError::DuplicateDestination`]; rules with two or more
    /// destinations are not checked for duplicates.
    pub fn compile(
        source: &FlattenedSchema<S>,
        destination: &FlattenedSchema<D>,
        rules: impl IntoIterator<Item = MappingRule<S, D>>,
    ) -> MappingResult<Self> {
        let mut groups: HashMap<FieldId<S>, Vec<Vec<FieldId<D>>>> = HashMap::new();
        let mut dedup_sets: HashMap<FieldId<S>, HashSet<FieldId<D>>> = HashMap::new();
        // Source fields in the order of their first rule
        let mut registration_order: Vec<FieldId<S>> = Vec::new();
        let mut rule_count = 0;

        for rule in rules {
            rule_count += 1;
            let from = rule.source();
            if !source.contains(from) {
                return Err(MappingError::UnknownSourceField {
                    ordinal: from.ordinal(),
                });
            }
            if let Some(to) = rule.destinations().iter().find(|&&to| !destination.contains(to)) {
                return Err(MappingError::UnknownDestinationField {
                    ordinal: to.ordinal(),
                });
            }

            match rule.destinations() {
                [] => {
                    return Err(MappingError::EmptyDestinationGroup {
                        source_path: full_name(source, from),
                    });
                }
                [to] => {
                    if !dedup_sets.entry(from).or_default().insert(*to) {
                        return Err(MappingError::DuplicateDestination {
                            source_path: full_name(source, from),
                            destination_path: full_name(destination, *to),
                        });
                    }
                }
                _ => {}
            }

            let alternatives = groups.entry(from).or_default();
            if alternatives.is_empty() {
                registration_order.push(from);
            }
            alternatives.push(rule.into_destinations());
        }

        let mut shadowed_groups = 0;
        let mut shadowed = Vec::new();
        for from in registration_order {
            let extra = groups.get(&from).map_or(0, |alternatives| alternatives.len() - 1);
            if extra > 0 {
                shadowed_groups += extra;
                shadowed.push(from);
                warn!(
                    "{} mapping(s) for source field '{}' are shadowed by the first registration",
                    extra,
                    full_name(source, from)
                );
            }
        }

        let destination_fields = groups
            .values()
            .flatten()
            .flatten()
            .collect::<HashSet<_>>()
            .len();

        let mut mapper = Self {
            groups,
            parents: source.parent_table().to_vec(),
            unmapped: Vec::new(),
            shadowed,
            stats: MappingStats::default(),
        };

        mapper.unmapped = source
            .field_ids()
            .filter(|&f| mapper.matched_group(f).is_none())
            .collect();
        mapper.stats = MappingStats {
            rules: rule_count,
            source_fields: mapper.groups.len(),
            destination_fields,
            shadowed_groups,
            unmapped_source_fields: mapper.unmapped.len(),
        };

        info!(
            "Compiled {} mapping rules for {} source fields ({} unmapped)",
            mapper.stats.rules, mapper.stats.source_fields, mapper.stats.unmapped_source_fields
        );
        Ok(mapper)
    }

    /// Compile a mapper from a path-based rule table
    pub fn from_table(
        source: &FlattenedSchema<S>,
        destination: &FlattenedSchema<D>,
        table: &RuleTable,
    ) -> MappingResult<Self> {
        let rules = table.to_rules(source, destination)?;
        Self::compile(source, destination, rules)
    }

    /// Destination fields to recompute when `changed` source fields change
    ///
    /// Never fails: unmapped or unknown fields contribute nothing.
    pub fn resolve(&self, changed: impl IntoIterator<Item = FieldId<S>>) -> Vec<FieldId<D>> {
        let mut result = Vec::new();
        let mut seen = HashSet::new();

        for field in changed {
            if let Some(group) = self.matched_group(field) {
                for &to in group {
                    if seen.insert(to) {
                        result.push(to);
                    }
                }
            }
        }

        debug!("Resolved changes to {} destination fields", result.len());
        result
    }

    /// The group `resolve` uses for `field`: its own first rule, else its nearest mapped ancestor's
    pub fn matched_group(&self, field: FieldId<S>) -> Option<&[FieldId<D>]> {
        let mut current = Some(field);
        while let Some(f) = current {
            if let Some(alternatives) = self.groups.get(&f) {
                return alternatives.first().map(Vec::as_slice);
            }
            current = self.parent_of(f);
        }
        None
    }

    /// Every group registered for exactly `field`, in registration order
    pub fn alternatives(&self, field: FieldId<S>) -> &[Vec<FieldId<D>>] {
        self.groups.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Source fields that resolve to nothing, in ordinal order
    pub fn unmapped_sources(&self) -> &[FieldId<S>] {
        &self.unmapped
    }

    /// Source fields with rules that never fire, in the order their first rule was registered
    pub fn shadowed_sources(&self) -> &[FieldId<S>] {
        &self.shadowed
    }

    pub fn stats(&self) -> &MappingStats {
        &self.stats
    }

    fn parent_of(&self, field: FieldId<S>) -> Option<FieldId<S>> {
        let index = field.index()?;
        self.parents
            .get(index)
            .copied()
            .map(FieldId::from_ordinal)
            .and_then(FieldId::non_zero)
    }
}

fn full_name<S>(schema: &FlattenedSchema<S>, field: FieldId<S>) -> String {
    schema
        .full_name_of(field)
        .unwrap_or_else(|| field.ordinal().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DynamicSchema, FieldNode, SchemaOptions};

    type Schema = FlattenedSchema<DynamicSchema>;

    fn schemas() -> (Schema, Schema) {
        let options = SchemaOptions::new();
        let source = Schema::from_nodes(
            &[
                FieldNode::leaf("Sku"),
                FieldNode::composite(
                    "Seller",
                    vec![
                        FieldNode::leaf("ID"),
                        FieldNode::composite("Attr", vec![FieldNode::leaf("Code")]),
                    ],
                ),
                FieldNode::leaf("Body"),
            ],
            &options,
        )
        .unwrap();
        let destination = Schema::from_nodes(
            &[
                FieldNode::leaf("Info"),
                FieldNode::leaf("Detail"),
                FieldNode::leaf("SearchText"),
            ],
            &options,
        )
        .unwrap();
        (source, destination)
    }

    fn field(schema: &Schema, path: &str) -> FieldId<DynamicSchema> {
        schema.lookup(path).unwrap()
    }

    #[test]
    fn test_nearest_ancestor_wins() {
        let (src, dst) = schemas();
        let rules = vec![
            MappingRule::new(field(&src, "Seller"), [field(&dst, "Detail")]),
            MappingRule::new(field(&src, "Seller.Attr"), [field(&dst, "SearchText")]),
        ];
        let mapper = Mapper::compile(&src, &dst, rules).unwrap();

        assert_eq!(
            mapper.resolve([field(&src, "Seller.Attr.Code")]),
            vec![field(&dst, "SearchText")]
        );
        assert_eq!(
            mapper.resolve([field(&src, "Seller.ID")]),
            vec![field(&dst, "Detail")]
        );
    }

    #[test]
    fn test_stats_and_unmapped() {
        let (src, dst) = schemas();
        let rules = vec![
            MappingRule::new(field(&src, "Seller"), [field(&dst, "Detail")]),
            MappingRule::new(field(&src, "Seller"), [field(&dst, "Info")]),
            MappingRule::new(field(&src, "Sku"), [field(&dst, "Info"), field(&dst, "SearchText")]),
        ];
        let mapper = Mapper::compile(&src, &dst, rules).unwrap();

        let stats = mapper.stats();
        assert_eq!(stats.rules, 3);
        assert_eq!(stats.source_fields, 2);
        assert_eq!(stats.destination_fields, 3);
        assert_eq!(stats.shadowed_groups, 1);
        assert_eq!(stats.unmapped_source_fields, 1);
        assert!(!stats.is_complete());
        assert_eq!(mapper.unmapped_sources(), &[field(&src, "Body")]);

        assert_eq!(mapper.alternatives(field(&src, "Seller")).len(), 2);
        assert!(mapper.alternatives(field(&src, "Seller.ID")).is_empty());
    }

    #[test]
    fn test_shadowed_sources_follow_registration_order() {
        let (src, dst) = schemas();
        // Registered in reverse ordinal order, with an unshadowed field in between
        let rules = vec![
            MappingRule::new(field(&src, "Body"), [field(&dst, "Info")]),
            MappingRule::new(field(&src, "Seller.ID"), [field(&dst, "Detail")]),
            MappingRule::new(field(&src, "Sku"), [field(&dst, "Info")]),
            MappingRule::new(field(&src, "Sku"), [field(&dst, "Detail")]),
            MappingRule::new(field(&src, "Body"), [field(&dst, "SearchText")]),
            MappingRule::new(field(&src, "Body"), [field(&dst, "Detail")]),
        ];
        let mapper = Mapper::compile(&src, &dst, rules).unwrap();

        assert_eq!(
            mapper.shadowed_sources(),
            &[field(&src, "Body"), field(&src, "Sku")]
        );
        assert_eq!(mapper.stats().shadowed_groups, 3);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let (src, dst) = schemas();

        let rules = vec![MappingRule::new(FieldId::from_ordinal(42), [field(&dst, "Info")])];
        assert!(matches!(
            Mapper::compile(&src, &dst, rules),
            Err(MappingError::UnknownSourceField { ordinal: 42 })
        ));

        let rules = vec![MappingRule::new(field(&src, "Sku"), [FieldId::NONE])];
        assert!(matches!(
            Mapper::compile(&src, &dst, rules),
            Err(MappingError::UnknownDestinationField { ordinal: 0 })
        ));
    }

    #[test]
    fn test_empty_group_rejected() {
        let (src, dst) = schemas();
        let rules = vec![MappingRule::new(field(&src, "Seller.ID"), [])];

        match Mapper::compile(&src, &dst, rules) {
            Err(MappingError::EmptyDestinationGroup { source_path }) => {
                assert_eq!(source_path, "Seller.ID")
            }
            other => panic!("unexpected result: {:?}", other.err()),
        }
    }

    #[test]
    fn test_resolve_ignores_foreign_fields() {
        let (src, dst) = schemas();
        let rules = vec![MappingRule::new(field(&src, "Sku"), [field(&dst, "Info")])];
        let mapper = Mapper::compile(&src, &dst, rules).unwrap();

        assert!(mapper.resolve([FieldId::NONE, FieldId::from_ordinal(99)]).is_empty());
        assert!(mapper.resolve(Vec::new()).is_empty());
    }
}
