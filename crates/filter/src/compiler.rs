//! Walks a filter document and compiles it into a [`CompiledFilter`].

use crate::{
    adapter::FilterBuilder,
    bucket::{PendingRelationPredicate, RelationBuckets},
    error::FilterError,
    node::{FilterNode, json_kind},
    operator::{Classifier, ComparisonOp, Connective, KeyKind},
    options::CompileOptions,
    predicate::{ColumnRef, CompiledFilter, CompiledPredicate, Diagnostic},
    relation::RelationRegistry,
    resolver::{ResolvedField, resolve_field},
};
use model::core::value::Value;
use serde_json::{Map, Value as Json};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompileOptions,
    classifier: Classifier,
}

impl Compiler {
    pub fn new(options: CompileOptions) -> Self {
        Self {
            classifier: Classifier::new(options.marker),
            options,
        }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compiles `filter` against `base_table` without touching any builder.
    pub fn compile_tree(
        &self,
        base_table: &str,
        registry: &RelationRegistry,
        filter: &FilterNode,
    ) -> Result<CompiledFilter, FilterError> {
        let mut ctx = Context {
            compiler: self,
            base_table,
            registry,
            diagnostics: Vec::new(),
        };

        let mut root = Scope::new(Connective::And);
        ctx.compile_node(filter.entries(), "", &mut root)?;
        let predicates = ctx.close(root);

        debug!(
            "Compiled filter on `{}` into {} top-level predicate(s)",
            base_table,
            predicates.len()
        );

        Ok(CompiledFilter {
            base_table: base_table.to_string(),
            predicates,
            diagnostics: ctx.diagnostics,
        })
    }

    /// Compiles `filter` and applies it to `builder`. On error the builder is
    /// dropped untouched.
    pub fn compile<B: FilterBuilder>(
        &self,
        base_table: &str,
        registry: &RelationRegistry,
        filter: &FilterNode,
        builder: B,
    ) -> Result<B, FilterError> {
        let compiled = self.compile_tree(base_table, registry, filter)?;
        Ok(compiled.apply(builder))
    }
}

/// One boolean scope: the top level, or a `$and` / `$or` group.
struct Scope<'r> {
    connective: Connective,
    predicates: Vec<CompiledPredicate>,
    buckets: RelationBuckets<'r>,
}

impl Scope<'_> {
    fn new(connective: Connective) -> Self {
        Self {
            connective,
            predicates: Vec::new(),
            buckets: RelationBuckets::new(),
        }
    }
}

struct Context<'c, 'r> {
    compiler: &'c Compiler,
    base_table: &'c str,
    registry: &'r RelationRegistry,
    diagnostics: Vec<Diagnostic>,
}

impl<'r> Context<'_, 'r> {
    /// Records a skipped clause, or fails in strict mode.
    fn report(&mut self, diagnostic: Diagnostic) -> Result<(), FilterError> {
        if self.compiler.options.strict {
            return Err(diagnostic.into());
        }
        warn!("Skipping clause: {}", diagnostic);
        self.diagnostics.push(diagnostic);
        Ok(())
    }

    /// Flushes the relation buckets and returns everything the scope holds.
    fn close(&self, mut scope: Scope<'r>) -> Vec<CompiledPredicate> {
        if !scope.buckets.is_empty() {
            let base_column = ColumnRef::new(self.base_table, &self.compiler.options.base_key);
            let subqueries = scope.buckets.flush(scope.connective, &base_column);
            scope.predicates.extend(subqueries);
        }
        scope.predicates
    }

    /// Closes `child` and attaches it to `parent` as one group. Empty groups
    /// are dropped.
    fn attach(&self, child: Scope<'r>, parent: &mut Scope<'r>) {
        let inner = child.connective;
        let predicates = self.close(child);
        if predicates.is_empty() {
            debug!("Dropping empty `{}` group", inner);
            return;
        }
        parent.predicates.push(CompiledPredicate::Group {
            connective: parent.connective,
            inner,
            predicates,
        });
    }

    fn compile_node(
        &mut self,
        node: &Map<String, Json>,
        path: &str,
        scope: &mut Scope<'r>,
    ) -> Result<(), FilterError> {
        for (key, value) in node {
            let key_path = join_path(path, key);
            match self.compiler.classifier.classify(key) {
                KeyKind::Logical(connective) => {
                    self.compile_logical(connective, value, &key_path, scope)?
                }
                KeyKind::Field(field) => self.compile_field(field, value, &key_path, scope)?,
                KeyKind::Comparison(_) | KeyKind::UnknownOperator(_) => {
                    self.report(Diagnostic::unrecognized_operator(&key_path, key))?
                }
            }
        }
        Ok(())
    }

    fn compile_logical(
        &mut self,
        connective: Connective,
        value: &Json,
        path: &str,
        parent: &mut Scope<'r>,
    ) -> Result<(), FilterError> {
        let elements: Vec<(String, Map<String, Json>)> = match value {
            Json::Array(items) => {
                let mut elements = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let item_path = format!("{path}[{index}]");
                    match item {
                        Json::Object(map) => elements.push((item_path, map.clone())),
                        other => self.report(Diagnostic::malformed(
                            item_path,
                            format!("expected an object, found {}", json_kind(other)),
                        ))?,
                    }
                }
                elements
            }
            // `{"$or": {"a": 1, "b": 2}}` reads as `{"$or": [{"a": 1}, {"b": 2}]}`.
            Json::Object(map) => map
                .iter()
                .map(|(key, value)| {
                    let mut entry = Map::new();
                    entry.insert(key.clone(), value.clone());
                    (path.to_string(), entry)
                })
                .collect(),
            other => {
                return self.report(Diagnostic::malformed(
                    path,
                    format!("expected an object or an array, found {}", json_kind(other)),
                ));
            }
        };

        debug!("Opening `{}` group with {} element(s)", connective, elements.len());

        let mut scope = Scope::new(connective);
        for (element_path, element) in &elements {
            if connective == Connective::Or && element.len() > 1 {
                let mut and = Scope::new(Connective::And);
                self.compile_node(element, element_path, &mut and)?;
                self.attach(and, &mut scope);
            } else {
                self.compile_node(element, element_path, &mut scope)?;
            }
        }
        self.attach(scope, parent);
        Ok(())
    }

    fn compile_field(
        &mut self,
        field: &str,
        value: &Json,
        path: &str,
        scope: &mut Scope<'r>,
    ) -> Result<(), FilterError> {
        let target = match resolve_field(field, self.base_table, self.registry) {
            Ok(target) => target,
            Err(FilterError::MalformedFilter { reason, .. }) => {
                return self.report(Diagnostic::malformed(path, reason));
            }
            Err(err) => return Err(err),
        };

        let comparisons: Vec<(ComparisonOp, &Json, String)> = match value {
            Json::Object(operators) => {
                let mut comparisons = Vec::with_capacity(operators.len());
                for (key, operand) in operators {
                    let op_path = join_path(path, key);
                    match self.compiler.classifier.classify(key) {
                        KeyKind::Comparison(op) => comparisons.push((op, operand, op_path)),
                        _ => self.report(Diagnostic::unrecognized_operator(op_path, key))?,
                    }
                }
                if operators.is_empty() {
                    self.report(Diagnostic::malformed(path, "empty comparison object"))?;
                }
                comparisons
            }
            Json::Array(_) => {
                return self.report(Diagnostic::malformed(
                    path,
                    "a list of values needs an explicit `in` or `nin` operator",
                ));
            }
            scalar => vec![(ComparisonOp::Eq, scalar, path.to_string())],
        };

        // Several operators on one field constrain it together.
        if scope.connective == Connective::Or && comparisons.len() > 1 {
            let mut and = Scope::new(Connective::And);
            for (op, operand, op_path) in comparisons {
                self.compile_comparison(&target, op, operand, &op_path, &mut and)?;
            }
            self.attach(and, scope);
            return Ok(());
        }

        for (op, operand, op_path) in comparisons {
            self.compile_comparison(&target, op, operand, &op_path, scope)?;
        }
        Ok(())
    }

    fn compile_comparison(
        &mut self,
        target: &ResolvedField<'r>,
        op: ComparisonOp,
        operand: &Json,
        path: &str,
        scope: &mut Scope<'r>,
    ) -> Result<(), FilterError> {
        let value = match Value::from_json(operand) {
            Ok(value) => value,
            Err(err) => return self.report(Diagnostic::malformed(path, err.to_string())),
        };

        let value = if value.is_null() {
            if op.is_ordering() {
                return self.report(Diagnostic::malformed(
                    path,
                    format!("`{}` cannot compare against null", op.token()),
                ));
            }
            Value::Null
        } else if op.takes_list() {
            Value::List(value.into_list())
        } else if value.is_list() {
            return self.report(Diagnostic::malformed(
                path,
                format!("`{}` takes a single value, found a list", op.token()),
            ));
        } else {
            value
        };

        let (value, lists_null) = match value {
            Value::List(items) if items.iter().any(Value::is_null) => (
                Value::List(items.into_iter().filter(|item| !item.is_null()).collect()),
                true,
            ),
            value => (value, false),
        };

        let connective = scope.connective;
        match target {
            ResolvedField::Local(column) if lists_null => {
                scope
                    .predicates
                    .push(membership_with_null(connective, column, op, value));
            }
            ResolvedField::Relation(_) if lists_null => {
                return self.report(Diagnostic::malformed(
                    path,
                    format!("`{}` on a relation field cannot list null", op.token()),
                ));
            }
            ResolvedField::Local(column) if value.is_null() => {
                scope.predicates.push(CompiledPredicate::NullTest {
                    connective,
                    column: column.clone(),
                    negated: op.is_negated(),
                });
            }
            ResolvedField::Local(column) => {
                scope.predicates.push(CompiledPredicate::Comparison {
                    connective,
                    column: column.clone(),
                    comparator: op.comparator(),
                    value,
                });
            }
            ResolvedField::Relation(relation) => {
                debug!(
                    "Deferring `{}` {} on relation `{}`",
                    relation.column_ref(),
                    op.comparator(),
                    relation.relation
                );
                scope.buckets.push(PendingRelationPredicate {
                    target: relation.clone(),
                    op,
                    value,
                    connective,
                });
            }
        }
        Ok(())
    }
}

/// `in [a, null]` becomes `(col IN (a) OR col IS NULL)` and
/// `nin [a, null]` becomes `(col NOT IN (a) AND col IS NOT NULL)`.
fn membership_with_null(
    connective: Connective,
    column: &ColumnRef,
    op: ComparisonOp,
    values: Value,
) -> CompiledPredicate {
    let negated = op.is_negated();
    let values = values.into_list();
    if values.is_empty() {
        return CompiledPredicate::NullTest {
            connective,
            column: column.clone(),
            negated,
        };
    }

    let inner = if negated { Connective::And } else { Connective::Or };
    CompiledPredicate::Group {
        connective,
        inner,
        predicates: vec![
            CompiledPredicate::Comparison {
                connective: inner,
                column: column.clone(),
                comparator: op.comparator(),
                value: Value::List(values),
            },
            CompiledPredicate::NullTest {
                connective: inner,
                column: column.clone(),
                negated,
            },
        ],
    }
}

fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        operator::Comparator,
        predicate::{Membership, Subquery, SubqueryFilter},
        relation::RelationDescriptor,
    };
    use serde_json::json;
    use tracing_test::traced_test;

    fn registry() -> RelationRegistry {
        RelationRegistry::from_json(
            r#"{
                "tags": {"tableName": "tags", "type": "manyToMany",
                         "join_table": "posts_tags", "join_from": "post_id", "join_to": "tag_id"},
                "comments": {"tableName": "comments", "type": "oneToMany", "foreignKey": "post_id"}
            }"#,
        )
        .unwrap()
    }

    fn compile(filter: serde_json::Value) -> Result<CompiledFilter, FilterError> {
        compile_with(CompileOptions::default(), filter)
    }

    fn compile_with(
        options: CompileOptions,
        filter: serde_json::Value,
    ) -> Result<CompiledFilter, FilterError> {
        let filter = FilterNode::from_json(filter)?;
        Compiler::new(options).compile_tree("posts", &registry(), &filter)
    }

    fn cmp(connective: Connective, column: &str, comparator: Comparator, value: Value) -> CompiledPredicate {
        CompiledPredicate::Comparison {
            connective,
            column: ColumnRef::new("posts", column),
            comparator,
            value,
        }
    }

    fn subqueries(predicates: &[CompiledPredicate]) -> Vec<(Membership, &Subquery)> {
        predicates
            .iter()
            .filter_map(|predicate| match predicate {
                CompiledPredicate::Subquery {
                    membership,
                    subquery,
                    ..
                } => Some((*membership, subquery)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_default_conjunction() {
        let compiled = compile(json!({"id": 3})).unwrap();
        assert_eq!(
            compiled.predicates,
            vec![cmp(Connective::And, "id", Comparator::Eq, Value::Int(3))]
        );
        assert!(compiled.diagnostics.is_empty());
    }

    #[test]
    fn test_equality_shorthand() {
        let short = compile(json!({"title": "Second post"})).unwrap();
        let long = compile(json!({"title": {"$eq": "Second post"}})).unwrap();
        assert_eq!(short, long);
    }

    #[test]
    fn test_base_table_prefix_matches_bare_column() {
        let bare = compile(json!({"status": "draft"})).unwrap();
        let qualified = compile(json!({"posts.status": "draft"})).unwrap();
        assert_eq!(bare, qualified);
    }

    #[test]
    fn test_null_handling() {
        let compiled = compile(json!({
            "image": null,
            "status": {"$ne": null},
            "author_id": {"$in": null},
            "slug": {"$nin": null}
        }))
        .unwrap();

        let negations: Vec<_> = compiled
            .predicates
            .iter()
            .map(|predicate| match predicate {
                CompiledPredicate::NullTest { negated, .. } => *negated,
                other => panic!("expected a null test, got {other:?}"),
            })
            .collect();
        assert_eq!(negations, vec![false, true, false, true]);
    }

    #[test]
    fn test_or_group_is_one_predicate() {
        let compiled = compile(json!({
            "$or": [{"status": "published"}, {"image": {"$ne": null}}]
        }))
        .unwrap();

        assert_eq!(
            compiled.predicates,
            vec![CompiledPredicate::Group {
                connective: Connective::And,
                inner: Connective::Or,
                predicates: vec![
                    cmp(Connective::Or, "status", Comparator::Eq, Value::from("published")),
                    CompiledPredicate::NullTest {
                        connective: Connective::Or,
                        column: ColumnRef::new("posts", "image"),
                        negated: true,
                    },
                ],
            }]
        );
    }

    #[test]
    fn test_nested_group_attaches_with_parent_connective() {
        let compiled = compile(json!({
            "$or": [
                {"featured": true},
                {"$and": [{"status": "draft"}, {"image": {"$ne": null}}]}
            ]
        }))
        .unwrap();

        let CompiledPredicate::Group { predicates, .. } = &compiled.predicates[0] else {
            panic!("expected a group");
        };
        assert!(matches!(
            &predicates[1],
            CompiledPredicate::Group {
                connective: Connective::Or,
                inner: Connective::And,
                predicates,
            } if predicates.iter().all(|p| p.connective() == Connective::And)
        ));
    }

    #[test]
    fn test_multi_key_element_in_or_is_an_and_group() {
        let compiled = compile(json!({
            "$or": [{"status": "draft", "featured": true}, {"id": 1}]
        }))
        .unwrap();

        let CompiledPredicate::Group { predicates, .. } = &compiled.predicates[0] else {
            panic!("expected a group");
        };
        assert_eq!(predicates.len(), 2);
        assert!(matches!(
            &predicates[0],
            CompiledPredicate::Group { connective: Connective::Or, inner: Connective::And, predicates }
                if predicates.len() == 2
        ));
        assert_eq!(predicates[1], cmp(Connective::Or, "id", Comparator::Eq, Value::Int(1)));
    }

    #[test]
    fn test_single_object_logical_value_reads_as_entries() {
        let map_form = compile(json!({"$or": {"status": "draft", "featured": true}})).unwrap();
        let list_form = compile(json!({"$or": [{"status": "draft"}, {"featured": true}]})).unwrap();
        assert_eq!(map_form, list_form);
    }

    #[test]
    fn test_range_in_or_scope_stays_together() {
        let compiled = compile(json!({
            "$or": [{"id": {"$gt": 2, "$lte": 5}}, {"featured": true}]
        }))
        .unwrap();

        let CompiledPredicate::Group { predicates, .. } = &compiled.predicates[0] else {
            panic!("expected a group");
        };
        assert_eq!(
            predicates[0],
            CompiledPredicate::Group {
                connective: Connective::Or,
                inner: Connective::And,
                predicates: vec![
                    cmp(Connective::And, "id", Comparator::Gt, Value::Int(2)),
                    cmp(Connective::And, "id", Comparator::LtEq, Value::Int(5)),
                ],
            }
        );
    }

    #[test]
    fn test_in_wraps_scalar_operand() {
        let compiled = compile(json!({"status": {"$in": "draft"}, "id": {"$nin": [1, 2]}})).unwrap();
        assert_eq!(
            compiled.predicates,
            vec![
                cmp(Connective::And, "status", Comparator::In, Value::from(vec!["draft"])),
                cmp(Connective::And, "id", Comparator::NotIn, Value::from(vec![1, 2])),
            ]
        );
    }

    #[test]
    fn test_null_inside_list_becomes_null_test() {
        let compiled = compile(json!({
            "image": {"$nin": ["first.png", null]},
            "status": {"$in": [null, "draft"]},
            "author_id": {"$in": [null]}
        }))
        .unwrap();

        let null_test = |connective, column: &str, negated| CompiledPredicate::NullTest {
            connective,
            column: ColumnRef::new("posts", column),
            negated,
        };
        assert_eq!(
            compiled.predicates,
            vec![
                CompiledPredicate::Group {
                    connective: Connective::And,
                    inner: Connective::And,
                    predicates: vec![
                        cmp(Connective::And, "image", Comparator::NotIn, Value::from(vec!["first.png"])),
                        null_test(Connective::And, "image", true),
                    ],
                },
                CompiledPredicate::Group {
                    connective: Connective::And,
                    inner: Connective::Or,
                    predicates: vec![
                        cmp(Connective::Or, "status", Comparator::In, Value::from(vec!["draft"])),
                        null_test(Connective::Or, "status", false),
                    ],
                },
                null_test(Connective::And, "author_id", false),
            ]
        );
        assert!(compiled.diagnostics.is_empty());
    }

    #[test]
    fn test_null_inside_relation_list_is_malformed() {
        let compiled = compile(json!({"tags.slug": {"$nin": ["animal", null]}})).unwrap();
        assert!(compiled.predicates.is_empty());
        assert_eq!(compiled.diagnostics.len(), 1);
        assert_eq!(compiled.diagnostics[0].path, "tags.slug.$nin");

        let err = compile_with(
            CompileOptions::default().strict(true),
            json!({"tags.slug": {"$in": [null]}}),
        )
        .unwrap_err();
        assert!(matches!(err, FilterError::MalformedFilter { .. }));
    }

    #[test]
    fn test_empty_groups_are_dropped() {
        let compiled = compile(json!({"$and": [], "$or": {}, "featured": false})).unwrap();
        assert_eq!(
            compiled.predicates,
            vec![cmp(Connective::And, "featured", Comparator::Eq, Value::Boolean(false))]
        );
    }

    #[test]
    fn test_relation_fan_out_gives_independent_subqueries() {
        let compiled = compile(json!({
            "$and": [{"tags.slug": "animal"}, {"tags.slug": "classic"}]
        }))
        .unwrap();

        let CompiledPredicate::Group { predicates, .. } = &compiled.predicates[0] else {
            panic!("expected a group");
        };
        let subqueries = subqueries(predicates);
        assert_eq!(subqueries.len(), 2);
        for ((membership, subquery), slug) in subqueries.into_iter().zip(["animal", "classic"]) {
            assert_eq!(membership, Membership::In);
            assert_eq!(
                subquery.filters,
                vec![SubqueryFilter::Comparison {
                    column: ColumnRef::new("tags", "slug"),
                    comparator: Comparator::Eq,
                    value: Value::from(slug),
                }]
            );
        }
    }

    #[test]
    fn test_relation_negation_uses_not_in() {
        let compiled = compile(json!({"tags.slug": {"$ne": "animal"}})).unwrap();
        let subqueries = subqueries(&compiled.predicates);
        assert_eq!(subqueries.len(), 1);
        assert_eq!(subqueries[0].0, Membership::NotIn);
        assert!(matches!(
            &compiled.predicates[0],
            CompiledPredicate::Subquery { base_column, .. } if *base_column == ColumnRef::new("posts", "id")
        ));
    }

    #[test]
    fn test_primary_tag_qualifier_shares_subquery() {
        let compiled = compile(json!({
            "$and": [{"tags.slug": "animal"}, {"posts_tags.sort_order": 0}]
        }))
        .unwrap();

        let CompiledPredicate::Group { predicates, .. } = &compiled.predicates[0] else {
            panic!("expected a group");
        };
        let subqueries = subqueries(predicates);
        assert_eq!(subqueries.len(), 1);
        let columns: Vec<_> = subqueries[0].1.filters.iter().map(|f| f.column().to_string()).collect();
        assert_eq!(columns, vec!["tags.slug", "posts_tags.sort_order"]);
    }

    #[test]
    fn test_relation_predicates_follow_local_ones() {
        let compiled = compile(json!({"tags.slug": "animal", "featured": true})).unwrap();
        assert_eq!(
            compiled.predicates[0],
            cmp(Connective::And, "featured", Comparator::Eq, Value::Boolean(true))
        );
        assert!(matches!(compiled.predicates[1], CompiledPredicate::Subquery { .. }));
    }

    #[test]
    fn test_relation_buckets_do_not_leak_between_siblings() {
        let compiled = compile(json!({
            "$or": [{"tags.slug": "animal"}],
            "$and": [{"tags.slug": "classic"}]
        }))
        .unwrap();

        assert_eq!(compiled.predicates.len(), 2);
        for predicate in &compiled.predicates {
            let CompiledPredicate::Group { predicates, .. } = predicate else {
                panic!("expected a group");
            };
            assert_eq!(subqueries(predicates).len(), 1);
        }
    }

    #[test]
    fn test_compilation_is_idempotent() {
        let filter = FilterNode::from_json(json!({
            "$or": [
                {"tags.slug": "animal"},
                {"posts_tags.sort_order": 0},
                {"tags.visibility": "internal"}
            ],
            "featured": true
        }))
        .unwrap();
        let registry = registry();
        let compiler = Compiler::default();

        let first = compiler.compile_tree("posts", &registry, &filter).unwrap();
        let second = compiler.compile_tree("posts", &registry, &filter).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_relation_fails() {
        let err = compile(json!({"featured": true, "nosuchrelation.x": 1})).unwrap_err();
        assert!(matches!(
            err,
            FilterError::UnknownRelation { ref relation, ref field }
                if relation == "nosuchrelation" && field == "nosuchrelation.x"
        ));
    }

    #[test]
    #[traced_test]
    fn test_lenient_mode_skips_unknown_operators() {
        let compiled = compile(json!({"status": {"$like": "dr%", "$ne": "draft"}})).unwrap();

        assert_eq!(
            compiled.predicates,
            vec![cmp(Connective::And, "status", Comparator::NotEq, Value::from("draft"))]
        );
        assert_eq!(
            compiled.diagnostics,
            vec![Diagnostic::unrecognized_operator("status.$like", "$like")]
        );
        assert!(logs_contain("Skipping clause"));
    }

    #[test]
    fn test_strict_mode_rejects_unknown_operators() {
        let err = compile_with(
            CompileOptions::default().strict(true),
            json!({"status": {"$like": "dr%"}}),
        )
        .unwrap_err();
        assert!(matches!(err, FilterError::UnrecognizedOperator { ref operator, .. } if operator == "$like"));
    }

    #[test]
    fn test_malformed_values() {
        let filter = json!({
            "$or": "published",
            "$and": [1, {"featured": true}],
            "id": [1, 2],
            "title": {"$eq": ["a", "b"]},
            "published_at": {"$gt": null},
            "status": {}
        });

        let compiled = compile(filter.clone()).unwrap();
        let paths: Vec<_> = compiled.diagnostics.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["$or", "$and[0]", "id", "title.$eq", "published_at.$gt", "status"]
        );
        assert_eq!(compiled.predicates.len(), 1);

        let err = compile_with(CompileOptions::default().strict(true), filter).unwrap_err();
        assert!(matches!(err, FilterError::MalformedFilter { ref path, .. } if path == "$or"));
    }

    #[test]
    fn test_operator_in_field_position_is_unrecognized() {
        let compiled = compile(json!({"$eq": 1, "$where": "1 = 1"})).unwrap();
        assert!(compiled.predicates.is_empty());
        assert_eq!(compiled.diagnostics.len(), 2);
    }

    #[test]
    fn test_custom_marker() {
        let compiled = compile_with(
            CompileOptions::default().with_marker('@'),
            json!({"@or": [{"status": {"@ne": "draft"}}, {"featured": true}]}),
        )
        .unwrap();

        assert!(compiled.diagnostics.is_empty());
        let CompiledPredicate::Group { predicates, .. } = &compiled.predicates[0] else {
            panic!("expected a group");
        };
        assert_eq!(
            predicates[0],
            cmp(Connective::Or, "status", Comparator::NotEq, Value::from("draft"))
        );
    }

    #[test]
    fn test_custom_base_key() {
        let registry = RelationRegistry::new()
            .with(
                "tags",
                RelationDescriptor::many_to_many("tags", "posts_tags", "post_uuid", "tag_id"),
            )
            .unwrap();
        let filter = FilterNode::from_json(json!({"tags.slug": "animal"})).unwrap();
        let compiled = Compiler::new(CompileOptions::default().with_base_key("uuid"))
            .compile_tree("posts", &registry, &filter)
            .unwrap();

        assert!(matches!(
            &compiled.predicates[0],
            CompiledPredicate::Subquery { base_column, .. } if *base_column == ColumnRef::new("posts", "uuid")
        ));
    }
}
