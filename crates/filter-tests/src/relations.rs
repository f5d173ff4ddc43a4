#[cfg(test)]
mod tests {
    use crate::{
        registry,
        utils::{post_count, post_ids, render},
    };
    use filter::{Compiler, FilterError, FilterNode};
    use serde_json::json;

    #[test]
    fn test_equal_on_tag_slug() {
        assert_eq!(post_ids(json!({"tags.slug": "animal"})), vec![1, 2, 5]);
    }

    #[test]
    fn test_equal_on_tag_visibility() {
        assert_eq!(post_ids(json!({"tags.visibility": "internal"})), vec![7]);
    }

    #[test]
    fn test_not_equal_keeps_posts_without_tags() {
        let ids = post_ids(json!({"tags.slug": {"$ne": "animal"}}));
        assert_eq!(ids, vec![3, 4, 6, 7, 8]);
        assert!(ids.contains(&8));
    }

    #[test]
    fn test_not_equal_on_visibility() {
        assert_eq!(
            post_ids(json!({"tags.visibility": {"$ne": "public"}})),
            vec![7, 8]
        );
    }

    #[test]
    fn test_and_on_same_column_needs_both_tags() {
        let filter = json!({"$and": [{"tags.slug": "animal"}, {"tags.slug": "classic"}]});
        let (sql, _, _) = render(filter.clone());

        assert_eq!(sql.matches("IN (SELECT").count(), 2);
        assert_eq!(post_ids(filter), vec![1, 2]);
    }

    #[test]
    fn test_and_on_different_columns_same_tag() {
        let filter = json!({
            "$and": [{"tags.slug": "hash-internal"}, {"tags.visibility": "internal"}]
        });
        assert_eq!(post_ids(filter), vec![7]);
    }

    #[test]
    fn test_equal_and_not_in() {
        let filter = json!({
            "$and": [{"tags.slug": "animal"}, {"tags.slug": {"$nin": ["classic"]}}]
        });
        assert_eq!(post_ids(filter), vec![5]);
    }

    #[test]
    fn test_primary_tag() {
        let filter = json!({
            "$and": [{"tags.slug": "animal"}, {"posts_tags.sort_order": 0}]
        });
        let (sql, _, _) = render(filter.clone());

        assert_eq!(sql.matches("IN (SELECT").count(), 1);
        assert_eq!(post_ids(filter), vec![5]);
    }

    #[test]
    fn test_two_negations() {
        let filter = json!({
            "$and": [{"tags.slug": {"$ne": "animal"}}, {"tags.slug": {"$ne": "cgi"}}]
        });
        assert_eq!(post_ids(filter), vec![4, 6, 7, 8]);
    }

    #[test]
    fn test_positive_and_negated_on_same_relation() {
        let filter = json!({
            "$and": [{"tags.visibility": "public"}, {"tags.slug": {"$ne": "classic"}}]
        });
        assert_eq!(post_ids(filter), vec![5, 6]);
    }

    #[test]
    fn test_or_over_relation_and_join_table() {
        let filter = json!({
            "$or": [
                {"tags.slug": "animal"},
                {"posts_tags.sort_order": 0},
                {"tags.visibility": "internal"}
            ]
        });
        assert_eq!(post_count(filter), 7);
    }

    #[test]
    fn test_and_order_does_not_change_result() {
        let elements = [
            json!({"tags.slug": {"$ne": "cgi"}}),
            json!({"posts_tags.sort_order": 0}),
            json!({"tags.slug": "classic"}),
        ];
        let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];

        for order in orders {
            let filter = json!({"$and": order.map(|index| elements[index].clone())});
            assert_eq!(post_ids(filter), vec![2, 4], "order {order:?}");
        }
    }

    #[test]
    fn test_or_of_primary_tag_group_and_visibility() {
        let filter = json!({
            "$or": [
                {"$and": [{"tags.slug": "animal"}, {"posts_tags.sort_order": 0}]},
                {"tags.visibility": "internal"}
            ]
        });
        assert_eq!(post_ids(filter), vec![5, 7]);
    }

    #[test]
    fn test_or_of_primary_tag_group_visibility_and_author() {
        let filter = json!({
            "$or": [
                {"$and": [{"tags.slug": "animal"}, {"posts_tags.sort_order": 0}]},
                {"tags.visibility": "internal"},
                {"author_id": 1}
            ]
        });
        assert_eq!(post_ids(filter), vec![1, 2, 5, 7]);
    }

    #[test]
    fn test_in_on_tag_slug() {
        assert_eq!(
            post_ids(json!({"tags.slug": {"$in": ["animal", "cgi"]}})),
            vec![1, 2, 3, 5]
        );
    }

    #[test]
    fn test_in_on_tag_id() {
        assert_eq!(post_ids(json!({"tags.id": {"$in": [2, 3]}})), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_not_in_mixed_with_local_column() {
        let filter = json!({
            "$and": [{"tags.slug": {"$nin": ["classic", "animal"]}}, {"featured": true}]
        });
        assert_eq!(post_ids(filter), vec![6, 7, 8]);
    }

    #[test]
    fn test_not_primary_tag_mixed_with_local_column() {
        let filter = json!({
            "$and": [
                {"$and": [{"tags.slug": {"$ne": "classic"}}, {"posts_tags.sort_order": 0}]},
                {"featured": true}
            ]
        });
        let ids = post_ids(filter);
        assert_eq!(ids, vec![6, 7, 8]);
        assert!(ids.contains(&8));
    }

    #[test]
    fn test_relation_inside_or_with_local_column() {
        let filter = json!({"$or": [{"tags.slug": "cgi"}, {"status": "draft"}]});
        assert_eq!(post_ids(filter), vec![1, 3, 5]);
    }

    #[test]
    fn test_one_to_many_equal() {
        assert_eq!(post_ids(json!({"comments.status": "approved"})), vec![1, 2]);
    }

    #[test]
    fn test_one_to_many_fan_out() {
        let filter = json!({
            "$and": [{"comments.status": "approved"}, {"comments.status": "spam"}]
        });
        assert_eq!(post_ids(filter), vec![1]);
    }

    #[test]
    fn test_one_to_many_negation_ignores_orphans() {
        assert_eq!(post_count(json!({"comments.status": {"$ne": "spam"}})), 7);
    }

    #[test]
    fn test_unknown_relation_fails() {
        let filter = FilterNode::from_json(json!({"authors.slug": "joe"})).unwrap();
        let err = Compiler::default()
            .compile_tree("posts", &registry(), &filter)
            .unwrap_err();
        assert!(matches!(err, FilterError::UnknownRelation { ref relation, .. } if relation == "authors"));
    }
}
