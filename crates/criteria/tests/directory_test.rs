#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Directory compiler integration tests.

use pretty_assertions::assert_eq;
use sift_criteria::prelude::*;
use sift_criteria::{CriteriaError, DirectoryCriteria, DirectoryMapping, SearchScope};
use sift_test_utils::{assert, group_mapping};

fn groups() -> DirectoryCriteria {
    DirectoryCriteria::new(&group_mapping()).unwrap()
}

// -------------------------------------------------------------------------
// Filters
// -------------------------------------------------------------------------

#[test]
fn group_name_wildcard_search() {
    let mut criteria = groups();
    criteria.add(eq("name", "testgroup*")).unwrap();

    let query = criteria.compile().unwrap();
    assert_eq!(
        query.filter,
        "(&(&(objectclass=groupOfUniqueNames)(objectclass=top))(cn=testgroup*))"
    );
    assert_eq!(query.search_base, "ou=groups,dc=example,dc=com");
    assert_eq!(query.search_scope, SearchScope::Subtree);
}

#[test]
fn no_restrictions_yields_object_class_filter() {
    let query = groups().compile().unwrap();
    assert_eq!(
        query.filter,
        "(&(objectclass=groupOfUniqueNames)(objectclass=top))"
    );
}

#[test]
fn or_wraps_everything_accumulated() {
    let mut criteria = groups();
    criteria
        .add(eq("name", "admins"))
        .unwrap()
        .add(or(eq("name", "operators")))
        .unwrap();
    assert_eq!(
        criteria.filter(),
        "(|(&(&(objectclass=groupOfUniqueNames)(objectclass=top))(cn=admins))(cn=operators))"
    );
}

#[test]
fn enclosure_groups_nest() {
    let mut criteria = groups();
    criteria
        .add(eq("name", "staff"))
        .unwrap()
        .add(and(begin_with(eq("description", "east"))))
        .unwrap()
        .add(end_with(or(eq("description", "west"))))
        .unwrap();

    let filter = criteria.compile().unwrap().filter;
    assert_eq!(
        filter,
        "(&(&(&(objectclass=groupOfUniqueNames)(objectclass=top))(cn=staff))\
         (|(description=east)(description=west)))"
    );
    assert::balanced(&filter);
}

#[test]
fn is_in_becomes_disjunction_group() {
    let mut criteria = groups();
    criteria
        .add_all(is_in("name", ["a", "b"]).unwrap())
        .unwrap();
    assert_eq!(
        criteria.filter(),
        "(&(&(objectclass=groupOfUniqueNames)(objectclass=top))(|(cn=a)(cn=b)))"
    );
}

#[test]
fn not_equal_and_greater_or_equal() {
    let mut criteria = groups();
    criteria
        .add(ne("name", "guests"))
        .unwrap()
        .add(and(ge("description", "m")))
        .unwrap();
    let filter = criteria.filter();
    assert::contains(&filter, "(!cn=guests)");
    assert::contains(&filter, "(description>=m)");
}

#[test]
fn less_or_equal_renders_as_greater_or_equal() {
    let mut criteria = groups();
    criteria.add(le("description", "m")).unwrap();
    let filter = criteria.filter();
    assert::contains(&filter, "(description>=m)");
    assert::not_contains(&filter, "<=");
}

#[test]
fn values_are_escaped() {
    let mut criteria = groups();
    criteria.add(eq("name", "R&D (west)")).unwrap();
    assert::contains(&criteria.filter(), r"(cn=R&D \28west\29)");
}

#[test]
fn boolean_and_numeric_literals() {
    let mut criteria = groups();
    criteria
        .add(eq("members", true))
        .unwrap()
        .add(and(eq("description", 7)))
        .unwrap();
    let filter = criteria.filter();
    assert::contains(&filter, "(uniqueMember=TRUE)");
    assert::contains(&filter, "(description=7)");
}

// -------------------------------------------------------------------------
// Rejections
// -------------------------------------------------------------------------

#[test]
fn unsupported_comparisons() {
    for criterion in [
        like("name", "a%"),
        gt("name", "a"),
        lt("name", "a"),
        is_null("name"),
        member_of("members", "x"),
    ] {
        let mut criteria = groups();
        let err = criteria.add(criterion).unwrap_err();
        assert!(matches!(err, CriteriaError::UnsupportedOperation(_)), "{err}");
        assert!(!criteria.restriction_exists());
    }
}

#[test]
fn unmapped_property_rejected() {
    let mut criteria = groups();
    let err = criteria.add(eq("owner", "bob")).unwrap_err();
    assert!(matches!(err, CriteriaError::InvalidArgument(_)));
}

#[test]
fn ordering_is_unsupported() {
    let mut criteria = groups();
    assert!(matches!(
        criteria.add_order(asc("name")),
        Err(CriteriaError::UnsupportedOperation(_))
    ));
    assert!(matches!(
        criteria.add_orders(vec![asc("name"), desc("description")]),
        Err(CriteriaError::UnsupportedOperation(_))
    ));
    assert!(!criteria.order_exists());
}

#[test]
fn open_group_fails_compile() {
    let mut criteria = groups();
    criteria.add(begin_with(eq("name", "a"))).unwrap();
    assert!(matches!(
        criteria.compile(),
        Err(CriteriaError::InvalidArgument(_))
    ));
}

#[test]
fn failed_add_all_leaves_filter_unchanged() {
    let mut criteria = groups();
    criteria.add(eq("name", "a")).unwrap();
    let before = criteria.filter();

    let result = criteria.add_all(vec![or(eq("name", "b")), or(like("name", "c%"))]);
    assert!(result.is_err());
    assert_eq!(criteria.filter(), before);
}

#[test]
fn incomplete_mappings_rejected() {
    let without_scope = DirectoryMapping::new()
        .with_object_class("person")
        .with_attribute("name", "cn")
        .with_search_base("dc=example,dc=com");
    assert!(DirectoryCriteria::new(&without_scope).is_err());

    let without_classes = group_mapping();
    let without_classes = DirectoryMapping {
        object_classes: Vec::new(),
        ..without_classes
    };
    assert!(matches!(
        DirectoryCriteria::new(&without_classes),
        Err(CriteriaError::InvalidArgument(_))
    ));
}

// -------------------------------------------------------------------------
// Mapping files
// -------------------------------------------------------------------------

#[test]
fn mapping_loaded_from_toml_matches_builder() {
    let mapping = DirectoryMapping::from_toml_str(
        r#"
search_base = "ou=groups,dc=example,dc=com"
search_scope = "subtree"
object_classes = ["top", "groupOfUniqueNames"]

[attributes]
name = "cn"
description = "description"
members = "uniqueMember"
"#,
    )
    .unwrap();
    assert_eq!(mapping, group_mapping());
}

#[test]
fn compiled_query_serializes_scope_lowercase() {
    let json = serde_json::to_value(groups().compile().unwrap()).unwrap();
    assert_eq!(json["search_scope"], "subtree");
    assert_eq!(json["search_base"], "ou=groups,dc=example,dc=com");
}
