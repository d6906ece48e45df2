//! Sift test utilities.
//!
//! Fixture schemas, directory mappings and assertion helpers shared by the
//! integration tests.

use sift_criteria::{
    DirectoryMapping, EntityMeta, Parameters, RelationalCriteria, Schema, SearchScope,
};

/// Company / department / employee / address schema.
///
/// ```text
/// Company    --departments(many)--> Department --employees(many)--> Employee
///     \--headquarters(one)--> Address          <--department(one)--/   |
///                                  ^---------------address(one)--------/
/// ```
///
/// The back references make the graph cyclic.
pub fn company_schema() -> Schema {
    Schema::new()
        .with_entity(
            EntityMeta::new("com.acme.Company")
                .to_many("departments", "Department")
                .to_one("headquarters", "Address"),
        )
        .with_entity(
            EntityMeta::new("com.acme.Department")
                .to_one("company", "Company")
                .to_many("employees", "Employee"),
        )
        .with_entity(
            EntityMeta::new("com.acme.Employee")
                .to_one("department", "Department")
                .to_one("address", "Address"),
        )
        .with_entity(EntityMeta::new("com.acme.Address"))
}

/// The same schema as TOML, for loader tests.
pub const COMPANY_SCHEMA_TOML: &str = r#"
[[entity]]
name = "com.acme.Company"

[[entity.relation]]
name = "departments"
target = "Department"
cardinality = "many"

[[entity.relation]]
name = "headquarters"
target = "Address"
cardinality = "one"

[[entity]]
name = "com.acme.Department"

[[entity.relation]]
name = "company"
target = "Company"
cardinality = "one"

[[entity.relation]]
name = "employees"
target = "Employee"
cardinality = "many"

[[entity]]
name = "com.acme.Employee"

[[entity.relation]]
name = "department"
target = "Department"
cardinality = "one"

[[entity.relation]]
name = "address"
target = "Address"
cardinality = "one"

[[entity]]
name = "com.acme.Address"
"#;

/// Relational criteria for `entity` in [`company_schema`], panicking on
/// failure.
pub fn relational(entity: &str) -> RelationalCriteria {
    match RelationalCriteria::new(entity, &company_schema()) {
        Ok(criteria) => criteria,
        Err(e) => panic!("fixture entity {entity} rejected: {e}"),
    }
}

/// Group search mapping: `{top, groupOfUniqueNames}` under a subtree scope.
pub fn group_mapping() -> DirectoryMapping {
    DirectoryMapping::new()
        .with_object_class("top")
        .with_object_class("groupOfUniqueNames")
        .with_attribute("name", "cn")
        .with_attribute("description", "description")
        .with_attribute("members", "uniqueMember")
        .with_search_base("ou=groups,dc=example,dc=com")
        .with_search_scope(SearchScope::Subtree)
}

/// Assertion helpers for compiled output.
pub mod assert {
    use super::Parameters;

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that parentheses in `text` are balanced and never close early.
    pub fn balanced(text: &str) {
        let mut depth: i64 = 0;
        for c in text.chars() {
            match c {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
            assert!(depth >= 0, "unbalanced ')' in: {text}");
        }
        assert_eq!(depth, 0, "unclosed '(' in: {text}");
    }

    /// Assert that parameters are named `param1..paramN` in order and that
    /// each name occurs in `ql` as `:paramN`.
    pub fn gapless_parameters(ql: &str, parameters: &Parameters) {
        for (i, (name, _)) in parameters.iter().enumerate() {
            let expected = format!("param{}", i + 1);
            assert_eq!(name, expected, "parameter {i} misnamed");
            let placeholder = format!(":{name}");
            let occurrences = ql
                .match_indices(&placeholder)
                .filter(|(at, _)| {
                    !ql[at + placeholder.len()..]
                        .starts_with(|c: char| c.is_ascii_digit())
                })
                .count();
            assert_eq!(occurrences, 1, "{placeholder} should occur once in: {ql}");
        }
    }
}

/// Criteria document builders for testing.
pub mod documents {
    use serde_json::json;

    /// `city = Phoenix and state = AZ`, ordered by city.
    pub fn address_document() -> serde_json::Value {
        json!({
            "restrictions": [
                { "operand": "city", "comparison": "equal", "value": "Phoenix" },
                { "operand": "state", "comparison": "equal", "value": "AZ", "logical": "and" }
            ],
            "orders": [
                { "operand": "city", "order": "asc" }
            ]
        })
    }

    /// Group name wildcard search.
    pub fn group_document() -> serde_json::Value {
        json!({
            "restrictions": [
                { "operand": "name", "comparison": "equal", "value": "testgroup*" }
            ]
        })
    }
}
