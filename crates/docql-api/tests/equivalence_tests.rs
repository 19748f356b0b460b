// Text queries and builder chains must compile to equal query objects

use docql::{
    delete_all, select, select_all, DeleteQueryParser, PassThroughObserver, SelectQuery,
    SelectQueryParser,
};

fn compile(text: &str) -> SelectQuery {
    let (query, params) = SelectQueryParser::new()
        .compile(text, &PassThroughObserver)
        .unwrap();
    assert!(params.is_empty());
    query
}

#[test]
fn test_equals_integer() {
    let expected = select_all().from("God").where_("age").eq(10).build().unwrap();
    assert_eq!(compile("FROM God WHERE age = 10"), expected);
}

#[test]
fn test_delete_greater_than_float() {
    let (query, _) = DeleteQueryParser::new()
        .compile("DELETE FROM God WHERE stamina > 10.23", &PassThroughObserver)
        .unwrap();
    let expected = delete_all()
        .from("God")
        .where_("stamina")
        .gt(10.23)
        .build()
        .unwrap();
    assert_eq!(query, expected);
}

#[test]
fn test_and_of_two_fields() {
    let expected = select_all()
        .from("God")
        .where_("name")
        .eq("Ada")
        .and("age")
        .eq(20)
        .build()
        .unwrap();
    assert_eq!(compile(r#"FROM God WHERE name = "Ada" AND age = 20"#), expected);
}

#[test]
fn test_or_chain_stays_flat() {
    let expected = select_all()
        .from("God")
        .where_("age")
        .lt(10)
        .or("age")
        .gte(100)
        .or("name")
        .like("A%")
        .build()
        .unwrap();
    assert_eq!(
        compile("FROM God WHERE age < 10 OR age >= 100 OR name LIKE 'A%'"),
        expected
    );
}

#[test]
fn test_negated_comparison() {
    let expected = select_all()
        .from("God")
        .where_("age")
        .not()
        .eq(10)
        .build()
        .unwrap();
    assert_eq!(compile("FROM God WHERE NOT age = 10"), expected);
}

#[test]
fn test_in_and_between() {
    let expected = select_all()
        .from("God")
        .where_("name")
        .in_(["Ada", "Diana"])
        .and("age")
        .between(1, 100)
        .build()
        .unwrap();
    assert_eq!(
        compile("FROM God WHERE name IN ('Ada', 'Diana') AND age BETWEEN 1 AND 100"),
        expected
    );
}

#[test]
fn test_projection_order_skip_limit() {
    let expected = select(["name", "age"])
        .from("God")
        .order_by("age")
        .desc()
        .skip(2)
        .limit(5)
        .build()
        .unwrap();
    assert_eq!(
        compile("SELECT name, age FROM God ORDER BY age DESC SKIP 2 LIMIT 5"),
        expected
    );
}
