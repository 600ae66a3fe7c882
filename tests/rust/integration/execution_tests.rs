use std::sync::Arc;

use cypher_builder::{
    BuilderConfig, EngineError, Parameters, QueryBuilder, QueryBuilderError, SortDirection,
};
use serde_json::json;

use super::mock_executor::{lisa_parents, params, row, MockEngine};

const LISA_PARENTS_QUERY: &str =
    "START lisa=node:SIMPSONS({search}) MATCH (lisa)-[:CHILD_OF]->(parent) RETURN parent";
const LISA_PARENTS_COUNT: &str = "START lisa=node:SIMPSONS({search}) MATCH (lisa)-[:CHILD_OF]->(parent) WITH parent RETURN count(*) AS total";

fn lisa_parents_builder(engine: MockEngine) -> QueryBuilder {
    let mut query = QueryBuilder::new(Arc::new(engine));
    query.start_at([("lisa", "node:SIMPSONS({search})")]);
    query.match_("(lisa)-[:CHILD_OF]->(parent)").return_("parent");
    query
}

#[tokio::test]
async fn test_execute_simple_query() {
    let mut engine = MockEngine::new();
    engine
        .expect_execute_query()
        .withf(|query, params| query == "START n=node:SIMPSONS(\"*: *\") RETURN n" && params.is_empty())
        .times(1)
        .returning(|_, _| Ok(vec![row(json!({"n": {"id": 0}}))]));

    let mut query = QueryBuilder::new(Arc::new(engine));
    query.start_at([("n", "node:SIMPSONS(\"*: *\")")]);
    query.returns("n");

    let rows = query.execute(Parameters::new()).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_find_lisas_parents_and_count() {
    let mut engine = MockEngine::new();
    engine
        .expect_execute_query()
        .withf(|query, params| {
            query == LISA_PARENTS_QUERY && params.get("search") == Some(&json!("name: Lisa"))
        })
        .times(1)
        .returning(|_, _| Ok(lisa_parents()));
    engine
        .expect_count_query()
        .withf(|query, params| {
            query == LISA_PARENTS_COUNT && params.get("search") == Some(&json!("name: Lisa"))
        })
        .times(1)
        .returning(|_, _| Ok(2));

    let query = lisa_parents_builder(engine);
    let search = params(&[("search", json!("name: Lisa"))]);

    let results = query.execute(search.clone()).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["parent"]["name"], json!("Homer"));

    let total = query.get_count(search).await.unwrap();
    assert_eq!(total, 2);
}

#[tokio::test]
async fn test_delete_marge() {
    let mut engine = MockEngine::new();
    engine
        .expect_execute_query()
        .withf(|query, params| {
            query == "START marge=node:SIMPSONS({search}) MATCH marge-[r]-x DELETE r, marge"
                && params.get("search") == Some(&json!("name: Marge"))
        })
        .times(1)
        .returning(|_, _| Ok(Vec::new()));

    let mut query = QueryBuilder::new(Arc::new(engine));
    query.start_at([("marge", "node:SIMPSONS({search})")]);
    query.match_("marge-[r]-x").delete("r, marge");

    let rows = query
        .execute(params(&[("search", json!("name: Marge"))]))
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_missing_parameter_is_rejected_before_dispatch() {
    let mut engine = MockEngine::new();
    engine.expect_execute_query().never();
    engine.expect_count_query().never();

    let query = lisa_parents_builder(engine);

    let err = query.execute(Parameters::new()).await.unwrap_err();
    assert!(matches!(err, QueryBuilderError::MissingParameter(ref name) if name == "search"));

    let err = query.get_count(Parameters::new()).await.unwrap_err();
    assert!(matches!(err, QueryBuilderError::MissingParameter(_)));
}

#[tokio::test]
async fn test_lenient_mode_leaves_binding_to_engine() {
    let mut engine = MockEngine::new();
    engine
        .expect_execute_query()
        .times(1)
        .returning(|_, _| Err(EngineError::new("Expected a parameter named search")));

    let config = BuilderConfig {
        strict_parameters: false,
        ..Default::default()
    };
    let query = lisa_parents_builder(engine).with_config(config);

    let err = query.execute(Parameters::new()).await.unwrap_err();
    assert_eq!(
        err.as_engine_error().map(|e| e.message()),
        Some("Expected a parameter named search")
    );
}

#[tokio::test]
async fn test_engine_error_passes_through_unchanged() {
    let mut engine = MockEngine::new();
    engine
        .expect_execute_query()
        .times(1)
        .returning(|_, _| Err(EngineError::new("Invalid input 'X': expected 'RETURN'")));

    let mut query = QueryBuilder::new(Arc::new(engine));
    query.match_("(n)").where_("X");

    let err = query.execute(Parameters::new()).await.unwrap_err();
    assert!(matches!(err, QueryBuilderError::Engine(_)));
    assert_eq!(err.to_string(), "Invalid input 'X': expected 'RETURN'");
}

#[tokio::test]
async fn test_empty_builder_dispatches_empty_query() {
    let mut engine = MockEngine::new();
    engine
        .expect_execute_query()
        .withf(|query, _| query.is_empty())
        .times(1)
        .returning(|_, _| Err(EngineError::new("Unexpected end of input")));

    let query = QueryBuilder::new(Arc::new(engine));
    let err = query.execute(Parameters::new()).await.unwrap_err();
    assert!(err.as_engine_error().is_some());
}

#[tokio::test]
async fn test_builder_defaults_merge_with_call_parameters() {
    let mut engine = MockEngine::new();
    engine
        .expect_execute_query()
        .withf(|_, params| {
            params.get("search") == Some(&json!("name: Bart"))
                && params.get("limit") == Some(&json!(1))
        })
        .times(1)
        .returning(|_, _| Ok(Vec::new()));

    let mut query = lisa_parents_builder(engine);
    query.param("search", "name: Lisa").param("limit", 1);

    query
        .execute(params(&[("search", json!("name: Bart"))]))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_detached_builder_cannot_execute() {
    let mut query = QueryBuilder::detached();
    query.match_("(n)").returns("n");
    assert!(matches!(
        query.execute(Parameters::new()).await,
        Err(QueryBuilderError::NoExecutor)
    ));
    assert!(matches!(
        query.get_count(Parameters::new()).await,
        Err(QueryBuilderError::NoExecutor)
    ));
}

#[tokio::test]
async fn test_execute_paged_returns_rows_and_unpaged_total() {
    let mut engine = MockEngine::new();
    engine
        .expect_execute_query()
        .withf(|query, _| query.ends_with("RETURN s ORDER BY s.name ASC SKIP 0 LIMIT 2"))
        .times(1)
        .returning(|_, _| {
            Ok(vec![
                row(json!({"s": {"name": "Bart"}})),
                row(json!({"s": {"name": "Lisa"}})),
            ])
        });
    engine
        .expect_count_query()
        .withf(|query, _| {
            query == "MATCH (s)-[:CHILD_OF]->(p) WITH DISTINCT s WITH s RETURN count(*) AS total"
        })
        .times(1)
        .returning(|_, _| Ok(3));

    let mut query = QueryBuilder::new(Arc::new(engine));
    query.match_("(s)-[:CHILD_OF]->(p)").returns("DISTINCT s");
    query
        .with()
        .returns("s")
        .order_by("s.name", SortDirection::Asc)
        .limit(0, 2);

    let page = query.execute_paged(Parameters::new()).await.unwrap();
    assert_eq!(page.rows.len(), 2);
    assert_eq!(page.total, 3);
}

#[tokio::test]
async fn test_count_matches_distinct_rows() {
    // Lisa, Bart and Maggie share the same two parents
    let mut engine = MockEngine::new();
    engine
        .expect_execute_query()
        .withf(|query, _| query == "MATCH (c)-[:CHILD_OF]->(parent) RETURN DISTINCT parent")
        .times(1)
        .returning(|_, _| Ok(lisa_parents()));
    engine
        .expect_count_query()
        .withf(|query, _| {
            query
                == "MATCH (c)-[:CHILD_OF]->(parent) WITH DISTINCT parent RETURN count(*) AS total"
        })
        .times(1)
        .returning(|_, _| Ok(2));

    let mut query = QueryBuilder::new(Arc::new(engine));
    query
        .match_("(c)-[:CHILD_OF]->(parent)")
        .returns("DISTINCT parent");

    let page = query.execute_paged(Parameters::new()).await.unwrap();
    assert_eq!(page.rows.len() as u64, page.total);
}

#[tokio::test]
async fn test_paged_delete_runs_delete_once() {
    let mut engine = MockEngine::new();
    engine
        .expect_execute_query()
        .withf(|query, _| query.contains("DELETE r, marge"))
        .times(1)
        .returning(|_, _| Ok(Vec::new()));
    engine
        .expect_count_query()
        .withf(|query, _| {
            query == "START marge=node:SIMPSONS({search}) MATCH marge-[r]-x RETURN count(*) AS total"
        })
        .times(1)
        .returning(|_, _| Ok(0));

    let mut query = QueryBuilder::new(Arc::new(engine));
    query.start_at([("marge", "node:SIMPSONS({search})")]);
    query.match_("marge-[r]-x").delete("r, marge");

    let page = query
        .execute_paged(params(&[("search", json!("name: Marge"))]))
        .await
        .unwrap();
    assert!(page.rows.is_empty());
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_builders_share_one_executor() {
    let mut engine = MockEngine::new();
    engine
        .expect_count_query()
        .times(2)
        .returning(|query, _| Ok(if query.contains(":Parent") { 2 } else { 3 }));
    let engine: Arc<dyn cypher_builder::QueryExecutor> = Arc::new(engine);

    let mut parents = QueryBuilder::new(engine.clone());
    parents.match_("(p:Parent)").returns("p");
    let mut children = QueryBuilder::new(engine);
    children.match_("(c:Child)").returns("c");

    let (parents, children) = tokio::join!(
        parents.get_count(Parameters::new()),
        children.get_count(Parameters::new())
    );
    assert_eq!(parents.unwrap(), 2);
    assert_eq!(children.unwrap(), 3);
}
