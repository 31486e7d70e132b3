use super::filler::{create_filler, FillerOptions};
use super::list::list;
use super::resolvers::ResolverRegistry;
use super::thunk::{resolver, Thunk};
use crate::domain::{Document, FillError, FillResult, GraphQLRequest};
use apollo_compiler::ast::Type;
use apollo_compiler::validation::Valid;
use apollo_compiler::Schema;
use serde_json::{json, Value};

const SCHEMA: &str = r#"
type Query {
  shop: Shop
  requiredShop: Shop!
  node(id: ID!): Node
  search: [SearchResult!]!
  status: Status
  price: Money
}

type Mutation {
  rename(name: String!): Shop
}

scalar Money

enum Status {
  OPEN
  CLOSED
}

interface Node {
  id: ID!
}

type Shop implements Node {
  id: ID!
  name: String!
  description: String
  products: [Product!]!
  owner: Person
}

type Product implements Node {
  id: ID!
  title: String!
  price: Float
  tags: [String!]!
}

type Person {
  name: String
  age: Int
}

union SearchResult = Shop | Product
"#;

fn schema() -> Valid<Schema> {
    Schema::parse_and_validate(SCHEMA, "schema.graphql").unwrap_or_else(|e| panic!("{}", e.errors))
}

fn never_null() -> FillerOptions {
    FillerOptions::default().with_null_probability(0.0)
}

fn always_null() -> FillerOptions {
    FillerOptions::default().with_null_probability(1.0)
}

fn fill(query: &str, overrides: impl Into<Thunk>, options: FillerOptions) -> FillResult<Value> {
    let filler = create_filler(schema(), options);
    let document = Document::from_source(query, None);
    filler.fill(document, overrides).generate()
}

#[test]
fn test_same_inputs_give_same_output() {
    let filler = create_filler(schema(), FillerOptions::default());
    let document = Document::from_source(
        "query Shop { shop { id name description owner { name age } } status price }",
        None,
    );
    let fill = filler.fill(document, Thunk::Undefined);

    let first = fill.generate().unwrap();
    let second = fill.generate().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_separate_fillers_agree() {
    let query = "query Shop { requiredShop { id name description } }";
    let first = fill(query, Thunk::Undefined, FillerOptions::default()).unwrap();
    let second = fill(query, Thunk::Undefined, FillerOptions::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_generates_leaf_defaults() {
    let result = fill(
        "{ requiredShop { id name owner { name age } } }",
        Thunk::Undefined,
        never_null(),
    )
    .unwrap();

    let shop = &result["requiredShop"];
    let id = shop["id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
    assert!(shop["name"].is_string());
    assert!(shop["owner"]["name"].is_string());
    let age = shop["owner"]["age"].as_i64().unwrap();
    assert!((0..=99_999).contains(&age));
}

#[test]
fn test_nested_objects_carry_typename() {
    let result = fill("{ shop { owner { name } } }", Thunk::Undefined, never_null()).unwrap();

    assert_eq!(result["shop"]["__typename"], "Shop");
    assert_eq!(result["shop"]["owner"]["__typename"], "Person");
    assert!(result.get("__typename").is_none());
}

#[test]
fn test_root_typename() {
    let result = fill("{ __typename }", Thunk::Undefined, FillerOptions::default()).unwrap();
    assert_eq!(result, json!({ "__typename": "Query" }));
}

#[test]
fn test_keys_follow_selection_order() {
    let result = fill("{ shop { name id } }", Thunk::Undefined, never_null()).unwrap();
    let keys: Vec<&String> = result["shop"].as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["name", "id", "__typename"]);
}

#[test]
fn test_override_value_wins() {
    let result = fill(
        "{ shop { name description } }",
        json!({ "shop": { "name": "Acme" } }),
        always_null(),
    )
    .unwrap();

    assert_eq!(result["shop"]["name"], "Acme");
    assert_eq!(result["shop"]["description"], Value::Null);
}

#[test]
fn test_override_null_wins_on_nullable_field() {
    let result = fill(
        "{ shop { name description } }",
        json!({ "shop": { "description": null } }),
        never_null(),
    )
    .unwrap();

    assert!(result["shop"]["name"].is_string());
    assert_eq!(result["shop"]["description"], Value::Null);

    let result = fill("{ shop { name } }", json!({ "shop": null }), never_null()).unwrap();
    assert_eq!(result["shop"], Value::Null);
}

#[test]
fn test_non_null_fields_ignore_null_probability() {
    let result = fill(
        "{ shop { id } requiredShop { id name description products { id } } }",
        Thunk::Undefined,
        always_null(),
    )
    .unwrap();

    assert_eq!(result["shop"], Value::Null);
    let shop = &result["requiredShop"];
    assert!(shop["id"].is_string());
    assert!(shop["name"].is_string());
    assert_eq!(shop["description"], Value::Null);
    assert_eq!(shop["products"], json!([]));
}

#[test]
fn test_aliases_are_filled_independently() {
    let result = fill(
        "{ a: shop { name } b: shop { name } }",
        json!({ "a": { "name": "A" }, "b": { "name": "B" } }),
        never_null(),
    )
    .unwrap();

    assert_eq!(result["a"]["name"], "A");
    assert_eq!(result["b"]["name"], "B");
}

#[test]
fn test_enum_values_come_from_schema() {
    let result = fill("{ status }", Thunk::Undefined, never_null()).unwrap();
    let status = result["status"].as_str().unwrap();
    assert!(["OPEN", "CLOSED"].contains(&status));
}

#[test]
fn test_custom_scalar_defaults_to_word() {
    let result = fill("{ price }", Thunk::Undefined, never_null()).unwrap();
    assert!(result["price"].is_string());
}

#[test]
fn test_custom_scalar_resolver() {
    let options = never_null().with_resolver("Money", ResolverRegistry::literal(json!("9.99 EUR")));
    let result = fill("{ price }", Thunk::Undefined, options).unwrap();
    assert_eq!(result["price"], "9.99 EUR");
}

#[test]
fn test_builtin_scalar_resolver_can_be_replaced() {
    let options = never_null().with_resolver("String", ResolverRegistry::literal(json!("fixed")));
    let result = fill("{ shop { name description } }", Thunk::Undefined, options).unwrap();

    assert_eq!(result["shop"]["name"], "fixed");
    assert_eq!(result["shop"]["description"], "fixed");
}

#[test]
fn test_type_resolver_fills_object_fields() {
    let options = never_null().with_resolver(
        "Shop",
        ResolverRegistry::literal(json!({ "name": "From resolver" })),
    );
    let query = "{ shop { id name } }";

    let result = fill(query, Thunk::Undefined, options.clone()).unwrap();
    assert_eq!(result["shop"]["name"], "From resolver");
    assert!(result["shop"]["id"].is_string());

    let result = fill(query, json!({ "shop": { "name": "From override" } }), options).unwrap();
    assert_eq!(result["shop"]["name"], "From override");
}

#[test]
fn test_resolver_null_without_override_is_null() {
    let options = never_null().with_resolver("Shop", ResolverRegistry::literal(Value::Null));
    let query = "{ shop { name } }";

    let result = fill(query, Thunk::Undefined, options.clone()).unwrap();
    assert_eq!(result["shop"], Value::Null);

    let result = fill(query, json!({ "shop": { "name": "Acme" } }), options).unwrap();
    assert_eq!(result["shop"]["name"], "Acme");
}

#[test]
fn test_resolver_object_with_override_null_is_null() {
    let options =
        never_null().with_resolver("Shop", ResolverRegistry::literal(json!({ "name": "Acme" })));
    let result = fill("{ shop { name } }", json!({ "shop": null }), options).unwrap();
    assert_eq!(result["shop"], Value::Null);
}

#[test]
fn test_deferred_override_sees_nullable_type() {
    let overrides = Thunk::object([(
        "requiredShop",
        Thunk::object([(
            "name",
            Thunk::deferred(|_, details| {
                assert!(matches!(details.ty, Type::Named(_)));
                assert_eq!(details.parent.as_str(), "Shop");
                assert_eq!(details.field.response_key, "name");
                json!("Lazy").into()
            }),
        )]),
    )]);

    let result = fill("{ requiredShop { name } }", overrides, never_null()).unwrap();
    assert_eq!(result["requiredShop"]["name"], "Lazy");
}

#[test]
fn test_resolver_sees_request() {
    let options = never_null().with_resolver(
        "Person",
        resolver(|request, _| {
            let name = request
                .variables
                .as_ref()
                .and_then(|variables| variables.get("owner"))
                .cloned()
                .unwrap_or(Value::Null);
            json!({ "name": name }).into()
        }),
    );
    let filler = create_filler(schema(), options);
    let document = Document::from_source("query Owner { shop { owner { name } } }", None);
    let fill = filler.fill(document.clone(), Thunk::Undefined);

    let mut variables = serde_json::Map::new();
    variables.insert("owner".to_string(), json!("Ada"));
    let request = GraphQLRequest::new(document).with_variables(variables);

    let result = fill.call(&request).unwrap();
    assert_eq!(result["shop"]["owner"]["name"], "Ada");
}

#[test]
fn test_list_override_sets_length() {
    let overrides = Thunk::object([(
        "requiredShop",
        Thunk::object([("products", list(3usize, Thunk::Undefined))]),
    )]);
    let result = fill("{ requiredShop { products { id title } } }", overrides, always_null()).unwrap();

    let products = result["requiredShop"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 3);
    for product in products {
        assert!(product["id"].is_string());
        assert!(product["title"].is_string());
        assert_eq!(product["__typename"], "Product");
    }
}

#[test]
fn test_list_items_are_seeded_by_index() {
    let overrides = Thunk::object([(
        "requiredShop",
        Thunk::object([("products", list(2usize, Thunk::Undefined))]),
    )]);
    let result = fill("{ requiredShop { products { id } } }", overrides, never_null()).unwrap();

    let products = result["requiredShop"]["products"].as_array().unwrap();
    assert_ne!(products[0]["id"], products[1]["id"]);
}

#[test]
fn test_list_template_applies_to_every_item() {
    let overrides = json!({
        "requiredShop": { "products": [{ "title": "One" }, { "title": "Two" }] }
    });
    let result = fill("{ requiredShop { products { title } } }", overrides, never_null()).unwrap();
    assert_eq!(
        result["requiredShop"]["products"],
        json!([
            { "title": "One", "__typename": "Product" },
            { "title": "Two", "__typename": "Product" }
        ])
    );
}

#[test]
fn test_lists_without_override_are_empty() {
    let result = fill(
        "{ requiredShop { products { tags } } search { __typename } }",
        Thunk::Undefined,
        never_null(),
    )
    .unwrap();

    assert_eq!(result["requiredShop"]["products"], json!([]));
    assert_eq!(result["search"], json!([]));
}

#[test]
fn test_union_items_follow_override_typename() {
    let overrides = json!({
        "search": [{ "__typename": "Product" }, { "__typename": "Shop", "name": "Acme" }]
    });
    let result = fill(
        "{ search { ... on Shop { name } ... on Product { title } } }",
        overrides,
        never_null(),
    )
    .unwrap();

    let search = result["search"].as_array().unwrap();
    assert_eq!(search[0]["__typename"], "Product");
    assert!(search[0]["title"].is_string());
    assert!(search[0].get("name").is_none());
    assert_eq!(search[1]["__typename"], "Shop");
    assert_eq!(search[1]["name"], "Acme");
    assert!(search[1].get("title").is_none());
}

#[test]
fn test_interface_picks_possible_type() {
    let query = "query Node { node(id: \"1\") { id ... on Shop { name } } }";
    let first = fill(query, Thunk::Undefined, never_null()).unwrap();
    let second = fill(query, Thunk::Undefined, never_null()).unwrap();
    assert_eq!(first, second);

    let node = &first["node"];
    assert!(node["id"].is_string());
    match node["__typename"].as_str() {
        Some("Shop") => assert!(node["name"].is_string()),
        Some("Product") => assert!(node.get("name").is_none()),
        other => panic!("unexpected typename {:?}", other),
    }
}

#[test]
fn test_abstract_type_from_resolver() {
    let options = never_null().with_resolver(
        "Node",
        ResolverRegistry::literal(json!({ "__typename": "Product" })),
    );
    let result = fill(
        "{ node(id: \"1\") { ... on Product { title } } }",
        Thunk::Undefined,
        options,
    )
    .unwrap();

    assert_eq!(result["node"]["__typename"], "Product");
    assert!(result["node"]["title"].is_string());
}

#[test]
fn test_unknown_typename_fails() {
    let result = fill(
        "{ node(id: \"1\") { id } }",
        json!({ "node": { "__typename": "Person" } }),
        never_null(),
    );

    match result {
        Err(FillError::UnresolvedAbstractType {
            abstract_type,
            typename,
        }) => {
            assert_eq!(abstract_type, "Node");
            assert_eq!(typename.as_deref(), Some("Person"));
        }
        other => panic!("expected unresolved abstract type, got {:?}", other),
    }
}

#[test]
fn test_named_operation_is_selected() {
    let filler = create_filler(schema(), never_null());
    let document = Document::from_source(
        "query A { status } query B { shop { name } }",
        None,
    );
    let fill = filler.fill(document.clone(), Thunk::Undefined);

    let result = fill
        .call(&GraphQLRequest::new(document.clone()).with_operation_name("B"))
        .unwrap();
    assert!(result.get("shop").is_some());
    assert!(result.get("status").is_none());

    let result = fill.call(&GraphQLRequest::new(document)).unwrap();
    assert!(result.get("status").is_some());
}

#[test]
fn test_unknown_operation_name_fails() {
    let filler = create_filler(schema(), FillerOptions::default());
    let document = Document::from_source("query A { status }", None);
    let fill = filler.fill(document.clone(), Thunk::Undefined);

    let result = fill.call(&GraphQLRequest::new(document).with_operation_name("Missing"));
    assert!(matches!(result, Err(FillError::OperationNotFound(name)) if name == "Missing"));
}

#[test]
fn test_invalid_document_fails_to_compile() {
    let result = fill("{ shop { nope } }", Thunk::Undefined, FillerOptions::default());
    assert!(matches!(result, Err(FillError::Compile(_))));
}

#[test]
fn test_missing_required_variables_still_fill() {
    let result = fill(
        "query Node($id: ID!) { node(id: $id) { id } }",
        Thunk::Undefined,
        never_null(),
    )
    .unwrap();
    assert!(result["node"]["id"].is_string());
}

#[test]
fn test_mutation_root() {
    let result = fill(
        "mutation Rename { rename(name: \"New\") { name } }",
        json!({ "rename": { "name": "New" } }),
        FillerOptions::default(),
    )
    .unwrap();
    assert_eq!(result, json!({ "rename": { "name": "New", "__typename": "Shop" } }));
}

#[test]
fn test_named_operations_are_cached() {
    let filler = create_filler(schema(), FillerOptions::default());
    let document = Document::from_source("query Status { status }", None);
    let fill = filler.fill(document.clone(), Thunk::Undefined);

    fill.call(&GraphQLRequest::new(document.clone()).with_operation_name("Status"))
        .unwrap();
    fill.call(&GraphQLRequest::new(document).with_operation_name("Status"))
        .unwrap();

    assert_eq!(filler.cache().len(), 1);
    assert!(filler.cache().get("Status").is_some());
}

#[test]
fn test_resolver_randomness_is_seeded() {
    let options = never_null().with_resolver(
        "Node",
        resolver(|_, details| {
            let typename = if details.random.boolean() { "Shop" } else { "Product" };
            json!({ "__typename": typename }).into()
        }),
    );
    let overrides = Thunk::deferred(|_, details| json!({ "price": details.random.uuid() }).into());
    let query = "{ price node(id: \"1\") { id } }";

    let first = fill(query, overrides.clone(), options.clone()).unwrap();
    for _ in 0..5 {
        assert_eq!(fill(query, overrides.clone(), options.clone()).unwrap(), first);
    }
    assert!(uuid::Uuid::parse_str(first["price"].as_str().unwrap()).is_ok());
}

#[test]
fn test_deferred_entries_inside_leaf_override_are_seeded() {
    let overrides = Thunk::object([(
        "price",
        Thunk::object([
            ("currency", Thunk::from(json!("EUR"))),
            (
                "amount",
                Thunk::deferred(|_, details| json!(details.random.integer()).into()),
            ),
        ]),
    )]);

    let first = fill("{ price }", overrides.clone(), never_null()).unwrap();
    let second = fill("{ price }", overrides, never_null()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first["price"]["currency"], "EUR");
    assert!(first["price"]["amount"].is_i64());
}

#[test]
fn test_filler_exposes_context_and_fill_document() {
    let options = FillerOptions::default()
        .with_null_probability(0.25)
        .with_resolver("Money", ResolverRegistry::literal(json!("1.00 EUR")));
    let filler = create_filler(schema(), options);

    let context = filler.context();
    assert_eq!(context.null_probability, 0.25);
    assert!(context.resolvers.contains("Money"));
    assert!(context.resolvers.contains("String"));
    assert!(context.possible_types.is_abstract("SearchResult"));

    let document = Document::from_source("{ price }", Some("price.graphql"));
    let fill = filler.fill(document.clone(), Thunk::Undefined);
    assert_eq!(fill.document(), &document);
}
