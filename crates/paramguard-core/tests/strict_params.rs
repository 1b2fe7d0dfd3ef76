use paramguard_core::{Filter, Params, ParamsConfig, ParamsError, Rejection, Value};
use serde_json::json;

fn person_params() -> Params {
    Params::from_json(json!({
        "person": {
            "age": "32",
            "name": {"first": "David", "last": "Heinemeier Hansson"}
        }
    }))
    .unwrap()
}

fn filters(doc: serde_json::Value) -> Vec<Filter> {
    Filter::parse_list(&doc).unwrap()
}

fn person(params: &Params) -> Value {
    params.get("person").expect("person present")
}

#[test]
fn test_extra_parameters_forbidden() {
    let params = person_params();
    let person = person(&params);
    let err = person
        .as_tree()
        .unwrap()
        .permit_strict(&filters(json!(["age"])))
        .unwrap_err();
    assert_eq!(err, ParamsError::forbidden(vec!["name".into()]));
}

#[test]
fn test_exact_parameters_pass() {
    let params = person_params();
    let person = person(&params);
    let tree = person.as_tree().unwrap();
    assert!(tree.permit_strict(&filters(json!(["age", "name"]))).is_ok());
    assert!(tree
        .permit_strict(&filters(json!(["age", {"name": ["first", "last"]}])))
        .is_ok());
}

#[test]
fn test_extra_nested_parameters_forbidden() {
    let params = person_params();
    let person = person(&params);
    let err = person
        .as_tree()
        .unwrap()
        .permit_strict(&filters(json!(["age", {"name": ["first", "third"]}])))
        .unwrap_err();
    // `third` is requested but absent, which is fine; `last` is the trigger.
    assert_eq!(err, ParamsError::forbidden(vec!["last".into()]));
}

#[test]
fn test_deep_nesting() {
    let params = person_params();
    let err = params
        .permit_strict(&filters(json!([{"person": ["age", {"name": ["first", "third"]}]}])))
        .unwrap_err();
    assert_eq!(err, ParamsError::forbidden(vec!["last".into()]));

    let params = person_params();
    let permitted = params
        .permit_strict(&filters(json!([{"person": ["age", {"name": ["first", "last"]}]}])))
        .unwrap()
        .unwrap();
    assert_eq!(permitted.to_json(), person_params().to_json());
}

#[test]
fn test_strict_result_is_permitted() {
    let params = person_params();
    let person = person(&params);
    let permitted = person
        .as_tree()
        .unwrap()
        .permit_strict(&filters(json!(["age", "name"])))
        .unwrap()
        .unwrap();
    assert!(permitted.is_permitted());
}

#[test]
fn test_embedded_hashes() {
    let params = Params::from_json(json!({
        "email": "test@example.com",
        "profile": {"person_description": {"age": 35, "sex": "f"}}
    }))
    .unwrap();

    let err = params
        .permit_strict(&filters(json!(["email", {"profile": [{"person_description": []}]}])))
        .unwrap_err();
    assert_eq!(err, ParamsError::forbidden(vec!["age".into(), "sex".into()]));
}

#[test]
fn test_strict_from_config() {
    let params = person_params();
    let person = person(&params);
    let tree = person.as_tree().unwrap();

    let err = tree
        .permit_with(&filters(json!(["age"])), &ParamsConfig::strict())
        .unwrap_err();
    assert!(matches!(err, ParamsError::Forbidden { .. }));
}

#[test]
fn test_strict_disabled_by_default() {
    let params = person_params();
    let person = person(&params);
    let permitted = person
        .as_tree()
        .unwrap()
        .permit(&filters(json!(["age"])))
        .unwrap()
        .unwrap();
    assert_eq!(permitted.to_json(), json!({"age": "32"}));
}

#[test]
fn test_fields_for_style_negative_indices() {
    let params = Params::from_json(json!({
        "book": {
            "authors_attributes": {
                "-1": {"name": "William Shakespeare", "age_of_death": "52"},
                "-2": {"name": "Unattributed Assistant"}
            }
        }
    }))
    .unwrap();

    let permitted = params
        .permit_strict(&filters(
            json!([{"book": [{"authors_attributes": ["name", "age_of_death"]}]}]),
        ))
        .unwrap()
        .unwrap();

    let authors = permitted
        .get("book")
        .unwrap()
        .get("authors_attributes")
        .unwrap();
    let first = authors.get("-1").expect("-1 kept");
    let second = authors.get("-2").expect("-2 kept");

    assert!(first.get("age_of_death").is_some());
    assert_eq!(
        first.get("name").unwrap().as_str(),
        Some("William Shakespeare")
    );
    assert_eq!(
        second.get("name").unwrap().as_str(),
        Some("Unattributed Assistant")
    );
    assert!(second.get("age_of_death").is_none());
}

#[test]
fn test_forbidden_response_body() {
    let params = Params::from_json(json!({"author": {"password": "rails"}})).unwrap();
    let author = params.require("author").unwrap();

    let err = author
        .as_tree()
        .unwrap()
        .permit_strict(&filters(json!(["name"])))
        .unwrap_err();
    let rejection = Rejection::from_error(&err, &ParamsConfig::default()).unwrap();
    assert_eq!(rejection.status, 400);
    assert_eq!(rejection.body, "Parameters forbidden: password");
}

#[test]
fn test_forbidden_nested_under_schema() {
    let params = Params::from_json(json!({"author": {"password": "x"}})).unwrap();
    let err = params
        .permit_strict(&filters(json!([{"author": ["name"]}])))
        .unwrap_err();
    assert_eq!(
        err,
        ParamsError::Forbidden {
            keys: vec!["password".into()]
        }
    );
}

#[test]
fn test_present_strict_parameters_do_not_raise() {
    let params = Params::from_json(json!({"author": {"name": "David"}})).unwrap();
    let author = params.require("author").unwrap();
    let permitted = author
        .as_tree()
        .unwrap()
        .permit_strict(&filters(json!(["name"])))
        .unwrap()
        .unwrap();
    assert_eq!(permitted.to_json(), json!({"name": "David"}));
}

#[test]
fn test_missing_required_parameter() {
    let params = Params::new();
    let err = params.require("author").unwrap_err();
    assert_eq!(err, ParamsError::missing("author"));

    let rejection = Rejection::from_error(&err, &ParamsConfig::default()).unwrap();
    assert_eq!(rejection.body, "Required parameter missing: author");
}
