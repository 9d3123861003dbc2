/*
 * value_model_tests.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Cross-module tests for the value model and namespace resolver.
 */

use std::cmp::Ordering;

use mobject::{Array, Dict, NamespaceErrorKind, Value, ValueType, namespace};
use pretty_assertions::assert_eq;

fn nested_value() -> Value {
    let mut ns = Dict::new();
    namespace::set(&mut ns, "people[0].name", Value::string("Ada")).unwrap();
    namespace::set(&mut ns, "people[0].born", Value::Int(1815)).unwrap();
    namespace::set(&mut ns, "people[1].name", Value::string("Grace")).unwrap();
    namespace::set(&mut ns, "tags[2]", Value::string("late")).unwrap();
    Value::Dict(ns)
}

#[test]
fn test_deep_copy_shares_nothing() {
    let original = nested_value();
    let mut copy = original.clone();

    {
        let copy_ns = copy.as_dict_mut().unwrap();
        namespace::set(copy_ns, "people[0].name", Value::string("Changed")).unwrap();
        copy_ns.delete("tags").unwrap();
    }
    drop(copy);

    let ns = original.as_dict().unwrap();
    assert_eq!(
        namespace::lookup(ns, "people[0].name").unwrap(),
        &Value::string("Ada")
    );
    assert_eq!(
        namespace::lookup(ns, "tags").unwrap().as_array().unwrap().len(),
        3
    );
}

#[test]
fn test_deep_copy_has_distinct_identity() {
    let original = nested_value();
    let copy = original.clone();

    let a = namespace::lookup(original.as_dict().unwrap(), "people").unwrap();
    let b = namespace::lookup(copy.as_dict().unwrap(), "people").unwrap();
    assert!(!std::ptr::eq(a, b));
    // Arrays of dictionaries still compare by dictionary identity
    assert_ne!(a.compare(b), Ordering::Equal);

    let tags_a = namespace::lookup(original.as_dict().unwrap(), "tags").unwrap();
    let tags_b = namespace::lookup(copy.as_dict().unwrap(), "tags").unwrap();
    assert_eq!(tags_a.compare(tags_b), Ordering::Equal);
}

#[test]
fn test_array_length_follows_operations() {
    let mut array = Array::new();
    let mut expected = 0usize;

    for step in 0..40i64 {
        match step % 5 {
            0 | 1 => {
                array.append(Value::Int(step)).unwrap();
                expected += 1;
            }
            2 => {
                array.prepend(Value::Int(step)).unwrap();
                expected += 1;
            }
            3 => {
                if array.pop().is_some() {
                    expected -= 1;
                }
            }
            _ => {
                let index = array.len() + 2;
                array.set(index, Value::Int(step)).unwrap();
                expected = index + 1;
            }
        }
        assert_eq!(array.len(), expected, "after step {step}");
    }

    while array.pull().is_some() {
        expected -= 1;
        assert_eq!(array.len(), expected);
    }
    assert_eq!(array.pull(), None);
    assert_eq!(array.len(), 0);
}

#[test]
fn test_dict_replace_keeps_len() {
    let mut dict = Dict::new();
    dict.insert("a", Value::Int(1)).unwrap();
    dict.insert("b", Value::Int(2)).unwrap();
    dict.replace("a", Value::string("one"));
    assert_eq!(dict.len(), 2);
    assert_eq!(dict.item("a"), Some(&Value::string("one")));
    assert_eq!(dict.remove("zzz"), None);
}

#[test]
fn test_iteration_over_containers() {
    let value = nested_value();
    let keys: Vec<Value> = value.iter().unwrap().map(|(k, _)| k.to_value()).collect();
    assert_eq!(keys, vec![Value::string("people"), Value::string("tags")]);

    let tags = namespace::lookup(value.as_dict().unwrap(), "tags").unwrap();
    let entries: Vec<(Value, ValueType)> = tags
        .iter()
        .unwrap()
        .map(|(k, v)| (k.to_value(), v.value_type()))
        .collect();
    assert_eq!(
        entries,
        vec![
            (Value::Int(0), ValueType::None),
            (Value::Int(1), ValueType::None),
            (Value::Int(2), ValueType::String),
        ]
    );
}

#[test]
fn test_resolver_error_messages() {
    let value = nested_value();
    let ns = value.as_dict().unwrap();

    let err = namespace::lookup(ns, "people[5].name").unwrap_err();
    assert_eq!(err.kind, NamespaceErrorKind::IndexOutOfBounds);
    insta::assert_snapshot!(err, @r#"Array index is out of bounds at "people[5]""#);

    let err = namespace::lookup(ns, "people[0].name.first").unwrap_err();
    insta::assert_snapshot!(err, @r#"Name "name" is not a dictionary at "people[0].name.""#);

    let err = namespace::lookup(ns, "people[0].age").unwrap_err();
    insta::assert_snapshot!(err, @r#"Name "age" not found at "people[0].""#);
}

#[test]
fn test_json_document_as_namespace() {
    let json = serde_json::json!({
        "title": "Report",
        "sections": [{"heading": "Intro"}, {"heading": "Results"}],
        "draft": false
    });
    let value = Value::try_from(json).unwrap();
    let ns = value.as_dict().unwrap();

    assert_eq!(
        namespace::lookup(ns, "sections[1].heading").unwrap(),
        &Value::string("Results")
    );
    assert!(!namespace::lookup(ns, "draft").unwrap().is_truthy());
}
