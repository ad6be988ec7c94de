use qseq::prelude::*;
use std::any::Any;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Text(String),
    Number(i64),
}

impl Narrow<String> for Value {
    fn narrow(self) -> Result<String, Self> {
        match self {
            Value::Text(text) => Ok(text),
            other => Err(other),
        }
    }
}

impl Narrow<i64> for Value {
    fn narrow(self) -> Result<i64, Self> {
        match self {
            Value::Number(number) => Ok(number),
            other => Err(other),
        }
    }
}

fn mixed() -> SeqList<Value> {
    seq_list![
        Value::Text("One".into()),
        Value::Number(2),
        Value::Text("Three".into()),
        Value::Number(4),
        Value::Text("Five".into()),
        Value::Number(6),
    ]
}

#[test]
fn test_of_type_narrows_enum() {
    let list = mixed();

    let strings = (&list).of_type::<String>();
    let numbers = (&list).of_type::<i64>();

    assert_eq!(strings.count(), 3);
    assert_eq!(strings.collect_vec(), vec!["One", "Three", "Five"]);
    assert_eq!(numbers.sum(|n| *n as f64), 12.0);
}

#[test]
fn test_cast_fails_only_at_offending_element() {
    let list = mixed();

    let as_numbers = (&list).cast::<i64>();
    let mut cursor = as_numbers.cursor();

    assert!(cursor.has_next());
    assert!(matches!(
        cursor.next(),
        Some(Err(QueryError::TypeMismatch { .. }))
    ));
    assert_eq!(cursor.next(), Some(Ok(2)));
}

#[test]
fn test_cast_after_filter_succeeds() {
    let list = mixed();

    let numbers = (&list)
        .filter(|value| matches!(value, Value::Number(_)))
        .cast::<i64>();

    assert!(numbers.all(|result| result.is_ok()));
    assert_eq!(numbers.first(), Ok(Ok(2)));
}

#[test]
fn test_of_type_on_any() {
    let things: SeqList<Rc<dyn Any>> = seq_list![
        Rc::new("One") as Rc<dyn Any>,
        Rc::new(2u32) as Rc<dyn Any>,
        Rc::new("Three") as Rc<dyn Any>,
        Rc::new(4u32) as Rc<dyn Any>,
    ];

    let words = (&things).of_type::<Rc<&str>>().project(|word| *word);
    let numbers = (&things).of_type::<Rc<u32>>();

    assert_eq!(words.collect_vec(), vec!["One", "Three"]);
    assert_eq!(numbers.count(), 2);
    assert!((&things).cast::<Rc<u32>>().any_where(|result| result.is_err()));
}

#[test]
fn test_type_mismatch_names_target() {
    let list = seq_list![Value::Text("x".into())];

    let error = (&list).cast::<i64>().first().unwrap().unwrap_err();

    assert_eq!(error, QueryError::TypeMismatch { expected: "i64" });
}

#[test]
fn test_typed_accessors_narrow_the_element() {
    let list = mixed();

    assert_eq!(list.first_as::<String>(), Ok("One".to_string()));
    assert_eq!(list.second_as::<i64>(), Ok(2));
    assert_eq!(list.get_as::<i64>(5), Ok(6));
    assert_eq!(list.last_as::<i64>(), Ok(6));
    assert_eq!(
        (&list).filter(|value| *value == Value::Number(4)).single_as::<i64>(),
        Ok(4)
    );
}

#[test]
fn test_typed_accessors_report_mismatch() {
    let list = mixed();

    assert_eq!(
        list.first_as::<i64>(),
        Err(QueryError::TypeMismatch { expected: "i64" })
    );
    assert!(matches!(
        list.get_as::<String>(1),
        Err(QueryError::TypeMismatch { .. })
    ));
    assert!(matches!(
        list.last_as::<String>(),
        Err(QueryError::TypeMismatch { .. })
    ));
}

#[test]
fn test_typed_accessors_keep_positional_errors() {
    let list = mixed();
    let none: SeqList<Value> = SeqList::new();

    assert_eq!(
        list.get_as::<i64>(6),
        Err(QueryError::IndexOutOfRange { index: 6 })
    );
    assert_eq!(list.single_as::<i64>(), Err(QueryError::MultipleMatches));
    assert_eq!(none.first_as::<String>(), Err(QueryError::EmptySequence));
    assert_eq!(none.last_as::<String>(), Err(QueryError::EmptySequence));
    assert_eq!(
        seq_list![Value::Number(1)].second_as::<i64>(),
        Err(QueryError::IndexOutOfRange { index: 1 })
    );
}

#[test]
fn test_typed_accessors_on_any() {
    let things: SeqList<Rc<dyn Any>> = seq_list![
        Rc::new(7u32) as Rc<dyn Any>,
        Rc::new("word") as Rc<dyn Any>,
    ];

    assert_eq!(things.first_as::<Rc<u32>>().map(|n| *n), Ok(7));
    assert_eq!(things.last_as::<Rc<&str>>().map(|word| *word), Ok("word"));
    assert!(things.second_as::<Rc<u32>>().is_err());
}
