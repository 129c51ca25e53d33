//! Quantified properties of default-value synthesis

use proptest::prelude::*;
use surrogate_defaults::DefaultValueProvider;
use surrogate_types::{PrimitiveType, TypeDescriptor, Value};

fn primitive() -> impl Strategy<Value = PrimitiveType> {
    prop_oneof![
        Just(PrimitiveType::Bool),
        Just(PrimitiveType::Char),
        Just(PrimitiveType::I8),
        Just(PrimitiveType::I16),
        Just(PrimitiveType::I32),
        Just(PrimitiveType::I64),
        Just(PrimitiveType::U8),
        Just(PrimitiveType::U16),
        Just(PrimitiveType::U32),
        Just(PrimitiveType::U64),
        Just(PrimitiveType::F32),
        Just(PrimitiveType::F64),
    ]
}

/// Arbitrary well-formed descriptors, a few levels deep
fn descriptor() -> impl Strategy<Value = TypeDescriptor> {
    let leaf = prop_oneof![
        primitive().prop_map(TypeDescriptor::Primitive),
        Just(TypeDescriptor::object()),
        Just(TypeDescriptor::string()),
        "[A-Z][a-z]{1,6}".prop_map(|name| TypeDescriptor::enumeration(name, PrimitiveType::I32)),
        Just(TypeDescriptor::enumerable()),
        Just(TypeDescriptor::task()),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            (inner.clone(), 1..4usize).prop_map(|(e, rank)| TypeDescriptor::array(e, rank)),
            inner.clone().prop_map(TypeDescriptor::by_ref),
            inner.clone().prop_map(TypeDescriptor::task_of),
            inner.clone().prop_map(TypeDescriptor::value_task_of),
            inner.clone().prop_map(TypeDescriptor::enumerable_of),
            inner.clone().prop_map(TypeDescriptor::queryable_of),
            prop::collection::vec(inner.clone(), 1..4).prop_map(TypeDescriptor::Tuple),
            prop::collection::vec(inner, 1..3)
                .prop_map(|args| TypeDescriptor::generic("Box", args)),
        ]
    })
}

proptest! {
    #[test]
    fn prop_value_type_default_is_zero(p in primitive()) {
        let provider = DefaultValueProvider::new();
        let ty = TypeDescriptor::Primitive(p);
        prop_assert_eq!(provider.get_default(&ty), p.zero());
    }

    #[test]
    fn prop_nullable_default_is_null(p in primitive()) {
        let provider = DefaultValueProvider::new();
        let ty = TypeDescriptor::nullable(TypeDescriptor::Primitive(p));
        prop_assert_eq!(provider.get_default(&ty), Value::Null);
    }

    #[test]
    fn prop_array_default_is_empty_with_rank(element in descriptor(), rank in 1..6usize) {
        let provider = DefaultValueProvider::new();
        let value = provider.get_default(&TypeDescriptor::array(element, rank));
        let array = value.as_array().expect("array default is never null");
        prop_assert_eq!(array.rank(), rank);
        prop_assert!(array.lengths().iter().all(|len| *len == 0));
    }

    #[test]
    fn prop_task_unwraps_to_inner_default(inner in descriptor()) {
        let provider = DefaultValueProvider::new();
        let value = provider.get_default(&TypeDescriptor::task_of(inner.clone()));
        let task = value.as_task().expect("task").clone();
        prop_assert!(task.is_completed());
        let awaited = futures::executor::block_on(task.into_future());
        prop_assert_eq!(awaited, provider.get_default(&inner));
    }

    #[test]
    fn prop_sequence_yields_nothing(inner in descriptor()) {
        let provider = DefaultValueProvider::new();
        let value = provider.get_default(&TypeDescriptor::enumerable_of(inner));
        let sequence = value.as_sequence().expect("sequence default is never null");
        prop_assert_eq!(sequence.iter().count(), 0);
    }

    #[test]
    fn prop_tuple_elements_resolve_independently(elements in prop::collection::vec(descriptor(), 1..6)) {
        let provider = DefaultValueProvider::new();
        let value = provider.get_default(&TypeDescriptor::Tuple(elements.clone()));
        let items = value.as_tuple().expect("tuple");
        prop_assert_eq!(items.len(), elements.len());
        for (item, element) in items.iter().zip(&elements) {
            prop_assert_eq!(item, &provider.get_default(element));
        }
    }

    #[test]
    fn prop_synthesis_is_total_and_deterministic(ty in descriptor()) {
        let provider = DefaultValueProvider::new();
        prop_assert_eq!(provider.get_default(&ty), provider.get_default(&ty));
    }

    #[test]
    fn prop_register_then_deregister_reverts(ty in descriptor(), marker in any::<i64>()) {
        let mut provider = DefaultValueProvider::new();
        let builtin = provider.get_default(&ty);

        provider.register(ty.clone(), move || Value::I64(marker));
        prop_assert_eq!(provider.get_default(&ty), Value::I64(marker));

        prop_assert!(provider.deregister(ty.clone()));
        prop_assert_eq!(provider.get_default(&ty), builtin);
    }
}

#[test]
fn value_task_of_void_is_completed_unit() {
    let provider = DefaultValueProvider::new();
    let value = provider.get_default(&TypeDescriptor::value_task());
    let task = value.as_task().expect("task").clone();
    assert!(task.is_completed());
    assert_eq!(futures::executor::block_on(task.into_future()), Value::Unit);
}
