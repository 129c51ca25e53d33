//! Default-value provider
//!
//! Provides [`DefaultValueProvider`], a per-instance override registry plus
//! the recursive synthesis rules. Resolution never fails: every shape of
//! [`TypeDescriptor`] has a total rule.

use crate::key::{OpenShape, TypeKey};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use surrogate_types::{
    ArrayValue, FromValue, IntoValue, Reflect, SequenceValue, TaskValue, TypeDescriptor, Value, ValueError,
};

/// Factory producing an override value
///
/// Receives the closed descriptor being requested, which matters for
/// factories registered under an [`OpenShape`].
pub type Factory = Arc<dyn Fn(&TypeDescriptor) -> Value + Send + Sync>;

/// Default-value registry and synthesis engine
///
/// # Resolution order
/// 1. Registered override (exact key, then open shape)
/// 2. By-reference slot: default of the referenced type
/// 3. Array: zero-length array of the same rank
/// 4. Nullable: `Null`
/// 5. Primitive, enum, struct: zero bit-pattern value
/// 6. Async wrapper: already-completed task holding the inner default
/// 7. Sequence: exhausted sequence
/// 8. Tuple: element-wise defaults
/// 9. Anything else: `Null`
///
/// # Concurrency
/// The registry has no internal locking. Registration takes `&mut self`,
/// lookup takes `&self`; share across threads behind a lock of your choice.
#[derive(Clone, Default)]
pub struct DefaultValueProvider {
    overrides: HashMap<TypeKey, Factory>,
}

impl DefaultValueProvider {
    /// Create provider with no overrides
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            overrides: HashMap::new(),
        }
    }

    /// Register a zero-argument factory, replacing any factory for the same key
    pub fn register<F>(&mut self, key: impl Into<TypeKey>, factory: F)
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.register_with(key, move |_: &TypeDescriptor| factory());
    }

    /// Register a factory that sees the requested descriptor
    pub fn register_with<F>(&mut self, key: impl Into<TypeKey>, factory: F)
    where
        F: Fn(&TypeDescriptor) -> Value + Send + Sync + 'static,
    {
        let key = key.into();
        if self.overrides.insert(key.clone(), Arc::new(factory)).is_some() {
            tracing::debug!(%key, "replaced default value override");
        } else {
            tracing::debug!(%key, "registered default value override");
        }
    }

    /// Register a typed factory for the descriptor of `T`
    pub fn register_for<T>(&mut self, factory: impl Fn() -> T + Send + Sync + 'static)
    where
        T: Reflect + IntoValue,
    {
        self.register(T::descriptor(), move || factory().into_value());
    }

    /// Remove the factory for `key`
    ///
    /// Returns `false` if nothing was registered under `key`.
    pub fn deregister(&mut self, key: impl Into<TypeKey>) -> bool {
        let key = key.into();
        let removed = self.overrides.remove(&key).is_some();
        tracing::debug!(%key, removed, "deregistered default value override");
        removed
    }

    /// Remove the factory for the descriptor of `T`
    pub fn deregister_for<T: Reflect>(&mut self) -> bool {
        self.deregister(T::descriptor())
    }

    /// Check if an override exists for exactly `key`
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &TypeKey) -> bool {
        self.overrides.contains_key(key)
    }

    /// Number of registered overrides
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    /// Check if no overrides are registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// Default value for the descriptor of `T`
    #[inline]
    #[must_use]
    pub fn get_default_for<T: Reflect>(&self) -> Value {
        self.get_default(&T::descriptor())
    }

    /// Typed default value for `T`
    ///
    /// Reference types read as `Option<T>`, so the built-in rules always
    /// produce an assignable value.
    ///
    /// # Errors
    /// Fails only when a registered factory produced a value not assignable to `T`
    pub fn typed_default<T: Reflect + FromValue>(&self) -> Result<T, ValueError> {
        T::from_value(self.get_default_for::<T>())
    }

    /// Default value for `ty`
    #[must_use]
    pub fn get_default(&self, ty: &TypeDescriptor) -> Value {
        if let Some(factory) = self.lookup(ty) {
            tracing::trace!(%ty, "default from override");
            return factory(ty);
        }

        match ty {
            TypeDescriptor::ByRef(inner) => self.get_default(inner),
            TypeDescriptor::Array { element, rank } => {
                Value::Array(ArrayValue::empty((**element).clone(), *rank))
            }
            TypeDescriptor::Nullable(_) => Value::Null,
            TypeDescriptor::Primitive(_) | TypeDescriptor::Enum(_) | TypeDescriptor::Struct(_) => {
                ty.zeroed()
            }
            TypeDescriptor::Async { kind, result } => Value::Task(TaskValue::completed(
                *kind,
                result
                    .as_deref()
                    .filter(|inner| !inner.is_void())
                    .map(|inner| self.get_default(inner)),
            )),
            TypeDescriptor::Sequence { kind, element } => {
                let element = element
                    .as_deref()
                    .cloned()
                    .unwrap_or_else(TypeDescriptor::object);
                Value::Sequence(SequenceValue::empty(*kind, element))
            }
            TypeDescriptor::Tuple(elements) => Value::Tuple(
                elements
                    .iter()
                    .map(|element| self.get_default(element))
                    .collect(),
            ),
            TypeDescriptor::Void => Value::Unit,
            TypeDescriptor::Reference(_) | TypeDescriptor::Generic { .. } => Value::Null,
        }
    }

    fn lookup(&self, ty: &TypeDescriptor) -> Option<&Factory> {
        if self.overrides.is_empty() {
            return None;
        }
        self.overrides
            .get(&TypeKey::Exact(ty.clone()))
            .or_else(|| OpenShape::of(ty).and_then(|shape| self.overrides.get(&TypeKey::Open(shape))))
    }
}

impl fmt::Debug for DefaultValueProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultValueProvider")
            .field("overrides", &self.overrides.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrogate_types::{AsyncKind, ObjectRef, PrimitiveType, SequenceKind};

    #[test]
    fn value_types_are_zero() {
        let provider = DefaultValueProvider::new();
        assert_eq!(provider.get_default(&TypeDescriptor::I32), Value::I32(0));
        assert_eq!(provider.get_default_for::<bool>(), Value::Bool(false));
        assert_eq!(provider.typed_default::<u64>(), Ok(0));
    }

    #[test]
    fn enum_default_is_zero_member() {
        let provider = DefaultValueProvider::new();
        let ty = TypeDescriptor::enumeration("PlatformId", PrimitiveType::I32);
        let Value::Enum(value) = provider.get_default(&ty) else {
            panic!("expected enum");
        };
        assert_eq!(value.discriminant, 0);
    }

    #[test]
    fn nullable_default_is_null() {
        let provider = DefaultValueProvider::new();
        assert_eq!(provider.get_default_for::<Option<i32>>(), Value::Null);
        assert_eq!(provider.typed_default::<Option<i32>>(), Ok(None));
    }

    #[test]
    fn reference_default_is_null() {
        let provider = DefaultValueProvider::new();
        assert_eq!(provider.get_default(&TypeDescriptor::reference("Foo")), Value::Null);
        assert_eq!(provider.get_default_for::<Option<String>>(), Value::Null);
    }

    #[test]
    fn typed_reference_default_is_none() {
        let provider = DefaultValueProvider::new();
        assert_eq!(provider.typed_default::<Option<String>>(), Ok(None));
        assert!(provider.typed_default::<Option<ObjectRef>>().is_ok_and(|o| o.is_none()));
        assert_eq!(
            provider.typed_default::<Vec<Option<String>>>(),
            Ok(Vec::new())
        );
    }

    #[test]
    fn array_default_is_empty_not_null() {
        let provider = DefaultValueProvider::new();
        let value = provider.get_default(&TypeDescriptor::array_of(TypeDescriptor::object()));
        let array = value.as_array().expect("array");
        assert!(array.is_empty());
        assert_eq!(array.element(), &TypeDescriptor::object());
    }

    #[test]
    fn jagged_array_default_is_empty_outer() {
        let provider = DefaultValueProvider::new();
        let ty = TypeDescriptor::array_of(TypeDescriptor::array_of(TypeDescriptor::I32));
        let value = provider.get_default(&ty);
        assert_eq!(value.as_array().map(ArrayValue::len), Some(0));
    }

    #[test]
    fn by_ref_resolves_element() {
        let provider = DefaultValueProvider::new();
        let ty = TypeDescriptor::by_ref(TypeDescriptor::array_of(TypeDescriptor::object()));
        assert!(provider.get_default(&ty).as_array().is_some());
    }

    #[test]
    fn task_default_is_completed() {
        let provider = DefaultValueProvider::new();

        let value = provider.get_default(&TypeDescriptor::task());
        let task = value.as_task().expect("task");
        assert!(task.is_completed());
        assert!(task.result().is_none());

        let value = provider.get_default(&TypeDescriptor::task_of(TypeDescriptor::BOOL));
        let task = value.as_task().expect("task");
        assert_eq!(task.kind(), AsyncKind::Task);
        assert_eq!(task.result(), Some(&Value::Bool(false)));
    }

    #[test]
    fn task_of_void_holds_no_result() {
        let provider = DefaultValueProvider::new();
        for ty in [
            TypeDescriptor::task_of(TypeDescriptor::Void),
            TypeDescriptor::value_task_of(TypeDescriptor::Void),
        ] {
            let value = provider.get_default(&ty);
            let task = value.as_task().expect("task");
            assert!(task.is_completed());
            assert!(task.result().is_none());
        }
        assert_eq!(
            provider.get_default(&TypeDescriptor::task_of(TypeDescriptor::Void)),
            provider.get_default(&TypeDescriptor::task())
        );
    }

    #[test]
    fn value_task_default_is_completed() {
        let provider = DefaultValueProvider::new();
        let value = provider.get_default(&TypeDescriptor::value_task_of(TypeDescriptor::BOOL));
        let task = value.as_task().expect("task");
        assert_eq!(task.kind(), AsyncKind::ValueTask);
        assert_eq!(task.result(), Some(&Value::Bool(false)));
    }

    #[test]
    fn non_generic_sequence_uses_object_elements() {
        let provider = DefaultValueProvider::new();
        for ty in [TypeDescriptor::enumerable(), TypeDescriptor::queryable()] {
            let value = provider.get_default(&ty);
            let sequence = value.as_sequence().expect("sequence");
            assert!(sequence.is_empty());
            assert_eq!(sequence.element(), &TypeDescriptor::object());
        }
    }

    #[test]
    fn generic_queryable_is_empty() {
        let provider = DefaultValueProvider::new();
        let value = provider.get_default(&TypeDescriptor::queryable_of(TypeDescriptor::object()));
        let sequence = value.as_sequence().expect("sequence");
        assert_eq!(sequence.kind(), SequenceKind::Queryable);
        assert_eq!(sequence.iter().count(), 0);
    }

    #[test]
    fn tuple_resolves_each_element() {
        let provider = DefaultValueProvider::new();
        let ty = TypeDescriptor::tuple([
            TypeDescriptor::array_of(TypeDescriptor::reference("ServiceProvider")),
            TypeDescriptor::task_of(TypeDescriptor::reference("FormatProvider")),
            TypeDescriptor::enumeration("PlatformId", PrimitiveType::I32),
        ]);

        let value = provider.get_default(&ty);
        let items = value.as_tuple().expect("tuple");
        assert_eq!(items.len(), 3);
        assert!(items[0].as_array().is_some_and(ArrayValue::is_empty));
        assert_eq!(items[1].as_task().and_then(TaskValue::result), Some(&Value::Null));
        assert!(matches!(&items[2], Value::Enum(e) if e.discriminant == 0));
    }

    #[test]
    fn tuple_elements_see_overrides() {
        let mut provider = DefaultValueProvider::new();
        provider.register_for::<i32>(|| 7);
        assert_eq!(
            provider.typed_default::<(i32, bool)>(),
            Ok((7, false))
        );
    }

    #[test]
    fn override_is_identity_preserving() {
        let mut provider = DefaultValueProvider::new();
        let expected = ObjectRef::new(vec![5, 10]);
        let captured = expected.clone();
        provider.register(TypeDescriptor::enumerable_of(TypeDescriptor::object()), move || {
            Value::Object(captured.clone())
        });

        let value = provider.get_default(&TypeDescriptor::enumerable_of(TypeDescriptor::object()));
        assert!(value.as_object().is_some_and(|o| o.ptr_eq(&expected)));
    }

    #[test]
    fn register_replaces_existing() {
        let mut provider = DefaultValueProvider::new();
        provider.register_for::<i32>(|| 1);
        provider.register_for::<i32>(|| 2);
        assert_eq!(provider.len(), 1);
        assert_eq!(provider.get_default_for::<i32>(), Value::I32(2));
    }

    #[test]
    fn deregister_reverts_to_builtin_rule() {
        let mut provider = DefaultValueProvider::new();
        provider.register(TypeDescriptor::reference("Foo"), || {
            Value::Object(ObjectRef::new("foo"))
        });
        assert!(provider.get_default(&TypeDescriptor::reference("Foo")).as_object().is_some());

        assert!(provider.deregister(TypeDescriptor::reference("Foo")));
        assert_eq!(provider.get_default(&TypeDescriptor::reference("Foo")), Value::Null);
    }

    #[test]
    fn deregister_absent_reports_not_found() {
        let mut provider = DefaultValueProvider::new();
        assert!(!provider.deregister_for::<i32>());
        assert!(provider.is_empty());
    }

    #[test]
    fn open_shape_matches_any_closing() {
        let mut provider = DefaultValueProvider::new();
        provider.register_with(
            OpenShape::Sequence(SequenceKind::Enumerable),
            |ty: &TypeDescriptor| Value::String(ty.to_string()),
        );

        assert_eq!(
            provider.get_default(&TypeDescriptor::enumerable_of(TypeDescriptor::I32)),
            Value::String("Enumerable<i32>".to_string())
        );
        assert_eq!(
            provider.get_default(&TypeDescriptor::enumerable_of(TypeDescriptor::string())),
            Value::String("Enumerable<string>".to_string())
        );
        // Non-generic form is not a closing of the open shape.
        assert!(provider.get_default(&TypeDescriptor::enumerable()).as_sequence().is_some());
    }

    #[test]
    fn exact_key_beats_open_shape() {
        let mut provider = DefaultValueProvider::new();
        provider.register(OpenShape::generic("List", 1), || Value::I32(1));
        provider.register(TypeDescriptor::generic("List", [TypeDescriptor::I32]), || Value::I32(2));

        assert_eq!(
            provider.get_default(&TypeDescriptor::generic("List", [TypeDescriptor::I32])),
            Value::I32(2)
        );
        assert_eq!(
            provider.get_default(&TypeDescriptor::generic("List", [TypeDescriptor::BOOL])),
            Value::I32(1)
        );
    }

    #[test]
    fn typed_default_reports_factory_mismatch() {
        let mut provider = DefaultValueProvider::new();
        provider.register(TypeDescriptor::I32, || Value::Bool(true));
        assert!(provider.typed_default::<i32>().is_err());
    }

    #[test]
    fn register_for_stores_under_reflected_descriptor() {
        let mut provider = DefaultValueProvider::new();
        provider.register_for::<Option<String>>(|| Some("fallback".to_string()));
        provider.register_for::<Vec<u8>>(|| vec![1, 2]);

        assert!(provider.contains(&TypeKey::Exact(TypeDescriptor::string())));
        assert_eq!(
            provider.typed_default::<Option<String>>(),
            Ok(Some("fallback".to_string()))
        );
        assert_eq!(provider.typed_default::<Vec<u8>>(), Ok(vec![1, 2]));
    }
}
