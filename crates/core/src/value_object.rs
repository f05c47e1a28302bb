//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity and are compared by their attribute values.
/// `Cost` is one: two costs of `12.50` are the same cost.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Cost { hundredths: i64 }
///
/// impl ValueObject for Cost {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
