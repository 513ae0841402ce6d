use crate::storage::Column;

/// Marker trait for component kinds.
///
/// Component kinds are plain data records. The `Default` bound is load
/// bearing: storage slots are filled with `C::default()` when the table
/// grows, and attaching a component overwrites the slot without running any
/// cleanup of the previous value. Kinds must therefore not own external
/// resources (file handles, connections, heap structures that must be freed
/// at a precise time).
pub trait Component: Default + 'static {}

/// Stable integer id of a component kind, equal to its position in the
/// schema's catalogue.
pub type ComponentId = usize;

/// Setup-time metadata for one declared kind.
///
/// `new_column` is captured at registration, when the concrete type is still
/// known; it lets the store materialise a typed column per kind without any
/// compile-time type-list machinery.
#[derive(Debug, Clone)]
pub(crate) struct ComponentInfo {
    pub name: &'static str,
    pub new_column: fn() -> Box<dyn Column>,
}
