use crate::component::{Component, ComponentId};
use crate::schema::Schema;
use std::any::{Any, type_name};

/// Type-erased growable column, one per declared kind.
pub(crate) trait Column: 'static {
    fn grow_to(&mut self, new_len: usize);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct TypedColumn<C: Component> {
    values: Vec<C>,
}

impl<C: Component> Column for TypedColumn<C> {
    fn grow_to(&mut self, new_len: usize) {
        debug_assert!(new_len >= self.values.len());
        self.values.resize_with(new_len, C::default);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Column constructor stored in the schema's kind registry.
pub(crate) fn new_column<C: Component>() -> Box<dyn Column> {
    Box::new(TypedColumn::<C> { values: Vec::new() })
}

/// One dense array per component kind, indexed by kind id.
///
/// Every column always has the same length, the current table capacity, so
/// an entity's slot is a valid index into all of them. Whether the value at
/// a slot is meaningful is tracked by the entity's mask, not here; reading a
/// slot that was never attached yields the kind's default value.
pub(crate) struct ComponentStore {
    columns: Vec<Box<dyn Column>>,
    capacity: usize,
}

impl ComponentStore {
    pub fn for_schema(schema: &Schema) -> Self {
        let columns = schema.kinds().iter().map(|kind| (kind.new_column)()).collect();
        Self {
            columns,
            capacity: 0,
        }
    }

    /// Resizes every column to `new_capacity`, preserving existing values.
    pub fn grow_to(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity > self.capacity);
        for column in &mut self.columns {
            column.grow_to(new_capacity);
        }
        self.capacity = new_capacity;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn column<C: Component>(&self, kind: ComponentId) -> &TypedColumn<C> {
        self.columns[kind]
            .as_any()
            .downcast_ref()
            .unwrap_or_else(|| panic!("column {kind} does not store `{}`", type_name::<C>()))
    }

    fn column_mut<C: Component>(&mut self, kind: ComponentId) -> &mut TypedColumn<C> {
        self.columns[kind]
            .as_any_mut()
            .downcast_mut()
            .unwrap_or_else(|| panic!("column {kind} does not store `{}`", type_name::<C>()))
    }

    pub fn get<C: Component>(&self, kind: ComponentId, slot: usize) -> &C {
        &self.column::<C>(kind).values[slot]
    }

    pub fn get_mut<C: Component>(&mut self, kind: ComponentId, slot: usize) -> &mut C {
        &mut self.column_mut::<C>(kind).values[slot]
    }

    /// Overwrites the slot with a freshly constructed value. The previous
    /// value is dropped in place; see the `Component` contract.
    pub fn reconstruct<C: Component>(&mut self, kind: ComponentId, slot: usize, value: C) -> &mut C {
        let cell = &mut self.column_mut::<C>(kind).values[slot];
        *cell = value;
        cell
    }
}

#[cfg(test)]
mod tests {
    use super::ComponentStore;
    use crate::component::Component;
    use crate::schema::SchemaBuilder;

    #[derive(Debug, Default, PartialEq)]
    struct Health {
        value: f32,
    }
    impl Component for Health {}

    #[derive(Debug, Default, PartialEq)]
    struct Circle {
        radius: f32,
    }
    impl Component for Circle {}

    fn store() -> (ComponentStore, usize, usize) {
        let mut builder = SchemaBuilder::new();
        let health = builder.register::<Health>().unwrap();
        let circle = builder.register::<Circle>().unwrap();
        let schema = builder.build();
        (ComponentStore::for_schema(&schema), health, circle)
    }

    #[test]
    fn columns_grow_in_lockstep() {
        let (mut store, _, _) = store();
        assert_eq!(store.capacity(), 0);
        store.grow_to(16);
        assert_eq!(store.capacity(), 16);
        store.grow_to(52);
        assert_eq!(store.capacity(), 52);
    }

    #[test]
    fn growth_preserves_values() {
        let (mut store, health, circle) = store();
        store.grow_to(8);
        store.reconstruct(health, 3, Health { value: 80.0 });
        store.reconstruct(circle, 3, Circle { radius: 2.0 });

        store.grow_to(64);
        assert_eq!(store.get::<Health>(health, 3), &Health { value: 80.0 });
        assert_eq!(store.get::<Circle>(circle, 3), &Circle { radius: 2.0 });
    }

    #[test]
    fn reconstruct_discards_the_previous_value() {
        let (mut store, health, _) = store();
        store.grow_to(4);
        store.reconstruct(health, 0, Health { value: 1.0 });
        store.reconstruct(health, 0, Health { value: 2.0 });
        assert_eq!(store.get::<Health>(health, 0).value, 2.0);
    }

    #[test]
    #[should_panic(expected = "does not store")]
    fn mismatched_kind_panics() {
        let (store, _, circle) = store();
        store.get::<Health>(circle, 0);
    }
}
