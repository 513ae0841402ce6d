use crate::component::{Component, ComponentId};
use crate::entity::{EntityIndex, EntityTable, INITIAL_CAPACITY};
use crate::schema::Schema;
use crate::signature::{SignatureId, SignatureIndex};
use crate::storage::ComponentStore;
use log::{debug, trace};
use std::any::type_name;

/// Façade over the entity table, the per-kind component columns and the
/// precomputed signature masks.
///
/// Single-threaded and non-reentrant. Component references obtained from
/// [`Manager::component`] or during iteration must not be held across any
/// call that can grow capacity (`create_index`), and iteration must run to
/// completion before the next mutation that changes the live count.
pub struct Manager {
    schema: Schema,
    signatures: SignatureIndex,
    entities: EntityTable,
    components: ComponentStore,
}

impl Manager {
    pub fn new(schema: Schema) -> Self {
        let signatures = SignatureIndex::new(&schema);
        let mut entities = EntityTable::new(schema.component_count());
        let mut components = ComponentStore::for_schema(&schema);
        entities.grow_to(INITIAL_CAPACITY);
        components.grow_to(INITIAL_CAPACITY);
        Self {
            schema,
            signatures,
            entities,
            components,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Live entity count as of the last [`Manager::refresh`].
    pub fn entity_count(&self) -> usize {
        self.entities.size()
    }

    pub fn capacity(&self) -> usize {
        self.entities.capacity()
    }

    /// Activates the next free position and returns its handle. Grows the
    /// table and every component column in lockstep when the next position
    /// would not fit; any outstanding component reference is invalidated by
    /// that growth.
    pub fn create_index(&mut self) -> EntityIndex {
        if let Some(new_capacity) = self.entities.required_capacity() {
            debug!(
                "growing storage: capacity {} -> {new_capacity}",
                self.entities.capacity()
            );
            self.entities.grow_to(new_capacity);
            self.components.grow_to(new_capacity);
        }
        debug_assert_eq!(self.entities.capacity(), self.components.capacity());
        self.entities.create()
    }

    pub fn is_alive(&self, entity: EntityIndex) -> bool {
        self.entities.is_alive(entity)
    }

    /// Marks the entity dead; its position is reclaimed by the next refresh.
    pub fn kill(&mut self, entity: EntityIndex) {
        self.entities.kill(entity);
    }

    /// Sets the entity's mask bit for `C` and overwrites the payload at its
    /// slot with `value`. The slot never changes; attach is purely an
    /// in-place reconstruction.
    pub fn add_component<C: Component>(&mut self, entity: EntityIndex, value: C) -> &mut C {
        let kind = self.schema.expect_component_id::<C>();
        let record = self.entities.record_mut(entity);
        record.mask.set(kind);
        let slot = record.slot;
        self.components.reconstruct(kind, slot, value)
    }

    pub fn has_component<C: Component>(&self, entity: EntityIndex) -> bool {
        let kind = self.schema.expect_component_id::<C>();
        self.entities.record(entity).mask.test(kind)
    }

    /// Clears the mask bit only; the payload stays in its slot and is merely
    /// logically absent until the next attach.
    pub fn remove_component<C: Component>(&mut self, entity: EntityIndex) {
        let kind = self.schema.expect_component_id::<C>();
        self.entities.record_mut(entity).mask.unset(kind);
    }

    /// Reads the entity's component of kind `C`. Contract: the mask bit must
    /// be set; check [`Manager::has_component`] first or go through
    /// signature-gated iteration.
    pub fn component<C: Component>(&self, entity: EntityIndex) -> &C {
        let kind = self.schema.expect_component_id::<C>();
        let record = self.entities.record(entity);
        debug_assert!(
            record.mask.test(kind),
            "entity {} read without an attached `{}`",
            entity.index,
            type_name::<C>()
        );
        self.components.get(kind, record.slot)
    }

    pub fn component_mut<C: Component>(&mut self, entity: EntityIndex) -> &mut C {
        let kind = self.schema.expect_component_id::<C>();
        let record = self.entities.record(entity);
        debug_assert!(
            record.mask.test(kind),
            "entity {} read without an attached `{}`",
            entity.index,
            type_name::<C>()
        );
        let slot = record.slot;
        self.components.get_mut(kind, slot)
    }

    /// Superset test of the entity's mask against the signature's mask.
    pub fn matches_signature(&self, entity: EntityIndex, signature: SignatureId) -> bool {
        self.entities
            .record(entity)
            .mask
            .contains_all(self.signatures.mask(signature))
    }

    /// Visits every live position in `[0, entity_count())`. The bound is
    /// snapshotted at call start.
    pub fn for_each(&self, mut visit: impl FnMut(EntityIndex)) {
        let live = self.entities.size();
        for index in 0..live {
            visit(EntityIndex { index });
        }
    }

    /// Visits every live entity matching `signature`, exposing its
    /// components through a slot view restricted to the signature's kinds in
    /// declared order.
    pub fn for_each_matching(
        &mut self,
        signature: SignatureId,
        mut visit: impl FnMut(EntityIndex, &mut SlotComponents),
    ) {
        let Manager {
            schema,
            signatures,
            entities,
            components,
        } = self;
        let required = signatures.mask(signature);
        let kinds = schema.signature_kinds(signature);

        let live = entities.size();
        for index in 0..live {
            let record = entities.record_at(index);
            if !record.mask.contains_all(required) {
                continue;
            }
            let mut slot_components = SlotComponents {
                schema: &*schema,
                components: &mut *components,
                slot: record.slot,
                kinds,
            };
            visit(EntityIndex { index }, &mut slot_components);
        }
    }

    /// Compacts live entities to the front of the table and returns the new
    /// live count. Every previously issued handle is invalidated.
    pub fn refresh(&mut self) -> usize {
        let live = self.entities.refresh();
        trace!("refresh settled at {live} live entities");
        live
    }

    /// Resets every position in capacity to inert. Capacity is kept.
    pub fn clear(&mut self) {
        debug!(
            "clearing {} entity positions",
            self.entities.capacity()
        );
        self.entities.clear();
    }

    pub(crate) fn entities(&self) -> &EntityTable {
        &self.entities
    }
}

/// Access to one matched entity's components during
/// [`Manager::for_each_matching`].
///
/// Only the kinds declared by the iterated signature are reachable; their
/// declared order is available through [`SlotComponents::kinds`].
pub struct SlotComponents<'a> {
    schema: &'a Schema,
    components: &'a mut ComponentStore,
    slot: usize,
    kinds: &'a [ComponentId],
}

impl SlotComponents<'_> {
    pub fn get<C: Component>(&self) -> &C {
        let kind = self.resolve::<C>();
        self.components.get(kind, self.slot)
    }

    pub fn get_mut<C: Component>(&mut self) -> &mut C {
        let kind = self.resolve::<C>();
        self.components.get_mut(kind, self.slot)
    }

    /// The iterated signature's kinds, in declared order.
    pub fn kinds(&self) -> &[ComponentId] {
        self.kinds
    }

    fn resolve<C: Component>(&self) -> ComponentId {
        let kind = self.schema.expect_component_id::<C>();
        debug_assert!(
            self.kinds.contains(&kind),
            "`{}` is not part of the iterated signature",
            type_name::<C>()
        );
        kind
    }
}
