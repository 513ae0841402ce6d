use crate::mask::KindMask;
use log::debug;

/// Capacity the table starts with on the first growth cycle.
pub(crate) const INITIAL_CAPACITY: usize = 100;

/// Fixed padding applied before doubling when the table runs out of room.
const GROWTH_PADDING: usize = 10;

/// Handle to an entity: its position in the table at the time of creation.
///
/// Valid only until the next `refresh`; compaction relocates live records
/// and a previously issued handle may then address a different entity or a
/// reusable position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntityIndex {
    pub(crate) index: usize,
}

impl EntityIndex {
    /// Rebuilds a handle from a raw table position. The position must be
    /// below the created-so-far count, and the usual lifetime rule applies:
    /// the handle is only meaningful until the next refresh.
    pub fn from_position(position: usize) -> Self {
        Self { index: position }
    }

    /// The raw table position this handle was issued for.
    pub fn position(self) -> usize {
        self.index
    }
}

/// One row of the entity table.
///
/// Invariant: mask bit `i` is set iff the entity owns a valid value of kind
/// `i` at `slot` in every component column. The slot is assigned when the
/// position is first grown into and travels with the record through
/// compaction swaps, so component data survives relocation even though the
/// position does not.
pub(crate) struct EntityRecord {
    pub slot: usize,
    pub mask: KindMask,
    pub alive: bool,
}

/// Dense table of entity records with deferred-destruction compaction.
///
/// `size` is the live count as of the last refresh, `size_next` the next
/// free position. Records in `[size, size_next)` were created (or killed)
/// since then and are settled by the next `refresh`.
pub(crate) struct EntityTable {
    records: Vec<EntityRecord>,
    capacity: usize,
    size: usize,
    size_next: usize,
    created: usize,
    kind_count: usize,
}

impl EntityTable {
    pub fn new(kind_count: usize) -> Self {
        Self {
            records: Vec::new(),
            capacity: 0,
            size: 0,
            size_next: 0,
            created: 0,
            kind_count,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Live entity count as of the last refresh.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of positions handed out so far (live + unsettled).
    pub fn attempt_count(&self) -> usize {
        self.size_next
    }

    /// The capacity the table must grow to before the next creation, if the
    /// next free position would not fit.
    pub fn required_capacity(&self) -> Option<usize> {
        (self.size_next >= self.capacity).then(|| (self.capacity + GROWTH_PADDING) * 2)
    }

    /// Appends inert records up to `new_capacity`. New positions get their
    /// own index as slot; existing records are untouched. The caller must
    /// grow component storage to the same capacity.
    pub fn grow_to(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity > self.capacity);
        self.records
            .extend((self.capacity..new_capacity).map(|position| EntityRecord {
                slot: position,
                mask: KindMask::empty(self.kind_count),
                alive: false,
            }));
        self.capacity = new_capacity;
        debug!("entity table grown to capacity {new_capacity}");
    }

    /// Activates the record at the next free position and returns it as a
    /// handle. The caller must have grown the table first if needed.
    pub fn create(&mut self) -> EntityIndex {
        assert!(
            self.size_next < self.capacity,
            "entity table full: grow before creating"
        );
        let position = self.size_next;
        self.size_next += 1;
        self.created += 1;

        let record = &mut self.records[position];
        debug_assert!(!record.alive, "position {position} reused while alive");
        record.alive = true;
        record.mask.reset();

        EntityIndex { index: position }
    }

    pub fn record(&self, entity: EntityIndex) -> &EntityRecord {
        debug_assert!(
            entity.index < self.size_next,
            "entity {} outside the created range {}",
            entity.index,
            self.size_next
        );
        &self.records[entity.index]
    }

    pub fn record_mut(&mut self, entity: EntityIndex) -> &mut EntityRecord {
        debug_assert!(
            entity.index < self.size_next,
            "entity {} outside the created range {}",
            entity.index,
            self.size_next
        );
        &mut self.records[entity.index]
    }

    /// Record access by raw position, used by iteration over the live prefix.
    pub fn record_at(&self, position: usize) -> &EntityRecord {
        &self.records[position]
    }

    pub fn is_alive(&self, entity: EntityIndex) -> bool {
        self.record(entity).alive
    }

    /// Marks the entity dead. Removal is deferred to the next refresh.
    pub fn kill(&mut self, entity: EntityIndex) {
        self.record_mut(entity).alive = false;
    }

    /// Partitions live records to the front and returns the new live count.
    ///
    /// If nothing was created since the last refresh, every record dies and
    /// both counts drop to 0: liveness is single-generation.
    pub fn refresh(&mut self) -> usize {
        if self.created == 0 {
            for record in &mut self.records[..self.size_next] {
                record.alive = false;
            }
            self.size = 0;
            self.size_next = 0;
            return 0;
        }
        self.created = 0;

        let live = self.partition();
        self.size = live;
        self.size_next = live;
        live
    }

    /// Two-pointer in-place partition over `[0, size_next)`. Whole records
    /// are swapped so slot, mask and liveness travel together. No allocation.
    fn partition(&mut self) -> usize {
        let mut forward = 0;
        let mut backward = self.size_next - 1;

        loop {
            // Forward cursor: first dead record.
            loop {
                if forward > backward {
                    return forward;
                }
                if !self.records[forward].alive {
                    break;
                }
                forward += 1;
            }
            // Backward cursor: last live record.
            loop {
                if self.records[backward].alive {
                    break;
                }
                if backward <= forward {
                    return forward;
                }
                backward -= 1;
            }

            // records[forward] is dead, records[backward] is alive and
            // forward < backward, so the swap moves a live record left.
            self.records.swap(forward, backward);
            forward += 1;
            backward -= 1;
        }
    }

    /// Resets every allocated position to inert and both counts to 0.
    pub fn clear(&mut self) {
        for (position, record) in self.records.iter_mut().enumerate() {
            record.slot = position;
            record.mask.reset();
            record.alive = false;
        }
        self.size = 0;
        self.size_next = 0;
        self.created = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityIndex, EntityTable, INITIAL_CAPACITY};

    fn table() -> EntityTable {
        let mut table = EntityTable::new(3);
        table.grow_to(INITIAL_CAPACITY);
        table
    }

    #[test]
    fn growth_policy_pads_then_doubles() {
        let mut table = EntityTable::new(3);
        assert_eq!(table.required_capacity(), Some(20));
        table.grow_to(INITIAL_CAPACITY);
        assert_eq!(table.required_capacity(), None);

        for _ in 0..INITIAL_CAPACITY {
            table.create();
        }
        assert_eq!(table.required_capacity(), Some(220));
    }

    #[test]
    fn create_returns_consecutive_positions() {
        let mut table = table();
        assert_eq!(table.create().position(), 0);
        assert_eq!(table.create().position(), 1);
        assert_eq!(table.create().position(), 2);
        assert_eq!(table.attempt_count(), 3);
        assert_eq!(table.size(), 0, "live count settles at refresh");
    }

    #[test]
    fn refresh_without_kills_keeps_everyone() {
        let mut table = table();
        for _ in 0..10 {
            table.create();
        }
        assert_eq!(table.refresh(), 10);
        for position in 0..10 {
            assert!(table.is_alive(EntityIndex { index: position }));
        }
    }

    #[test]
    fn refresh_partitions_live_records_to_the_front() {
        let mut table = table();
        let handles: Vec<_> = (0..6).map(|_| table.create()).collect();
        // Kill positions 0, 2 and 5.
        table.kill(handles[0]);
        table.kill(handles[2]);
        table.kill(handles[5]);

        assert_eq!(table.refresh(), 3);
        for position in 0..3 {
            assert!(table.record_at(position).alive);
        }
        for position in 3..6 {
            assert!(!table.record_at(position).alive);
        }
    }

    #[test]
    fn slots_travel_with_swapped_records() {
        let mut table = table();
        let handles: Vec<_> = (0..4).map(|_| table.create()).collect();
        table.kill(handles[0]);
        table.kill(handles[1]);

        table.refresh();
        // The survivors started at positions 2 and 3; their slots
        // must have moved with them into the live prefix.
        let mut slots = [table.record_at(0).slot, table.record_at(1).slot];
        slots.sort_unstable();
        assert_eq!(slots, [2, 3]);
    }

    #[test]
    fn refresh_with_all_dead_yields_zero() {
        let mut table = table();
        let handles: Vec<_> = (0..5).map(|_| table.create()).collect();
        for handle in handles {
            table.kill(handle);
        }
        assert_eq!(table.refresh(), 0);
        assert_eq!(table.attempt_count(), 0);
    }

    #[test]
    fn refresh_without_creations_drops_all_liveness() {
        let mut table = table();
        for _ in 0..4 {
            table.create();
        }
        assert_eq!(table.refresh(), 4);

        // No creations since the last refresh: the whole generation is
        // discarded, even records that were never killed.
        assert_eq!(table.refresh(), 0);
        assert_eq!(table.size(), 0);
        assert_eq!(table.attempt_count(), 0);
        for position in 0..4 {
            assert!(!table.record_at(position).alive);
        }
    }

    #[test]
    fn positions_are_reusable_after_refresh() {
        let mut table = table();
        let doomed = table.create();
        table.create();
        table.kill(doomed);
        assert_eq!(table.refresh(), 1);

        // The next creation reuses position 1, right after the live prefix.
        let recycled = table.create();
        assert_eq!(recycled.position(), 1);
        assert!(table.is_alive(recycled));
    }

    #[test]
    fn clear_resets_everything() {
        let mut table = table();
        for _ in 0..7 {
            table.create();
        }
        table.refresh();
        table.clear();

        assert_eq!(table.size(), 0);
        assert_eq!(table.attempt_count(), 0);
        assert_eq!(table.capacity(), INITIAL_CAPACITY);
        for position in 0..table.capacity() {
            let record = table.record_at(position);
            assert!(!record.alive);
            assert_eq!(record.slot, position);
        }
    }
}
