use crate::component::ComponentId;
use bitvec::vec::BitVec;

/// Fixed-width bit vector with one bit per declared component kind.
///
/// The width is locked to the schema's kind count at construction; unlike a
/// growable set, two masks from the same schema can always be compared
/// word-for-word.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct KindMask {
    bits: BitVec,
}

impl KindMask {
    pub fn empty(width: usize) -> Self {
        Self {
            bits: BitVec::repeat(false, width),
        }
    }

    pub fn set(&mut self, id: ComponentId) {
        debug_assert!(id < self.width());
        self.bits.set(id, true);
    }

    pub fn unset(&mut self, id: ComponentId) {
        debug_assert!(id < self.width());
        self.bits.set(id, false);
    }

    pub fn test(&self, id: ComponentId) -> bool {
        debug_assert!(id < self.width());
        self.bits[id]
    }

    /// Clears every bit; the width stays fixed.
    pub fn reset(&mut self) {
        self.bits.fill(false);
    }

    /// Superset test: true iff every bit set in `required` is also set here.
    pub fn contains_all(&self, required: &KindMask) -> bool {
        debug_assert_eq!(self.bits.len(), required.bits.len());
        required.bits.iter_ones().all(|id| self.bits[id])
    }

    pub fn width(&self) -> usize {
        self.bits.len()
    }
}
