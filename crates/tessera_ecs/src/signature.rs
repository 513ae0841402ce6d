use crate::mask::KindMask;
use crate::schema::Schema;

/// Stable integer id of a declared signature.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SignatureId(pub(crate) usize);

/// One precomputed kind mask per declared signature.
///
/// Built once from the schema; matching an entity against a signature is a
/// single superset test between two fixed-width masks.
pub(crate) struct SignatureIndex {
    masks: Vec<KindMask>,
}

impl SignatureIndex {
    pub fn new(schema: &Schema) -> Self {
        let width = schema.component_count();
        let masks = schema
            .signatures()
            .iter()
            .map(|decl| {
                let mut mask = KindMask::empty(width);
                for &kind in &decl.kinds {
                    mask.set(kind);
                }
                mask
            })
            .collect();
        Self { masks }
    }

    pub fn mask(&self, signature: SignatureId) -> &KindMask {
        &self.masks[signature.0]
    }
}

#[cfg(test)]
mod tests {
    use super::SignatureIndex;
    use crate::component::Component;
    use crate::schema::SchemaBuilder;

    #[derive(Default)]
    struct Health;
    impl Component for Health {}

    #[derive(Default)]
    struct Circle;
    impl Component for Circle {}

    #[derive(Default)]
    struct Input;
    impl Component for Input {}

    #[test]
    fn masks_carry_exactly_the_declared_kinds() {
        let mut builder = SchemaBuilder::new();
        let health = builder.register::<Health>().unwrap();
        let circle = builder.register::<Circle>().unwrap();
        let input = builder.register::<Input>().unwrap();
        let velocity = builder.signature("velocity", &[input, circle]).unwrap();
        let life = builder.signature("life", &[health]).unwrap();
        let schema = builder.build();

        let index = SignatureIndex::new(&schema);
        let velocity_mask = index.mask(velocity);
        assert!(velocity_mask.test(input));
        assert!(velocity_mask.test(circle));
        assert!(!velocity_mask.test(health));

        let life_mask = index.mask(life);
        assert!(life_mask.test(health));
        assert!(!life_mask.test(input));
    }
}
