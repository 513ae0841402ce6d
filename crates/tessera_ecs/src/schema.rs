use crate::component::{Component, ComponentId, ComponentInfo};
use crate::signature::SignatureId;
use crate::storage;
use std::any::{TypeId, type_name};
use std::collections::HashMap;
use thiserror::Error;

/// A schema declaration mistake. These are setup-time failures; once a
/// [`Schema`] is built, no declaration error can occur at runtime.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("component kind `{0}` is already registered")]
    DuplicateComponent(&'static str),
    #[error("signature `{0}` is already declared")]
    DuplicateSignature(String),
    #[error("signature `{name}` references unknown component kind id {kind}")]
    UnknownKind { name: String, kind: ComponentId },
    #[error("signature `{0}` must require at least one component kind")]
    EmptySignature(String),
}

#[derive(Debug, Clone)]
pub(crate) struct SignatureDecl {
    pub name: String,
    pub kinds: Box<[ComponentId]>,
}

/// Builder for the fixed catalogue of component kinds and signatures.
///
/// Kinds get ids in registration order, signatures in declaration order.
/// Both catalogues are frozen by [`SchemaBuilder::build`]; there is no
/// runtime registration.
#[derive(Default)]
pub struct SchemaBuilder {
    kinds: Vec<ComponentInfo>,
    kinds_by_type: HashMap<TypeId, ComponentId>,
    signatures: Vec<SignatureDecl>,
    signatures_by_name: HashMap<String, SignatureId>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a component kind and returns its id, equal to its position
    /// in the catalogue.
    pub fn register<C: Component>(&mut self) -> Result<ComponentId, SchemaError> {
        let type_id = TypeId::of::<C>();
        if self.kinds_by_type.contains_key(&type_id) {
            return Err(SchemaError::DuplicateComponent(type_name::<C>()));
        }

        let id = self.kinds.len();
        self.kinds.push(ComponentInfo {
            name: type_name::<C>(),
            new_column: storage::new_column::<C>,
        });
        self.kinds_by_type.insert(type_id, id);
        Ok(id)
    }

    /// Declares a named signature over previously registered kinds. The
    /// declared order of `kinds` is preserved and drives the order in which
    /// matching iteration exposes components.
    pub fn signature(
        &mut self,
        name: &str,
        kinds: &[ComponentId],
    ) -> Result<SignatureId, SchemaError> {
        if self.signatures_by_name.contains_key(name) {
            return Err(SchemaError::DuplicateSignature(name.to_owned()));
        }
        if kinds.is_empty() {
            return Err(SchemaError::EmptySignature(name.to_owned()));
        }
        for &kind in kinds {
            if kind >= self.kinds.len() {
                return Err(SchemaError::UnknownKind {
                    name: name.to_owned(),
                    kind,
                });
            }
        }

        let id = SignatureId(self.signatures.len());
        self.signatures.push(SignatureDecl {
            name: name.to_owned(),
            kinds: kinds.into(),
        });
        self.signatures_by_name.insert(name.to_owned(), id);
        Ok(id)
    }

    pub fn build(self) -> Schema {
        Schema {
            kinds: self.kinds,
            kinds_by_type: self.kinds_by_type,
            signatures: self.signatures,
            signatures_by_name: self.signatures_by_name,
        }
    }
}

/// Immutable lookup tables for the declared kinds and signatures.
pub struct Schema {
    kinds: Vec<ComponentInfo>,
    kinds_by_type: HashMap<TypeId, ComponentId>,
    signatures: Vec<SignatureDecl>,
    signatures_by_name: HashMap<String, SignatureId>,
}

impl Schema {
    pub fn component_count(&self) -> usize {
        self.kinds.len()
    }

    pub fn signature_count(&self) -> usize {
        self.signatures.len()
    }

    pub fn component_id<C: Component>(&self) -> Option<ComponentId> {
        self.kinds_by_type.get(&TypeId::of::<C>()).copied()
    }

    pub fn is_component<C: Component>(&self) -> bool {
        self.component_id::<C>().is_some()
    }

    pub fn signature_id(&self, name: &str) -> Option<SignatureId> {
        self.signatures_by_name.get(name).copied()
    }

    pub fn is_signature(&self, name: &str) -> bool {
        self.signature_id(name).is_some()
    }

    /// The signature's required kinds, in declared order.
    pub fn signature_kinds(&self, signature: SignatureId) -> &[ComponentId] {
        &self.signatures[signature.0].kinds
    }

    pub fn signature_name(&self, signature: SignatureId) -> &str {
        &self.signatures[signature.0].name
    }

    /// The registered type name of a kind, for diagnostics.
    pub fn component_name(&self, kind: ComponentId) -> &'static str {
        self.kinds[kind].name
    }

    /// Resolves a kind id, treating an undeclared kind as the contract
    /// violation it is.
    pub(crate) fn expect_component_id<C: Component>(&self) -> ComponentId {
        self.component_id::<C>().unwrap_or_else(|| {
            panic!(
                "component kind `{}` is not part of the schema",
                type_name::<C>()
            )
        })
    }

    pub(crate) fn kinds(&self) -> &[ComponentInfo] {
        &self.kinds
    }

    pub(crate) fn signatures(&self) -> &[SignatureDecl] {
        &self.signatures
    }
}
