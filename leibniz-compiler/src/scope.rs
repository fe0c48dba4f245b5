use std::collections::HashMap;

use thiserror::Error;
use tracing::trace;

use crate::typed_ast::{Function, Variable};
use crate::types::Type;

/// A name-bound thing.
#[derive(Debug, Clone)]
pub enum Entity {
    Variable(Variable),
    Function(Function),
    /// A shape instance bound by `obj`.
    Object(Variable),
}

impl Entity {
    pub fn ty(&self) -> Type {
        match self {
            Entity::Variable(variable) => variable.ty.clone(),
            Entity::Function(function) => function.ty(),
            Entity::Object(object) => object.ty.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Root,
    Block,
    Loop,
    Function,
}

/// The function whose body encloses a scope.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionContext {
    pub name: String,
    pub return_type: Type,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Identifier {0} already declared in this scope")]
pub struct DuplicateName(pub String);

#[derive(Debug)]
pub struct Scope {
    kind: ScopeKind,
    in_loop: bool,
    function: Option<FunctionContext>,
    entities: HashMap<String, Entity>,
}

impl Scope {
    fn root() -> Self {
        Self {
            kind: ScopeKind::Root,
            in_loop: false,
            function: None,
            entities: HashMap::new(),
        }
    }

    /// A nested scope. Loop scopes set the loop marker, function scopes clear it,
    /// blocks inherit it.
    fn child(&self, kind: ScopeKind, function: Option<FunctionContext>) -> Self {
        let in_loop = match kind {
            ScopeKind::Loop => true,
            ScopeKind::Function | ScopeKind::Root => false,
            ScopeKind::Block => self.in_loop,
        };
        let function = match kind {
            ScopeKind::Function => function,
            _ => self.function.clone(),
        };
        Self {
            kind,
            in_loop,
            function,
            entities: HashMap::new(),
        }
    }
}

/// Stack of lexical scopes, innermost last.
#[derive(Debug)]
pub struct ScopeChain {
    scopes: Vec<Scope>,
    next_entity_id: usize,
}

impl Default for ScopeChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeChain {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::root()],
            next_entity_id: 1,
        }
    }

    pub fn push(&mut self, kind: ScopeKind) {
        let child = self.current().child(kind, None);
        trace!(?kind, depth = self.scopes.len(), "push scope");
        self.scopes.push(child);
    }

    pub fn push_function(&mut self, context: FunctionContext) {
        let child = self.current().child(ScopeKind::Function, Some(context));
        trace!(depth = self.scopes.len(), "push function scope");
        self.scopes.push(child);
    }

    pub fn pop(&mut self) {
        if self.scopes.len() > 1 {
            let scope = self.scopes.pop();
            trace!(kind = ?scope.map(|s| s.kind), depth = self.scopes.len(), "pop scope");
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn declare(&mut self, name: &str, entity: Entity) -> Result<(), DuplicateName> {
        let scope = self.current_mut();
        if scope.entities.contains_key(name) {
            return Err(DuplicateName(name.to_string()));
        }
        scope.entities.insert(name.to_string(), entity);
        Ok(())
    }

    pub fn is_declared_locally(&self, name: &str) -> bool {
        self.current().entities.contains_key(name)
    }

    pub fn lookup(&self, name: &str) -> Option<&Entity> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.entities.get(name))
    }

    pub fn in_loop(&self) -> bool {
        self.current().in_loop
    }

    pub fn enclosing_function(&self) -> Option<&FunctionContext> {
        self.current().function.as_ref()
    }

    /// Fresh identity for a new entity; the generator derives target names from it.
    pub fn allocate_id(&mut self) -> usize {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    fn current(&self) -> &Scope {
        self.scopes
            .last()
            .unwrap_or_else(|| unreachable!("scope chain always holds the root scope"))
    }

    fn current_mut(&mut self) -> &mut Scope {
        self.scopes
            .last_mut()
            .unwrap_or_else(|| unreachable!("scope chain always holds the root scope"))
    }
}
