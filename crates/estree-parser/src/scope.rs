//! Binding tracking and redeclaration rules.
//!
//! The parser keeps a [`ScopeStack`] of open scopes. Each [`Scope`] records
//! the names declared directly in it and refers to its parent by index, which
//! is how `var` declarations find the function scope they hoist to. Conflicts
//! are reported as soon as the offending declaration is seen. Duplicate
//! parameters are the exception: they are only an error once the function's
//! strictness is known, so the parser collects them and decides after the
//! body's directive prologue.

use rustc_hash::FxHashMap;

use crate::context::Context;
use crate::error::ErrorKind;

/// The kind of a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Top level of a script.
    Script,
    /// Top level of a module.
    Module,
    /// Formal parameters of a function or arrow.
    Parameters,
    /// Top level of a function body; parent is the matching `Parameters`.
    FunctionBody,
    /// A `{ ... }` block, including switch case blocks.
    Block,
    /// The parameter of a `catch` clause; the catch body is a child `Block`.
    Catch,
    /// The head of a `for` loop declaring `let`/`const`.
    ForHead,
    /// A class static initialization block.
    StaticBlock,
}

impl ScopeKind {
    /// Returns `true` if `var` declarations stop here.
    pub fn is_var_boundary(self) -> bool {
        matches!(
            self,
            ScopeKind::Script | ScopeKind::Module | ScopeKind::FunctionBody | ScopeKind::StaticBlock
        )
    }
}

/// The syntactic origin of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// `var` declaration.
    Var,
    /// `var` in the head of a `for-of` loop.
    ForOfVar,
    /// Function declared at the top of a function body or script; var-scoped.
    VarFunction,
    Let,
    Const,
    Class,
    /// Function declared in a block or at module top level; lexically
    /// scoped. `plain` is false for async and generator functions.
    Function { plain: bool },
    /// A formal parameter.
    Parameter,
    /// A `catch (e)` parameter that is a single identifier.
    CatchParameter,
    /// A name bound by a destructuring `catch` parameter.
    CatchPattern,
    /// A binding introduced by an `import` declaration.
    Import,
}

impl BindingKind {
    /// Returns `true` for `var` and var-scoped functions.
    pub fn is_var_scoped(self) -> bool {
        matches!(self, BindingKind::Var | BindingKind::ForOfVar | BindingKind::VarFunction)
    }
}

/// A single scope record.
#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    /// Index of the enclosing scope in the stack.
    pub parent: Option<usize>,
    /// Names declared directly in this scope.
    bindings: FxHashMap<String, BindingKind>,
    /// For `Parameters` scopes: whether the list holds only plain identifiers.
    pub simple_parameters: bool,
}

impl Scope {
    fn new(kind: ScopeKind, parent: Option<usize>) -> Self {
        Self {
            kind,
            parent,
            bindings: FxHashMap::default(),
            simple_parameters: true,
        }
    }

    /// How `name` is bound directly in this scope.
    pub fn binding(&self, name: &str) -> Option<BindingKind> {
        self.bindings.get(name).copied()
    }
}

/// The stack of open scopes.
#[derive(Debug, Clone)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    /// A stack holding only the top-level scope.
    pub fn new(module: bool) -> Self {
        let kind = if module { ScopeKind::Module } else { ScopeKind::Script };
        Self { scopes: vec![Scope::new(kind, None)] }
    }

    /// Enter a nested scope.
    pub fn push(&mut self, kind: ScopeKind) {
        let parent = self.scopes.len() - 1;
        self.scopes.push(Scope::new(kind, Some(parent)));
    }

    /// Leave the innermost scope. The top-level scope is never popped.
    pub fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// The innermost scope.
    pub fn current(&self) -> &Scope {
        &self.scopes[self.scopes.len() - 1]
    }

    pub fn current_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    /// The top-level scope.
    pub fn root(&self) -> &Scope {
        &self.scopes[0]
    }

    /// Declare `name` in the innermost scope (hoisting `var`-scoped kinds to
    /// the nearest function or top-level scope).
    pub fn declare(&mut self, name: &str, kind: BindingKind, ctx: Context) -> Result<(), ErrorKind> {
        match kind {
            BindingKind::Var | BindingKind::ForOfVar => self.declare_var(name, kind, ctx),
            BindingKind::Parameter => {
                // Duplicate parameters are validated by the caller once the
                // function's strictness is known.
                self.current_mut().bindings.insert(name.to_string(), kind);
                Ok(())
            }
            _ => self.declare_lexical(name, kind, ctx),
        }
    }

    /// Declare a formal parameter. Returns `false` if the name was already
    /// bound in the same parameter list.
    pub fn declare_parameter(&mut self, name: &str) -> bool {
        self.current_mut()
            .bindings
            .insert(name.to_string(), BindingKind::Parameter)
            .is_none()
    }

    fn declare_var(&mut self, name: &str, kind: BindingKind, ctx: Context) -> Result<(), ErrorKind> {
        let mut index = self.scopes.len() - 1;
        loop {
            let scope = &mut self.scopes[index];
            match scope.bindings.get(name).copied() {
                None => {
                    scope.bindings.insert(name.to_string(), kind);
                }
                Some(existing) if existing.is_var_scoped() || existing == BindingKind::Parameter => {}
                // `try {} catch (e) { var e }` is allowed for a simple catch
                // parameter, except when the var is a for-of binding.
                Some(BindingKind::CatchParameter)
                    if kind != BindingKind::ForOfVar && !ctx.contains(Context::DISABLE_WEB_COMPAT) => {}
                Some(_) => return Err(ErrorKind::DuplicateBinding(name.to_string())),
            }
            if scope.kind.is_var_boundary() {
                return Ok(());
            }
            match scope.parent {
                Some(parent) => index = parent,
                None => return Ok(()),
            }
        }
    }

    fn declare_lexical(&mut self, name: &str, kind: BindingKind, ctx: Context) -> Result<(), ErrorKind> {
        let index = self.scopes.len() - 1;
        let scope = &self.scopes[index];

        if let Some(existing) = scope.binding(name) {
            let allowed = match (existing, kind) {
                // Var-scoped functions at function/script top level behave like `var`.
                (existing, BindingKind::VarFunction) => existing.is_var_scoped(),
                // Sibling plain function declarations in a sloppy block.
                (BindingKind::Function { plain: true }, BindingKind::Function { plain: true }) => {
                    scope.kind == ScopeKind::Block && ctx.web_compat()
                }
                _ => false,
            };
            if !allowed {
                return Err(ErrorKind::DuplicateBinding(name.to_string()));
            }
        }

        // Body-level lexical names may not shadow parameters, and a catch
        // body may not redeclare the catch parameter.
        if kind != BindingKind::VarFunction {
            if let Some(parent) = scope.parent.map(|p| &self.scopes[p]) {
                let shadows_enclosing = match (scope.kind, parent.kind) {
                    (ScopeKind::FunctionBody, ScopeKind::Parameters) => parent.binding(name).is_some(),
                    (ScopeKind::Block, ScopeKind::Catch) => parent.binding(name).is_some(),
                    _ => false,
                };
                if shadows_enclosing {
                    return Err(ErrorKind::DuplicateBinding(name.to_string()));
                }
            }
        }

        self.scopes[index].bindings.entry(name.to_string()).or_insert(kind);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sloppy() -> Context {
        Context::empty()
    }

    fn strict() -> Context {
        Context::STRICT
    }

    fn dup(name: &str) -> Result<(), ErrorKind> {
        Err(ErrorKind::DuplicateBinding(name.into()))
    }

    #[test]
    fn test_var_var_never_conflicts() {
        let mut scopes = ScopeStack::new(false);
        assert_eq!(scopes.declare("a", BindingKind::Var, strict()), Ok(()));
        assert_eq!(scopes.declare("a", BindingKind::Var, strict()), Ok(()));
    }

    #[test]
    fn test_lexical_conflicts() {
        let mut scopes = ScopeStack::new(false);
        scopes.declare("a", BindingKind::Const, sloppy()).unwrap();
        assert_eq!(scopes.declare("a", BindingKind::Const, sloppy()), dup("a"));
        assert_eq!(scopes.declare("a", BindingKind::Var, sloppy()), dup("a"));

        let mut scopes = ScopeStack::new(false);
        scopes.declare("b", BindingKind::Var, sloppy()).unwrap();
        assert_eq!(scopes.declare("b", BindingKind::Let, sloppy()), dup("b"));
    }

    #[test]
    fn test_var_hoists_through_blocks() {
        let mut scopes = ScopeStack::new(false);
        scopes.declare("x", BindingKind::Let, sloppy()).unwrap();
        scopes.push(ScopeKind::Block);
        assert_eq!(scopes.declare("x", BindingKind::Var, sloppy()), dup("x"));

        let mut scopes = ScopeStack::new(false);
        scopes.push(ScopeKind::Block);
        scopes.declare("y", BindingKind::Var, sloppy()).unwrap();
        scopes.pop();
        assert_eq!(scopes.declare("y", BindingKind::Let, sloppy()), dup("y"));
    }

    #[test]
    fn test_sibling_scopes_do_not_conflict() {
        let mut scopes = ScopeStack::new(false);
        scopes.push(ScopeKind::Block);
        scopes.declare("a", BindingKind::Var, sloppy()).unwrap();
        scopes.pop();
        scopes.push(ScopeKind::Block);
        assert_eq!(scopes.declare("a", BindingKind::Let, sloppy()), Ok(()));
    }

    #[test]
    fn test_body_lexical_conflicts_with_parameter() {
        let mut scopes = ScopeStack::new(false);
        scopes.push(ScopeKind::Parameters);
        assert!(scopes.declare_parameter("a"));
        assert!(!scopes.declare_parameter("a"));
        scopes.push(ScopeKind::FunctionBody);
        assert_eq!(scopes.declare("a", BindingKind::Var, sloppy()), Ok(()));
        assert_eq!(scopes.declare("a", BindingKind::VarFunction, sloppy()), Ok(()));
        assert_eq!(scopes.declare("a", BindingKind::Let, sloppy()), dup("a"));
    }

    #[test]
    fn test_block_function_redeclaration() {
        let plain = BindingKind::Function { plain: true };
        let mut scopes = ScopeStack::new(false);
        scopes.push(ScopeKind::Block);
        scopes.declare("f", plain, sloppy()).unwrap();
        assert_eq!(scopes.declare("f", plain, sloppy()), Ok(()));
        assert_eq!(scopes.declare("f", BindingKind::Function { plain: false }, sloppy()), dup("f"));
        assert_eq!(scopes.declare("f", plain, Context::DISABLE_WEB_COMPAT), dup("f"));
        assert_eq!(scopes.declare("f", plain, strict()), dup("f"));
    }

    #[test]
    fn test_module_functions_are_lexical() {
        let plain = BindingKind::Function { plain: true };
        let mut scopes = ScopeStack::new(true);
        scopes.declare("f", plain, Context::MODULE).unwrap();
        assert_eq!(scopes.declare("f", plain, Context::MODULE), dup("f"));
    }

    #[test]
    fn test_script_functions_are_var_scoped() {
        let mut scopes = ScopeStack::new(false);
        scopes.declare("f", BindingKind::VarFunction, sloppy()).unwrap();
        assert_eq!(scopes.declare("f", BindingKind::VarFunction, sloppy()), Ok(()));
        assert_eq!(scopes.declare("f", BindingKind::Var, sloppy()), Ok(()));
        assert_eq!(scopes.declare("f", BindingKind::Let, sloppy()), dup("f"));
    }

    #[test]
    fn test_catch_parameter_rules() {
        let mut scopes = ScopeStack::new(false);
        scopes.push(ScopeKind::Catch);
        scopes.declare("e", BindingKind::CatchParameter, sloppy()).unwrap();
        scopes.push(ScopeKind::Block);
        assert_eq!(scopes.declare("e", BindingKind::Var, sloppy()), Ok(()));
        assert_eq!(scopes.declare("e", BindingKind::ForOfVar, sloppy()), dup("e"));
        assert_eq!(scopes.declare("e", BindingKind::Let, sloppy()), dup("e"));
    }

    #[test]
    fn test_catch_pattern_rejects_var() {
        let mut scopes = ScopeStack::new(false);
        scopes.push(ScopeKind::Catch);
        scopes.declare("e", BindingKind::CatchPattern, sloppy()).unwrap();
        assert_eq!(scopes.declare("e", BindingKind::CatchPattern, sloppy()), dup("e"));
        scopes.push(ScopeKind::Block);
        assert_eq!(scopes.declare("e", BindingKind::Var, sloppy()), dup("e"));
    }

    #[test]
    fn test_root_records_top_level_names() {
        let mut scopes = ScopeStack::new(true);
        scopes.declare("a", BindingKind::Import, Context::MODULE).unwrap();
        scopes.push(ScopeKind::Block);
        scopes.declare("b", BindingKind::Var, Context::MODULE).unwrap();
        scopes.pop();
        assert_eq!(scopes.root().binding("a"), Some(BindingKind::Import));
        assert_eq!(scopes.root().binding("b"), Some(BindingKind::Var));
    }
}
