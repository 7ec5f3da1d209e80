//! Parsing context flags.
//!
//! A [`Context`] is passed by value into every parsing routine. Nested
//! constructs derive their own set from the enclosing one and never mutate
//! the caller's copy.

use bitflags::bitflags;

use crate::options::ParserOptions;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Context: u32 {
        /// Strict mode code.
        const STRICT = 1 << 0;
        /// Module goal.
        const MODULE = 1 << 1;
        /// Disable Annex B web-compatibility leniencies.
        const DISABLE_WEB_COMPAT = 1 << 2;
        /// Staged grammar (import attributes, `import()` options).
        const NEXT = 1 << 3;
        /// `in` is a binary operator (cleared in `for` heads).
        const ALLOW_IN = 1 << 4;
        /// Parsing formal parameters.
        const IN_PARAMETERS = 1 << 5;
        /// Inside a function body; `return` is legal.
        const IN_FUNCTION_BODY = 1 << 6;
        /// `await` is an operator.
        const ASYNC = 1 << 7;
        /// `yield` is an operator.
        const YIELD = 1 << 8;
        /// Inside a loop body; unlabelled `continue` is legal.
        const IN_ITERATION = 1 << 9;
        /// Inside a switch; unlabelled `break` is legal.
        const IN_SWITCH = 1 << 10;
        const ALLOW_NEW_TARGET = 1 << 11;
        const ALLOW_SUPER_PROPERTY = 1 << 12;
        const ALLOW_SUPER_CALL = 1 << 13;
        /// Field initializer or static block; `arguments` is forbidden.
        const IN_CLASS_FIELD = 1 << 14;
        /// Static block; `await` may not be an identifier.
        const IN_STATIC_BLOCK = 1 << 15;
        /// Directly in the Program body; `import`/`export` declarations are legal.
        const TOP_LEVEL = 1 << 16;
    }
}

impl Context {
    /// Flags that flow unchanged into every nested function.
    const INHERITED: Self = Self::STRICT
        .union(Self::MODULE)
        .union(Self::DISABLE_WEB_COMPAT)
        .union(Self::NEXT);

    /// Flags that an arrow function takes over from its enclosing code.
    const ARROW_INHERITED: Self = Self::INHERITED
        .union(Self::ALLOW_NEW_TARGET)
        .union(Self::ALLOW_SUPER_PROPERTY)
        .union(Self::ALLOW_SUPER_CALL)
        .union(Self::IN_CLASS_FIELD);

    /// The context of a Program body.
    pub fn for_program(options: &ParserOptions) -> Self {
        let mut ctx = Self::TOP_LEVEL | Self::ALLOW_IN;
        if options.module {
            // Module code is strict and allows top-level await.
            ctx |= Self::MODULE | Self::STRICT | Self::ASYNC;
        }
        if options.strict {
            ctx |= Self::STRICT;
        }
        if options.disable_web_compat {
            ctx |= Self::DISABLE_WEB_COMPAT;
        }
        if options.next {
            ctx |= Self::NEXT;
        }
        ctx
    }

    /// Set or clear `flags`.
    #[inline]
    #[must_use]
    pub fn with(self, flags: Self, on: bool) -> Self {
        if on {
            self | flags
        } else {
            self - flags
        }
    }

    /// The context for the parameters and body of a non-arrow function.
    #[must_use]
    pub fn enter_function(self, is_async: bool, is_generator: bool) -> Self {
        ((self & Self::INHERITED) | Self::IN_FUNCTION_BODY | Self::ALLOW_IN | Self::ALLOW_NEW_TARGET)
            .with(Self::ASYNC, is_async)
            .with(Self::YIELD, is_generator)
    }

    /// The context for the parameters and body of an arrow function.
    #[must_use]
    pub fn enter_arrow(self, is_async: bool) -> Self {
        ((self & Self::ARROW_INHERITED) | Self::IN_FUNCTION_BODY | Self::ALLOW_IN)
            .with(Self::ASYNC, is_async)
    }

    /// The context of a class body: always strict.
    #[must_use]
    pub fn enter_class(self) -> Self {
        (self - Self::TOP_LEVEL) | Self::STRICT
    }

    /// The context of a field initializer or (with `is_static_block`) a
    /// static initialization block.
    #[must_use]
    pub fn enter_class_initializer(self, is_static_block: bool) -> Self {
        ((self & Self::INHERITED)
            | Self::STRICT
            | Self::ALLOW_IN
            | Self::IN_CLASS_FIELD
            | Self::ALLOW_NEW_TARGET
            | Self::ALLOW_SUPER_PROPERTY)
            .with(Self::IN_STATIC_BLOCK, is_static_block)
    }

    /// Contexts where the directive prologue and bindings are module-scoped.
    #[inline]
    pub fn is_module(self) -> bool {
        self.contains(Self::MODULE)
    }

    #[inline]
    pub fn is_strict(self) -> bool {
        self.contains(Self::STRICT)
    }

    /// Annex B leniencies apply: sloppy script code without
    /// `DISABLE_WEB_COMPAT`.
    #[inline]
    pub fn web_compat(self) -> bool {
        !self.intersects(Self::STRICT | Self::MODULE | Self::DISABLE_WEB_COMPAT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_program_is_strict_and_async() {
        let ctx = Context::for_program(&ParserOptions::default().with_module(true));
        assert!(ctx.contains(Context::STRICT | Context::MODULE | Context::ASYNC | Context::TOP_LEVEL));
        assert!(!ctx.web_compat());
    }

    #[test]
    fn test_function_does_not_inherit_async_or_loop_state() {
        let outer = Context::for_program(&ParserOptions::default().with_module(true))
            | Context::IN_ITERATION
            | Context::YIELD;
        let inner = outer.enter_function(false, false);
        assert!(inner.contains(Context::STRICT | Context::MODULE | Context::IN_FUNCTION_BODY));
        assert!(!inner.intersects(Context::ASYNC | Context::YIELD | Context::IN_ITERATION | Context::TOP_LEVEL));

        let generator = outer.enter_function(true, true);
        assert!(generator.contains(Context::ASYNC | Context::YIELD));
    }

    #[test]
    fn test_arrow_keeps_super_and_field_restrictions() {
        let field = Context::default().enter_class_initializer(false);
        let arrow = field.enter_arrow(false);
        assert!(arrow.contains(Context::IN_CLASS_FIELD | Context::ALLOW_SUPER_PROPERTY));
        assert!(arrow.contains(Context::IN_FUNCTION_BODY));
    }

    #[test]
    fn test_static_block() {
        let ctx = Context::default().enter_class().enter_class_initializer(true);
        assert!(ctx.contains(Context::STRICT | Context::IN_STATIC_BLOCK));
        assert!(!ctx.contains(Context::IN_FUNCTION_BODY));
    }
}
