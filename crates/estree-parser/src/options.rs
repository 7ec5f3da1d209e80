use serde::{Deserialize, Serialize};

/// Parser configuration.
///
/// Deserializes from the camelCase JSON form, e.g.
/// `{"module": true, "loc": true, "disableWebCompat": true}`. Missing fields
/// take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParserOptions {
    /// Parse with the module goal (implies strict mode).
    pub module: bool,

    /// Start in strict mode.
    pub strict: bool,

    /// Reject Annex B web-compatibility syntax: HTML-like comments, sibling
    /// block function redeclarations, labelled functions, `for (var x = 0 in y)`.
    pub disable_web_compat: bool,

    /// Attach line/column locations to every node.
    pub loc: bool,

    /// Enable staged grammar: import attributes and the `import()` options
    /// argument.
    pub next: bool,

    /// Attach the source text to literals (`Literal.raw`).
    pub raw: bool,
}

/// The goal symbol a Program was parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Script,
    Module,
}

impl SourceType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Module => "module",
        }
    }
}

impl ParserOptions {
    /// Options for the script goal.
    #[must_use]
    pub fn script() -> Self {
        Self::default()
    }

    /// Options for the module goal.
    #[must_use]
    pub fn module() -> Self {
        Self::default().with_module(true)
    }

    /// The goal selected by these options.
    #[must_use]
    pub fn source_type(&self) -> SourceType {
        if self.module {
            SourceType::Module
        } else {
            SourceType::Script
        }
    }

    /// Set the module goal.
    #[must_use]
    pub fn with_module(mut self, module: bool) -> Self {
        self.module = module;
        self
    }

    /// Set strict mode.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set web-compatibility suppression.
    #[must_use]
    pub fn with_disable_web_compat(mut self, disable: bool) -> Self {
        self.disable_web_compat = disable;
        self
    }

    /// Set location tracking.
    #[must_use]
    pub fn with_loc(mut self, loc: bool) -> Self {
        self.loc = loc;
        self
    }

    /// Set staged grammar.
    #[must_use]
    pub fn with_next(mut self, next: bool) -> Self {
        self.next = next;
        self
    }

    /// Set raw literal text.
    #[must_use]
    pub fn with_raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }
}
