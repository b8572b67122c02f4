use std::fmt;

use crate::error::SemanticError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Constant,
    Variable,
    Procedure,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SymbolKind::Constant => "constant",
            SymbolKind::Variable => "variable",
            SymbolKind::Procedure => "procedure",
        })
    }
}

/// How an identifier is being used at a reference site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Usage {
    /// Target of `:=` or `read... into`.
    Assign,
    /// Operand of an expression or a print statement.
    Value,
    /// Operand of `call`.
    Call,
}

impl Usage {
    pub(crate) fn requirement(&self) -> &'static str {
        match self {
            Usage::Assign => "must be a variable",
            Usage::Value => "must not be a procedure",
            Usage::Call => "must be a procedure",
        }
    }

    fn accepts(&self, kind: SymbolKind) -> bool {
        match self {
            Usage::Assign => kind == SymbolKind::Variable,
            Usage::Value => kind != SymbolKind::Procedure,
            Usage::Call => kind == SymbolKind::Procedure,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolEntry {
    pub name: String,
    pub kind: SymbolKind,
    pub depth: usize,
    /// Id of the declaring block; 0 for the sentinel.
    block: usize,
}

/// Declared names in declaration order.
///
/// Constants and variables are removed when the block that declared them
/// ends; procedures stay for the rest of the compilation. Because stale
/// entries are physically gone, the last entry with a given name is always
/// the innermost visible declaration.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
    depth: usize,
    /// Ids of the open blocks, outermost first.
    open: Vec<usize>,
    blocks: usize,
}

impl SymbolTable {
    /// Name of the sentinel entry standing for the outermost procedure.
    pub const ENTRY_NAME: &'static str = "main";

    pub fn new() -> Self {
        Self {
            entries: vec![SymbolEntry {
                name: Self::ENTRY_NAME.to_string(),
                kind: SymbolKind::Procedure,
                depth: 0,
                block: 0,
            }],
            depth: 0,
            open: vec![0],
            blocks: 0,
        }
    }

    /// Number of blocks currently open.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    /// Whether the block that declared `entry` is still open. A procedure
    /// declared inside another procedure stays callable after that block
    /// ends, but the C function it becomes is only visible inside it.
    pub fn declared_in_open_block(&self, entry: &SymbolEntry) -> bool {
        self.open.contains(&entry.block)
    }

    pub fn enter_block(&mut self) {
        self.depth += 1;
        self.blocks += 1;
        self.open.push(self.blocks);
        tracing::debug!(depth = self.depth, "entered block");
    }

    /// Drops the constants and variables of the innermost open block.
    pub fn exit_block(&mut self) {
        let level = self.level();
        let before = self.entries.len();
        self.entries
            .retain(|e| e.kind == SymbolKind::Procedure || e.depth < level);
        self.depth = self.depth.saturating_sub(1);
        self.open.pop();
        tracing::debug!(
            level,
            removed = before - self.entries.len(),
            "exited block"
        );
    }

    /// Nesting level of the innermost open block.
    fn level(&self) -> usize {
        self.depth.saturating_sub(1)
    }

    pub fn declare(&mut self, name: &str, kind: SymbolKind, line: usize) -> Result<(), SemanticError> {
        let depth = self.level();
        if self
            .entries
            .iter()
            .any(|e| e.name == name && e.kind == kind && e.depth == depth)
        {
            return Err(SemanticError::DuplicateSymbol {
                line,
                name: name.to_string(),
                kind,
            });
        }

        tracing::debug!(name, %kind, depth, "declared symbol");
        let block = self.open.last().copied().unwrap_or_default();
        self.entries.push(SymbolEntry {
            name: name.to_string(),
            kind,
            depth,
            block,
        });
        Ok(())
    }

    pub fn resolve(&self, name: &str, line: usize) -> Result<&SymbolEntry, SemanticError> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.name == name)
            .ok_or_else(|| SemanticError::UndeclaredIdentifier {
                line,
                name: name.to_string(),
            })
    }

    /// Resolves `name` and verifies its kind fits `usage`.
    pub fn check(&self, name: &str, usage: Usage, line: usize) -> Result<&SymbolEntry, SemanticError> {
        let entry = self.resolve(name, line)?;
        if !usage.accepts(entry.kind) {
            return Err(SemanticError::KindMismatch {
                line,
                name: name.to_string(),
                found: entry.kind,
                usage,
            });
        }
        Ok(entry)
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
