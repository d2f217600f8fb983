//! Output token budgets per request kind.

/// Planning: a short JSON array of filenames.
pub const PLAN_TOKENS: u32 = 500;

/// One source file and its tests, returned together as JSON.
pub const PAIR_TOKENS: u32 = 6000;

/// One source file on its own.
pub const SOURCE_TOKENS: u32 = 3000;

/// Test stubs for one generated source file.
pub const STUB_TOKENS: u32 = 2000;

/// Maximum output size requested for each kind of call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBudgets {
    /// Planning call.
    pub plan: u32,
    /// Combined source and test generation.
    pub pair: u32,
    /// Source-only generation.
    pub source: u32,
    /// Test stub generation.
    pub stubs: u32,
}

impl Default for TokenBudgets {
    fn default() -> Self {
        Self {
            plan: PLAN_TOKENS,
            pair: PAIR_TOKENS,
            source: SOURCE_TOKENS,
            stubs: STUB_TOKENS,
        }
    }
}
