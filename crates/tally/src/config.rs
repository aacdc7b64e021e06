//! Book configuration.

/// Configuration supplied when opening a [`Book`](crate::Book).
///
/// There is no global state: two books may run different precisions side
/// by side, but all writes to one book must share one precision, since
/// stored minor units are only comparable at the scale they were written
/// with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookConfig {
    /// Number of decimal places amounts are kept to. Caller-supplied
    /// amounts are rounded half away from zero at this precision before
    /// they enter the integer minor-unit domain.
    pub precision: u32,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self { precision: 2 }
    }
}
