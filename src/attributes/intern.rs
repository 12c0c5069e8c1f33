use arcstr::ArcStr;
use hashbrown::HashSet;

/// Cache mapping distinct string contents to one shared allocation.
///
/// The same attribute keys (`gene_id`, `transcript_id`, ...) and many
/// values (biotypes, gene names) recur across millions of records.
/// Interning keeps a single refcounted [`ArcStr`] per distinct content
/// while the sparse row data accumulates. The pool is owned by one load
/// pass and passed by reference; there is no process-global cache.
/// Interned equality is content equality, so interning is never
/// observable in the output.
#[derive(Debug, Default)]
pub struct InternPool {
    cache: HashSet<ArcStr>,
}

impl InternPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the canonical shared instance for `s`.
    ///
    /// Idempotent: interning equal content twice returns clones of the
    /// same allocation.
    pub fn intern(
        &mut self,
        s: &str,
    ) -> ArcStr {
        if let Some(cached) = self.cache.get(s) {
            cached.clone()
        }
        else {
            let owned = ArcStr::from(s);
            self.cache.insert(owned.clone());
            owned
        }
    }

    /// Number of distinct strings interned so far.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
