use std::fmt;
use std::sync::Arc;

/// Widths of platform record identifiers.
pub const DEFAULT_ID_LENGTHS: &[usize] = &[15, 18];

/// Decides whether an id names a real record and so may be linked to.
///
/// The decision is a pure function of the id's shape.
#[derive(Clone)]
pub enum IdPredicate {
    Lengths(Vec<usize>),
    Custom(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl IdPredicate {
    pub fn custom(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        IdPredicate::Custom(Arc::new(predicate))
    }

    pub fn is_valid(&self, id: &str) -> bool {
        match self {
            IdPredicate::Lengths(lengths) => lengths.contains(&id.chars().count()),
            IdPredicate::Custom(predicate) => predicate(id),
        }
    }

    /// `"/" + id` when the id is valid, empty otherwise.
    pub fn link_for(&self, id: Option<&str>) -> String {
        match id {
            Some(id) if self.is_valid(id) => format!("/{}", id),
            _ => String::new(),
        }
    }
}

impl Default for IdPredicate {
    fn default() -> Self {
        IdPredicate::Lengths(DEFAULT_ID_LENGTHS.to_vec())
    }
}

impl fmt::Debug for IdPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdPredicate::Lengths(lengths) => f.debug_tuple("Lengths").field(lengths).finish(),
            IdPredicate::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
