// Engine - everything between a raw fetch payload and a render-ready view
//
// Normalization turns the raw record tree into a display tree, the editor
// drives column configuration, and `DisplayState` owns the retained original
// so either can be rebuilt at any time.

pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod editor;
pub mod error;
pub mod normalize;
pub mod state;

pub use config::{ExpansionPolicy, ExplorerConfig};
pub use diagnostics::{ConfigurationWarning, NormalizationWarning, WarningKind};
pub use editor::{
    ColumnEdit, CommitOutcome, DraftColumnSpec, EditSession, EditorAction, EditorState,
    Transition, reduce,
};
pub use error::{Error, Result};
pub use normalize::{IdPredicate, NormalizeOptions, Normalized, Normalizer, normalize};
pub use state::{DisplayState, LoadStatus, VisibleRow};
