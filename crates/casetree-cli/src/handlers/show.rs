use crate::presentation::{ConsoleRenderer, TreeView};
use anyhow::Result;
use casetree_engine::DisplayState;

pub fn handle(mut state: DisplayState, collapsed: bool, renderer: &ConsoleRenderer) -> Result<()> {
    if collapsed {
        state.set_expanded_rows(Vec::new());
    }

    renderer.render(&TreeView::new(&state))
}
