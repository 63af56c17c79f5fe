use crate::presentation::{CatalogView, ConsoleRenderer};
use anyhow::Result;

pub fn handle(renderer: &ConsoleRenderer) -> Result<()> {
    renderer.render(&CatalogView::new())
}
