use super::Palette;

const MAX_CELL_WIDTH: usize = 48;

/// Fixed-width text table. Cells longer than the cap are truncated.
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| width_of(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(i) {
                    *width = (*width).max(width_of(cell));
                }
            }
        }
        widths
    }

    pub fn render(&self, palette: Palette) -> String {
        let widths = self.widths();
        let mut out = String::new();

        let header: Vec<String> = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| palette.header(&pad(h, *w)))
            .collect();
        push_line(&mut out, &header);

        let rule: Vec<String> = widths.iter().map(|w| palette.dim(&"─".repeat(*w))).collect();
        push_line(&mut out, &rule);

        for row in &self.rows {
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, w)| pad(row.get(i).map(String::as_str).unwrap_or(""), *w))
                .collect();
            push_line(&mut out, &cells);
        }

        out
    }
}

fn width_of(text: &str) -> usize {
    text.chars().count().min(MAX_CELL_WIDTH)
}

fn pad(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    } else {
        format!("{:<width$}", text, width = width)
    }
}

fn push_line(out: &mut String, cells: &[String]) {
    out.push_str(cells.join("  ").trim_end());
    out.push('\n');
}
