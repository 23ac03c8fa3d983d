use crate::types::Panel;

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;

/// Draws a panel as ASCII art: pieces outlined and tagged with their placed
/// size, offcuts shaded with `.`.
pub fn render_panel(panel: &Panel) -> String {
    let scale = f64::min(MAX_WIDTH / panel.width, MAX_HEIGHT / panel.height);
    let grid_w = (panel.width * scale).round() as usize;
    let grid_h = (panel.height * scale).round() as usize;

    if grid_w == 0 || grid_h == 0 {
        return String::new();
    }

    let to_cells = |x: f64, y: f64, w: f64, h: f64| {
        (
            (x * scale).round() as usize,
            (y * scale).round() as usize,
            (w * scale).round() as usize,
            (h * scale).round() as usize,
        )
    };

    let mut grid = vec![vec![' '; grid_w + 1]; grid_h + 1];

    draw_rect(&mut grid, 0, 0, grid_w, grid_h);

    for o in &panel.offcuts {
        let (sx, sy, sw, sh) = to_cells(o.x, o.y, o.width, o.height);
        shade(&mut grid, sx, sy, sw, sh);
    }

    for p in &panel.pieces {
        let (sx, sy, sw, sh) = to_cells(p.x, p.y, p.width, p.height);
        if sw == 0 || sh == 0 {
            continue;
        }
        draw_rect(&mut grid, sx, sy, sw, sh);
        tag(&mut grid, &p.rect().to_string(), sx, sy, sw, sh);
    }

    let mut result = String::new();
    for row in &grid {
        let line: String = row.iter().collect();
        result.push_str(line.trim_end());
        result.push('\n');
    }
    result
}

/// Fills the cells strictly inside a rectangle.
fn shade(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    for row in grid.iter_mut().take(y + h).skip(y + 1) {
        for cell in row.iter_mut().take(x + w).skip(x + 1) {
            *cell = '.';
        }
    }
}

/// Writes `text` on the first inner row of a rectangle, left aligned.
/// Rectangles too small to hold it stay untagged.
fn tag(grid: &mut [Vec<char>], text: &str, x: usize, y: usize, w: usize, h: usize) {
    if h < 2 || text.len() + 1 > w {
        return;
    }
    let Some(row) = grid.get_mut(y + 1) else {
        return;
    };
    for (cell, ch) in row.iter_mut().skip(x + 1).zip(text.chars()) {
        *cell = ch;
    }
}

fn draw_rect(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    for i in x..=x + w {
        mark(grid, i, y, '-');
        mark(grid, i, y + h, '-');
    }
    for j in y..=y + h {
        mark(grid, x, j, '|');
        mark(grid, x + w, j, '|');
    }
    for (cx, cy) in [(x, y), (x + w, y), (x, y + h), (x + w, y + h)] {
        mark(grid, cx, cy, '+');
    }
}

/// Sets one cell; crossing edges become a junction.
fn mark(grid: &mut [Vec<char>], x: usize, y: usize, edge: char) {
    let Some(cell) = grid.get_mut(y).and_then(|row| row.get_mut(x)) else {
        return;
    };
    *cell = match (*cell, edge) {
        (_, '+') | ('+', _) | ('-', '|') | ('|', '-') => '+',
        _ => edge,
    };
}
