/*
Query results are printed as a markdown-style table:

    | id | repairs |
    |:--:|:-------:|
    | 0  |    2    |
    | 1  |  null   |

NULL values are shown as `null`. Widths are counted in characters.
*/

use crate::database::Rows;

pub fn table(rows: &Rows) -> String {
    let mut widths: Vec<usize> = rows.columns.iter().map(|c| c.chars().count()).collect();
    for row in &rows.rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell_text(cell).chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, rows.columns.iter().map(String::as_str), &widths);
    out.push('|');
    for width in &widths {
        out.push(':');
        out.push_str(&"-".repeat(*width));
        out.push_str(":|");
    }
    out.push('\n');
    for row in &rows.rows {
        push_line(&mut out, row.iter().map(cell_text), &widths);
    }
    out
}

fn cell_text(cell: &Option<String>) -> &str {
    cell.as_deref().unwrap_or("null")
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    out.push('|');
    for (cell, &width) in cells.zip(widths) {
        out.push_str(&format!(" {cell:^width$} |"));
    }
    out.push('\n');
}
