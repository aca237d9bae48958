// Render small listings as an ASCII table.

// Cap to keep output readable
const MAX_COL_WIDTH: usize = 60;

pub fn print_table<const N: usize>(header: &[&str; N], rows: &[[String; N]]) {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len().min(MAX_COL_WIDTH)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len().min(MAX_COL_WIDTH));
        }
    }

    let sep = build_separator(&widths);
    println!("{}", sep);
    println!("{}", build_row(header.iter().map(|s| *s), &widths));
    println!("{}", sep);
    for row in rows {
        println!("{}", build_row(row.iter().map(|s| s.as_str()), &widths));
    }
    println!("{}", sep);
}

fn build_separator(widths: &[usize]) -> String {
    let mut s = String::from("+");
    for w in widths {
        s.push_str(&"-".repeat(w + 2));
        s.push('+');
    }
    s
}

fn build_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let mut s = String::from("|");
    for (cell, w) in cells.zip(widths.iter().copied()) {
        s.push_str(&format!(" {:<width$} |", cell, width = w));
    }
    s
}
