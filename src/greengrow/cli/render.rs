//! # Rendering Module
//!
//! Turns `CmdResult` data into terminal text. Every `render_*` function returns a
//! `String` so output can be tested without a terminal; the `print_*` wrappers
//! decide on color and write to stdout.
//!
//! Column widths are measured with `unicode-width`, so names with wide characters
//! still line up.

use chrono::{DateTime, Utc};
use colored::Colorize;
use greengrow::api::{CmdMessage, MessageLevel};
use greengrow::config::GreenGrowConfig;
use greengrow::model::{Location, SaleLine, StockLine, TreeType};
use rust_decimal::Decimal;
use unicode_width::UnicodeWidthStr;

const COLUMN_GAP: &str = "  ";

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

struct Column {
    header: &'static str,
    align: Align,
}

const fn left(header: &'static str) -> Column {
    Column {
        header,
        align: Align::Left,
    }
}

const fn right(header: &'static str) -> Column {
    Column {
        header,
        align: Align::Right,
    }
}

fn use_color() -> bool {
    colored::control::SHOULD_COLORIZE.should_colorize()
}

pub fn print_stock(lines: &[StockLine], total: Decimal) {
    print!("{}", render_stock(lines, total, use_color()));
}

pub fn print_sales(lines: &[SaleLine], revenue: Decimal) {
    print!("{}", render_sales(lines, revenue, use_color()));
}

pub fn print_tree_types(types: &[TreeType]) {
    print!("{}", render_tree_types(types, use_color()));
}

pub fn print_locations(locations: &[Location]) {
    print!("{}", render_locations(locations, use_color()));
}

pub fn print_config(config: &GreenGrowConfig) {
    print!("{}", render_config(config));
}

pub fn print_messages(messages: &[CmdMessage]) {
    print!("{}", render_messages(messages, use_color()));
}

pub fn render_stock(lines: &[StockLine], total: Decimal, color: bool) -> String {
    if lines.is_empty() {
        return "No stock found.\n".to_string();
    }
    let columns = [
        right("ID"),
        left("Type"),
        left("Location"),
        right("Qty"),
        right("Price"),
        right("Value"),
    ];
    let rows: Vec<Vec<String>> = lines
        .iter()
        .map(|line| {
            vec![
                line.entry.id.to_string(),
                line.tree_type.clone(),
                line.location.clone(),
                line.entry.quantity.to_string(),
                money(line.unit_price),
                money(line.value),
            ]
        })
        .collect();

    let mut out = render_table(&columns, &rows, color);
    out.push_str(&footer("Total value:", total, color));
    out
}

pub fn render_sales(lines: &[SaleLine], revenue: Decimal, color: bool) -> String {
    if lines.is_empty() {
        return "No sales found.\n".to_string();
    }
    let columns = [
        right("ID"),
        left("Sold at"),
        left("Type"),
        right("Qty"),
        right("Price"),
        right("Total"),
    ];
    let rows: Vec<Vec<String>> = lines
        .iter()
        .map(|line| {
            vec![
                line.sale.id.to_string(),
                timestamp(line.sale.sold_at),
                line.tree_type.clone(),
                line.sale.quantity.to_string(),
                money(line.sale.unit_price),
                money(line.sale.total_amount),
            ]
        })
        .collect();

    let mut out = render_table(&columns, &rows, color);
    out.push_str(&footer("Total revenue:", revenue, color));
    out
}

pub fn render_tree_types(types: &[TreeType], color: bool) -> String {
    if types.is_empty() {
        return "No tree types found.\n".to_string();
    }
    let columns = [
        right("ID"),
        left("Name"),
        right("Base price"),
        left("Description"),
    ];
    let rows: Vec<Vec<String>> = types
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.name.clone(),
                money(t.base_price),
                t.description.clone().unwrap_or_default(),
            ]
        })
        .collect();
    render_table(&columns, &rows, color)
}

pub fn render_locations(locations: &[Location], color: bool) -> String {
    if locations.is_empty() {
        return "No locations found.\n".to_string();
    }
    let columns = [right("ID"), left("Name"), left("Description")];
    let rows: Vec<Vec<String>> = locations
        .iter()
        .map(|l| {
            vec![
                l.id.to_string(),
                l.name.clone(),
                l.description.clone().unwrap_or_default(),
            ]
        })
        .collect();
    render_table(&columns, &rows, color)
}

pub fn render_config(config: &GreenGrowConfig) -> String {
    config
        .list_all()
        .into_iter()
        .map(|(key, value)| format!("{} = {}\n", key, value))
        .collect()
}

pub fn render_messages(messages: &[CmdMessage], color: bool) -> String {
    messages
        .iter()
        .map(|message| {
            let text = if color {
                match message.level {
                    MessageLevel::Info => message.content.dimmed().to_string(),
                    MessageLevel::Success => message.content.green().to_string(),
                    MessageLevel::Warning => message.content.yellow().to_string(),
                }
            } else {
                message.content.clone()
            };
            format!("{}\n", text)
        })
        .collect()
}

fn render_table(columns: &[Column], rows: &[Vec<String>], color: bool) -> String {
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.width())
                .chain(std::iter::once(col.header.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = columns.iter().map(|c| c.header.to_string()).collect();
    let header_line = format_row(columns, &widths, &header);
    if color {
        out.push_str(&header_line.bold().to_string());
    } else {
        out.push_str(&header_line);
    }
    out.push('\n');

    for row in rows {
        out.push_str(&format_row(columns, &widths, row));
        out.push('\n');
    }
    out
}

fn format_row(columns: &[Column], widths: &[usize], cells: &[String]) -> String {
    let parts: Vec<String> = columns
        .iter()
        .zip(widths)
        .zip(cells)
        .map(|((col, &width), cell)| pad(cell, width, col.align))
        .collect();
    parts.join(COLUMN_GAP).trim_end().to_string()
}

fn pad(cell: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(cell.width()));
    match align {
        Align::Left => format!("{}{}", cell, fill),
        Align::Right => format!("{}{}", fill, cell),
    }
}

fn footer(label: &str, amount: Decimal, color: bool) -> String {
    let line = format!("{} {}", label, money(amount));
    if color {
        format!("{}\n", line.bold())
    } else {
        format!("{}\n", line)
    }
}

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}
