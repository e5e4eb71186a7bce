//! Table conversion.

use log::debug;

use super::normalize::wrap_inlines;
use super::walker::Walker;
use crate::dom::ElementRef;
use crate::model::{Paragraph, Table, TableCell, TableRow};
use crate::style::{StyleContext, resolve};

/// Build a table from a `<table>` element, or `None` if it has no cells.
pub(super) fn build_table(
    walker: &Walker<'_>,
    table: ElementRef<'_>,
    ctx: &StyleContext,
) -> Option<Table> {
    let table_ctx = resolve(ctx, &table);
    let rows: Vec<TableRow> = row_elements(table)
        .into_iter()
        .filter_map(|tr| build_row(walker, tr, &table_ctx))
        .collect();

    if rows.is_empty() {
        debug!("dropping table without cells");
        return None;
    }
    Some(Table { rows })
}

/// Rows in display order: header rows, body rows (including bare `tr`
/// children), then footer rows.
fn row_elements(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let dom = table.dom();
    let sections: Vec<ElementRef<'_>> = table
        .children()
        .filter_map(|child| ElementRef::new(dom, child))
        .collect();

    let mut head = Vec::new();
    let mut body = Vec::new();
    let mut foot = Vec::new();
    for section in sections {
        match section.tag() {
            "tr" => body.push(section),
            "thead" => head.extend(section.child_elements("tr")),
            "tbody" => body.extend(section.child_elements("tr")),
            "tfoot" => foot.extend(section.child_elements("tr")),
            _ => {}
        }
    }

    head.extend(body);
    head.extend(foot);
    head
}

fn build_row(walker: &Walker<'_>, tr: ElementRef<'_>, ctx: &StyleContext) -> Option<TableRow> {
    let row_ctx = resolve(ctx, &tr).for_table_cell();
    let dom = tr.dom();
    let cells: Vec<TableCell> = tr
        .children()
        .filter_map(|child| ElementRef::new(dom, child))
        .filter(|cell| matches!(cell.tag(), "td" | "th"))
        .map(|cell| build_cell(walker, cell, &row_ctx))
        .collect();

    (!cells.is_empty()).then_some(TableRow { cells })
}

fn build_cell(walker: &Walker<'_>, cell: ElementRef<'_>, ctx: &StyleContext) -> TableCell {
    let cell_ctx = resolve(ctx, &cell);
    let nodes = walker.walk_children(cell.id(), &cell_ctx);
    TableCell::new(cell.tag() == "th", wrap_inlines(nodes, &Paragraph::default()))
}
