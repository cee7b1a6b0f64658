use super::{container_frame, view};
use crate::editors::grid_tracks::count_tracks;
use crate::instance::{GridCell, WidgetInstance};
use crate::metadata::{accept_any, PropertyDescriptor, PropertyType, WidgetTypeDescriptor};
use crate::render::{BuildContext, Element, RenderNode};
use serde::Deserialize;
use tracing::debug;

pub const GRID: &str = "grid";

const DEFAULT_COLUMNS: &str = "1fr 1fr";
const DEFAULT_ROWS: &str = "auto";
const EDIT_BACKGROUND: &str = "#1a1a1a";

/// Upper bound on the tracks per axis drawn as drop cells in edit mode
pub const MAX_EDIT_TRACKS: u32 = 64;

const JUSTIFY_ITEMS: &[&str] = &["start", "end", "center", "stretch"];
const ALIGN_ITEMS: &[&str] = &["start", "end", "center", "stretch", "baseline"];
const CONTENT_DISTRIBUTION: &[&str] = &[
    "start",
    "end",
    "center",
    "stretch",
    "space-between",
    "space-around",
    "space-evenly",
];
const AUTO_FLOW: &[&str] = &["row", "column", "row dense", "column dense"];

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridWidget {
    pub grid_template_columns: String,
    pub grid_template_rows: String,
    pub column_gap: String,
    pub row_gap: String,
    pub justify_items: String,
    pub align_items: String,
    pub justify_content: String,
    pub align_content: String,
    pub grid_auto_flow: String,
    pub grid_auto_columns: String,
    pub grid_auto_rows: String,
    pub width: String,
    pub height: String,
    pub min_width: String,
    pub min_height: String,
    pub background_color: String,
    pub padding: String,
    pub border_radius: String,
}

impl GridWidget {
    pub fn columns(&self) -> &str {
        non_empty_or(&self.grid_template_columns, DEFAULT_COLUMNS)
    }

    pub fn rows(&self) -> &str {
        non_empty_or(&self.grid_template_rows, DEFAULT_ROWS)
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

pub fn descriptor() -> WidgetTypeDescriptor {
    let track = |name: &str, label: &str, default: &str| {
        PropertyDescriptor::new(name, PropertyType::GridTemplate)
            .label(label)
            .group("grid")
            .default_value(default)
    };
    let length = |name: &str, label: &str, group: &str| {
        PropertyDescriptor::new(name, PropertyType::Padding)
            .label(label)
            .group(group)
    };
    let choice = |name: &str, label: &str, group: &str, options: &[&str], default: &str| {
        PropertyDescriptor::new(name, PropertyType::Select)
            .label(label)
            .group(group)
            .options(options.iter().copied())
            .default_value(default)
    };

    WidgetTypeDescriptor::new(GRID)
        .label("Grid")
        .group("layout")
        .icon("⊞")
        .accept_child(accept_any)
        .property(track("gridTemplateColumns", "Columns", DEFAULT_COLUMNS))
        .property(track("gridTemplateRows", "Rows", DEFAULT_ROWS))
        .property(length("columnGap", "Column Gap", "grid").default_value("16px"))
        .property(length("rowGap", "Row Gap", "grid").default_value("16px"))
        .property(choice("justifyItems", "Justify Items", "alignment", JUSTIFY_ITEMS, "stretch"))
        .property(choice("alignItems", "Align Items", "alignment", ALIGN_ITEMS, "stretch"))
        .property(choice("justifyContent", "Justify Content", "alignment", CONTENT_DISTRIBUTION, "start"))
        .property(choice("alignContent", "Align Content", "alignment", CONTENT_DISTRIBUTION, "start"))
        .property(choice("gridAutoFlow", "Auto Flow", "grid", AUTO_FLOW, "row"))
        .property(
            PropertyDescriptor::new("gridAutoColumns", PropertyType::String)
                .label("Auto Columns")
                .group("grid")
                .default_value("auto"),
        )
        .property(
            PropertyDescriptor::new("gridAutoRows", PropertyType::String)
                .label("Auto Rows")
                .group("grid")
                .default_value("auto"),
        )
        .property(length("width", "Width", "size").default_value("100%"))
        .property(length("height", "Height", "size").default_value("auto"))
        .property(length("minWidth", "Min Width", "size"))
        .property(length("minHeight", "Min Height", "size"))
        .property(
            PropertyDescriptor::new("backgroundColor", PropertyType::Color)
                .label("Background Color")
                .group("style"),
        )
        .property(length("padding", "Padding", "style").default_value("16px"))
        .property(length("borderRadius", "Border Radius", "style").default_value("0px"))
}

fn container(grid: &GridWidget) -> Element {
    Element::div()
        .style("display", "grid")
        .style("grid-template-columns", grid.columns())
        .style("grid-template-rows", grid.rows())
        .style("column-gap", grid.column_gap.as_str())
        .style("row-gap", grid.row_gap.as_str())
        .style("justify-items", grid.justify_items.as_str())
        .style("align-items", grid.align_items.as_str())
        .style("justify-content", grid.justify_content.as_str())
        .style("align-content", grid.align_content.as_str())
        .style("grid-auto-flow", grid.grid_auto_flow.as_str())
        .style("grid-auto-columns", grid.grid_auto_columns.as_str())
        .style("grid-auto-rows", grid.grid_auto_rows.as_str())
        .style("width", grid.width.as_str())
        .style("height", grid.height.as_str())
        .style("min-width", grid.min_width.as_str())
        .style("min-height", grid.min_height.as_str())
        .style("padding", grid.padding.as_str())
        .style("border-radius", grid.border_radius.as_str())
}

/// CSS placement line: `"2"` or `"2 / span 3"`
fn placement(start: u32, span: u32) -> String {
    let line = u64::from(start) + 1;
    if span > 1 {
        format!("{} / span {}", line, span)
    } else {
        line.to_string()
    }
}

fn place(element: Element, cell: Option<&GridCell>) -> Element {
    match cell {
        Some(cell) => element
            .style("grid-column", placement(cell.col, cell.column_span()))
            .style("grid-row", placement(cell.row, cell.row_span())),
        None => element,
    }
}

pub fn build(ctx: &BuildContext<'_>) -> RenderNode {
    let grid: GridWidget = view(ctx.data);
    let items = ctx.data.children().iter().map(|child| {
        RenderNode::from(place(Element::div(), child.cell()).child(ctx.render_child(child)))
    });
    container(&grid)
        .style("background-color", grid.background_color.as_str())
        .children(items)
        .into()
}

fn covers(cell: &GridCell, row: u32, col: u32) -> bool {
    (cell.row..cell.row.saturating_add(cell.row_span())).contains(&row)
        && (cell.col..cell.col.saturating_add(cell.column_span())).contains(&col)
}

fn starting_at(children: &[WidgetInstance], row: u32, col: u32) -> Option<&WidgetInstance> {
    children
        .iter()
        .find(|c| c.cell().is_some_and(|cell| cell.row == row && cell.col == col))
}

/// One drop cell per `(row, col)`. Cells covered by a spanning child, other
/// than the one it starts in, are left out.
pub fn build_edit(ctx: &BuildContext<'_>) -> RenderNode {
    let grid: GridWidget = view(ctx.data);
    let children = ctx.data.children();
    let cols = edit_tracks(grid.columns());
    let rows = edit_tracks(grid.rows());

    let mut cells: Vec<RenderNode> = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            let occupant = starting_at(children, row, col);
            let covered = children
                .iter()
                .filter_map(|c| c.cell())
                .any(|cell| covers(cell, row, col));
            if covered && occupant.is_none() {
                continue;
            }
            cells.push(drop_cell(ctx, row, col, occupant).into());
        }
    }

    let background = non_empty_or(&grid.background_color, EDIT_BACKGROUND).to_string();
    container_frame(ctx, format!("Grid {}×{} ({} items)", cols, rows, children.len()))
        .child(
            container(&grid)
                .style("background-color", background)
                .children(cells),
        )
        .into()
}

/// Track count of a template, capped at [`MAX_EDIT_TRACKS`]
fn edit_tracks(template: &str) -> u32 {
    let count = u32::try_from(count_tracks(template)).unwrap_or(u32::MAX);
    if count > MAX_EDIT_TRACKS {
        debug!(template, count, max = MAX_EDIT_TRACKS, "capping grid tracks in edit view");
    }
    count.min(MAX_EDIT_TRACKS)
}

fn drop_cell(ctx: &BuildContext<'_>, row: u32, col: u32, occupant: Option<&WidgetInstance>) -> Element {
    let cell = place(Element::div(), occupant.and_then(|w| w.cell()))
        .attr("data-grid-cell", format!("{}-{}", row, col))
        .attr("data-drop-target", "true")
        .style("position", "relative")
        .style("min-height", "80px")
        .style("border", "2px dotted #444")
        .style("border-radius", "4px")
        .style("box-sizing", "border-box");
    match occupant {
        Some(widget) => cell
            .style("background-color", "transparent")
            .child(ctx.render_child(widget)),
        None => cell
            .style("background-color", "#0d0d0d")
            .child(
                Element::div()
                    .style("color", "#555")
                    .style("font-size", "11px")
                    .style("text-align", "center")
                    .text("Drop here"),
            ),
    }
}
