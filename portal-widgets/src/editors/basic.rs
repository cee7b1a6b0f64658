use super::{ControlKind, EditorControl, EditorInput, SelectOption};
use serde_json::{json, Value};

pub const FONT_WEIGHTS: &[(&str, &str)] = &[
    ("normal", "Normal"),
    ("bold", "Bold"),
    ("100", "100"),
    ("200", "200"),
    ("300", "300"),
    ("400", "400"),
    ("500", "500"),
    ("600", "600"),
    ("700", "700"),
    ("800", "800"),
    ("900", "900"),
];

pub const TEXT_ALIGNMENTS: &[(&str, &str)] = &[
    ("left", "Left"),
    ("center", "Center"),
    ("right", "Right"),
    ("justify", "Justify"),
];

const DEFAULT_SWATCH: &str = "#000000";

pub fn string_editor(input: &EditorInput<'_>) -> EditorControl {
    input.control(ControlKind::Text)
}

pub fn number_editor(input: &EditorInput<'_>) -> EditorControl {
    input.control(ControlKind::Number {
        integer: false,
        min: None,
    })
}

pub fn integer_editor(input: &EditorInput<'_>) -> EditorControl {
    input.control(ControlKind::Number {
        integer: true,
        min: None,
    })
}

pub fn boolean_editor(input: &EditorInput<'_>) -> EditorControl {
    input.control(ControlKind::Checkbox {
        checked: input.value.as_bool().unwrap_or(false),
    })
}

/// Choices come from the property's declared options
pub fn select_editor(input: &EditorInput<'_>) -> EditorControl {
    input.control(ControlKind::Select {
        options: input
            .property
            .option_values()
            .iter()
            .map(SelectOption::plain)
            .collect(),
        selected: input.str_value().to_string(),
    })
}

pub fn color_editor(input: &EditorInput<'_>) -> EditorControl {
    let swatch = match input.str_value() {
        "" => DEFAULT_SWATCH,
        color => color,
    };
    input.control(ControlKind::Color {
        swatch: swatch.to_string(),
    })
}

pub fn font_weight_editor(input: &EditorInput<'_>) -> EditorControl {
    input.control(ControlKind::Select {
        options: options(FONT_WEIGHTS),
        selected: non_empty_or(input.str_value(), "normal"),
    })
}

pub fn text_align_editor(input: &EditorInput<'_>) -> EditorControl {
    input.control(ControlKind::ButtonGroup {
        options: options(TEXT_ALIGNMENTS),
        selected: non_empty_or(input.str_value(), "left"),
    })
}

pub fn span_editor(input: &EditorInput<'_>) -> EditorControl {
    let (col_span, row_span) = parse_span(input.value);
    input.control(ControlKind::Span { col_span, row_span })
}

/// Read `{ colSpan, rowSpan }`; missing or non-positive spans read as 1
pub fn parse_span(value: &Value) -> (u32, u32) {
    let read = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n >= 1)
            .unwrap_or(1)
    };
    (read("colSpan"), read("rowSpan"))
}

pub fn span_value(col_span: u32, row_span: u32) -> Value {
    json!({ "colSpan": col_span.max(1), "rowSpan": row_span.max(1) })
}

fn options(pairs: &[(&str, &str)]) -> Vec<SelectOption> {
    pairs
        .iter()
        .map(|(value, label)| SelectOption::new(*value, *label))
        .collect()
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    let chosen = if value.is_empty() { fallback } else { value };
    chosen.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{PropertyDescriptor, PropertyType};

    fn run(editor: crate::editors::EditorFn, property: &PropertyDescriptor, value: Value) -> EditorControl {
        editor(&EditorInput {
            property,
            value: &value,
            cubes: &[],
        })
    }

    #[test]
    fn test_select_uses_declared_options() {
        let property = PropertyDescriptor::new("gridAutoFlow", PropertyType::Select)
            .label("Auto Flow")
            .options(["row", "column"]);
        let control = run(select_editor, &property, json!("column"));

        assert_eq!(control.label, "Auto Flow");
        assert_eq!(
            control.kind,
            ControlKind::Select {
                options: vec![SelectOption::plain("row"), SelectOption::plain("column")],
                selected: "column".to_string(),
            }
        );
    }

    #[test]
    fn test_font_weight_falls_back_to_normal() {
        let property = PropertyDescriptor::new("fontWeight", PropertyType::FontWeight);
        let control = run(font_weight_editor, &property, Value::Null);
        match control.kind {
            ControlKind::Select { options, selected } => {
                assert_eq!(selected, "normal");
                assert_eq!(options.len(), 11);
            }
            other => panic!("unexpected control {other:?}"),
        }
    }

    #[test]
    fn test_color_swatch_default() {
        let property = PropertyDescriptor::new("backgroundColor", PropertyType::Color);
        let control = run(color_editor, &property, json!(""));
        assert_eq!(
            control.kind,
            ControlKind::Color {
                swatch: "#000000".to_string()
            }
        );
    }

    #[test]
    fn test_span_parsing() {
        assert_eq!(parse_span(&json!({ "colSpan": 3 })), (3, 1));
        assert_eq!(parse_span(&json!({ "colSpan": 0, "rowSpan": 2 })), (1, 2));
        assert_eq!(parse_span(&Value::Null), (1, 1));
        assert_eq!(span_value(0, 4), json!({ "colSpan": 1, "rowSpan": 4 }));
    }

    #[test]
    fn test_control_serialization() {
        let property = PropertyDescriptor::new("showClear", PropertyType::Boolean).required();
        let control = run(boolean_editor, &property, json!(true));
        assert_eq!(
            serde_json::to_value(&control).unwrap(),
            json!({
                "property": "showClear",
                "label": "showClear",
                "required": true,
                "value": true,
                "control": "checkbox",
                "checked": true
            })
        );
    }
}
