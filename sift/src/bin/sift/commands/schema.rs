use anyhow::{Result, bail};
use clap::Args;
use comfy_table::{Cell, Table};
use serde::Serialize;

use sift::{FieldType, ShapeDescriptor, get_shape, registered_shapes};

use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, add_table_header, create_table};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Shape Introspection",
    commands: &[
        "sift schema                       # List every registered shape",
        "sift schema users                 # Show the fields of the users shape",
        "sift --output json schema contacts",
    ],
}];

#[derive(Args)]
pub struct SchemaArgs {
    /// Shape to describe (optional, lists all shapes if omitted)
    pub shape: Option<String>,
}

#[derive(Serialize)]
struct ShapeSummary {
    shape: &'static str,
    field_count: usize,
    text_search_fields: Vec<&'static str>,
    default_sort: Option<&'static str>,
}

#[derive(Serialize)]
struct ShapeList {
    shapes: Vec<ShapeSummary>,
}

#[derive(Serialize)]
struct FieldRow {
    name: &'static str,
    #[serde(rename = "type")]
    field_type: String,
    nullable: bool,
    text_search: bool,
}

#[derive(Serialize)]
struct ShapeDetail {
    shape: &'static str,
    default_sort: Option<&'static str>,
    fields: Vec<FieldRow>,
}

fn describe_type(field_type: FieldType) -> String {
    match field_type {
        FieldType::Tag(tags) => format!("tag({})", tags.join("|")),
        other => other.to_string(),
    }
}

impl From<&ShapeDescriptor> for ShapeSummary {
    fn from(descriptor: &ShapeDescriptor) -> Self {
        Self {
            shape: descriptor.shape,
            field_count: descriptor.fields.len(),
            text_search_fields: descriptor.text_search_fields.to_vec(),
            default_sort: descriptor.default_sort,
        }
    }
}

impl From<&ShapeDescriptor> for ShapeDetail {
    fn from(descriptor: &ShapeDescriptor) -> Self {
        let fields = descriptor
            .fields
            .iter()
            .map(|field| FieldRow {
                name: field.name,
                field_type: describe_type(field.field_type),
                nullable: field.nullable,
                text_search: descriptor
                    .text_search_fields
                    .iter()
                    .any(|text| text.eq_ignore_ascii_case(field.name)),
            })
            .collect();
        Self {
            shape: descriptor.shape,
            default_sort: descriptor.default_sort,
            fields,
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "" }
}

impl TableDisplay for ShapeList {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = create_table(options);
        add_table_header(options, &mut table, &["Shape", "Fields", "Text search", "Default sort"]);

        if self.shapes.is_empty() {
            table.add_row(vec![Cell::new("No shapes registered")]);
            return table;
        }

        for summary in &self.shapes {
            table.add_row(vec![
                summary.shape.to_string(),
                summary.field_count.to_string(),
                summary.text_search_fields.join(", "),
                summary.default_sort.unwrap_or("").to_string(),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.shapes
            .iter()
            .map(|summary| format!("{} ({} fields)", summary.shape, summary.field_count))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TableDisplay for ShapeDetail {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = create_table(options);
        add_table_header(options, &mut table, &["Field", "Type", "Nullable", "Text search"]);
        for field in &self.fields {
            table.add_row(vec![
                field.name.to_string(),
                field.field_type.clone(),
                yes_no(field.nullable).to_string(),
                yes_no(field.text_search).to_string(),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.fields
            .iter()
            .map(|field| {
                let marker = if field.nullable { "?" } else { "" };
                format!("{}: {}{marker}", field.name, field.field_type)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn handle_schema(args: SchemaArgs, output: &OutputManager) -> Result<()> {
    match args.shape {
        None => {
            let shapes = registered_shapes();
            output.heading(&format!("Registered shapes ({})", shapes.len()));
            let list = ShapeList {
                shapes: shapes.iter().map(ShapeSummary::from).collect(),
            };
            output.display(&list)
        }
        Some(name) => {
            let Some(descriptor) = get_shape(&name) else {
                let known: Vec<&str> = registered_shapes().iter().map(|s| s.shape).collect();
                bail!("Unknown shape '{name}'. Known shapes: {}", known.join(", "));
            };
            let detail = ShapeDetail::from(&descriptor);
            output.heading(&format!("Shape: {}", detail.shape));
            if let Some(sort) = detail.default_sort {
                output.key_value("Default sort", sort);
            }
            output.display(&detail)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift::FieldDescriptor;

    fn descriptor() -> ShapeDescriptor {
        ShapeDescriptor {
            shape: "pets",
            fields: vec![
                FieldDescriptor {
                    name: "name",
                    field_type: FieldType::Text,
                    nullable: false,
                },
                FieldDescriptor {
                    name: "kind",
                    field_type: FieldType::Tag(&["Cat", "Dog"]),
                    nullable: false,
                },
                FieldDescriptor {
                    name: "adoptedAt",
                    field_type: FieldType::Timestamp,
                    nullable: true,
                },
            ],
            text_search_fields: &["name"],
            default_sort: Some("adoptedAt"),
        }
    }

    #[test]
    fn detail_lists_types_and_text_fields() {
        let detail = ShapeDetail::from(&descriptor());
        assert_eq!(detail.fields[1].field_type, "tag(Cat|Dog)");
        assert!(detail.fields[0].text_search);
        assert!(!detail.fields[2].text_search);
        assert_eq!(detail.to_compact(), "name: text\nkind: tag(Cat|Dog)\nadoptedAt: timestamp?");
    }

    #[test]
    fn summary_counts_fields() {
        let summary = ShapeSummary::from(&descriptor());
        assert_eq!(summary.field_count, 3);
        assert_eq!(summary.default_sort, Some("adoptedAt"));
    }

    #[test]
    fn unknown_shape_is_an_error() {
        let output = OutputManager::new(GlobalOptions {
            quiet: true,
            ..Default::default()
        });
        let result = handle_schema(
            SchemaArgs {
                shape: Some("no-such-shape".to_string()),
            },
            &output,
        );
        assert!(result.is_err());
    }
}
