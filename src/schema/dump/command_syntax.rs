//! Command-syntax renderer: flat `table_create`/`column_create` lines.

use super::deferred_columns;
use crate::schema::builder::SchemaDefinition;
use crate::schema::types::{ColumnSpec, IndexSpec, TableSpec, TableType};

fn table_flags(table: &TableSpec) -> String {
    let mut flags = vec![match table.table_type {
        TableType::Array => "TABLE_NO_KEY",
        TableType::Hash => "TABLE_HASH_KEY",
        TableType::PatriciaTrie => "TABLE_PAT_KEY",
    }];
    if table.key_normalize {
        flags.push("KEY_NORMALIZE");
    }
    flags.join("|")
}

fn table_line(table: &TableSpec) -> String {
    let mut line = format!("table_create {} {}", table.name, table_flags(table));
    if table.table_type.has_key() {
        if let Some(key_type) = &table.key_type {
            line.push_str(&format!(" --key_type {}", key_type));
        }
    }
    if let Some(tokenizer) = &table.default_tokenizer {
        line.push_str(&format!(" --default_tokenizer {}", tokenizer));
    }
    line
}

fn column_line(table: &TableSpec, column: &ColumnSpec) -> String {
    match column.index_spec() {
        Some(index) => index_line(table, column, index),
        None => {
            let kind = if column.is_vector() {
                "COLUMN_VECTOR"
            } else {
                "COLUMN_SCALAR"
            };
            format!(
                "column_create {} {} {} {}",
                table.name, column.name, kind, column.value_type
            )
        }
    }
}

fn index_line(table: &TableSpec, column: &ColumnSpec, index: &IndexSpec) -> String {
    let mut flags = vec!["COLUMN_INDEX"];
    if index.with_section {
        flags.push("WITH_SECTION");
    }
    if index.with_weight {
        flags.push("WITH_WEIGHT");
    }
    if table.index_with_position(index) {
        flags.push("WITH_POSITION");
    }
    format!(
        "column_create {} {} {} {} {}",
        table.name,
        column.name,
        flags.join("|"),
        index.source_table,
        index.source_column
    )
}

/// Render `schema` in command syntax.
///
/// One block per table (sorted by name) with its plain columns, then one
/// block per table holding its reference and index columns. Blocks are
/// separated by a blank line.
pub fn render_command_syntax(schema: &SchemaDefinition) -> String {
    let tables = schema.sorted_tables();
    let mut blocks = Vec::new();

    for table in &tables {
        let mut block = table_line(table);
        block.push('\n');
        for column in table
            .sorted_columns()
            .into_iter()
            .filter(|c| !c.is_reference() && !c.is_index())
        {
            block.push_str(&column_line(table, column));
            block.push('\n');
        }
        blocks.push(block);
    }

    for table in &tables {
        let deferred = deferred_columns(table);
        if deferred.is_empty() {
            continue;
        }
        let block: String = deferred
            .into_iter()
            .map(|column| column_line(table, column) + "\n")
            .collect();
        blocks.push(block);
    }

    blocks.join("\n")
}
