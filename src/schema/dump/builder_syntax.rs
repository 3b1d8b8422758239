//! Builder-syntax renderer: nested `create_table`/`change_table` blocks.
//!
//! Example output:
//! ```text
//! create_table("Posts",
//!              :force => true) do |table|
//!   table.short_text("comments", :type => :vector)
//!   table.short_text("title")
//! end
//! ```

use super::deferred_columns;
use super::format::{quote_string, IndentWriter};
use crate::schema::builder::SchemaDefinition;
use crate::schema::types::{ColumnSpec, IndexSpec, TableSpec, TableType};

const CREATE_TABLE: &str = "create_table(";

/// Builder method for a built-in value type, if it has one.
fn column_method(type_name: &str) -> Option<&'static str> {
    let method = match type_name {
        "Bool" => "boolean",
        "Int8" => "integer8",
        "UInt8" => "unsigned_integer8",
        "Int16" => "integer16",
        "UInt16" => "unsigned_integer16",
        "Int32" => "integer32",
        "UInt32" => "unsigned_integer32",
        "Int64" => "integer64",
        "UInt64" => "unsigned_integer64",
        "Float" => "float",
        "Time" => "time",
        "ShortText" => "short_text",
        "Text" => "text",
        "LongText" => "long_text",
        "TokyoGeoPoint" => "tokyo_geo_point",
        "WGS84GeoPoint" => "wgs84_geo_point",
        _ => return None,
    };
    Some(method)
}

fn table_type_symbol(table_type: TableType) -> Option<&'static str> {
    match table_type {
        TableType::Array => None,
        TableType::Hash => Some(":hash"),
        TableType::PatriciaTrie => Some(":patricia_trie"),
    }
}

/// Render `schema` in builder syntax.
///
/// Tables come out sorted by name, columns sorted by name. Reference and
/// index columns are moved to `change_table` blocks after every
/// `create_table` block so that no table is referenced before it exists.
pub fn render_builder_syntax(schema: &SchemaDefinition) -> String {
    let mut w = IndentWriter::new();
    let tables = schema.sorted_tables();

    for table in &tables {
        w.begin_block();
        emit_create_table(&mut w, table);
    }

    for table in &tables {
        let deferred = deferred_columns(table);
        if deferred.is_empty() {
            continue;
        }

        w.begin_block();
        w.write_line(&format!("change_table({}) do |table|", quote_string(&table.name)));
        w.indent();
        for column in deferred {
            match column.index_spec() {
                Some(index) => w.write_line(&index_line(column, index)),
                None => w.write_line(&reference_line(column)),
            }
        }
        w.dedent();
        w.write_line("end");
    }

    w.into_string()
}

fn emit_create_table(w: &mut IndentWriter, table: &TableSpec) {
    let mut options = Vec::new();
    if let Some(symbol) = table_type_symbol(table.table_type) {
        options.push(format!(":type => {}", symbol));
    }
    if let Some(key_type) = &table.key_type {
        options.push(format!(":key_type => {}", quote_string(key_type)));
    }
    if table.key_normalize {
        options.push(":key_normalize => true".to_string());
    }
    if let Some(tokenizer) = &table.default_tokenizer {
        options.push(format!(":default_tokenizer => {}", quote_string(tokenizer)));
    }
    options.push(":force => true".to_string());

    let align = " ".repeat(CREATE_TABLE.len());
    w.write_line(&format!("{}{},", CREATE_TABLE, quote_string(&table.name)));
    let last = options.len() - 1;
    for (i, option) in options.iter().enumerate() {
        if i == last {
            w.write_line(&format!("{}{}) do |table|", align, option));
        } else {
            w.write_line(&format!("{}{},", align, option));
        }
    }

    w.indent();
    for column in table
        .sorted_columns()
        .into_iter()
        .filter(|c| !c.is_reference() && !c.is_index())
    {
        w.write_line(&column_line(column));
    }
    w.dedent();
    w.write_line("end");
}

fn vector_suffix(column: &ColumnSpec) -> &'static str {
    if column.is_vector() {
        ", :type => :vector"
    } else {
        ""
    }
}

fn column_line(column: &ColumnSpec) -> String {
    match column_method(&column.value_type) {
        Some(method) => format!(
            "table.{}({}{})",
            method,
            quote_string(&column.name),
            vector_suffix(column)
        ),
        None => format!(
            "table.column({}, {}{})",
            quote_string(&column.name),
            quote_string(&column.value_type),
            vector_suffix(column)
        ),
    }
}

fn reference_line(column: &ColumnSpec) -> String {
    format!(
        "table.reference({}, {}{})",
        quote_string(&column.name),
        quote_string(&column.value_type),
        vector_suffix(column)
    )
}

fn index_line(column: &ColumnSpec, index: &IndexSpec) -> String {
    let mut line = format!(
        "table.index({}, {}, :name => {}",
        quote_string(&index.source_table),
        quote_string(&index.source_column),
        quote_string(&column.name)
    );
    if index.with_section {
        line.push_str(", :with_section => true");
    }
    if index.with_weight {
        line.push_str(", :with_weight => true");
    }
    if let Some(with_position) = index.with_position {
        line.push_str(&format!(", :with_position => {}", with_position));
    }
    line.push(')');
    line
}
