//! Schema dumps in builder and command syntax.

use grnbind::schema::{Schema, SchemaDefinition, SchemaError, Syntax, TableOptions};

fn simple_schema() -> SchemaDefinition {
    Schema::define(|schema| {
        schema.create_table("Posts", TableOptions::array(), |table| {
            table.short_text("title");
            table.short_text("comments").vector();
        });
    })
}

fn reference_schema() -> SchemaDefinition {
    Schema::define(|schema| {
        schema.create_table("Items", TableOptions::array(), |table| {
            table.short_text("title");
        });
        schema.create_table("Users", TableOptions::array(), |table| {
            table.short_text("name");
        });
        schema.create_table("Comments", TableOptions::array(), |table| {
            table.reference("item", "Items");
            table.reference("author", "Users");
            table.reference("children", "Items").vector();
            table.text("content");
            table.time("issued");
        });
    })
}

fn index_schema() -> SchemaDefinition {
    Schema::define(|schema| {
        schema.create_table("Items", TableOptions::hash().key_type("ShortText"), |table| {
            table.short_text("title");
        });
        schema.create_table(
            "Terms",
            TableOptions::patricia_trie()
                .key_type("ShortText")
                .key_normalize()
                .default_tokenizer("TokenBigram"),
            |table| {
                table.index("Items", "_key");
                table.index("Items", "title");
            },
        );
    })
}

// =============================================================================
// Builder syntax
// =============================================================================

#[test]
fn test_builder_simple() {
    let expected = r#"create_table("Posts",
             :force => true) do |table|
  table.short_text("comments", :type => :vector)
  table.short_text("title")
end
"#;
    assert_eq!(simple_schema().dump(Syntax::Builder), expected);
}

#[test]
fn test_builder_reference() {
    let expected = r#"create_table("Comments",
             :force => true) do |table|
  table.text("content")
  table.time("issued")
end

create_table("Items",
             :force => true) do |table|
  table.short_text("title")
end

create_table("Users",
             :force => true) do |table|
  table.short_text("name")
end

change_table("Comments") do |table|
  table.reference("author", "Users")
  table.reference("children", "Items", :type => :vector)
  table.reference("item", "Items")
end
"#;
    assert_eq!(reference_schema().dump(Syntax::Builder), expected);
}

#[test]
fn test_builder_index() {
    let expected = r#"create_table("Items",
             :type => :hash,
             :key_type => "ShortText",
             :force => true) do |table|
  table.short_text("title")
end

create_table("Terms",
             :type => :patricia_trie,
             :key_type => "ShortText",
             :key_normalize => true,
             :default_tokenizer => "TokenBigram",
             :force => true) do |table|
end

change_table("Terms") do |table|
  table.index("Items", "_key", :name => "Items__key")
  table.index("Items", "title", :name => "Items_title")
end
"#;
    assert_eq!(index_schema().dump(Syntax::Builder), expected);
}

// =============================================================================
// Command syntax
// =============================================================================

#[test]
fn test_command_simple() {
    let expected = "\
table_create Posts TABLE_NO_KEY
column_create Posts comments COLUMN_VECTOR ShortText
column_create Posts title COLUMN_SCALAR ShortText
";
    assert_eq!(simple_schema().dump(Syntax::Command), expected);
}

#[test]
fn test_command_reference() {
    let expected = "\
table_create Comments TABLE_NO_KEY
column_create Comments content COLUMN_SCALAR Text
column_create Comments issued COLUMN_SCALAR Time

table_create Items TABLE_NO_KEY
column_create Items title COLUMN_SCALAR ShortText

table_create Users TABLE_NO_KEY
column_create Users name COLUMN_SCALAR ShortText

column_create Comments author COLUMN_SCALAR Users
column_create Comments children COLUMN_VECTOR Items
column_create Comments item COLUMN_SCALAR Items
";
    assert_eq!(reference_schema().dump(Syntax::Command), expected);
}

#[test]
fn test_command_index() {
    let expected = "\
table_create Items TABLE_HASH_KEY --key_type ShortText
column_create Items title COLUMN_SCALAR ShortText

table_create Terms TABLE_PAT_KEY|KEY_NORMALIZE --key_type ShortText --default_tokenizer TokenBigram

column_create Terms Items__key COLUMN_INDEX|WITH_POSITION Items _key
column_create Terms Items_title COLUMN_INDEX|WITH_POSITION Items title
";
    assert_eq!(index_schema().dump(Syntax::Command), expected);
}

// =============================================================================
// Ordering and loading
// =============================================================================

#[test]
fn test_dump_ignores_definition_order() {
    let reversed = Schema::define(|schema| {
        schema.create_table("Comments", TableOptions::array(), |table| {
            table.time("issued");
            table.text("content");
            table.reference("children", "Items").vector();
            table.reference("author", "Users");
            table.reference("item", "Items");
        });
        schema.create_table("Users", TableOptions::array(), |table| {
            table.short_text("name");
        });
        schema.create_table("Items", TableOptions::array(), |table| {
            table.short_text("title");
        });
    });

    for syntax in [Syntax::Builder, Syntax::Command] {
        assert_eq!(reversed.dump(syntax), reference_schema().dump(syntax));
    }
}

#[test]
fn test_references_added_by_change_table() {
    let schema = Schema::define(|schema| {
        schema.create_table("Items", TableOptions::array(), |table| {
            table.short_text("title");
        });
        schema.create_table("Users", TableOptions::array(), |table| {
            table.short_text("name");
        });
        schema.create_table("Comments", TableOptions::array(), |table| {
            table.text("content");
            table.time("issued");
        });
        schema.change_table("Comments", |table| {
            table.reference("item", "Items");
            table.reference("author", "Users");
            table.reference("children", "Items").vector();
        });
    });

    assert!(schema.validate().is_ok());
    for syntax in [Syntax::Builder, Syntax::Command] {
        assert_eq!(schema.dump(syntax), reference_schema().dump(syntax));
    }
}

#[test]
fn test_change_table_typo_is_reported() {
    let schema = Schema::define(|schema| {
        schema.create_table("Comments", TableOptions::array(), |table| {
            table.text("content");
        });
        schema.change_table("Comment", |table| {
            table.short_text("title");
        });
    });

    assert_eq!(
        schema.validate(),
        Err(SchemaError::UnknownTable {
            table: "Comment".to_string(),
        })
    );
    assert!(!schema.dump(Syntax::Command).contains("Comment "));
    assert_eq!(
        schema.dump(Syntax::Command),
        "table_create Comments TABLE_NO_KEY\ncolumn_create Comments content COLUMN_SCALAR Text\n"
    );
}

#[test]
fn test_remove_column() {
    let schema = Schema::define(|schema| {
        schema.create_table("Posts", TableOptions::array(), |table| {
            table.short_text("title");
            table.short_text("comments").vector();
            table.text("draft");
        });
        schema.change_table("Posts", |table| {
            table.remove_column("draft").remove_column("missing");
        });
    });

    assert!(schema.table("Posts").unwrap().column("draft").is_none());
    assert_eq!(schema.dump(Syntax::Command), simple_schema().dump(Syntax::Command));
    assert_eq!(schema.dump(Syntax::Builder), simple_schema().dump(Syntax::Builder));
}

#[test]
fn test_reference_and_index_schemas_validate() {
    assert!(reference_schema().validate().is_ok());
    assert!(index_schema().validate().is_ok());
}

#[test]
fn test_schema_toml_round_trip() {
    let schema = index_schema();
    let toml = toml::to_string(&schema).unwrap();
    let loaded: SchemaDefinition = toml::from_str(&toml).unwrap();

    assert_eq!(loaded, schema);
    assert_eq!(loaded.dump(Syntax::Command), schema.dump(Syntax::Command));
}
