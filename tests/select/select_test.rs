//! Select command building.

use grnbind::expression::ExpressionBuilder;
use grnbind::schema::TableHandle;
use grnbind::select::{normalize_option_name, OptionValue, SelectCommand, SelectOption};
use insta::assert_snapshot;

#[test]
fn test_normalize_option_name_idempotent() {
    let names = [
        "drill-down",
        "drill_down_sort_by",
        "sort-by",
        "output-columns",
        "match_escalation_threshold",
        "drill-down-output-columns",
        "some-future-option",
    ];
    for name in names {
        let once = normalize_option_name(name);
        assert_eq!(normalize_option_name(&once), once, "not idempotent for {}", name);
    }
}

#[test]
fn test_option_names_map_to_variants() {
    assert_eq!(SelectOption::from("drill-down"), SelectOption::Drilldown);
    assert_eq!(SelectOption::from("drill_down_sort_by"), SelectOption::DrilldownSortBy);
    assert_eq!(SelectOption::from("sort-by"), SelectOption::SortBy);
    assert_eq!(
        SelectOption::from("future-option"),
        SelectOption::Other("future_option".to_string())
    );
}

#[test]
fn test_minimal_command() {
    assert_snapshot!(SelectCommand::new("Entries").to_command_string(), @"select Entries");
}

#[test]
fn test_list_options_keep_order() {
    let command = SelectCommand::new("Entries")
        .option("match-columns", vec!["title", "content"])
        .option("query", "fulltext")
        .option("output-columns", ["_key", "title", "_score"])
        .option("sort-by", vec!["-_score", "_key"]);

    assert_snapshot!(
        command.to_command_string(),
        @r#"select Entries --match_columns "title, content" --query "fulltext" --output_columns "_key, title, _score" --sortby "-_score, _key""#
    );
}

#[test]
fn test_rendered_options_match_input() {
    let options = vec![
        ("limit", OptionValue::from(10)),
        ("offset", OptionValue::from(20)),
        ("drilldown", OptionValue::from(vec!["tag", "category"])),
        ("cache", OptionValue::from(false)),
    ];
    let command = SelectCommand::new("Entries").options(options.clone());

    let rendered: Vec<String> = command
        .option_entries()
        .iter()
        .map(|(name, _)| name.to_string())
        .collect();
    assert_eq!(rendered, vec!["limit", "offset", "drilldown", "cache"]);

    let line = command.to_command_string();
    assert_eq!(line.matches(" --").count(), options.len());
    assert!(line.contains(r#"--drilldown "tag, category""#));
    assert!(line.contains(r#"--cache "false""#));
}

#[test]
fn test_reset_option_keeps_position() {
    let command = SelectCommand::new("Entries")
        .option("limit", 10)
        .option("query", "a")
        .option("limit", 5);

    assert_snapshot!(
        command.to_command_string(),
        @r#"select Entries --limit "5" --query "a""#
    );
}

#[test]
fn test_quotes_are_escaped() {
    let command = SelectCommand::new("Entries").option("query", r#"title:"rust book""#);
    assert_snapshot!(
        command.to_command_string(),
        @r#"select Entries --query "title:\"rust book\"""#
    );
}

#[test]
fn test_unknown_option_passes_through() {
    let command = SelectCommand::new("Entries").option("adjuster", "tag @ \"rust\" * 10");
    assert_eq!(
        command.option_entries()[0].0,
        SelectOption::Other("adjuster".to_string())
    );
    assert!(command.to_command_string().starts_with("select Entries --adjuster "));
}

#[test]
fn test_table_handle_resolves_to_name() {
    let handle = TableHandle::new("Bookmarks").with_columns(["title", "uri"]);
    let command = SelectCommand::new(&handle).option("limit", 1);
    assert_snapshot!(command.to_command_string(), @r#"select Bookmarks --limit "1""#);
}

#[test]
fn test_drilldown_keys() {
    let scalar = SelectCommand::new("Entries").option("drill-down", "category, tag  author");
    assert_eq!(scalar.drilldown_keys(), vec!["category", "tag", "author"]);

    let list = SelectCommand::new("Entries").option("drilldown", vec!["category", "tag"]);
    assert_eq!(list.drilldown_keys(), vec!["category", "tag"]);

    assert!(SelectCommand::new("Entries").drilldown_keys().is_empty());
}

#[test]
fn test_filter_expression() {
    let users = TableHandle::new("Users").with_columns(["name", "age"]);
    let builder = ExpressionBuilder::new(&users);
    let filter = builder
        .column("name")
        .unwrap()
        .eq("alice")
        .and(builder.column("age").unwrap().lt(20));

    let command = SelectCommand::new(&users).filter_expression(&filter);
    assert_snapshot!(
        command.to_command_string(),
        @r#"select Users --filter "name == \"alice\" && age < 20""#
    );
}
