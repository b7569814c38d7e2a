use crate::{metadata::column_definition::ColumnDefinition, query::identifier::Identifier};

/// Builds the text of a view's defining query,
/// `SELECT <columns> FROM <table> WHERE <where_clause> ALLOW FILTERING`.
pub fn build_select_statement(
    table_name: &str,
    columns: &[&ColumnDefinition],
    where_clause: &str,
) -> String {
    let selection = if columns.is_empty() {
        "*".to_string()
    } else {
        columns
            .iter()
            .map(|c| c.name().to_cql_string())
            .collect::<Vec<String>>()
            .join(", ")
    };
    let mut ret = format!(
        "SELECT {} FROM {}",
        selection,
        Identifier::new(table_name).to_cql_string()
    );
    if !where_clause.trim().is_empty() {
        ret = format!("{} WHERE {}", ret, where_clause);
    }
    format!("{} ALLOW FILTERING", ret)
}
