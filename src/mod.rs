pub mod metadata {
    pub mod column_definition;
    pub mod data_type;
    pub mod metadata_error;
    pub mod schema_registry;
    pub mod table_metadata;
}

pub mod parse {
    pub mod grammar;
    pub mod lexer;
    pub mod parser;
    pub mod select_statement;
}

pub mod query {
    pub mod constant;
    pub mod identifier;
    pub mod operator;
    pub mod predicate;
    pub mod relation;
    pub mod rewriter;
    pub mod term;
}

pub mod view {
    pub mod select_builder;
    pub mod view_definition;
    pub mod view_error;
}
