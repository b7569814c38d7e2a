use std::process::exit;

pub mod utils;

use sabiview::{
    metadata::schema_registry::SchemaRegistry, parse::grammar::CqlGrammar,
    view::view_definition::ViewDefinition,
};

use clap::Parser;

#[derive(Debug, Parser)]
struct Args {
    #[arg(help = "keyspace name", short, long, default_value = "ks")]
    keyspace: String,
    #[arg(help = "view name", long, default_value = "mv")]
    view: String,
    #[arg(help = "base table name", short, long)]
    table: String,
    #[arg(help = "partition key columns, name[:type]", short, long, value_delimiter = ',', required = true)]
    partition_key: Vec<String>,
    #[arg(help = "clustering columns, name[:type]", short, long, value_delimiter = ',')]
    clustering: Vec<String>,
    #[arg(help = "other columns, name[:type]", long, value_delimiter = ',')]
    columns: Vec<String>,
    #[arg(help = "view filter", short, long = "where", default_value = "")]
    where_clause: String,
    #[arg(help = "rename a column, from:to (repeatable)", short, long)]
    rename: Vec<String>,
    #[arg(help = "log every rename step", short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    utils::init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("error: {}", e);
        exit(1)
    }
}

fn run(args: &Args) -> Result<(), String> {
    let registry = SchemaRegistry::new();
    let base = utils::build_metadata(
        &args.keyspace,
        &args.table,
        &args.partition_key,
        &args.clustering,
        &args.columns,
    )?;
    let metadata = utils::build_metadata(
        &args.keyspace,
        &args.view,
        &args.partition_key,
        &args.clustering,
        &args.columns,
    )?;
    let view = ViewDefinition::create(
        &CqlGrammar,
        args.view.clone(),
        &base,
        true,
        metadata,
        &args.where_clause,
    )
    .map_err(|e| e.to_string())?;
    let base_id = base.id();
    registry.register_table(base).map_err(|e| e.to_string())?;
    registry.register_view(view).map_err(|e| e.to_string())?;

    for spec in &args.rename {
        let (from, to) = utils::parse_rename(spec)?;
        registry
            .rename_column(base_id, &from, &to)
            .map_err(|e| e.to_string())?;
    }

    let view = registry
        .view(&args.keyspace, &args.view)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("view {}.{} disappeared", args.keyspace, args.view))?;
    println!("{}", view);
    println!("{}", view.select());
    Ok(())
}
