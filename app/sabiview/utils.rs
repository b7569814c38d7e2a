use sabiview::{
    metadata::{
        data_type::DataType,
        table_metadata::{TableId, TableMetadata},
    },
    parse::grammar::CqlGrammar,
    query::identifier::Identifier,
};
use tracing::Level;

pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Byte offsets of the ':' separators that sit outside double-quoted names.
fn unquoted_colons(spec: &str) -> Vec<usize> {
    let mut quoted = false;
    let mut ret = Vec::new();
    for (i, c) in spec.char_indices() {
        match c {
            // a doubled "" inside a quoted name toggles twice
            '"' => quoted = !quoted,
            ':' if !quoted => ret.push(i),
            _ => {}
        }
    }
    ret
}

fn split_at_colon(spec: &str, at: Option<usize>) -> Option<(&str, &str)> {
    at.map(|i| (&spec[..i], &spec[i + 1..]))
}

/// Parses `name` or `name:type`; the type defaults to text.
pub fn parse_column(spec: &str) -> Result<(Identifier, DataType), String> {
    let (name, ty) = match split_at_colon(spec, unquoted_colons(spec).last().copied()) {
        Some((name, ty)) => (name, ty.parse::<DataType>().map_err(|e| e.to_string())?),
        None => (spec, DataType::Text),
    };
    let name = CqlGrammar
        .parse_identifier(name)
        .map_err(|e| format!("bad column name {}: {}", name, e))?;
    Ok((name, ty))
}

/// Parses `from:to`.
pub fn parse_rename(spec: &str) -> Result<(Identifier, Identifier), String> {
    let (from, to) = split_at_colon(spec, unquoted_colons(spec).first().copied())
        .ok_or_else(|| format!("expected from:to, got {}", spec))?;
    let from = CqlGrammar
        .parse_identifier(from)
        .map_err(|e| format!("bad column name {}: {}", from, e))?;
    let to = CqlGrammar
        .parse_identifier(to)
        .map_err(|e| format!("bad column name {}: {}", to, e))?;
    Ok((from, to))
}

pub fn build_metadata(
    keyspace: &str,
    name: &str,
    partition_key: &[String],
    clustering: &[String],
    columns: &[String],
) -> Result<TableMetadata, String> {
    let mut tm = TableMetadata::new(keyspace, name, TableId::random());
    for spec in partition_key {
        let (name, ty) = parse_column(spec)?;
        tm.add_partition_key_column(name, ty)
            .map_err(|e| e.to_string())?;
    }
    for spec in clustering {
        let (name, ty) = parse_column(spec)?;
        tm.add_clustering_column(name, ty).map_err(|e| e.to_string())?;
    }
    for spec in columns {
        let (name, ty) = parse_column(spec)?;
        tm.add_regular_column(name, ty).map_err(|e| e.to_string())?;
    }
    Ok(tm)
}

#[cfg(test)]
mod tests {
    use sabiview::{metadata::data_type::DataType, query::identifier::Identifier};

    use super::{build_metadata, parse_column, parse_rename};

    #[test]
    fn test_parse_column() {
        assert_eq!(
            Ok((Identifier::new("a"), DataType::Text)),
            parse_column("A")
        );
        assert_eq!(
            Ok((Identifier::new("a"), DataType::Int)),
            parse_column("a:int")
        );
        assert_eq!(
            Ok((Identifier::new("a:b"), DataType::Int)),
            parse_column("\"a:b\":int")
        );
        assert_eq!(
            Ok((Identifier::new("x:\"y"), DataType::Text)),
            parse_column("\"x:\"\"y\"")
        );
        assert!(parse_column("a:nosuchtype").is_err());
        assert!(parse_column("\"\"").is_err());
    }

    #[test]
    fn test_parse_rename() {
        assert_eq!(
            Ok((Identifier::new("a"), Identifier::new("b"))),
            parse_rename("a:b")
        );
        assert_eq!(
            Ok((Identifier::new("a:b"), Identifier::new("c"))),
            parse_rename("\"a:b\":c")
        );
        assert_eq!(
            Ok((Identifier::new("a"), Identifier::new("B:c"))),
            parse_rename("a:\"B:c\"")
        );
        assert!(parse_rename("\"a:b\"").is_err());
        assert!(parse_rename("a:b:c").is_err());
    }

    #[test]
    fn test_build_metadata() {
        let tm = build_metadata(
            "ks",
            "t",
            &["p:int".to_string()],
            &["\"C:1\"".to_string()],
            &["v".to_string()],
        )
        .unwrap();
        let names: Vec<&str> = tm.all_columns().into_iter().map(|c| c.name().as_str()).collect();
        assert_eq!(vec!["p", "C:1", "v"], names);
        assert!(build_metadata("ks", "t", &["p".to_string()], &[], &["p".to_string()]).is_err());
    }
}
