use std::{fmt, str::FromStr};

use super::metadata_error::MetadataError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int,
    BigInt,
    Text,
    Boolean,
    Double,
    Timestamp,
    Uuid,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Int => "int",
            DataType::BigInt => "bigint",
            DataType::Text => "text",
            DataType::Boolean => "boolean",
            DataType::Double => "double",
            DataType::Timestamp => "timestamp",
            DataType::Uuid => "uuid",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for DataType {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" => Ok(DataType::Int),
            "bigint" => Ok(DataType::BigInt),
            "text" | "varchar" => Ok(DataType::Text),
            "boolean" => Ok(DataType::Boolean),
            "double" => Ok(DataType::Double),
            "timestamp" => Ok(DataType::Timestamp),
            "uuid" => Ok(DataType::Uuid),
            other => Err(MetadataError::UnknownDataType(other.to_string())),
        }
    }
}
