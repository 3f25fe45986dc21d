//! Parsed Avro schemas and the empty records built from them.

use apache_avro::schema::Name;
use apache_avro::Schema;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Invalid Avro schema: {0}")]
    Parse(#[source] apache_avro::Error),

    #[error("Type '{0}' is already defined by this parser")]
    Redefined(String),

    #[error("Top-level schema type is {0}, expected record")]
    NotARecord(&'static str),

    #[error("Could not re-serialize schema JSON: {0}")]
    Render(#[from] serde_json::Error),
}

/// Single-use Avro schema parser.
///
/// A parser remembers every named type it has produced and refuses to define
/// one twice, so each schema file gets its own parser.
#[derive(Debug, Default)]
pub struct SchemaParser {
    defined: HashSet<String>,
}

impl SchemaParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(&mut self, text: &str) -> Result<SchemaDescriptor, SchemaError> {
        let schema = Schema::parse_str(text).map_err(SchemaError::Parse)?;
        let descriptor = SchemaDescriptor::new(schema, text)?;

        if let Some(full_name) = descriptor.full_name() {
            if !self.defined.insert(full_name.clone()) {
                return Err(SchemaError::Redefined(full_name));
            }
        }
        Ok(descriptor)
    }
}

/// One parsed schema together with the JSON text sent to the registry.
///
/// The text is the source JSON, compacted, so docs, custom properties and
/// enum defaults reach the registry unchanged.
#[derive(Debug, Clone)]
pub struct SchemaDescriptor {
    schema: Schema,
    text: String,
}

impl SchemaDescriptor {
    fn new(schema: Schema, source: &str) -> Result<Self, SchemaError> {
        let json: serde_json::Value = serde_json::from_str(source)?;
        let text = serde_json::to_string(&json)?;
        Ok(Self { schema, text })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Source schema as compact JSON; insensitive to the file's whitespace.
    pub fn text(&self) -> &str {
        &self.text
    }

    fn name(&self) -> Option<&Name> {
        self.schema.name()
    }

    /// Simple type name, for named types.
    pub fn type_name(&self) -> Option<&str> {
        self.name().map(|name| name.name.as_str())
    }

    pub fn namespace(&self) -> Option<&str> {
        self.name().and_then(|name| name.namespace.as_deref())
    }

    /// `namespace.name`, or just `name` without a namespace.
    pub fn full_name(&self) -> Option<String> {
        self.name().map(|name| name.fullname(None))
    }

    pub fn is_record(&self) -> bool {
        matches!(self.schema, Schema::Record { .. })
    }

    fn kind(&self) -> &'static str {
        match &self.schema {
            Schema::Null => "null",
            Schema::Boolean => "boolean",
            Schema::Int => "int",
            Schema::Long => "long",
            Schema::Float => "float",
            Schema::Double => "double",
            Schema::Bytes => "bytes",
            Schema::String => "string",
            Schema::Array { .. } => "array",
            Schema::Map { .. } => "map",
            Schema::Union { .. } => "union",
            Schema::Record { .. } => "record",
            Schema::Enum { .. } => "enum",
            Schema::Fixed { .. } => "fixed",
            _ => "a logical type",
        }
    }
}

/// A record with no field values, used as the marker message for its schema.
#[derive(Debug, Clone)]
pub struct TypedRecord {
    descriptor: SchemaDescriptor,
    full_name: String,
}

impl TypedRecord {
    /// Build the empty record for a record schema; any other top-level type fails.
    pub fn empty(descriptor: SchemaDescriptor) -> Result<Self, SchemaError> {
        let full_name = match descriptor.full_name() {
            Some(full_name) if descriptor.is_record() => full_name,
            _ => return Err(SchemaError::NotARecord(descriptor.kind())),
        };
        Ok(Self {
            descriptor,
            full_name,
        })
    }

    pub fn descriptor(&self) -> &SchemaDescriptor {
        &self.descriptor
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }
}
