//! Tantivy schema for a label index.
//!
//! One Tantivy document is one posting: a single (node, property key,
//! property value) triple. A node with three indexed properties owns three
//! postings, all removable with one term delete on `node_id`.

use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, INDEXED, STORED, STRING,
};

use crate::SearchError;

/// Schema field handles for efficient access
#[derive(Debug, Clone)]
pub struct PostingSchema {
    schema: Schema,
    /// Owning node id (INDEXED | STORED)
    pub node_id: Field,
    /// Property key, untokenized (STRING | STORED)
    pub key: Field,
    /// Property value, tokenized by the index analyzer (STORED)
    pub value: Field,
}

impl PostingSchema {
    /// Get the underlying Tantivy schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Create a PostingSchema from an existing Tantivy Schema
    pub fn from_schema(schema: Schema) -> Result<Self, SearchError> {
        let node_id = schema
            .get_field("node_id")
            .map_err(|_| SearchError::SchemaMismatch("missing node_id field".into()))?;
        let key = schema
            .get_field("key")
            .map_err(|_| SearchError::SchemaMismatch("missing key field".into()))?;
        let value = schema
            .get_field("value")
            .map_err(|_| SearchError::SchemaMismatch("missing value field".into()))?;

        Ok(Self {
            schema,
            node_id,
            key,
            value,
        })
    }

    /// Tokenizer the `value` field was created with.
    pub fn value_tokenizer(&self) -> Option<&str> {
        match self.schema.get_field_entry(self.value).field_type() {
            tantivy::schema::FieldType::Str(options) => options
                .get_indexing_options()
                .map(|indexing| indexing.tokenizer()),
            _ => None,
        }
    }
}

/// Build the posting schema, tokenizing values with `tokenizer`.
pub fn build_posting_schema(tokenizer: &str) -> PostingSchema {
    let mut schema_builder = Schema::builder();

    let node_id = schema_builder.add_u64_field("node_id", INDEXED | STORED);
    let key = schema_builder.add_text_field("key", STRING | STORED);

    // Positions are kept so exact queries can run as phrases
    let value_indexing = TextFieldIndexing::default()
        .set_tokenizer(tokenizer)
        .set_index_option(IndexRecordOption::WithFreqsAndPositions);
    let value_options = TextOptions::default()
        .set_indexing_options(value_indexing)
        .set_stored();
    let value = schema_builder.add_text_field("value", value_options);

    let schema = schema_builder.build();

    PostingSchema {
        schema,
        node_id,
        key,
        value,
    }
}
