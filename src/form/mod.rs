//! Form model: field definitions, field type registry and schema loading.

mod field;
pub mod registry;
pub mod schema;

pub use field::{FieldDefinition, OptionValue, SelectOption, Validate};
pub use registry::{FieldDescriptor, FieldRegistry, TAGLIST};
pub use schema::{FormData, FormErrors, FormSchema, SchemaError};
