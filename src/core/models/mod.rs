//! Data models for `PortalFields`

pub mod context;
pub mod display;
pub mod field;
mod lenient;
pub mod profile_data;
pub mod value;

pub use context::{FormContext, FormContextType, Role};
pub use display::{DisplayField, Projection};
pub use field::{FieldDefinition, FieldId, FieldKind, FieldOption, FieldType, FormSchema, SchemaField};
pub use profile_data::{find_by_label, CustomFieldRecord, ProfileData};
pub use value::{FieldValue, FormValues, UNSET};
