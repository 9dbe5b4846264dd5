//! Validation modules

pub mod metadata;

pub use metadata::{
    is_numeric, is_url, validate_meta_entry, validate_meta_value, validate_upload_items,
    META_NAME_MAX_LENGTH, META_VALUE_MAX_LENGTH,
};
