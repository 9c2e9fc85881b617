pub mod arrow;
pub mod fields;

pub use self::arrow::{
    build_arrow_schema, count_columns, extend_from_record_batch, to_record_batch,
};
pub use self::fields::{resolve, FieldCodeMap, LONGFORM_FIELDS, OD_FIELDS};
