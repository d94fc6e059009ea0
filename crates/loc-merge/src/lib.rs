pub mod import;
pub mod output;

pub use import::{resolve_import, ImportDecision, NO_TRANSLATION};
pub use output::{
    build_output, deleted_rows_table, previous_summary, CHANGES_COLUMN, PREVIOUS_DATA_COLUMN,
};
