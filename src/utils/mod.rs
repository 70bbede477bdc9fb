mod helpers;

pub use helpers::{index_to_col_name, secure_file_name};
