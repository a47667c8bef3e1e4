//! I/O for whitespace-separated text matrices
//!
//! The loader reads an elevation grid, the writer emits a field with four
//! decimals per value.

mod text;

pub use text::{
    read_matrix, read_matrix_from_reader, read_matrix_from_str, write_matrix,
    write_matrix_to_string, write_matrix_to_writer,
};
