//! File-system adapters: reading the attendance workbook, writing workbooks,
//! and preparing the output directory.

pub mod excel_read;
pub mod excel_write;
pub mod output_dir;
