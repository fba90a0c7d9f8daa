//! Core library for the `hkt` command line application.
//!
//! The library turns the weekly "home or daycare" attendance workbook into
//! per-group reports. Reading and validating the workbook lives in
//! [`hkt::tools::io`], the data representation in [`hkt::tools::model`],
//! grouping in [`hkt::tools::partition`] and the counting in
//! [`hkt::tools::aggregate`]. The two report commands are orchestrated by
//! [`hkt::tools::report`] on top of the renderers in [`hkt::tools::render`],
//! and [`hkt::tools::transfer`] moves files to and from Google Drive.

pub mod hkt;

pub use hkt::tools::{
    Result, ToolError, aggregate, error, io, model, partition, render, report, transfer,
};
