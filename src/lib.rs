//! Core library for the gradschool-tools command line application.
//!
//! The library exposes the workbook merge pipeline and the decision audit that
//! power the command-line interface as well as the tests. IO adapters live
//! under [`gradschool::tools::io`], cell and sheet representations inside
//! [`gradschool::tools::model`], the sheet layout configuration in
//! [`gradschool::tools::layout`], the merge logic in
//! [`gradschool::tools::merge`], and the file-level orchestration under
//! [`gradschool::tools::run`].

pub mod gradschool;

pub use gradschool::tools::{
    Result, ToolError, audit, error, io, layout, logging, merge, model, run,
};
