//! Form session state

mod forms;

pub use forms::*;
