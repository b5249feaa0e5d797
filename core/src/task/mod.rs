//! Task nodes for a workflow engine.
//!
//! Each task declares an input and an output [`SpecInfo`] once, at
//! construction. [`Task::run`] validates a [`Record`] of inputs against the
//! input schema, executes, and checks the produced record against the output
//! schema.
//!
//! ```text
//! Record (inputs)
//!   ↓  input_spec().check_inputs()
//! Task::execute()
//!   ↓  output_spec().check_outputs()
//! Record (outputs)
//! ```

pub mod data_reader;
pub mod file_info;
pub mod spec;
pub mod value;

pub use data_reader::{BidsDataReader, QueryResults};
pub use file_info::{BidsFileInfo, FileInfo, STANDARD_OUTPUTS};
pub use spec::{FieldSpec, FieldType, SpecInfo};
pub use value::{Record, Value};

use crate::error::TaskError;

/// Common interface of the BIDS task nodes.
pub trait Task: Send + Sync {
    fn name(&self) -> &str;

    fn input_spec(&self) -> &SpecInfo;

    fn output_spec(&self) -> &SpecInfo;

    /// Run the adapter on already-validated inputs.
    fn execute(&self, inputs: &Record) -> Result<Record, TaskError>;

    fn run(&self, inputs: &Record) -> Result<Record, TaskError> {
        self.input_spec().check_inputs(self.name(), inputs)?;
        let outputs = self.execute(inputs)?;
        self.output_spec().check_outputs(self.name(), &outputs)?;
        Ok(outputs)
    }
}
