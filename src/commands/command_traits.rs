//! Command pattern interfaces
//!
//! Each CLI operation is a [`Command`] built from parsed arguments by a
//! [`CommandFactory`].

use clap::ArgMatches;

use crate::fits::errors::FitsResult;
use crate::utils::logger::Logger;

/// An executable CLI operation
pub trait Command {
    /// Short name used in log messages
    fn name(&self) -> &'static str;

    /// Execute the command
    ///
    /// # Returns
    /// Result indicating success or an error; the error decides the exit code
    fn execute(&self) -> FitsResult<()>;
}

/// Factory for creating commands from CLI arguments
pub trait CommandFactory<'a> {
    /// Create the command selected by the arguments
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// The command, or an error when an argument value is malformed
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> FitsResult<Box<dyn Command + 'a>>;
}
