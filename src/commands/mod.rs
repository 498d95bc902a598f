//! CLI command implementations
//!
//! This module contains implementations of the commands supported by the
//! CLI application using the Command pattern.

pub mod command_traits;
pub mod analyze_command;
pub mod cutout_command;

pub use command_traits::{Command, CommandFactory};
pub use analyze_command::AnalyzeCommand;
pub use cutout_command::CutoutCommand;

use clap::ArgMatches;
use crate::utils::logger::Logger;
use crate::fits::errors::FitsResult;

/// Factory for creating command instances based on CLI arguments
///
/// This factory examines the command-line arguments and creates
/// the appropriate command instance for execution.
#[derive(Default)]
pub struct FitscutCommandFactory;

impl FitscutCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        FitscutCommandFactory
    }
}

impl<'a> CommandFactory<'a> for FitscutCommandFactory {
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> FitsResult<Box<dyn Command + 'a>> {
        if args.get_flag("analyze") {
            Ok(Box::new(AnalyzeCommand::new(args, logger)?))
        } else {
            // Default to the cutout command
            Ok(Box::new(CutoutCommand::new(args, logger)?))
        }
    }
}
