pub mod catalog;
pub mod dispatch;
pub mod options;
pub mod template;

pub use catalog::{CatalogError, CommandSpec, OutputMode, Relay};
pub use dispatch::{
    dispatch, decide_mode, ConfirmPrompt, DispatchError, DispatchOutcome, Mode, TerminalPrompt,
};
pub use options::{parse_options, Flag, FlagSet, OptionsError, ParsedOptions};
