//! Command implementations.

mod coverage;
mod format;
mod locales;
mod translate;
mod use_locale;

pub use coverage::CoverageCommand;
pub use format::{FormatCommand, FormatTarget};
pub use locales::LocalesCommand;
pub use translate::{parse_var, TranslateCommand};
pub use use_locale::UseCommand;
