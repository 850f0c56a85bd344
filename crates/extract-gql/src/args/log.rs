use clap::ValueEnum;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, ValueEnum)]
pub(crate) enum LogLevel {
    /// Completely disables logging
    Off,
    /// Only errors
    Error,
    /// Warnings and errors
    Warn,
    /// Info, warning and error messages
    #[default]
    Info,
    /// Debug, info, warning and error messages
    Debug,
    /// Trace, debug, info, warning and error messages from all dependencies
    Trace,
}

impl LogLevel {
    pub(crate) fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "extract_gql=error,off",
            LogLevel::Warn => "extract_gql=warn,off",
            LogLevel::Info => "extract_gql=info,off",
            LogLevel::Debug => "extract_gql=debug,off",
            LogLevel::Trace => "trace",
        }
    }
}
