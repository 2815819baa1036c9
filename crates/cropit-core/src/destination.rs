// Author: Dustin Pilgrim
// License: MIT

#[cfg(feature = "clap")]
use clap::ValueEnum;

/// Where a committed selection goes.
#[cfg_attr(feature = "clap", derive(ValueEnum))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Destination {
    #[default]
    Clipboard,
    File,
}

impl Destination {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "clipboard" => Some(Destination::Clipboard),
            "file" => Some(Destination::File),
            _ => None,
        }
    }
}
