//! Platform selection
//!
//! Maps the public `os/arch` platform identifiers accepted on the CLI to the
//! keys used by the Zig download index.

use crate::error::{ZigboxError, ZigboxResult};
use std::fmt;
use std::str::FromStr;

/// Target platform for the toolchain
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Platform {
    /// 64-bit x86 Linux (`linux/amd64`)
    #[default]
    LinuxAmd64,
    /// Anything else; resolution fails before touching the network
    Unsupported(String),
}

impl Platform {
    /// Parse a public platform identifier (e.g. `linux/amd64`)
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "linux/amd64" => Self::LinuxAmd64,
            other => Self::Unsupported(other.to_string()),
        }
    }

    /// Public identifier as accepted on the command line
    pub fn name(&self) -> &str {
        match self {
            Self::LinuxAmd64 => "linux/amd64",
            Self::Unsupported(name) => name,
        }
    }

    /// Key of this platform inside a channel of the download index
    pub fn index_key(&self) -> ZigboxResult<&'static str> {
        match self {
            Self::LinuxAmd64 => Ok("x86_64-linux"),
            Self::Unsupported(name) => Err(ZigboxError::UnsupportedPlatform(name.clone())),
        }
    }
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linux_amd64_maps_to_index_key() {
        let platform = Platform::parse("linux/amd64");
        assert_eq!(platform, Platform::LinuxAmd64);
        assert_eq!(platform.index_key().unwrap(), "x86_64-linux");
        // Pure: asking twice gives the same answer
        assert_eq!(platform.index_key().unwrap(), "x86_64-linux");
    }

    #[test]
    fn default_is_linux_amd64() {
        assert_eq!(Platform::default(), Platform::LinuxAmd64);
    }

    #[test]
    fn unknown_platforms_are_unsupported() {
        for name in ["linux/arm64", "darwin/amd64", "x86_64-linux", ""] {
            let platform = Platform::parse(name);
            assert!(matches!(platform, Platform::Unsupported(_)));
            match platform.index_key() {
                Err(ZigboxError::UnsupportedPlatform(n)) => assert_eq!(n, name),
                other => panic!("expected UnsupportedPlatform, got {:?}", other),
            }
        }
    }

    #[test]
    fn display_round_trips_name() {
        assert_eq!(Platform::LinuxAmd64.to_string(), "linux/amd64");
        assert_eq!("linux/amd64".parse::<Platform>().unwrap(), Platform::LinuxAmd64);
    }
}
