// crates/sharplife_host/src/config.rs
use std::fs;
use std::path::Path;

use ini::{Ini, Properties};

use crate::entry_point::EntryPointDescriptor;
use crate::error::ConfigError;

/// Location of the configuration file, relative to the game directory.
pub const CONFIG_FILENAME: &str = "cfg/SharpLife-Wrapper-Native.ini";

const SECTION_SHARPLIFE: &str = "SharpLife";
const SECTION_VERSIONS: &str = "DotNetCoreVersions";
const SECTION_MANAGED: &str = "Managed";

/// Where the managed side lives and how to enter it.
#[derive(Debug, PartialEq, Eq)]
pub struct ManagedEntryConfig {
    /// Directory holding the managed libraries, relative to the game directory.
    pub path: String,
    pub entry_point: EntryPointDescriptor,
}

/// Wrapper configuration. Loaded once, never mutated.
#[derive(Debug, PartialEq, Eq)]
pub struct Configuration {
    pub debug_logging_enabled: bool,
    /// Ordered from most to least preferred; used to find the shared runtime install.
    pub supported_runtime_versions: Vec<String>,
    pub managed: ManagedEntryConfig,
}

impl Configuration {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_ini_str(&text)
    }

    /// Parses the configuration the way the engine's own INI reader does: section and
    /// key names ignore case, a `;` after whitespace starts an inline comment, and
    /// malformed booleans or integers fall back to their defaults.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str_noescape(text).map_err(|err| ConfigError::Parse {
            message: err.to_string(),
        })?;

        let sharplife = section(&ini, SECTION_SHARPLIFE);
        let versions = section(&ini, SECTION_VERSIONS);
        let managed = section(&ini, SECTION_MANAGED);

        let debug_logging_enabled = value(sharplife, "DebugLoggingEnabled").is_some_and(parse_bool);

        let count = value(versions, "Count").and_then(parse_integer).unwrap_or(0);
        let supported_runtime_versions = (0..count.max(0))
            .filter_map(|i| value(versions, &format!("{i}/Version")))
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
            .collect();

        let get = |key: &str| value(managed, key).unwrap_or_default().to_owned();

        Ok(Self {
            debug_logging_enabled,
            supported_runtime_versions,
            managed: ManagedEntryConfig {
                path: get("Path"),
                entry_point: EntryPointDescriptor {
                    assembly_name: get("AssemblyName"),
                    type_name: get("Class"),
                    method_name: get("Method"),
                },
            },
        })
    }
}

fn section<'a>(ini: &'a Ini, name: &str) -> Option<&'a Properties> {
    ini.iter()
        .find(|(section, _)| section.is_some_and(|s| s.trim().eq_ignore_ascii_case(name)))
        .map(|(_, props)| props)
}

fn value<'a>(props: Option<&'a Properties>, key: &str) -> Option<&'a str> {
    props?
        .iter()
        .find(|(k, _)| k.trim().eq_ignore_ascii_case(key))
        .map(|(_, v)| strip_inline_comment(v))
}

fn strip_inline_comment(raw: &str) -> &str {
    let mut after_space = false;
    for (i, c) in raw.char_indices() {
        if c == ';' && after_space {
            return raw[..i].trim();
        }
        after_space = c.is_whitespace();
    }
    raw.trim()
}

/// Unrecognized spellings read as `false`.
fn parse_bool(raw: &str) -> bool {
    matches!(raw.to_ascii_lowercase().as_str(), "true" | "yes" | "on" | "1")
}

/// Reads the leading integer of `raw` (`0x` prefix for hex, leading `0` for octal).
/// `None` if no digits could be read.
fn parse_integer(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let hex = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .filter(|rest| rest.starts_with(|c: char| c.is_ascii_hexdigit()));
    let (radix, digits) = match hex {
        Some(rest) => (16, rest),
        None if s.starts_with('0') => (8, s),
        None => (10, s),
    };

    let len = digits.find(|c: char| !c.is_digit(radix)).unwrap_or(digits.len());
    if len == 0 {
        return None;
    }

    let magnitude = digits[..len]
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0i64, |acc, d| acc.saturating_mul(i64::from(radix)).saturating_add(i64::from(d)));

    Some(if negative { -magnitude } else { magnitude })
}
