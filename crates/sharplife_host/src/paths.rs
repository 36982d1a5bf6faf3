// crates/sharplife_host/src/paths.rs
use std::env;
use std::io;
use std::path::{Path, PathBuf};

/// Expands `${NAME}` and `%NAME%` references using the process environment.
pub fn expand_env_vars(input: &str) -> String {
    expand_env_vars_with(input, |name| env::var(name).ok())
}

/// Expands `${NAME}` and `%NAME%` references until none are left.
/// Unknown variables expand to nothing.
pub fn expand_env_vars_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = input.to_owned();

    while let Some(expanded) =
        expand_first(&result, "${", "}", &lookup).or_else(|| expand_first(&result, "%", "%", &lookup))
    {
        result = expanded;
    }

    result
}

fn expand_first<F>(input: &str, prefix: &str, suffix: &str, lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let start = input.find(prefix)?;
    let name_start = start + prefix.len();
    let name_len = input[name_start..].find(suffix)?;
    let name = &input[name_start..name_start + name_len];

    let value = lookup(name).unwrap_or_default();
    let rest = &input[name_start + name_len + suffix.len()..];

    Some(format!("{}{}{}", &input[..start], value, rest))
}

/// Directory holding the managed libraries: `<game_dir>/<relative>`, made absolute.
pub fn managed_directory(game_dir: &Path, relative: &str) -> io::Result<PathBuf> {
    std::path::absolute(game_dir.join(relative))
}
