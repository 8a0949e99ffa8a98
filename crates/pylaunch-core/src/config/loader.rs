//! Environment variable loading.
//!
//! Keeps the fallback chains in one place so callers never repeat `or_else`.

use std::collections::HashMap;
use std::env;
use std::ffi::OsStr;
use std::path::Path;

/// Source of configuration values. `ProcessEnv` in production, a map in tests.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads from the launcher's own process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Load `.env` from the current directory (never overrides existing variables).
pub fn load_dotenv() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        if let Ok(cwd) = env::current_dir() {
            load_dotenv_from_dir(&cwd);
        }
    });
}

/// Load `<dir>/.env` into the process environment. Existing variables win, so
/// calling this more than once is harmless.
pub fn load_dotenv_from_dir(dir: &Path) {
    let path = dir.join(".env");
    let Ok(content) = std::fs::read_to_string(&path) else {
        return;
    };
    let mut loaded = 0usize;
    for (key, value) in parse_dotenv(&content) {
        if env::var_os(&key).is_none() {
            set_env_var(&key, &value);
            loaded += 1;
        }
    }
    tracing::debug!(path = %path.display(), loaded, "Loaded .env");
}

/// Parse `KEY=VALUE` lines. Blank lines and `#` comments are skipped, matching
/// quotes are stripped, and an unquoted trailing `# comment` is dropped.
pub fn parse_dotenv(content: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some(eq_pos) = line.find('=') else {
            continue;
        };
        let key = line[..eq_pos].trim();
        let mut value = line[eq_pos + 1..].trim();
        if let Some(hash_pos) = value.find('#') {
            let before_hash = value[..hash_pos].trim_end();
            if !before_hash.contains('"') && !before_hash.contains('\'') {
                value = before_hash;
            }
        }
        if value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')))
        {
            value = &value[1..value.len() - 1];
        }
        if !key.is_empty() {
            pairs.push((key.to_string(), value.to_string()));
        }
    }
    pairs
}

/// Read the primary key or the first set alias; empty values count as unset.
pub fn env_optional(src: &impl EnvSource, primary: &str, aliases: &[&str]) -> Option<String> {
    src.get(primary)
        .or_else(|| aliases.iter().find_map(|a| src.get(a)))
        .and_then(|s| {
            let s = s.trim().to_string();
            if s.is_empty() {
                None
            } else {
                Some(s)
            }
        })
}

/// Like [`env_optional`] with a fallback.
pub fn env_or<F>(src: &impl EnvSource, primary: &str, aliases: &[&str], default: F) -> String
where
    F: FnOnce() -> String,
{
    env_optional(src, primary, aliases).unwrap_or_else(default)
}

/// Boolean variable: 0/false/no/off are false, any other set value is true.
pub fn env_bool(src: &impl EnvSource, primary: &str, aliases: &[&str], default: bool) -> bool {
    match env_optional(src, primary, aliases) {
        Some(s) => !matches!(
            s.to_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        ),
        None => default,
    }
}

// All process-environment writes go through these two functions.
// Callers must invoke them before spawning threads that read the environment.

pub fn set_env_var<K: AsRef<OsStr>, V: AsRef<OsStr>>(key: K, value: V) {
    env::set_var(key, value);
}

pub fn remove_env_var<K: AsRef<OsStr>>(key: K) {
    env::remove_var(key);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_dotenv_quotes_and_comments() {
        let content = r#"
# comment
PYLAUNCH_VENV_DIR=".venv"
export PYLAUNCH_ENTRY=app.py   # trailing
PYLAUNCH_SETUP_GUIDE='docs/SETUP.md'
NOEQUALS
EMPTY=
"#;
        let pairs = parse_dotenv(content);
        assert_eq!(
            pairs,
            vec![
                ("PYLAUNCH_VENV_DIR".to_string(), ".venv".to_string()),
                ("PYLAUNCH_ENTRY".to_string(), "app.py".to_string()),
                ("PYLAUNCH_SETUP_GUIDE".to_string(), "docs/SETUP.md".to_string()),
                ("EMPTY".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_parse_dotenv_keeps_hash_inside_quotes() {
        let pairs = parse_dotenv("TOKEN=\"abc#def\"");
        assert_eq!(pairs, vec![("TOKEN".to_string(), "abc#def".to_string())]);
    }

    #[test]
    fn test_env_optional_alias_and_empty() {
        let src = source(&[("PRIMARY", "  "), ("ALIAS", "value")]);
        assert_eq!(
            env_optional(&src, "PRIMARY", &["ALIAS"]),
            None,
            "a set-but-empty primary shadows the alias"
        );
        let src = source(&[("ALIAS", "value")]);
        assert_eq!(env_optional(&src, "PRIMARY", &["ALIAS"]).as_deref(), Some("value"));
    }

    #[test]
    fn test_env_bool_values() {
        for (raw, expected) in [("1", true), ("yes", true), ("0", false), ("Off", false), ("FALSE", false)] {
            let src = source(&[("FLAG", raw)]);
            assert_eq!(env_bool(&src, "FLAG", &[], !expected), expected, "raw={raw}");
        }
        let empty = source(&[]);
        assert!(env_bool(&empty, "FLAG", &[], true));
        assert!(!env_bool(&empty, "FLAG", &[], false));
    }

    #[test]
    fn test_load_dotenv_from_dir_does_not_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".env"),
            "PYLAUNCH_TEST_DOTENV_NEW=from_file\nPYLAUNCH_TEST_DOTENV_SET=from_file\n",
        )
        .unwrap();
        set_env_var("PYLAUNCH_TEST_DOTENV_SET", "from_process");

        load_dotenv_from_dir(dir.path());

        assert_eq!(env::var("PYLAUNCH_TEST_DOTENV_NEW").unwrap(), "from_file");
        assert_eq!(env::var("PYLAUNCH_TEST_DOTENV_SET").unwrap(), "from_process");
        remove_env_var("PYLAUNCH_TEST_DOTENV_NEW");
        remove_env_var("PYLAUNCH_TEST_DOTENV_SET");
    }
}
