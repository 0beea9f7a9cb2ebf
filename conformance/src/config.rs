//! Command line and environment configuration for the suite runner.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TODO_API_ROOT` | http://localhost:3000 | Backend under test |
//! | `TODO_SUITE_GROUP` | (all) | Only run groups whose title contains this |
//! | `TODO_SUITE_LOG` | info | Log level |

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "todo-tag-conformance")]
#[command(about = "Checks a Todo/Tag backend against the behavioural contract")]
pub struct SuiteConfig {
    /// API root of the backend, e.g. http://localhost:3000.
    #[arg(env = "TODO_API_ROOT", default_value = "http://localhost:3000")]
    pub api_root: String,

    /// Only run scenarios whose group title contains this substring.
    #[arg(short, long, env = "TODO_SUITE_GROUP")]
    pub group: Option<String>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "TODO_SUITE_LOG", default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_root_is_positional() {
        let args = ["todo-tag-conformance", "https://todo.example.com"];
        let config = SuiteConfig::try_parse_from(args).unwrap();
        assert_eq!(config.api_root, "https://todo.example.com");
    }

    #[test]
    fn group_and_log_level_flags() {
        let config = SuiteConfig::try_parse_from([
            "todo-tag-conformance",
            "http://127.0.0.1:8080",
            "--group",
            "tag",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(config.group.as_deref(), Some("tag"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(SuiteConfig::try_parse_from(["todo-tag-conformance", "--retries", "3"]).is_err());
    }
}
