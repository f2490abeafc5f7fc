//! Console command parsing.
//!
//! The console drives simulated players so the sleep plugin can be exercised
//! without a network front end. Anything not listed here is handed to the
//! plugin command registry as the console.

use slumber_plugin_api::GameMode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    /// Connect a simulated player.
    Join {
        name: String,
        world: Option<String>,
        gamemode: Option<GameMode>,
    },
    Quit { name: String },
    Bed { name: String },
    Wake { name: String },
    Move { name: String, to: (f32, f32, f32) },
    Interact { name: String },
    Gamemode { name: String, gamemode: GameMode },
    Time { world: String, time: i64 },
    Rain { world: String, raining: bool, thundering: bool },
    List,
    Op { name: String },
    Deop { name: String },
    /// Tab-complete a `/sleep` command line.
    Complete { args: Vec<String> },
    /// Run a plugin command as a player.
    As {
        name: String,
        command: String,
        args: Vec<String>,
    },
    /// A plugin command run by the console.
    Plugin { command: String, args: Vec<String> },
    Save,
    Stop,
    Help,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid number '{0}'")]
    InvalidNumber(String),

    #[error("Expected on, off or thunder, got '{0}'")]
    InvalidWeather(String),
}

fn arg<'a>(parts: &[&'a str], i: usize, usage: &'static str) -> Result<&'a str, ConsoleError> {
    parts.get(i).copied().ok_or(ConsoleError::Usage(usage))
}

fn number<T: std::str::FromStr>(s: &str) -> Result<T, ConsoleError> {
    s.parse().map_err(|_| ConsoleError::InvalidNumber(s.to_string()))
}

fn owned(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

impl ConsoleCommand {
    /// Parse one console line. A leading `/` is ignored.
    pub fn parse(line: &str) -> Result<Self, ConsoleError> {
        let line = line.trim();
        let line = line.strip_prefix('/').unwrap_or(line);
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&head) = parts.first() else {
            return Ok(ConsoleCommand::Help);
        };

        let cmd = match head.to_lowercase().as_str() {
            "join" => {
                const USAGE: &str = "join <player> [world] [gamemode]";
                ConsoleCommand::Join {
                    name: arg(&parts, 1, USAGE)?.to_string(),
                    world: parts.get(2).map(|s| s.to_string()),
                    gamemode: parts.get(3).map(|s| GameMode::parse(s)),
                }
            }
            "quit" => ConsoleCommand::Quit {
                name: arg(&parts, 1, "quit <player>")?.to_string(),
            },
            "bed" => ConsoleCommand::Bed {
                name: arg(&parts, 1, "bed <player>")?.to_string(),
            },
            "wake" => ConsoleCommand::Wake {
                name: arg(&parts, 1, "wake <player>")?.to_string(),
            },
            "move" => {
                const USAGE: &str = "move <player> <x> <y> <z>";
                ConsoleCommand::Move {
                    name: arg(&parts, 1, USAGE)?.to_string(),
                    to: (
                        number(arg(&parts, 2, USAGE)?)?,
                        number(arg(&parts, 3, USAGE)?)?,
                        number(arg(&parts, 4, USAGE)?)?,
                    ),
                }
            }
            "interact" => ConsoleCommand::Interact {
                name: arg(&parts, 1, "interact <player>")?.to_string(),
            },
            "gamemode" => {
                const USAGE: &str = "gamemode <player> <mode>";
                ConsoleCommand::Gamemode {
                    name: arg(&parts, 1, USAGE)?.to_string(),
                    gamemode: GameMode::parse(arg(&parts, 2, USAGE)?),
                }
            }
            "time" => {
                const USAGE: &str = "time <world> <ticks>";
                ConsoleCommand::Time {
                    world: arg(&parts, 1, USAGE)?.to_string(),
                    time: number(arg(&parts, 2, USAGE)?)?,
                }
            }
            "rain" => {
                const USAGE: &str = "rain <world> <on|off|thunder>";
                let world = arg(&parts, 1, USAGE)?.to_string();
                let state = arg(&parts, 2, USAGE)?;
                let (raining, thundering) = match state.to_lowercase().as_str() {
                    "on" => (true, false),
                    "off" => (false, false),
                    "thunder" => (true, true),
                    _ => return Err(ConsoleError::InvalidWeather(state.to_string())),
                };
                ConsoleCommand::Rain {
                    world,
                    raining,
                    thundering,
                }
            }
            "list" => ConsoleCommand::List,
            "op" => ConsoleCommand::Op {
                name: arg(&parts, 1, "op <player>")?.to_string(),
            },
            "deop" => ConsoleCommand::Deop {
                name: arg(&parts, 1, "deop <player>")?.to_string(),
            },
            "complete" => ConsoleCommand::Complete {
                args: owned(&parts[1..]),
            },
            "as" => {
                const USAGE: &str = "as <player> <command> [args...]";
                ConsoleCommand::As {
                    name: arg(&parts, 1, USAGE)?.to_string(),
                    command: arg(&parts, 2, USAGE)?.trim_start_matches('/').to_lowercase(),
                    args: owned(&parts[3..]),
                }
            }
            "save" | "save-all" => ConsoleCommand::Save,
            "stop" => ConsoleCommand::Stop,
            "help" | "?" => ConsoleCommand::Help,
            other => ConsoleCommand::Plugin {
                command: other.to_string(),
                args: owned(&parts[1..]),
            },
        };
        Ok(cmd)
    }
}

/// Console help text.
pub fn help_lines() -> Vec<&'static str> {
    vec![
        "join <player> [world] [gamemode]  - connect a simulated player",
        "quit <player>                     - disconnect a player",
        "bed <player> / wake <player>      - enter or leave a bed",
        "move <player> <x> <y> <z>         - move a player",
        "interact <player>                 - record an interaction",
        "gamemode <player> <mode>          - change a player's game mode",
        "time <world> <ticks>              - set world time",
        "rain <world> <on|off|thunder>     - set world weather",
        "list                              - show worlds and players",
        "op <player> / deop <player>       - manage operators",
        "complete <args...>                - tab-complete /sleep",
        "as <player> <command> [args...]   - run a command as a player",
        "save                              - save all worlds",
        "stop                              - shut down",
        "<command> [args...]               - run a plugin command as the console",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line_is_help() {
        assert_eq!(ConsoleCommand::parse("   "), Ok(ConsoleCommand::Help));
    }

    #[test]
    fn join_with_optional_parts() {
        assert_eq!(
            ConsoleCommand::parse("join Steve"),
            Ok(ConsoleCommand::Join {
                name: "Steve".into(),
                world: None,
                gamemode: None,
            })
        );
        assert_eq!(
            ConsoleCommand::parse("join Alex world_nether creative"),
            Ok(ConsoleCommand::Join {
                name: "Alex".into(),
                world: Some("world_nether".into()),
                gamemode: Some(GameMode::Creative),
            })
        );
        assert_eq!(
            ConsoleCommand::parse("join"),
            Err(ConsoleError::Usage("join <player> [world] [gamemode]"))
        );
    }

    #[test]
    fn move_parses_coordinates() {
        assert_eq!(
            ConsoleCommand::parse("move Steve 1 64.5 -3"),
            Ok(ConsoleCommand::Move {
                name: "Steve".into(),
                to: (1.0, 64.5, -3.0),
            })
        );
        assert_eq!(
            ConsoleCommand::parse("move Steve 1 up -3"),
            Err(ConsoleError::InvalidNumber("up".into()))
        );
    }

    #[test]
    fn time_and_weather() {
        assert_eq!(
            ConsoleCommand::parse("time world 13000"),
            Ok(ConsoleCommand::Time {
                world: "world".into(),
                time: 13000,
            })
        );
        assert_eq!(
            ConsoleCommand::parse("rain world thunder"),
            Ok(ConsoleCommand::Rain {
                world: "world".into(),
                raining: true,
                thundering: true,
            })
        );
        assert_eq!(
            ConsoleCommand::parse("rain world maybe"),
            Err(ConsoleError::InvalidWeather("maybe".into()))
        );
    }

    #[test]
    fn unknown_goes_to_plugins() {
        assert_eq!(
            ConsoleCommand::parse("/sleep skip world"),
            Ok(ConsoleCommand::Plugin {
                command: "sleep".into(),
                args: vec!["skip".into(), "world".into()],
            })
        );
    }

    #[test]
    fn as_player() {
        assert_eq!(
            ConsoleCommand::parse("as Steve /sleep stats"),
            Ok(ConsoleCommand::As {
                name: "Steve".into(),
                command: "sleep".into(),
                args: vec!["stats".into()],
            })
        );
        assert!(ConsoleCommand::parse("as Steve").is_err());
    }

    #[test]
    fn complete_keeps_trailing_args() {
        assert_eq!(
            ConsoleCommand::parse("complete cooldown"),
            Ok(ConsoleCommand::Complete {
                args: vec!["cooldown".into()],
            })
        );
        assert_eq!(
            ConsoleCommand::parse("complete"),
            Ok(ConsoleCommand::Complete { args: Vec::new() })
        );
    }
}
