//! `/sleep` command parsing, permissions, help, and tab completion.

pub mod complete;

use thiserror::Error;

pub use complete::tab_complete;

/// Name the command is registered under.
pub const COMMAND_NAME: &str = "sleep";

/// Sub-command names, in help order.
pub const SUBCOMMANDS: [&str; 6] = ["skip", "stats", "reload", "debug", "cooldown", "help"];

/// Context passed to a command handler.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Name of the player executing the command ("CONSOLE" for the console).
    pub sender_name: String,
    /// World the sender is standing in. `None` for the console.
    pub sender_world: Option<String>,
    /// Arguments after the command name.
    pub args: Vec<String>,
}

impl CommandContext {
    /// The world a command should act on: an explicit argument wins, then
    /// the sender's own world.
    pub fn target_world(&self, explicit: Option<&str>) -> Option<String> {
        explicit
            .map(str::to_string)
            .or_else(|| self.sender_world.clone())
    }
}

/// Result returned by a command handler.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    /// Whether the command executed successfully.
    pub success: bool,
    /// Messages to send back to the command sender.
    pub messages: Vec<String>,
    /// Optional message to broadcast to all players.
    pub broadcast: Option<String>,
}

impl CommandResult {
    /// Create a successful result with a single message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            messages: vec![message.into()],
            broadcast: None,
        }
    }

    /// Create a failed result with a single message.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            messages: vec![message.into()],
            broadcast: None,
        }
    }

    /// Create a successful result with several lines.
    pub fn lines(messages: Vec<String>) -> Self {
        Self {
            success: true,
            messages,
            broadcast: None,
        }
    }

    /// Create a successful result that only broadcasts.
    pub fn broadcast(message: impl Into<String>) -> Self {
        Self {
            success: true,
            messages: Vec::new(),
            broadcast: Some(message.into()),
        }
    }
}

/// What to do with a world's cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownAction {
    Clear,
    Check,
}

/// A parsed `/sleep` sub-command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SleepCommand {
    Skip { world: Option<String> },
    Stats,
    Reload,
    Debug,
    Cooldown {
        action: CooldownAction,
        world: Option<String>,
    },
    Help,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("&cUsage: /sleep cooldown <clear|check> [world]")]
    Usage,

    #[error("&cInvalid action '{0}'. Use 'clear' or 'check'.")]
    InvalidAction(String),
}

impl SleepCommand {
    /// Parse the arguments following `/sleep`.
    ///
    /// No arguments, `help`, or an unknown sub-command all yield `Help`.
    pub fn parse(args: &[String]) -> Result<Self, CommandError> {
        let Some(first) = args.first() else {
            return Ok(SleepCommand::Help);
        };
        let world = |i: usize| args.get(i).cloned();
        let cmd = match first.to_lowercase().as_str() {
            "skip" => SleepCommand::Skip { world: world(1) },
            "stats" => SleepCommand::Stats,
            "reload" => SleepCommand::Reload,
            "debug" => SleepCommand::Debug,
            "cooldown" => {
                let action = args.get(1).ok_or(CommandError::Usage)?;
                let action = match action.to_lowercase().as_str() {
                    "clear" => CooldownAction::Clear,
                    "check" => CooldownAction::Check,
                    _ => return Err(CommandError::InvalidAction(action.clone())),
                };
                SleepCommand::Cooldown {
                    action,
                    world: world(2),
                }
            }
            _ => SleepCommand::Help,
        };
        Ok(cmd)
    }

    /// Permission node required to run this sub-command.
    pub fn permission(&self) -> Option<&'static str> {
        match self {
            SleepCommand::Skip { .. } => Some("slumber.skip"),
            SleepCommand::Stats => Some("slumber.stats"),
            SleepCommand::Reload => Some("slumber.reload"),
            SleepCommand::Debug => Some("slumber.debug"),
            SleepCommand::Cooldown { .. } => Some("slumber.cooldown"),
            SleepCommand::Help => None,
        }
    }
}

/// Help text, one line per sub-command.
pub fn help_lines() -> Vec<String> {
    [
        "&6=== Slumber Commands ===",
        "&e/sleep skip [world] &7- Manually skip night",
        "&e/sleep stats &7- View sleep statistics",
        "&e/sleep reload &7- Reload configuration",
        "&e/sleep debug &7- Toggle debug mode",
        "&e/sleep cooldown <clear|check> [world] &7- Manage cooldowns",
        "&e/sleep help &7- Show this help",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_args_is_help() {
        assert_eq!(SleepCommand::parse(&[]), Ok(SleepCommand::Help));
    }

    #[test]
    fn unknown_subcommand_is_help() {
        assert_eq!(SleepCommand::parse(&args(&["dance"])), Ok(SleepCommand::Help));
    }

    #[test]
    fn skip_with_and_without_world() {
        assert_eq!(
            SleepCommand::parse(&args(&["skip"])),
            Ok(SleepCommand::Skip { world: None })
        );
        assert_eq!(
            SleepCommand::parse(&args(&["SKIP", "nether"])),
            Ok(SleepCommand::Skip {
                world: Some("nether".into())
            })
        );
    }

    #[test]
    fn cooldown_requires_action() {
        assert_eq!(
            SleepCommand::parse(&args(&["cooldown"])),
            Err(CommandError::Usage)
        );
    }

    #[test]
    fn cooldown_rejects_bad_action() {
        assert_eq!(
            SleepCommand::parse(&args(&["cooldown", "reset"])),
            Err(CommandError::InvalidAction("reset".into()))
        );
    }

    #[test]
    fn cooldown_check_with_world() {
        assert_eq!(
            SleepCommand::parse(&args(&["cooldown", "Check", "world"])),
            Ok(SleepCommand::Cooldown {
                action: CooldownAction::Check,
                world: Some("world".into())
            })
        );
    }

    #[test]
    fn permissions() {
        assert_eq!(SleepCommand::Stats.permission(), Some("slumber.stats"));
        assert_eq!(
            SleepCommand::Skip { world: None }.permission(),
            Some("slumber.skip")
        );
        assert_eq!(SleepCommand::Help.permission(), None);
    }

    #[test]
    fn target_world_prefers_explicit() {
        let ctx = CommandContext {
            sender_name: "Steve".into(),
            sender_world: Some("world".into()),
            args: Vec::new(),
        };
        assert_eq!(ctx.target_world(Some("end")), Some("end".into()));
        assert_eq!(ctx.target_world(None), Some("world".into()));

        let console = CommandContext {
            sender_name: "CONSOLE".into(),
            sender_world: None,
            args: Vec::new(),
        };
        assert_eq!(console.target_world(None), None);
    }

    #[test]
    fn help_covers_every_subcommand() {
        let help = help_lines().join("\n");
        for sub in SUBCOMMANDS {
            assert!(help.contains(&format!("/sleep {sub}")), "missing {sub}");
        }
    }

    #[test]
    fn result_helpers() {
        let ok = CommandResult::ok("success");
        assert!(ok.success);
        assert_eq!(ok.messages[0], "success");

        let err = CommandResult::err("failed");
        assert!(!err.success);
        assert_eq!(err.messages[0], "failed");

        let b = CommandResult::broadcast("hi");
        assert!(b.messages.is_empty());
        assert_eq!(b.broadcast.as_deref(), Some("hi"));
    }
}
