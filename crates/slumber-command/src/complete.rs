//! Tab completion for `/sleep`.

use crate::SUBCOMMANDS;

/// Suggest completions for the argument currently being typed.
///
/// `args` holds every argument typed so far, including the partial last one.
pub fn tab_complete(args: &[String], world_names: &[String]) -> Vec<String> {
    match args {
        [partial] => {
            let partial = partial.to_lowercase();
            SUBCOMMANDS
                .iter()
                .filter(|s| s.starts_with(&partial))
                .map(|s| s.to_string())
                .collect()
        }
        [sub, partial] if sub.eq_ignore_ascii_case("skip") => matching(world_names, partial),
        [sub, partial] if sub.eq_ignore_ascii_case("cooldown") => {
            matching(&["clear".to_string(), "check".to_string()], partial)
        }
        [sub, _, partial] if sub.eq_ignore_ascii_case("cooldown") => {
            matching(world_names, partial)
        }
        _ => Vec::new(),
    }
}

fn matching(candidates: &[String], partial: &str) -> Vec<String> {
    let partial = partial.to_lowercase();
    candidates
        .iter()
        .filter(|c| c.to_lowercase().starts_with(&partial))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn worlds() -> Vec<String> {
        args(&["world", "world_nether", "the_end"])
    }

    #[test]
    fn completes_subcommands_by_prefix() {
        assert_eq!(tab_complete(&args(&["s"]), &worlds()), args(&["skip", "stats"]));
        assert_eq!(tab_complete(&args(&[""]), &worlds()).len(), 6);
    }

    #[test]
    fn completes_worlds_after_skip() {
        assert_eq!(
            tab_complete(&args(&["skip", "wor"]), &worlds()),
            args(&["world", "world_nether"])
        );
    }

    #[test]
    fn completes_cooldown_actions_then_worlds() {
        assert_eq!(
            tab_complete(&args(&["cooldown", ""]), &worlds()),
            args(&["clear", "check"])
        );
        assert_eq!(
            tab_complete(&args(&["cooldown", "check", "the"]), &worlds()),
            args(&["the_end"])
        );
    }

    #[test]
    fn nothing_past_known_positions() {
        assert!(tab_complete(&args(&["stats", "x"]), &worlds()).is_empty());
        assert!(tab_complete(&args(&["skip", "world", "x"]), &worlds()).is_empty());
    }
}
