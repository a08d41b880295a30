//! Slash-command parser for the chat loop
//!
//! Anything starting with `/` is a command; everything else is a chat
//! prompt sent to the endpoint.

/// Parsed user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    /// Empty the conversation
    Clear,
    /// Session counters and last throughput
    Status,
    /// Show past turns, newest last
    History { limit: Option<usize> },
    /// Show or set the system prompt
    System { prompt: Option<String> },
    /// Set the generation seed
    Seed { value: i64 },
    /// Replace the content of the turn at `index`
    Edit { index: usize, text: String },
    /// Plain chat input
    Prompt { input: String },
    /// Unrecognized or malformed slash command
    Unknown { input: String },
}

impl Command {
    /// Parse one line of input
    pub fn parse(input: &str) -> Command {
        let trimmed = input.trim();

        if !trimmed.starts_with('/') {
            return Command::Prompt {
                input: trimmed.to_string(),
            };
        }

        let mut parts = trimmed[1..].splitn(2, char::is_whitespace);
        let head = parts.next().unwrap_or("").to_lowercase();
        let rest = parts.next().map(str::trim).unwrap_or("");

        match head.as_str() {
            "help" | "h" => Command::Help,
            "exit" | "quit" | "q" => Command::Exit,
            "clear" | "cls" => Command::Clear,
            "status" => Command::Status,
            "history" => Command::History {
                limit: if rest.is_empty() {
                    None
                } else {
                    match rest.parse() {
                        Ok(limit) => Some(limit),
                        Err(_) => {
                            return Command::Unknown {
                                input: trimmed.to_string(),
                            }
                        }
                    }
                },
            },
            "system" => Command::System {
                prompt: if rest.is_empty() {
                    None
                } else {
                    Some(rest.to_string())
                },
            },
            "seed" => match rest.parse() {
                Ok(value) => Command::Seed { value },
                Err(_) => Command::Unknown {
                    input: trimmed.to_string(),
                },
            },
            "edit" => {
                let mut edit_parts = rest.splitn(2, char::is_whitespace);
                let index = edit_parts.next().and_then(|s| s.parse().ok());
                let text = edit_parts.next().map(str::trim).unwrap_or("");
                match index {
                    Some(index) if !text.is_empty() => Command::Edit {
                        index,
                        text: text.to_string(),
                    },
                    _ => Command::Unknown {
                        input: trimmed.to_string(),
                    },
                }
            }
            _ => Command::Unknown {
                input: trimmed.to_string(),
            },
        }
    }

    /// Help text listing the built-in commands
    pub fn help_text() -> &'static str {
        "Commands:\n\
         /help           show this help\n\
         /exit           quit\n\
         /clear          empty the conversation\n\
         /status         session counters and last throughput\n\
         /history [n]    show the last n turns (all by default)\n\
         /system [text]  show or set the system prompt\n\
         /seed <n>       set the generation seed\n\
         /edit <i> <txt> replace the content of turn i\n\
         anything else   send as a chat message (Ctrl-C cancels a response)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_input_is_prompt() {
        assert_eq!(
            Command::parse("hello there"),
            Command::Prompt {
                input: "hello there".to_string()
            }
        );
    }

    #[test]
    fn test_basic_commands() {
        assert_eq!(Command::parse("/help"), Command::Help);
        assert_eq!(Command::parse("/h"), Command::Help);
        assert_eq!(Command::parse("/exit"), Command::Exit);
        assert_eq!(Command::parse("/q"), Command::Exit);
        assert_eq!(Command::parse("/clear"), Command::Clear);
        assert_eq!(Command::parse("/status"), Command::Status);
    }

    #[test]
    fn test_history_with_limit() {
        assert_eq!(
            Command::parse("/history 5"),
            Command::History { limit: Some(5) }
        );
        assert_eq!(Command::parse("/history"), Command::History { limit: None });
        assert!(matches!(
            Command::parse("/history five"),
            Command::Unknown { .. }
        ));
    }

    #[test]
    fn test_system_show_and_set() {
        assert_eq!(Command::parse("/system"), Command::System { prompt: None });
        assert_eq!(
            Command::parse("/system answer briefly"),
            Command::System {
                prompt: Some("answer briefly".to_string())
            }
        );
    }

    #[test]
    fn test_seed() {
        assert_eq!(Command::parse("/seed 42"), Command::Seed { value: 42 });
        assert!(matches!(Command::parse("/seed"), Command::Unknown { .. }));
        assert!(matches!(Command::parse("/seed abc"), Command::Unknown { .. }));
    }

    #[test]
    fn test_edit() {
        assert_eq!(
            Command::parse("/edit 2 fixed wording"),
            Command::Edit {
                index: 2,
                text: "fixed wording".to_string()
            }
        );
        assert!(matches!(Command::parse("/edit"), Command::Unknown { .. }));
        assert!(matches!(Command::parse("/edit 2"), Command::Unknown { .. }));
    }

    #[test]
    fn test_unknown_slash_command_is_not_a_prompt() {
        assert!(matches!(
            Command::parse("/frobnicate"),
            Command::Unknown { .. }
        ));
    }
}
