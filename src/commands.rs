#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Mode(Option<String>),
    Agents,
    Errors,
    Login,
    Logout,
    Width(Option<usize>),
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_slash_command(input: &str) -> Option<SlashCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut words = trimmed.split_whitespace();
    let command = words.next().unwrap_or(trimmed).to_string();
    let argument = words.next();

    let parsed = match command.as_str() {
        "/mode" => SlashCommand::Mode(argument.map(|arg| arg.to_ascii_lowercase())),
        "/agents" => SlashCommand::Agents,
        "/errors" => SlashCommand::Errors,
        "/login" => SlashCommand::Login,
        "/logout" => SlashCommand::Logout,
        "/width" => SlashCommand::Width(argument.and_then(|arg| arg.parse().ok())),
        "/help" => SlashCommand::Help,
        "/quit" => SlashCommand::Quit,
        _ => SlashCommand::Unknown(command),
    };

    Some(parsed)
}
