//! # Help Text
//!
//! Fragments used by the `/help` command to render the command catalogue.

pub const HEADER: &str = "*Available Commands:*\n\n";
pub const FOOTER: &str = "You can also ask me questions directly!";

pub fn command_line(name: &str, description: &str) -> String {
    format!("/{name} - {description}\n")
}

pub fn alias_line(aliases: &[&str]) -> String {
    format!("  Aliases: /{}\n", aliases.join(", /"))
}
