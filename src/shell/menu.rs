//! Main menu commands

use std::fmt;

/// Everything the main menu can do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOperation {
    Add,
    Edit,
    Delete,
    List,
    Search,
    History,
    Help,
    Quit,
}

impl MenuOperation {
    /// Menu order
    pub const ALL: [MenuOperation; 8] = [
        MenuOperation::Add,
        MenuOperation::Edit,
        MenuOperation::Delete,
        MenuOperation::List,
        MenuOperation::Search,
        MenuOperation::History,
        MenuOperation::Help,
        MenuOperation::Quit,
    ];

    /// Key shown in the menu
    pub fn key(self) -> char {
        match self {
            MenuOperation::Add => 'a',
            MenuOperation::Edit => 'e',
            MenuOperation::Delete => 'r',
            MenuOperation::List => 'l',
            MenuOperation::Search => 's',
            MenuOperation::History => 'h',
            MenuOperation::Help => 'c',
            MenuOperation::Quit => 'q',
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MenuOperation::Add => "Add a transaction",
            MenuOperation::Edit => "Edit a transaction",
            MenuOperation::Delete => "Remove a transaction and its receipt",
            MenuOperation::List => "List all transactions",
            MenuOperation::Search => "Search transactions",
            MenuOperation::History => "Show the change history",
            MenuOperation::Help => "Show commands",
            MenuOperation::Quit => "Quit",
        }
    }

    /// Parse a menu answer: the key, a few aliases, or the command name
    pub fn from_input(input: &str) -> Option<Self> {
        let input = input.trim().to_lowercase();
        let op = match input.as_str() {
            "a" | "add" => MenuOperation::Add,
            "e" | "edit" => MenuOperation::Edit,
            "r" | "d" | "remove" | "delete" => MenuOperation::Delete,
            "l" | "list" => MenuOperation::List,
            "s" | "search" => MenuOperation::Search,
            "h" | "history" => MenuOperation::History,
            "c" | "?" | "help" | "commands" => MenuOperation::Help,
            "q" | "quit" | "exit" => MenuOperation::Quit,
            _ => return None,
        };
        Some(op)
    }
}

impl fmt::Display for MenuOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\t{} - {}", self.key(), self.description())
    }
}

/// The command list shown at startup and on request
pub fn format_menu() -> String {
    let mut menu = String::from("Commands:\n");
    for op in MenuOperation::ALL {
        menu.push_str(&op.to_string());
        menu.push('\n');
    }
    menu
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip() {
        for op in MenuOperation::ALL {
            assert_eq!(MenuOperation::from_input(&op.key().to_string()), Some(op));
        }
    }

    #[test]
    fn test_aliases_and_unknown() {
        assert_eq!(MenuOperation::from_input(" D "), Some(MenuOperation::Delete));
        assert_eq!(MenuOperation::from_input("Search"), Some(MenuOperation::Search));
        assert_eq!(MenuOperation::from_input("?"), Some(MenuOperation::Help));
        assert_eq!(MenuOperation::from_input("history"), Some(MenuOperation::History));
        assert_eq!(MenuOperation::from_input("x"), None);
        assert_eq!(MenuOperation::from_input(""), None);
    }

    #[test]
    fn test_menu_lists_every_command() {
        let menu = format_menu();
        assert!(menu.contains("\ta - Add a transaction"));
        assert!(menu.contains("\tq - Quit"));
        assert_eq!(menu.lines().count(), 1 + MenuOperation::ALL.len());
    }
}
