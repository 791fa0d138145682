//! Keyboard shortcut registry and documentation.

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub command: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, command: bool, shift: bool, description: &'static str) -> Self {
        Self {
            key,
            command,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl/Cmd+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.command {
            parts.push("Ctrl/Cmd");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, false, "Undo last stroke (any page)"),
            Shortcut::new("Z", true, true, "Redo"),
            Shortcut::new("Alt (hold)", false, false, "Pan the page instead of drawing"),
        ]
    }

    /// Print all shortcuts to stdout.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}
