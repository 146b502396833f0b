//! Console output helpers: ANSI styling and the quiet/json modes.
//!
//! The global flags are exported through environment variables by `main`
//! so every module can check them without threading state around.

use serde::Serialize;

/// Whether `--quiet` was passed.
pub fn is_quiet() -> bool {
    std::env::var("SHODAN_HARVEST_QUIET").is_ok()
}

/// Whether `--json` was passed.
pub fn is_json() -> bool {
    std::env::var("SHODAN_HARVEST_JSON").is_ok()
}

/// Whether colored output is disabled (`--no-color` or the NO_COLOR convention).
pub fn no_color() -> bool {
    std::env::var("SHODAN_HARVEST_NO_COLOR").is_ok() || std::env::var("NO_COLOR").is_ok()
}

/// Print a value as a single JSON line on stdout.
pub fn print_json<T: Serialize>(value: &T) {
    if let Ok(s) = serde_json::to_string(value) {
        println!("{s}");
    }
}

/// ANSI styling that degrades to plain text when colors are disabled.
pub struct Styled {
    color: bool,
}

impl Styled {
    pub fn new() -> Self {
        Self { color: !no_color() }
    }

    fn wrap(&self, code: &str, s: &str) -> String {
        if self.color {
            format!("\x1b[{code}m{s}\x1b[0m")
        } else {
            s.to_string()
        }
    }

    pub fn ok_sym(&self) -> String {
        self.wrap("32", "✔")
    }

    pub fn warn_sym(&self) -> String {
        self.wrap("33", "⏳")
    }

    pub fn fail_sym(&self) -> String {
        self.wrap("31", "✖")
    }

    pub fn green(&self, s: &str) -> String {
        self.wrap("32", s)
    }

    pub fn yellow(&self, s: &str) -> String {
        self.wrap("33", s)
    }

    pub fn red(&self, s: &str) -> String {
        self.wrap("31", s)
    }

    pub fn cyan(&self, s: &str) -> String {
        self.wrap("36", s)
    }

    pub fn blue(&self, s: &str) -> String {
        self.wrap("94", s)
    }

    pub fn underline(&self, s: &str) -> String {
        self.wrap("4", s)
    }
}

impl Default for Styled {
    fn default() -> Self {
        Self::new()
    }
}
