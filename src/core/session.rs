//! # Session Gate
//!
//! Who is chatting. A session starts `Anonymous` and becomes `Active` once a
//! non-blank display name is confirmed. There is no way back: `Active` lasts
//! for the life of the process.
//!
//! ```text
//! Anonymous ──confirm(non-blank)──▶ Active(name)
//! ```

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Active(String),
}

impl Session {
    /// Try to confirm `name`. Returns `true` only on the Anonymous → Active
    /// transition. Blank names and repeated confirms are silently ignored.
    pub fn confirm(&mut self, name: &str) -> bool {
        if self.is_active() {
            return false;
        }
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        *self = Session::Active(name.to_string());
        true
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Session::Active(_))
    }

    /// The confirmed display name, if any.
    pub fn user(&self) -> Option<&str> {
        match self {
            Session::Active(name) => Some(name),
            Session::Anonymous => None,
        }
    }
}
