//! The two entity kinds exposed over HTTP

use std::fmt;

/// Resource kind, used to build user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    User,
    Post,
}

impl Resource {
    /// Lowercase singular name ("user").
    pub fn singular(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Post => "post",
        }
    }

    /// Capitalized name ("User").
    pub fn title(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Post => "Post",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}
