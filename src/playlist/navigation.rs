use std::fmt;

use serde::Serialize;

/// Edge of the playlist reached while navigating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    Beginning,
    End,
}

impl Boundary {
    /// Short form used in query strings, e.g. `/?notice=end`
    pub fn as_param(&self) -> &'static str {
        match self {
            Boundary::Beginning => "beginning",
            Boundary::End => "end",
        }
    }

    pub fn from_param(param: &str) -> Option<Self> {
        match param {
            "beginning" => Some(Boundary::Beginning),
            "end" => Some(Boundary::End),
            _ => None,
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::Beginning => write!(f, "Beginning of playlist."),
            Boundary::End => write!(f, "End of playlist."),
        }
    }
}

/// Outcome of `next_song` / `prev_song`.
///
/// A boundary is advisory: the cursor stays where it was and callers decide
/// whether to show the notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Moved,
    /// Nothing is playing, nothing happened.
    Idle,
    Boundary(Boundary),
}

impl Navigation {
    pub fn boundary(&self) -> Option<Boundary> {
        match self {
            Navigation::Boundary(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Navigation::Moved => "moved",
            Navigation::Idle => "idle",
            Navigation::Boundary(Boundary::Beginning) => "beginning_of_playlist",
            Navigation::Boundary(Boundary::End) => "end_of_playlist",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_text() {
        assert_eq!(Boundary::Beginning.to_string(), "Beginning of playlist.");
        assert_eq!(Boundary::End.to_string(), "End of playlist.");
    }

    #[test]
    fn test_param_parsing() {
        for b in [Boundary::Beginning, Boundary::End] {
            assert_eq!(Boundary::from_param(b.as_param()), Some(b));
        }
        assert_eq!(Boundary::from_param("middle"), None);
    }
}
