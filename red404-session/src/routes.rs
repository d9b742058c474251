//! The client route table.

use std::fmt;

/// A client route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum AppRoute {
    /// `/`, the sign-in page and redirect target of the guard.
    #[default]
    Entry,
    Login,
    Register,
    Home,
    Search,
    Explore,
    Messages,
    Brainrot,
    /// `/profile/*`; `section` is everything after `/profile/`, possibly empty.
    Profile { section: String },
    NotFound,
}

impl AppRoute {
    /// Match a path, ignoring any query string, fragment or trailing slash.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');

        match trimmed {
            "" => Self::Entry,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/home" => Self::Home,
            "/search" => Self::Search,
            "/explore" => Self::Explore,
            "/messages" => Self::Messages,
            "/brainrot" => Self::Brainrot,
            "/profile" => Self::Profile {
                section: String::new(),
            },
            other => match other.strip_prefix("/profile/") {
                Some(section) => Self::Profile {
                    section: section.to_string(),
                },
                None => Self::NotFound,
            },
        }
    }

    /// Canonical path of the route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Entry => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Home => "/home".to_string(),
            Self::Search => "/search".to_string(),
            Self::Explore => "/explore".to_string(),
            Self::Messages => "/messages".to_string(),
            Self::Brainrot => "/brainrot".to_string(),
            Self::Profile { section } if section.is_empty() => "/profile".to_string(),
            Self::Profile { section } => format!("/profile/{section}"),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// Whether the route needs a signed-in session.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Self::Home
                | Self::Search
                | Self::Explore
                | Self::Messages
                | Self::Brainrot
                | Self::Profile { .. }
        )
    }
}

impl fmt::Display for AppRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Which form started a Google sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoogleAuthMode {
    Login,
    Register,
}

impl GoogleAuthMode {
    /// Where the browser lands after the provider redirects back.
    #[must_use]
    pub fn redirect_target(self) -> &'static str {
        match self {
            Self::Login => "/home",
            Self::Register => "/register?setup=true",
        }
    }
}
