//! Route table
//!
//! Pure domain layer: no DOM, no `web_sys`. Defines every screen of the
//! client and the access class it belongs to.

use crate::guard::RouteKind;
use std::fmt::Display;

pub const SIGNIN_PATH: &str = "/signin";
pub const SIGNUP_PATH: &str = "/signup";
pub const DASHBOARD_PATH: &str = "/dashboard";
const REPORT_PREFIX: &str = "/report/";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// `/`, forwards to sign-in
    #[default]
    Landing,
    Signin,
    Signup,
    Dashboard,
    /// `/report/{id}`
    Report(String),
    NotFound,
}

impl AppRoute {
    pub fn from_path(path: &str) -> Self {
        // Query and fragment never select a route.
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let trimmed = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };

        match trimmed {
            "" | "/" => Self::Landing,
            SIGNIN_PATH => Self::Signin,
            SIGNUP_PATH => Self::Signup,
            DASHBOARD_PATH => Self::Dashboard,
            other => other
                .strip_prefix(REPORT_PREFIX)
                .filter(|raw| !raw.contains('/'))
                .map(decode_segment)
                // A decoded id must still be one non-empty segment.
                .filter(|id| !id.is_empty() && !id.contains('/'))
                .map_or(Self::NotFound, Self::Report),
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Self::Landing => "/".to_string(),
            Self::Signin => SIGNIN_PATH.to_string(),
            Self::Signup => SIGNUP_PATH.to_string(),
            Self::Dashboard => DASHBOARD_PATH.to_string(),
            Self::Report(id) => format!(
                "{}{}",
                REPORT_PREFIX,
                medscore_shared::protocol::encode_path_segment(id)
            ),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// Access class checked by the guard before the view renders.
    pub fn kind(&self) -> RouteKind {
        match self {
            Self::Signin | Self::Signup => RouteKind::AuthOnly,
            Self::Dashboard | Self::Report(_) => RouteKind::Private,
            Self::Landing | Self::NotFound => RouteKind::Public,
        }
    }

    /// Routes that render nothing themselves and hand off to another.
    pub fn forward(&self) -> Option<AppRoute> {
        match self {
            Self::Landing => Some(Self::Signin),
            _ => None,
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Reverses `%XX` escapes; anything else after `%`, signs included, is
/// kept literally.
fn decode_segment(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_paths() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Landing);
        assert_eq!(AppRoute::from_path("/signin"), AppRoute::Signin);
        assert_eq!(AppRoute::from_path("/signup/"), AppRoute::Signup);
        assert_eq!(AppRoute::from_path("/dashboard?x=1"), AppRoute::Dashboard);
        assert_eq!(
            AppRoute::from_path("/report/665f1c"),
            AppRoute::Report("665f1c".into())
        );
        assert_eq!(AppRoute::from_path("/report/"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/report/a/b"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
    }

    #[test]
    fn report_ids_survive_the_url() {
        let route = AppRoute::Report("a b~c".into());
        let path = route.to_path();
        assert_eq!(path, "/report/a%20b~c");
        assert_eq!(AppRoute::from_path(&path), route);
    }

    #[test]
    fn encoded_separators_are_not_report_ids() {
        assert_eq!(AppRoute::from_path("/report/a%2Fb"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/report/a%2fb"), AppRoute::NotFound);
        // Round trip of an id that cannot be a single segment.
        let path = AppRoute::Report("a/b".into()).to_path();
        assert_eq!(AppRoute::from_path(&path), AppRoute::NotFound);
    }

    #[test]
    fn malformed_escapes_are_kept() {
        assert_eq!(
            AppRoute::from_path("/report/50%"),
            AppRoute::Report("50%".into())
        );
        assert_eq!(
            AppRoute::from_path("/report/%zz1"),
            AppRoute::Report("%zz1".into())
        );
        // Signed "hex" is not an escape.
        assert_eq!(
            AppRoute::from_path("/report/x%+1"),
            AppRoute::Report("x%+1".into())
        );
        assert_eq!(
            AppRoute::from_path("/report/x%-f0"),
            AppRoute::Report("x%-f0".into())
        );
    }

    #[test]
    fn route_kinds() {
        assert_eq!(AppRoute::Signin.kind(), RouteKind::AuthOnly);
        assert_eq!(AppRoute::Signup.kind(), RouteKind::AuthOnly);
        assert_eq!(AppRoute::Dashboard.kind(), RouteKind::Private);
        assert_eq!(AppRoute::Report("r".into()).kind(), RouteKind::Private);
        assert_eq!(AppRoute::NotFound.kind(), RouteKind::Public);
        assert_eq!(AppRoute::Landing.forward(), Some(AppRoute::Signin));
    }
}
