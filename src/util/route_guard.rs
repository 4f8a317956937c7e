//! Route guard shared by every view.
//!
//! SYSTEM CONTEXT
//! ==============
//! The view layer asks [`decide`] before rendering any path. The answer is
//! either a view to render or a path to redirect to, computed only from the
//! current [`AuthState`].

#[cfg(test)]
#[path = "route_guard_test.rs"]
mod route_guard_test;

use std::fmt;

use serde::Serialize;

use crate::state::auth::AuthState;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const SIGNUP_PATH: &str = "/signup";

/// A renderable screen of the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum View {
    Loading,
    Home,
    Login,
    Signup,
    Admin,
    AdminCreate,
    AdminDelete,
    AdminVideo,
    #[serde(rename_all = "camelCase")]
    AdminUpload { problem_id: String },
    #[serde(rename_all = "camelCase")]
    Problem { problem_id: String },
    NotFound,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Decision {
    Render(View),
    RedirectTo(&'static str),
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Render(view) => write!(f, "render {view:?}"),
            Self::RedirectTo(path) => write!(f, "redirect {path}"),
        }
    }
}

/// Decide what to show for `path` given the session state.
#[must_use]
pub fn decide(state: &AuthState, path: &str) -> Decision {
    if state.loading {
        return Decision::Render(View::Loading);
    }

    let segments = segments(path);
    let view = match_view(&segments);
    let is_admin_path = segments.first() == Some(&"admin");
    let requires_identity = is_admin_path || view == View::Home;

    if !state.is_authenticated {
        if requires_identity {
            return Decision::RedirectTo(SIGNUP_PATH);
        }
        return Decision::Render(view);
    }

    if matches!(view, View::Login | View::Signup) {
        return Decision::RedirectTo(HOME_PATH);
    }
    if is_admin_path && !state.is_admin() {
        return Decision::RedirectTo(HOME_PATH);
    }
    Decision::Render(view)
}

/// Path segments with the query, fragment, and empty segments dropped.
fn segments(path: &str) -> Vec<&str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn match_view(segments: &[&str]) -> View {
    match segments {
        [] => View::Home,
        ["login"] => View::Login,
        ["signup"] => View::Signup,
        ["admin"] => View::Admin,
        ["admin", "create"] => View::AdminCreate,
        ["admin", "delete"] => View::AdminDelete,
        ["admin", "video"] => View::AdminVideo,
        ["admin", "upload", id] => View::AdminUpload { problem_id: (*id).to_owned() },
        ["problem", id] => View::Problem { problem_id: (*id).to_owned() },
        _ => View::NotFound,
    }
}
