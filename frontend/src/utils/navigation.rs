use log::debug;

pub const LOGIN_PATH: &str = "/login";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Where the app sends the user when auth state changes underneath a view.
pub trait Navigator {
    fn current_path(&self) -> Option<String>;
    fn navigate(&self, path: &str);
}

/// Full-page navigation through `window.location`, which also drops any
/// in-memory state belonging to the previous session.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn current_path(&self) -> Option<String> {
        super::storage::current_pathname()
    }

    fn navigate(&self, path: &str) {
        if let Ok(window) = super::storage::window() {
            let _ = window.location().set_href(path);
        }
    }
}

/// Host builds have no window to navigate.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedNavigator;

impl Navigator for DetachedNavigator {
    fn current_path(&self) -> Option<String> {
        None
    }

    fn navigate(&self, path: &str) {
        debug!("navigation to {} ignored outside the browser", path);
    }
}

pub fn redirect_to_login(navigator: &dyn Navigator) {
    if navigator.current_path().as_deref() == Some(LOGIN_PATH) {
        return;
    }
    navigator.navigate(LOGIN_PATH);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::RecordingNavigator;

    #[test]
    fn redirect_skips_when_already_on_login() {
        let nav = RecordingNavigator::at(LOGIN_PATH);
        redirect_to_login(&nav);
        assert!(nav.visits().is_empty());
    }

    #[test]
    fn redirect_navigates_from_other_pages() {
        let nav = RecordingNavigator::at("/dashboard");
        redirect_to_login(&nav);
        assert_eq!(nav.visits(), vec![LOGIN_PATH.to_string()]);
        assert_eq!(nav.current_path().as_deref(), Some(LOGIN_PATH));
    }
}
