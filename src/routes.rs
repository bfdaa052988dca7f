//! Route authorization.
//!
//! A pure decision table mapping (view, session) to an outcome. Keeping it
//! side-effect free means the same rules guard both interactive navigation
//! and one-shot commands, and the table is trivially testable.

use crate::session::{Role, SessionIdentity};

/// The navigable views of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Sign-in form; the only public view.
    Login,
    /// Shown when a signed-in user lacks the role for a view.
    Unauthorized,
    /// Aggregate figures.
    Dashboard,
    /// Point-of-sale terminal.
    PosTerminal,
    /// Medicine inventory management.
    Inventory,
    /// Category management.
    Categories,
    /// Account management.
    Users,
    /// Sales history and export.
    SalesHistory,
    /// The signed-in user's own profile.
    Profile,
}

/// Who may reach a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No session required.
    Public,
    /// Any signed-in user.
    Authenticated,
    /// Signed-in users holding one of the listed roles.
    Roles(&'static [Role]),
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Show the view.
    Allow,
    /// No session; send the user to sign in.
    RedirectToLogin,
    /// Signed in but lacking the role.
    RedirectToUnauthorized,
}

impl View {
    /// The access rule for this view. Inventory, category and account
    /// management are administrator-only; everything else needs any
    /// session.
    #[must_use]
    pub fn access(self) -> Access {
        match self {
            Self::Login | Self::Unauthorized => Access::Public,
            Self::Dashboard | Self::PosTerminal | Self::SalesHistory | Self::Profile => {
                Access::Authenticated
            }
            Self::Inventory | Self::Categories | Self::Users => Access::Roles(&[Role::Admin]),
        }
    }
}

/// Decide whether `identity` may reach `view`.
#[must_use]
pub fn authorize(view: View, identity: Option<&SessionIdentity>) -> RouteDecision {
    match view.access() {
        Access::Public => RouteDecision::Allow,
        Access::Authenticated => match identity {
            Some(_) => RouteDecision::Allow,
            None => RouteDecision::RedirectToLogin,
        },
        Access::Roles(roles) => match identity {
            Some(identity) if roles.contains(&identity.role) => RouteDecision::Allow,
            Some(_) => RouteDecision::RedirectToUnauthorized,
            None => RouteDecision::RedirectToLogin,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> SessionIdentity {
        SessionIdentity {
            id: 3,
            username: "alice".to_string(),
            role,
        }
    }

    #[test]
    fn anonymous_users_are_sent_to_login() {
        assert_eq!(
            authorize(View::PosTerminal, None),
            RouteDecision::RedirectToLogin
        );
        assert_eq!(
            authorize(View::Inventory, None),
            RouteDecision::RedirectToLogin
        );
    }

    #[test]
    fn login_is_public() {
        assert_eq!(authorize(View::Login, None), RouteDecision::Allow);
    }

    #[test]
    fn pharmacists_reach_shared_views() {
        let user = identity(Role::Pharmacist);

        assert_eq!(authorize(View::Dashboard, Some(&user)), RouteDecision::Allow);
        assert_eq!(
            authorize(View::PosTerminal, Some(&user)),
            RouteDecision::Allow
        );
        assert_eq!(
            authorize(View::SalesHistory, Some(&user)),
            RouteDecision::Allow
        );
        assert_eq!(authorize(View::Profile, Some(&user)), RouteDecision::Allow);
    }

    #[test]
    fn pharmacists_are_blocked_from_admin_views() {
        let user = identity(Role::Pharmacist);

        for view in [View::Inventory, View::Categories, View::Users] {
            assert_eq!(
                authorize(view, Some(&user)),
                RouteDecision::RedirectToUnauthorized,
                "{view:?} is administrator-only"
            );
        }
    }

    #[test]
    fn administrators_reach_everything() {
        let user = identity(Role::Admin);

        for view in [
            View::Dashboard,
            View::PosTerminal,
            View::Inventory,
            View::Categories,
            View::Users,
            View::SalesHistory,
            View::Profile,
        ] {
            assert_eq!(authorize(view, Some(&user)), RouteDecision::Allow);
        }
    }
}
