//! Named routes and the navigation history.
use crate::api::{Role, UserId};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Welcome,
    /// End-user landing screen offering login or registration.
    UserPortal,
    AdminLogin,
    UserLogin,
    AdminDashboard,
    UserDashboard,
    Directory,
    CreateUser,
    EditUser(UserId),
    Register,
}

impl Route {
    pub fn login_for(role: Role) -> Self {
        match role {
            Role::Admin => Route::AdminLogin,
            Role::User => Route::UserLogin,
        }
    }

    pub fn dashboard_for(role: Role) -> Self {
        match role {
            Role::Admin => Route::AdminDashboard,
            Role::User => Route::UserDashboard,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::Welcome => "Welcome",
            Route::UserPortal => "Users",
            Route::AdminLogin => "Sign in",
            Route::UserLogin => "User sign in",
            Route::AdminDashboard => "Admin dashboard",
            Route::UserDashboard => "User dashboard",
            Route::Directory => "User management",
            Route::CreateUser => "Create user",
            Route::EditUser(_) => "Edit user",
            Route::Register => "Register",
        }
    }

    /// Path-like name used in logs and the header line.
    pub fn path(self) -> String {
        match self {
            Route::Welcome => "/".into(),
            Route::UserPortal => "/user".into(),
            Route::AdminLogin => "/login".into(),
            Route::UserLogin => "/loginUser".into(),
            Route::AdminDashboard => "/dashboard".into(),
            Route::UserDashboard => "/dashboardUser".into(),
            Route::Directory => "/users".into(),
            Route::CreateUser => "/userscreate".into(),
            Route::EditUser(id) => format!("/usersedit?id={id}"),
            Route::Register => "/registerUser".into(),
        }
    }
}

/// Push-only history with back navigation, like a stack navigator.
#[derive(Clone, Debug)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Navigator {
    pub fn new(root: Route) -> Self {
        Self { stack: vec![root] }
    }

    pub fn current(&self) -> Route {
        // never empty: back() keeps the root
        self.stack[self.stack.len() - 1]
    }

    pub fn push(&mut self, route: Route) {
        tracing::info!(from = %self.current().path(), to = %route.path(), "navigate");
        self.stack.push(route);
    }

    /// Pop one entry. Returns `None` at the root.
    pub fn back(&mut self) -> Option<Route> {
        if self.stack.len() > 1 {
            self.stack.pop();
            Some(self.current())
        } else {
            None
        }
    }

    /// Drop history and start again from `route` (used on logout).
    pub fn reset(&mut self, route: Route) {
        tracing::info!(to = %route.path(), "reset navigation");
        self.stack.clear();
        self.stack.push(route);
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Welcome)
    }
}
