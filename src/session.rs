use std::collections::HashMap;

use crate::error::AuthError;
use crate::models::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    List,
    Detail(usize),
}

/// Navigation and admin state for one viewer.
#[derive(Debug, Default)]
pub struct Session {
    views: HashMap<Category, ViewState>,
    authenticated: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self, category: Category) -> ViewState {
        self.views.get(&category).copied().unwrap_or_default()
    }

    pub fn select(&mut self, category: Category, index: usize) {
        self.views.insert(category, ViewState::Detail(index));
    }

    pub fn back(&mut self, category: Category) {
        self.views.insert(category, ViewState::List);
    }

    /// Falls back to the list when the open index no longer exists.
    pub fn clamp(&mut self, category: Category, len: usize) {
        if let ViewState::Detail(i) = self.view(category) {
            if i >= len {
                self.back(category);
            }
        }
    }

    pub fn on_deleted(&mut self, category: Category, index: usize) {
        if let ViewState::Detail(i) = self.view(category) {
            if i == index {
                self.back(category);
            } else if i > index {
                self.select(category, i - 1);
            }
        }
    }

    pub fn on_inserted(&mut self, category: Category, index: usize) {
        if let ViewState::Detail(i) = self.view(category) {
            if i >= index {
                self.select(category, i + 1);
            }
        }
    }

    /// Any attempt that does not match, including when no secret is
    /// configured, clears the admin flag.
    pub fn login(&mut self, submitted: &str, secret: Option<&str>) -> Result<(), AuthError> {
        self.authenticated = matches!(secret, Some(s) if s.as_bytes() == submitted.as_bytes());
        if self.authenticated {
            tracing::info!("Admin login succeeded");
            Ok(())
        } else {
            tracing::warn!("Admin login failed");
            Err(AuthError::Mismatch)
        }
    }

    pub fn logout(&mut self) {
        self.authenticated = false;
    }

    pub fn is_admin(&self) -> bool {
        self.authenticated
    }

    pub fn require_admin(&self) -> Result<(), AuthError> {
        if self.authenticated {
            Ok(())
        } else {
            Err(AuthError::NotAuthenticated)
        }
    }
}
