//! Mobile app screen models
//!
//! Each screen is a plain struct with its own validation. [`MobileApp`] ties
//! them together for a scenario: it owns one instance of every screen and
//! tracks which screen is showing plus the back stack.

pub mod account;
pub mod auth;
pub mod payment;
pub mod plans;
pub mod providers;
pub mod validation;

pub use account::{AccountPage, AccountProfile, AccountRole, AccountSection, StaticProfiles, UserProfile};
pub use auth::{AuthScreen, AuthTab, UserRole};
pub use payment::PaymentScreen;
pub use plans::{PlansScreen, SubscriptionPlan, PLANS};
pub use providers::{Provider, ProviderDraft, ProviderUpdate, ProvidersView};

use crate::errors::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Auth,
    Home,
    AccountTypeSelection,
    TermsAndConditions,
    SubscriptionPlans,
    Payment { card_identifier: u8 },
    Providers,
    Account,
    ProfileInformation,
    ProfilePreferences,
}

#[derive(Debug, Clone)]
pub struct MobileApp {
    pub auth: AuthScreen,
    pub plans: PlansScreen,
    pub payment: Option<PaymentScreen>,
    pub providers: ProvidersView,
    pub account: AccountPage,
    current: Screen,
    stack: Vec<Screen>,
}

impl Default for MobileApp {
    fn default() -> Self {
        Self::new()
    }
}

impl MobileApp {
    /// Freshly launched app on the authentication screen
    pub fn new() -> Self {
        Self {
            auth: AuthScreen::new(),
            plans: PlansScreen::new(),
            payment: None,
            providers: ProvidersView::default(),
            account: AccountPage::default(),
            current: Screen::Auth,
            stack: Vec::new(),
        }
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    pub fn history(&self) -> &[Screen] {
        &self.stack
    }

    pub fn navigate(&mut self, screen: Screen) {
        if screen == self.current {
            return;
        }
        tracing::debug!("Navigate {:?} -> {:?}", self.current, screen);
        self.stack.push(self.current);
        self.current = screen;
    }

    /// Pop the back stack; false when already at the root
    pub fn back(&mut self) -> bool {
        let Some(previous) = self.stack.pop() else {
            return false;
        };
        if matches!(self.current, Screen::Payment { .. }) {
            self.payment = None;
            self.plans.clear_selection();
        }
        self.current = previous;
        true
    }

    pub fn login(&mut self) -> Result<(), AuthError> {
        self.auth.login()?;
        if let Some(role) = self.auth.login.role {
            self.account.set_role_id(Some(role.role_id()));
        }
        self.navigate(self.auth.current_screen);
        Ok(())
    }

    pub fn sign_up(&mut self) -> Result<(), AuthError> {
        self.auth.sign_up()?;
        self.navigate(self.auth.current_screen);
        Ok(())
    }

    pub fn open_terms(&mut self) {
        self.auth.open_terms();
        self.navigate(Screen::TermsAndConditions);
    }

    /// Session shortcut used by scenarios that start past the login screen
    pub fn log_in_as(&mut self, role: UserRole) {
        self.auth.auth_token = Some(format!("token_for_{}", role.as_str().to_lowercase()));
        self.auth.login.role = Some(role);
        self.auth.current_screen = Screen::Home;
        self.account.set_role_id(Some(role.role_id()));
        self.navigate(Screen::Home);
    }

    /// Select a plan and move to its checkout; `None` if no plan has that name
    pub fn select_plan(&mut self, name: &str) -> Option<u8> {
        let identifier = self.plans.select(name)?;
        self.payment = Some(PaymentScreen::new(identifier));
        self.navigate(Screen::Payment {
            card_identifier: identifier,
        });
        Some(identifier)
    }

    pub fn open_account_section(&mut self, section: AccountSection) {
        let screen = match section {
            AccountSection::ProfileInformation => Screen::ProfileInformation,
            AccountSection::ProfilePreferences => Screen::ProfilePreferences,
        };
        self.navigate(screen);
    }
}
