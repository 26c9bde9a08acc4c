//! BDD tests for the mobile app screens
//!
//! Run: cargo test --test mobile_bdd

use cucumber::{given, then, when, World};

use sweetmanager_bdd::mobile::account::DEFAULT_AVATAR_URL;
use sweetmanager_bdd::mobile::payment::validate_cvv;
use sweetmanager_bdd::mobile::plans::find_plan;
use sweetmanager_bdd::mobile::providers::sample_providers;
use sweetmanager_bdd::mobile::{
    AccountProfile, AccountSection, AuthTab, MobileApp, ProviderUpdate, ProvidersView, Screen,
    UserRole,
};

#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct MobileWorld {
    app: MobileApp,
    /// Message of the last failed action
    last_error: Option<String>,
    last_provider_id: Option<u32>,
}

impl MobileWorld {
    fn new() -> Self {
        Self {
            app: MobileApp::new(),
            last_error: None,
            last_provider_id: None,
        }
    }

    fn record<T, E: std::fmt::Display>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => {
                self.last_error = None;
                Some(value)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                None
            }
        }
    }

    fn payment(&mut self) -> &mut sweetmanager_bdd::mobile::PaymentScreen {
        self.app.payment.as_mut().expect("no checkout is open")
    }

    fn provider_named(&self, name: &str) -> u32 {
        self.app
            .providers
            .providers()
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.id)
            .unwrap_or_else(|| panic!("no provider named {:?}", name))
    }
}

fn screen_matches(screen: Screen, name: &str) -> bool {
    match name {
        "authentication" => screen == Screen::Auth,
        "home" => screen == Screen::Home,
        "account type selection" => screen == Screen::AccountTypeSelection,
        "terms and conditions" => screen == Screen::TermsAndConditions,
        "subscription plans" => screen == Screen::SubscriptionPlans,
        "payment" => matches!(screen, Screen::Payment { .. }),
        "providers" => screen == Screen::Providers,
        "account" => screen == Screen::Account,
        "profile information" => screen == Screen::ProfileInformation,
        "profile preferences" => screen == Screen::ProfilePreferences,
        other => panic!("unknown screen {:?}", other),
    }
}

// ============================================================================
// SESSION & NAVIGATION
// ============================================================================

#[given("the app is on the authentication screen")]
async fn on_auth_screen(w: &mut MobileWorld) {
    assert_eq!(w.app.current(), Screen::Auth);
}

#[given(regex = r"^I am logged in as an? (owner|guest)$")]
async fn logged_in_as(w: &mut MobileWorld, role: String) {
    let role: UserRole = role.parse().expect("role");
    w.app.log_in_as(role);
}

#[given("I am on the subscription plans screen")]
async fn on_plans_screen(w: &mut MobileWorld) {
    w.app.navigate(Screen::SubscriptionPlans);
}

#[when("I go back")]
async fn go_back(w: &mut MobileWorld) {
    w.app.back();
}

#[then(regex = r"^I should be on the (.+) screen$")]
async fn should_be_on(w: &mut MobileWorld, name: String) {
    assert!(
        screen_matches(w.app.current(), &name),
        "expected {} screen, on {:?}",
        name,
        w.app.current()
    );
}

#[then(regex = r#"^I should see the error "([^"]+)"$"#)]
async fn should_see_error(w: &mut MobileWorld, message: String) {
    assert_eq!(w.last_error.as_deref(), Some(message.as_str()));
}

#[then(regex = r#"^I should see an error containing "([^"]+)"$"#)]
async fn should_see_error_containing(w: &mut MobileWorld, fragment: String) {
    let error = w.last_error.as_deref().expect("no error shown");
    assert!(error.contains(&fragment), "{:?} lacks {:?}", error, fragment);
}

#[then("no error should be shown")]
async fn no_error(w: &mut MobileWorld) {
    assert_eq!(w.last_error, None);
}

// ============================================================================
// AUTHENTICATION
// ============================================================================

#[when(regex = r#"^I enter the email "([^"]*)" and password "([^"]*)"$"#)]
async fn enter_credentials(w: &mut MobileWorld, email: String, password: String) {
    w.app.auth.login.email = email;
    w.app.auth.login.password = password;
}

#[when(regex = r#"^I select the role "([^"]+)"$"#)]
async fn select_role(w: &mut MobileWorld, role: String) {
    w.app.auth.login.role = Some(role.parse().expect("role"));
}

#[when("I check remember me")]
async fn remember_me(w: &mut MobileWorld) {
    w.app.auth.login.remember_me = true;
}

#[when("I tap the login button")]
async fn tap_login(w: &mut MobileWorld) {
    let result = w.app.login();
    w.record(result);
}

#[when(regex = r#"^I switch to the "([^"]+)" tab$"#)]
async fn switch_tab(w: &mut MobileWorld, tab: String) {
    let tab: AuthTab = tab.parse().expect("tab");
    w.app.auth.switch_tab(tab);
}

#[when(regex = r#"^I fill the sign-up form with password "([^"]*)" and confirmation "([^"]*)"$"#)]
async fn fill_sign_up(w: &mut MobileWorld, password: String, confirmation: String) {
    let form = &mut w.app.auth.signup;
    form.full_name = "María García".to_string();
    form.email = "maria@hotel.com".to_string();
    form.dni = "12345678".to_string();
    form.phone = "+51 987 654 321".to_string();
    form.password = password;
    form.confirm_password = confirmation;
}

#[when(regex = r"^I leave the (full name|email|dni|phone) empty$")]
async fn leave_empty(w: &mut MobileWorld, field: String) {
    let form = &mut w.app.auth.signup;
    match field.as_str() {
        "full name" => form.full_name.clear(),
        "email" => form.email.clear(),
        "dni" => form.dni.clear(),
        _ => form.phone.clear(),
    }
}

#[when("I accept the terms and conditions")]
async fn accept_terms(w: &mut MobileWorld) {
    w.app.auth.signup.accept_terms = true;
}

#[when("I tap the sign-up button")]
async fn tap_sign_up(w: &mut MobileWorld) {
    let result = w.app.sign_up();
    w.record(result);
}

#[when("I toggle the login password visibility")]
async fn toggle_login_password(w: &mut MobileWorld) {
    w.app.auth.toggle_password_visibility();
}

#[when("I open the terms and conditions")]
async fn open_terms(w: &mut MobileWorld) {
    w.app.open_terms();
}

#[then("the login tab should be selected")]
async fn login_tab_selected(w: &mut MobileWorld) {
    assert_eq!(w.app.auth.tab, AuthTab::Login);
}

#[then("the sign-up tab should be selected")]
async fn sign_up_tab_selected(w: &mut MobileWorld) {
    assert_eq!(w.app.auth.tab, AuthTab::SignUp);
}

#[then("all passwords should be hidden")]
async fn passwords_hidden(w: &mut MobileWorld) {
    let visible = w.app.auth.visible;
    assert!(!visible.login && !visible.signup && !visible.confirm);
}

#[then("the login password should be visible")]
async fn login_password_visible(w: &mut MobileWorld) {
    assert!(w.app.auth.visible.login);
}

#[then(regex = r#"^the auth token should be "([^"]+)"$"#)]
async fn auth_token_is(w: &mut MobileWorld, token: String) {
    assert_eq!(w.app.auth.auth_token.as_deref(), Some(token.as_str()));
}

#[then("I should not be logged in")]
async fn not_logged_in(w: &mut MobileWorld) {
    assert!(!w.app.auth.is_logged_in());
}

#[then(regex = r#"^the remembered email should be "([^"]+)"$"#)]
async fn remembered_email(w: &mut MobileWorld, email: String) {
    assert_eq!(w.app.auth.remembered_email.as_deref(), Some(email.as_str()));
}

#[then(regex = r#"^the email field should show "([^"]+)"$"#)]
async fn email_field_error(w: &mut MobileWorld, message: String) {
    assert_eq!(w.app.auth.email_error(), Some(message.as_str()));
}

#[then(regex = r"^the sign-up button should be (enabled|disabled)$")]
async fn sign_up_button(w: &mut MobileWorld, state: String) {
    assert_eq!(w.app.auth.can_sign_up(), state == "enabled");
}

// ============================================================================
// SUBSCRIPTION PLANS
// ============================================================================

#[then(regex = r"^there should be (\d+) plans$")]
async fn plan_count(w: &mut MobileWorld, count: usize) {
    assert_eq!(w.app.plans.plans().len(), count);
}

#[then(regex = r#"^the plan "([^"]+)" should cost "([^"]+)"$"#)]
async fn plan_costs(_w: &mut MobileWorld, name: String, price: String) {
    let plan = find_plan(&name).expect("plan");
    assert_eq!(plan.price_label(), price);
}

#[then(regex = r#"^the plan "([^"]+)" should have identifier (\d+)$"#)]
async fn plan_identifier(_w: &mut MobileWorld, name: String, identifier: u8) {
    assert_eq!(find_plan(&name).expect("plan").identifier, identifier);
}

#[then(regex = r#"^the plan "([^"]+)" should include every feature of "([^"]+)"$"#)]
async fn plan_superset(_w: &mut MobileWorld, name: String, other: String) {
    let plan = find_plan(&name).expect("plan");
    let other = find_plan(&other).expect("plan");
    assert!(plan.includes_all_of(other));
    assert!(plan.features.len() > other.features.len());
}

#[then(regex = r#"^the cheapest plan should be "([^"]+)"$"#)]
async fn cheapest_plan(w: &mut MobileWorld, name: String) {
    assert_eq!(w.app.plans.cheapest().map(|p| p.title), Some(name.as_str()));
}

#[when(regex = r#"^I choose the plan "([^"]+)"$"#)]
async fn choose_plan(w: &mut MobileWorld, name: String) {
    match w.app.select_plan(&name) {
        Some(_) => w.last_error = None,
        None => w.last_error = Some(format!("Unknown plan: {}", name)),
    }
}

#[then(regex = r"^the checkout should be for plan (\d+)$")]
async fn checkout_for(w: &mut MobileWorld, identifier: u8) {
    assert_eq!(
        w.app.current(),
        Screen::Payment {
            card_identifier: identifier
        }
    );
    assert_eq!(w.payment().card_identifier(), identifier);
}

#[then("no plan should be selected")]
async fn no_plan_selected(w: &mut MobileWorld) {
    assert!(w.app.plans.selected().is_none());
    assert!(w.app.payment.is_none());
}

// ============================================================================
// PAYMENT
// ============================================================================

#[when(regex = r#"^I enter the card number "([^"]*)"$"#)]
async fn enter_card(w: &mut MobileWorld, number: String) {
    w.payment().set_card_number(&number);
}

#[when(regex = r#"^I enter the expiration date "([^"]*)"$"#)]
async fn enter_expiration(w: &mut MobileWorld, date: String) {
    w.payment().set_expiration(&date);
}

#[when(regex = r#"^I enter the CVV "([^"]*)"$"#)]
async fn enter_cvv(w: &mut MobileWorld, cvv: String) {
    w.payment().set_cvv(&cvv);
}

#[when("I tap the pay button")]
async fn tap_pay(w: &mut MobileWorld) {
    let payment = w.payment();
    let result = payment.process_payment();
    let message = payment.error_message();
    w.record(result);
    if w.last_error.is_some() {
        w.last_error = message;
    }
}

#[then(regex = r#"^the card number field should show "([^"]*)"$"#)]
async fn card_field(w: &mut MobileWorld, expected: String) {
    assert_eq!(w.payment().card_number(), expected);
}

#[then(regex = r#"^the expiration field should show "([^"]*)"$"#)]
async fn expiration_field(w: &mut MobileWorld, expected: String) {
    assert_eq!(w.payment().expiration(), expected);
}

#[then(regex = r"^the CVV field should show (\d+) hidden digits$")]
async fn cvv_field(w: &mut MobileWorld, count: usize) {
    assert_eq!(w.payment().masked_cvv().chars().count(), count);
}

#[then("the payment should succeed")]
async fn payment_succeeds(w: &mut MobileWorld) {
    let payment = w.payment();
    assert!(payment.payment_success(), "error: {:?}", payment.error());
    assert!(payment.processing_was_shown());
    assert!(payment.fields_editable());
}

#[then("the payment should fail")]
async fn payment_fails(w: &mut MobileWorld) {
    assert!(!w.payment().payment_success());
    assert!(w.payment().contract().is_none());
}

#[then(regex = r#"^the contract should be for plan (\d+) with a card ending in "(\d{4})"$"#)]
async fn contract_for(w: &mut MobileWorld, identifier: u8, last_four: String) {
    let contract = w.payment().contract().cloned().expect("no contract");
    assert_eq!(contract.plan_identifier, identifier);
    assert_eq!(contract.card_last_four, last_four);
}

#[then(regex = r#"^the CVV "([^"]*)" should be (valid|invalid)$"#)]
async fn cvv_validity(_w: &mut MobileWorld, cvv: String, validity: String) {
    assert_eq!(validate_cvv(&cvv), validity == "valid");
}

// ============================================================================
// PROVIDERS
// ============================================================================

#[given("the providers list is loaded with the sample providers")]
async fn providers_loaded(w: &mut MobileWorld) {
    w.app.navigate(Screen::Providers);
    w.app.providers.seed(sample_providers());
    let result = w.app.providers.fetch().map(|providers| providers.len());
    w.record(result);
}

#[given("my session has no hotel")]
async fn session_without_hotel(w: &mut MobileWorld) {
    w.app.providers = ProvidersView::without_hotel();
}

#[given("the provider service is unavailable")]
async fn provider_service_down(w: &mut MobileWorld) {
    w.app.providers.set_service_available(false);
}

#[when("I load the providers")]
async fn load_providers(w: &mut MobileWorld) {
    w.app.navigate(Screen::Providers);
    let result = w.app.providers.fetch().map(|providers| providers.len());
    w.record(result);
}

#[when(regex = r#"^I add a provider named "([^"]*)" with email "([^"]*)" and phone "([^"]*)"$"#)]
async fn add_provider(w: &mut MobileWorld, name: String, email: String, phone: String) {
    w.app.providers.open_create_form();
    if let Some(form) = w.app.providers.form_mut() {
        form.draft.name = name;
        form.draft.email = email;
        form.draft.phone = phone;
    }
    let result = w.app.providers.submit_form();
    w.last_provider_id = w.record(result);
}

#[when(regex = r#"^I rename "([^"]+)" to "([^"]*)"$"#)]
async fn rename_provider(w: &mut MobileWorld, from: String, to: String) {
    let id = w.provider_named(&from);
    let opened = w.app.providers.open_edit_form(id);
    w.record(opened);
    if let Some(form) = w.app.providers.form_mut() {
        form.draft.name = to;
    }
    let result = w.app.providers.submit_form();
    w.record(result);
}

#[when(regex = r#"^I mark "([^"]+)" as inactive$"#)]
async fn deactivate_provider(w: &mut MobileWorld, name: String) {
    let id = w.provider_named(&name);
    let update = ProviderUpdate {
        state: Some("inactive".to_string()),
        ..Default::default()
    };
    let result = w.app.providers.update(id, update).map(|p| p.id);
    w.record(result);
}

#[when(regex = r#"^I delete "([^"]+)" and confirm$"#)]
async fn delete_confirmed(w: &mut MobileWorld, name: String) {
    let id = w.provider_named(&name);
    let requested = w.app.providers.request_delete(id);
    w.record(requested);
    assert!(w.app.providers.confirmation_open());
    assert!(w.app.providers.confirm_delete());
}

#[when(regex = r#"^I delete "([^"]+)" and cancel$"#)]
async fn delete_cancelled(w: &mut MobileWorld, name: String) {
    let id = w.provider_named(&name);
    let requested = w.app.providers.request_delete(id);
    w.record(requested);
    w.app.providers.cancel_delete();
}

#[when(regex = r#"^I open the details of "([^"]+)"$"#)]
async fn open_details(w: &mut MobileWorld, name: String) {
    let id = w.provider_named(&name);
    let result = w.app.providers.select(id).map(|p| p.id);
    w.record(result);
}

#[then(regex = r"^I should see (\d+) providers?$")]
async fn provider_count(w: &mut MobileWorld, count: usize) {
    assert_eq!(w.app.providers.providers().len(), count);
}

#[then(regex = r"^(\d+) providers? should be active$")]
async fn active_count(w: &mut MobileWorld, count: usize) {
    assert_eq!(w.app.providers.active().len(), count);
}

#[then(regex = r#"^I should see the provider "([^"]+)"$"#)]
async fn provider_listed(w: &mut MobileWorld, name: String) {
    w.provider_named(&name);
}

#[then(regex = r#"^I should not see the provider "([^"]+)"$"#)]
async fn provider_not_listed(w: &mut MobileWorld, name: String) {
    assert!(w.app.providers.providers().iter().all(|p| p.name != name));
}

#[then(regex = r"^the new provider should have id (\d+)$")]
async fn new_provider_id(w: &mut MobileWorld, id: u32) {
    assert_eq!(w.last_provider_id, Some(id));
}

#[then(regex = r#"^the success message should be "([^"]+)"$"#)]
async fn success_message(w: &mut MobileWorld, message: String) {
    assert_eq!(w.app.providers.success_message(), Some(message.as_str()));
}

#[then("the provider form should still be open")]
async fn form_still_open(w: &mut MobileWorld) {
    let form = w.app.providers.form().expect("form closed");
    assert!(form.error.is_some());
}

#[then(regex = r#"^the provider details dialog should show "([^"]+)"$"#)]
async fn details_dialog(w: &mut MobileWorld, email: String) {
    assert!(w.app.providers.dialog_open());
    let selected = w.app.providers.selected().expect("nothing selected");
    assert_eq!(selected.email, email);
}

#[then(regex = r#"^the providers screen should show the error "([^"]+)"$"#)]
async fn providers_error(w: &mut MobileWorld, message: String) {
    assert_eq!(w.app.providers.error_message(), Some(message.as_str()));
    assert!(!w.app.providers.is_loading());
}

// ============================================================================
// ACCOUNT
// ============================================================================

#[given(regex = r"^the session role id is (\d+)$")]
async fn session_role_id(w: &mut MobileWorld, role_id: u32) {
    w.app.account.set_role_id(Some(role_id));
}

#[given("the user service is unavailable")]
async fn user_service_down(w: &mut MobileWorld) {
    w.app.account.source_mut().available = false;
}

#[when("I open the account page")]
async fn open_account(w: &mut MobileWorld) {
    w.app.navigate(Screen::Account);
    let result = w.app.account.initialize();
    w.record(result);
}

#[when("the user service recovers and I retry")]
async fn retry_account(w: &mut MobileWorld) {
    w.app.account.source_mut().available = true;
    let result = w.app.account.retry();
    w.record(result);
}

#[when(regex = r#"^I open the "([^"]+)" section$"#)]
async fn open_section(w: &mut MobileWorld, label: String) {
    let section = AccountSection::from_label(&label).expect("section");
    w.app.open_account_section(section);
}

#[then(regex = r"^an? (owner|guest) profile should be loaded$")]
async fn profile_loaded(w: &mut MobileWorld, kind: String) {
    let profile = w.app.account.profile().expect("no profile loaded");
    match kind.as_str() {
        "owner" => assert!(matches!(profile, AccountProfile::Owner(_))),
        _ => assert!(matches!(profile, AccountProfile::Guest(_))),
    }
}

#[then("no profile should be loaded")]
async fn no_profile(w: &mut MobileWorld) {
    assert!(w.app.account.profile().is_none());
    assert!(!w.app.account.is_loading());
}

#[then(regex = r#"^the account role should be "(Owner|Guest)"$"#)]
async fn account_role(w: &mut MobileWorld, role: String) {
    assert_eq!(w.app.account.role().to_string(), role);
}

#[then(regex = r#"^the display name should be "([^"]+)"$"#)]
async fn display_name(w: &mut MobileWorld, name: String) {
    assert_eq!(w.app.account.display_name(), name);
}

#[then("the photo should be the default avatar")]
async fn default_photo(w: &mut MobileWorld) {
    assert_eq!(w.app.account.photo_url(), DEFAULT_AVATAR_URL);
}

#[then(regex = r#"^the photo URL should be "([^"]+)"$"#)]
async fn photo_url(w: &mut MobileWorld, url: String) {
    assert_eq!(w.app.account.photo_url(), url);
}

#[tokio::main]
async fn main() {
    MobileWorld::cucumber()
        .max_concurrent_scenarios(1)
        .run_and_exit("tests/features/mobile")
        .await;
}
