//! Providers list of a hotel
//!
//! List-backed CRUD with a detail dialog, an add/edit form and a delete
//! confirmation. Ids come from a counter so a deleted id is never handed out
//! again.

use super::validation::{is_valid_email, is_valid_phone, is_valid_ruc};
use crate::errors::ProviderError;

pub const CREATED_MESSAGE: &str = "Provider created successfully";
pub const UPDATED_MESSAGE: &str = "Provider updated successfully";
pub const DELETED_MESSAGE: &str = "Provider deleted successfully";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub ruc: String,
    pub state: String,
}

impl Provider {
    pub fn is_active(&self) -> bool {
        self.state.eq_ignore_ascii_case("active")
    }
}

/// Fields of a new provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub ruc: String,
}

impl ProviderDraft {
    pub fn new(name: &str, email: &str, phone: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            ..Default::default()
        }
    }

    fn from_provider(provider: &Provider) -> Self {
        Self {
            name: provider.name.clone(),
            email: provider.email.clone(),
            phone: provider.phone.clone(),
            address: provider.address.clone(),
            ruc: provider.ruc.clone(),
        }
    }
}

/// Partial update; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub ruc: Option<String>,
    pub state: Option<String>,
}

impl ProviderUpdate {
    fn validate(&self) -> Result<(), ProviderError> {
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(ProviderError::NameRequired);
        }
        if matches!(&self.email, Some(email) if !is_valid_email(email)) {
            return Err(ProviderError::InvalidEmail);
        }
        if matches!(&self.phone, Some(phone) if !is_valid_phone(phone)) {
            return Err(ProviderError::InvalidPhone);
        }
        if matches!(&self.ruc, Some(ruc) if !is_valid_ruc(ruc)) {
            return Err(ProviderError::InvalidRuc);
        }
        Ok(())
    }
}

/// Checks run before a draft is saved, in field order
pub fn validate_draft(draft: &ProviderDraft) -> Result<(), ProviderError> {
    if draft.name.trim().is_empty() {
        return Err(ProviderError::NameRequired);
    }
    if !is_valid_email(&draft.email) {
        return Err(ProviderError::InvalidEmail);
    }
    if !is_valid_phone(&draft.phone) {
        return Err(ProviderError::InvalidPhone);
    }
    if !is_valid_ruc(&draft.ruc) {
        return Err(ProviderError::InvalidRuc);
    }
    Ok(())
}

/// Three active providers used to populate a list
pub fn sample_providers() -> Vec<Provider> {
    [
        (1, "123456789"),
        (2, "987654321"),
        (3, "456789123"),
    ]
    .into_iter()
    .map(|(n, phone)| Provider {
        id: n,
        name: format!("Provider {}", n),
        email: format!("provider{}@test.com", n),
        phone: phone.to_string(),
        address: String::new(),
        ruc: String::new(),
        state: "active".to_string(),
    })
    .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(u32),
}

/// Open add/edit form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderForm {
    pub mode: FormMode,
    pub draft: ProviderDraft,
    pub error: Option<ProviderError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvidersView {
    hotel_id: Option<String>,
    providers: Vec<Provider>,
    next_id: u32,
    service_available: bool,
    loading: bool,
    selected: Option<u32>,
    form: Option<ProviderForm>,
    pending_delete: Option<u32>,
    error_message: Option<String>,
    success_message: Option<String>,
}

impl Default for ProvidersView {
    fn default() -> Self {
        Self::for_hotel("hotel_123")
    }
}

impl ProvidersView {
    pub fn for_hotel(hotel_id: impl Into<String>) -> Self {
        Self::with_hotel_id(Some(hotel_id.into()))
    }

    /// View for a session whose token carries no hotel id
    pub fn without_hotel() -> Self {
        Self::with_hotel_id(None)
    }

    fn with_hotel_id(hotel_id: Option<String>) -> Self {
        Self {
            hotel_id,
            providers: Vec::new(),
            next_id: 1,
            service_available: true,
            loading: true,
            selected: None,
            form: None,
            pending_delete: None,
            error_message: None,
            success_message: None,
        }
    }

    pub fn hotel_id(&self) -> Option<&str> {
        self.hotel_id.as_deref()
    }

    /// Replace the list with `providers`; new ids continue after the highest one
    pub fn seed(&mut self, providers: Vec<Provider>) {
        let max_id = providers.iter().map(|p| p.id).max().unwrap_or(0);
        self.next_id = self.next_id.max(max_id + 1);
        self.providers = providers;
    }

    pub fn set_service_available(&mut self, available: bool) {
        self.service_available = available;
    }

    /// Load the providers of the current hotel
    pub fn fetch(&mut self) -> Result<&[Provider], ProviderError> {
        self.loading = true;
        self.error_message = None;

        let result = if self.hotel_id.is_none() {
            Err(ProviderError::MissingHotelId)
        } else if !self.service_available {
            Err(ProviderError::ServiceUnavailable)
        } else {
            Ok(())
        };

        self.loading = false;
        match result {
            Ok(()) => {
                tracing::debug!(
                    "Loaded {} providers for hotel {:?}",
                    self.providers.len(),
                    self.hotel_id
                );
                Ok(self.providers.as_slice())
            }
            Err(e) => {
                self.error_message = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn get(&self, id: u32) -> Option<&Provider> {
        self.providers.iter().find(|p| p.id == id)
    }

    pub fn active(&self) -> Vec<&Provider> {
        self.providers.iter().filter(|p| p.is_active()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    pub fn add(&mut self, draft: ProviderDraft) -> Result<&Provider, ProviderError> {
        validate_draft(&draft)?;

        let id = self.next_id;
        self.next_id += 1;
        self.providers.push(Provider {
            id,
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            phone: draft.phone.trim().to_string(),
            address: draft.address,
            ruc: draft.ruc.trim().to_string(),
            state: "active".to_string(),
        });
        self.success_message = Some(CREATED_MESSAGE.to_string());

        let index = self.providers.len() - 1;
        Ok(&self.providers[index])
    }

    pub fn update(&mut self, id: u32, update: ProviderUpdate) -> Result<&Provider, ProviderError> {
        update.validate()?;
        let provider = self
            .providers
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ProviderError::NotFound(id))?;

        let fields = [
            (&mut provider.name, update.name),
            (&mut provider.email, update.email),
            (&mut provider.phone, update.phone),
            (&mut provider.address, update.address),
            (&mut provider.ruc, update.ruc),
            (&mut provider.state, update.state),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }

        self.success_message = Some(UPDATED_MESSAGE.to_string());
        Ok(provider)
    }

    /// Remove a provider; false if no provider had that id
    pub fn delete(&mut self, id: u32) -> bool {
        let before = self.providers.len();
        self.providers.retain(|p| p.id != id);
        let removed = self.providers.len() != before;
        if removed {
            self.success_message = Some(DELETED_MESSAGE.to_string());
            if self.selected == Some(id) {
                self.selected = None;
            }
        }
        removed
    }

    /// Open the detail dialog for a provider
    pub fn select(&mut self, id: u32) -> Result<&Provider, ProviderError> {
        if self.get(id).is_none() {
            return Err(ProviderError::NotFound(id));
        }
        self.selected = Some(id);
        self.get(id).ok_or(ProviderError::NotFound(id))
    }

    pub fn selected(&self) -> Option<&Provider> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn dialog_open(&self) -> bool {
        self.selected.is_some()
    }

    pub fn close_dialog(&mut self) {
        self.selected = None;
    }

    pub fn open_create_form(&mut self) {
        self.form = Some(ProviderForm {
            mode: FormMode::Create,
            draft: ProviderDraft::default(),
            error: None,
        });
    }

    /// Open the edit form pre-filled with the provider's data
    pub fn open_edit_form(&mut self, id: u32) -> Result<(), ProviderError> {
        let provider = self.get(id).ok_or(ProviderError::NotFound(id))?;
        let draft = ProviderDraft::from_provider(provider);
        self.selected = None;
        self.form = Some(ProviderForm {
            mode: FormMode::Edit(id),
            draft,
            error: None,
        });
        Ok(())
    }

    pub fn form(&self) -> Option<&ProviderForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut ProviderForm> {
        self.form.as_mut()
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
    }

    /// Save the open form; on failure the form stays open with its error
    pub fn submit_form(&mut self) -> Result<u32, ProviderError> {
        let Some(form) = self.form.take() else {
            return Err(ProviderError::NoOpenForm);
        };

        let result = match form.mode {
            FormMode::Create => self.add(form.draft.clone()).map(|p| p.id),
            FormMode::Edit(id) => {
                let draft = form.draft.clone();
                let update = ProviderUpdate {
                    name: Some(draft.name),
                    email: Some(draft.email),
                    phone: Some(draft.phone),
                    address: Some(draft.address),
                    ruc: Some(draft.ruc),
                    state: None,
                };
                self.update(id, update).map(|p| p.id)
            }
        };

        if let Err(e) = &result {
            self.form = Some(ProviderForm {
                error: Some(e.clone()),
                ..form
            });
        }
        result
    }

    pub fn request_delete(&mut self, id: u32) -> Result<(), ProviderError> {
        if self.get(id).is_none() {
            return Err(ProviderError::NotFound(id));
        }
        self.pending_delete = Some(id);
        Ok(())
    }

    pub fn confirmation_open(&self) -> bool {
        self.pending_delete.is_some()
    }

    pub fn confirm_delete(&mut self) -> bool {
        match self.pending_delete.take() {
            Some(id) => self.delete(id),
            None => false,
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> ProvidersView {
        let mut view = ProvidersView::default();
        view.seed(sample_providers());
        view
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let mut view = seeded();
        assert!(view.delete(3));
        let id = view
            .add(ProviderDraft::new("Lavandería Sol", "sol@lavanderia.pe", "987111222"))
            .unwrap()
            .id;
        assert_eq!(id, 4);
        assert_eq!(view.success_message(), Some(CREATED_MESSAGE));
    }

    #[test]
    fn test_update_merges_only_given_fields() {
        let mut view = seeded();
        let updated = view
            .update(
                2,
                ProviderUpdate {
                    phone: Some("999888777".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.phone, "999888777");
        assert_eq!(updated.name, "Provider 2");
        assert_eq!(view.success_message(), Some(UPDATED_MESSAGE));
    }

    #[test]
    fn test_update_unknown_id() {
        let mut view = seeded();
        assert_eq!(
            view.update(42, ProviderUpdate::default()).unwrap_err(),
            ProviderError::NotFound(42)
        );
    }

    #[test]
    fn test_active_filter_ignores_case() {
        let mut view = seeded();
        view.update(
            1,
            ProviderUpdate {
                state: Some("INACTIVE".into()),
                ..Default::default()
            },
        )
        .unwrap();
        view.update(
            2,
            ProviderUpdate {
                state: Some("Active".into()),
                ..Default::default()
            },
        )
        .unwrap();
        let active: Vec<u32> = view.active().iter().map(|p| p.id).collect();
        assert_eq!(active, vec![2, 3]);
    }

    #[test]
    fn test_fetch_requires_hotel_id() {
        let mut view = ProvidersView::without_hotel();
        assert_eq!(view.fetch().unwrap_err(), ProviderError::MissingHotelId);
        assert_eq!(
            view.error_message(),
            Some("No se pudo obtener el hotelId del token")
        );
        assert!(!view.is_loading());
    }

    #[test]
    fn test_draft_validation_order() {
        let mut draft = ProviderDraft::new("", "bad", "1");
        assert_eq!(validate_draft(&draft), Err(ProviderError::NameRequired));
        draft.name = "Insumos SAC".into();
        assert_eq!(validate_draft(&draft), Err(ProviderError::InvalidEmail));
        draft.email = "ventas@insumos.pe".into();
        assert_eq!(validate_draft(&draft), Err(ProviderError::InvalidPhone));
        draft.phone = "987654321".into();
        draft.ruc = "123".into();
        assert_eq!(validate_draft(&draft), Err(ProviderError::InvalidRuc));
        draft.ruc = "20123456789".into();
        assert_eq!(validate_draft(&draft), Ok(()));
    }

    #[test]
    fn test_edit_form_is_prefilled_and_cancel_discards() {
        let mut view = seeded();
        view.open_edit_form(1).unwrap();
        let form = view.form_mut().unwrap();
        assert_eq!(form.draft.email, "provider1@test.com");
        form.draft.name = "Changed".into();

        view.cancel_form();
        assert_eq!(view.get(1).unwrap().name, "Provider 1");
    }

    #[test]
    fn test_invalid_form_stays_open() {
        let mut view = seeded();
        view.open_create_form();
        view.form_mut().unwrap().draft = ProviderDraft::new("X", "x@y.com", "abc");

        assert_eq!(view.submit_form(), Err(ProviderError::InvalidPhone));
        let form = view.form().unwrap();
        assert_eq!(form.error, Some(ProviderError::InvalidPhone));
        assert_eq!(view.providers().len(), 3);
    }

    #[test]
    fn test_submit_without_form() {
        let mut view = seeded();
        assert_eq!(view.submit_form(), Err(ProviderError::NoOpenForm));
        assert!(view.form().is_none());
        assert_eq!(view.providers().len(), 3);
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let mut view = seeded();
        view.request_delete(2).unwrap();
        view.cancel_delete();
        assert!(view.get(2).is_some());

        view.request_delete(2).unwrap();
        assert!(view.confirm_delete());
        assert!(view.get(2).is_none());
        assert_eq!(view.success_message(), Some(DELETED_MESSAGE));
    }
}
