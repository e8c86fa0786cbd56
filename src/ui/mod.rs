//! # Operator Screen
//!
//! Presentation logic for the customer list: search, sorting, the shared add/edit form,
//! the status-change menu, and the screen controller that ties them to a [`CustomerApi`].
//!
//! Every mutation waits for the API to answer and then refetches the full list; the server
//! is never asked to filter or sort.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::client::{ClientError, CustomerApi};
use crate::models::{
    CustomerPatch, CustomerResponse, CustomerUpdate, NewCustomer, VerificationStatus,
};
use crate::validation::{FieldErrors, Validate};

/// Statuses offered in the status-change menu of a record: every status except the
/// current one, in enumeration order.
pub fn status_menu_options(current: VerificationStatus) -> Vec<VerificationStatus> {
    VerificationStatus::ALL
        .into_iter()
        .filter(|status| *status != current)
        .collect()
}

/// Case-insensitive substring search over name, email, phone number and address.
///
/// An empty query matches every record; otherwise the query is matched literally,
/// surrounding spaces included.
pub fn filter_customers<'a>(
    records: &'a [CustomerResponse],
    query: &str,
) -> Vec<&'a CustomerResponse> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }

    records
        .iter()
        .filter(|record| {
            [
                &record.name,
                &record.email,
                &record.phone_no,
                &record.address,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Column the list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Id,
    Name,
    Email,
    Phone,
    Address,
    Status,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(SortKey::Id),
            "name" => Ok(SortKey::Name),
            "email" => Ok(SortKey::Email),
            "phone" | "phoneno" | "phone_no" => Ok(SortKey::Phone),
            "address" => Ok(SortKey::Address),
            "status" | "verificationstatus" => Ok(SortKey::Status),
            other => Err(format!(
                "unknown sort column '{}' (expected id, name, email, phone, address or status)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

fn status_rank(status: VerificationStatus) -> usize {
    VerificationStatus::ALL
        .iter()
        .position(|candidate| *candidate == status)
        .unwrap_or(usize::MAX)
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Sort records in place. Ties keep id order.
pub fn sort_customers(records: &mut [&CustomerResponse], key: SortKey, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Id => a.id.cmp(&b.id),
            SortKey::Name => compare_text(&a.name, &b.name),
            SortKey::Email => compare_text(&a.email, &b.email),
            SortKey::Phone => compare_text(&a.phone_no, &b.phone_no),
            SortKey::Address => compare_text(&a.address, &b.address),
            SortKey::Status => {
                status_rank(a.verification_status).cmp(&status_rank(b.verification_status))
            }
        };
        let ordering = match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        };
        ordering.then_with(|| a.id.cmp(&b.id))
    });
}

/// What submitting the form will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormSubmission {
    Create(NewCustomer),
    Update { id: i32, customer: CustomerUpdate },
}

/// Shared add/edit form.
///
/// Without an editing record the form creates a customer; with one it updates that record
/// and starts out filled with its values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerForm {
    editing: Option<CustomerResponse>,
    pub name: String,
    pub address: String,
    pub phone_no: String,
    pub email: String,
}

impl CustomerForm {
    /// Empty form on the create path
    pub fn new() -> Self {
        Self::default()
    }

    /// Form on the update path, pre-populated from `record`
    pub fn edit(record: &CustomerResponse) -> Self {
        Self {
            editing: Some(record.clone()),
            name: record.name.clone(),
            address: record.address.clone(),
            phone_no: record.phone_no.clone(),
            email: record.email.clone(),
        }
    }

    pub fn editing(&self) -> Option<&CustomerResponse> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn title(&self) -> &'static str {
        if self.is_editing() {
            "Edit Customer"
        } else {
            "Add Customer"
        }
    }

    fn as_update(&self) -> CustomerUpdate {
        CustomerUpdate {
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            phone_no: self.phone_no.trim().to_string(),
            email: self.email.trim().to_string(),
        }
    }

    /// Run the field checks; submission is blocked while this fails.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        self.as_update().validate()
    }

    /// Validated request for the path this form is on.
    pub fn submission(&self) -> Result<FormSubmission, FieldErrors> {
        self.validate()?;
        let customer = self.as_update();

        Ok(match &self.editing {
            Some(record) => FormSubmission::Update {
                id: record.id,
                customer,
            },
            None => FormSubmission::Create(NewCustomer {
                name: customer.name,
                address: customer.address,
                phone_no: customer.phone_no,
                email: customer.email,
                verification_status: None,
            }),
        })
    }
}

/// Loading state of a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenState<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> ScreenState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ScreenState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ScreenState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ScreenState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient message shown after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
}

impl Notification {
    fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            text: text.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn failure_text(action: &str, error: &ClientError) -> String {
    match error {
        ClientError::NotFound => format!("Failed to {}: customer no longer exists", action),
        ClientError::Validation { message, fields } if !fields.is_empty() => {
            let fields: Vec<String> = fields
                .iter()
                .map(|(field, problem)| format!("{}: {}", field, problem))
                .collect();
            format!("Failed to {}: {} ({})", action, message, fields.join("; "))
        }
        other => format!("Failed to {}: {}", action, other),
    }
}

/// Controller for the customer list screen.
pub struct CustomerScreen<A: CustomerApi> {
    api: A,
    state: ScreenState<Vec<CustomerResponse>>,
    search: String,
    sort: Option<(SortKey, SortDirection)>,
    form: Option<CustomerForm>,
    form_errors: FieldErrors,
    notification: Option<Notification>,
}

impl<A: CustomerApi> CustomerScreen<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: ScreenState::Loading,
            search: String::new(),
            sort: None,
            form: None,
            form_errors: FieldErrors::new(),
            notification: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &ScreenState<Vec<CustomerResponse>> {
        &self.state
    }

    /// Fetch the full list from the API.
    pub async fn refresh(&mut self) {
        self.state = ScreenState::Loading;
        match self.api.list().await {
            Ok(customers) => {
                tracing::debug!(count = customers.len(), "Loaded customers");
                self.state = ScreenState::Loaded(customers);
            }
            Err(e) => {
                let text = failure_text("load customers", &e);
                self.state = ScreenState::Failed(text.clone());
                self.notification = Some(Notification::error(text));
            }
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn set_sort(&mut self, key: SortKey, direction: SortDirection) {
        self.sort = Some((key, direction));
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    /// Records matching the search, in the selected sort order.
    pub fn visible_customers(&self) -> Vec<&CustomerResponse> {
        let Some(records) = self.state.data() else {
            return Vec::new();
        };

        let mut visible = filter_customers(records, &self.search);
        if let Some((key, direction)) = self.sort {
            sort_customers(&mut visible, key, direction);
        }
        visible
    }

    fn find(&self, id: i32) -> Option<&CustomerResponse> {
        self.state.data()?.iter().find(|record| record.id == id)
    }

    /// Status menu entries for a loaded record.
    pub fn status_options(&self, id: i32) -> Option<Vec<VerificationStatus>> {
        self.find(id)
            .map(|record| status_menu_options(record.verification_status))
    }

    pub fn open_create_form(&mut self) -> &mut CustomerForm {
        self.form_errors = FieldErrors::new();
        self.form.insert(CustomerForm::new())
    }

    /// Open the form on the update path; `None` when the record is not loaded.
    pub fn open_edit_form(&mut self, id: i32) -> Option<&mut CustomerForm> {
        let form = CustomerForm::edit(self.find(id)?);
        self.form_errors = FieldErrors::new();
        Some(self.form.insert(form))
    }

    pub fn form(&self) -> Option<&CustomerForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut CustomerForm> {
        self.form.as_mut()
    }

    pub fn form_errors(&self) -> &FieldErrors {
        &self.form_errors
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.form_errors = FieldErrors::new();
    }

    /// Validate and submit the open form. Returns the stored record on success; on failure
    /// the form stays open.
    pub async fn submit_form(&mut self) -> Option<CustomerResponse> {
        let submission = match self.form.as_ref()?.submission() {
            Ok(submission) => submission,
            Err(errors) => {
                self.form_errors = errors;
                self.notification =
                    Some(Notification::error("Please correct the highlighted fields"));
                return None;
            }
        };

        let (action, result) = match &submission {
            FormSubmission::Create(customer) => ("add customer", self.api.create(customer).await),
            FormSubmission::Update { id, customer } => {
                ("update customer", self.api.update(*id, customer).await)
            }
        };

        match result {
            Ok(saved) => {
                let text = match submission {
                    FormSubmission::Create(_) => "Customer added successfully",
                    FormSubmission::Update { .. } => "Customer updated successfully",
                };
                self.notification = Some(Notification::success(text));
                self.close_form();
                self.refresh().await;
                Some(saved)
            }
            Err(e) => {
                if let ClientError::Validation { fields, .. } = &e {
                    self.form_errors = server_field_errors(fields);
                }
                self.notification = Some(Notification::error(failure_text(action, &e)));
                None
            }
        }
    }

    /// Apply a partial update, then refetch.
    pub async fn patch_customer(
        &mut self,
        id: i32,
        patch: CustomerPatch,
    ) -> Option<CustomerResponse> {
        if let Err(errors) = patch.validate() {
            let text = format!("Failed to update customer: {}", describe_field_errors(&errors));
            self.notification = Some(Notification::error(text));
            return None;
        }

        let result = self.api.patch(id, &patch).await;
        self.finish("update customer", "Customer updated successfully", result)
            .await
    }

    /// Change a record's verification status, then refetch.
    pub async fn change_status(
        &mut self,
        id: i32,
        status: VerificationStatus,
    ) -> Option<CustomerResponse> {
        let result = self.api.update_status(id, status).await;
        let text = format!("Status changed to {}", status);
        self.finish("change status", &text, result).await
    }

    /// Delete a record, then refetch. Returns whether the delete succeeded.
    pub async fn delete_customer(&mut self, id: i32) -> bool {
        match self.api.delete(id).await {
            Ok(()) => {
                self.notification = Some(Notification::success("Customer deleted successfully"));
                self.refresh().await;
                true
            }
            Err(e) => {
                self.notification = Some(Notification::error(failure_text("delete customer", &e)));
                false
            }
        }
    }

    /// Fetch a single record without touching the list.
    pub async fn load_customer(&mut self, id: i32) -> Option<CustomerResponse> {
        match self.api.get(id).await {
            Ok(customer) => Some(customer),
            Err(e) => {
                self.notification = Some(Notification::error(failure_text("load customer", &e)));
                None
            }
        }
    }

    async fn finish(
        &mut self,
        action: &str,
        success: &str,
        result: Result<CustomerResponse, ClientError>,
    ) -> Option<CustomerResponse> {
        match result {
            Ok(saved) => {
                self.notification = Some(Notification::success(success));
                self.refresh().await;
                Some(saved)
            }
            Err(e) => {
                self.notification = Some(Notification::error(failure_text(action, &e)));
                None
            }
        }
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Take the pending notification, clearing it.
    pub fn take_notification(&mut self) -> Option<Notification> {
        self.notification.take()
    }
}

fn server_field_errors(fields: &BTreeMap<String, String>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for (field, message) in fields {
        let known = ["name", "address", "phoneNo", "email"]
            .into_iter()
            .find(|candidate| *candidate == field.as_str());
        if let Some(field) = known {
            errors.add(field, message.clone());
        }
    }
    errors
}

fn describe_field_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join("; ")
}
