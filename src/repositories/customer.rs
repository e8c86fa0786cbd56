//! # Customer Repository
//!
//! Storage primitives for the `customers` table (`find_all`, `find_by_id`, `save`,
//! `exists_by_id`, `delete_by_id`) and the create/update/patch/status/delete operations
//! the API exposes on top of them.

use crate::error::RepositoryError;
use crate::models::customer::{
    ActiveModel as CustomerActiveModel, Column, Entity as Customer, Model as CustomerModel,
};
use crate::models::{CustomerPatch, CustomerUpdate, NewCustomer, VerificationStatus};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait, QueryOrder, Set,
};

/// Repository for Customer database operations
pub struct CustomerRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new CustomerRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// List every customer in storage order
    pub async fn find_all(&self) -> Result<Vec<CustomerModel>, RepositoryError> {
        Customer::find()
            .order_by_asc(Column::Id)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Get a customer by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<CustomerModel>, RepositoryError> {
        Customer::find_by_id(id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Check if a customer exists
    pub async fn exists_by_id(&self, id: i32) -> Result<bool, RepositoryError> {
        let count = Customer::find_by_id(id)
            .count(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(count > 0)
    }

    /// Persist an active model: inserted when its id is unset, otherwise the row with that id
    /// is overwritten (a model loaded from storage carries its id as `Unchanged`).
    /// `updated_at` is always refreshed.
    pub async fn save(
        &self,
        mut customer: CustomerActiveModel,
    ) -> Result<CustomerModel, RepositoryError> {
        let now = Utc::now();
        customer.updated_at = Set(now.into());

        let saved = if !customer.id.is_not_set() {
            customer.update(self.db).await
        } else {
            if customer.created_at.is_not_set() {
                customer.created_at = Set(now.into());
            }
            customer.insert(self.db).await
        };

        saved.map_err(RepositoryError::database_error)
    }

    /// Remove a customer row. Callers check existence first.
    pub async fn delete_by_id(&self, id: i32) -> Result<(), RepositoryError> {
        Customer::delete_by_id(id)
            .exec(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }

    /// Get customer count
    pub async fn count(&self) -> Result<u64, RepositoryError> {
        Customer::find()
            .count(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Create a new customer; the status defaults to `Not Verified`
    pub async fn create(&self, request: NewCustomer) -> Result<CustomerModel, RepositoryError> {
        let customer = CustomerActiveModel {
            id: NotSet,
            name: Set(request.name),
            address: Set(request.address),
            phone_no: Set(request.phone_no),
            email: Set(request.email),
            verification_status: Set(request.verification_status.unwrap_or_default()),
            created_at: NotSet,
            updated_at: NotSet,
        };

        let created = self.save(customer).await?;
        tracing::info!(customer_id = created.id, "Customer created");
        Ok(created)
    }

    /// Overwrite name, address, phone and email. The verification status is untouched.
    pub async fn update(
        &self,
        id: i32,
        request: CustomerUpdate,
    ) -> Result<Option<CustomerModel>, RepositoryError> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut customer: CustomerActiveModel = existing.into();
        customer.name = Set(request.name);
        customer.address = Set(request.address);
        customer.phone_no = Set(request.phone_no);
        customer.email = Set(request.email);

        let updated = self.save(customer).await?;
        tracing::info!(customer_id = id, "Customer updated");
        Ok(Some(updated))
    }

    /// Overwrite only the fields present in the patch
    pub async fn patch(
        &self,
        id: i32,
        request: CustomerPatch,
    ) -> Result<Option<CustomerModel>, RepositoryError> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        if request.is_empty() {
            return Ok(Some(existing));
        }

        let mut customer: CustomerActiveModel = existing.into();
        if let Some(name) = request.name {
            customer.name = Set(name);
        }
        if let Some(address) = request.address {
            customer.address = Set(address);
        }
        if let Some(phone_no) = request.phone_no {
            customer.phone_no = Set(phone_no);
        }
        if let Some(email) = request.email {
            customer.email = Set(email);
        }

        let patched = self.save(customer).await?;
        tracing::info!(customer_id = id, "Customer patched");
        Ok(Some(patched))
    }

    /// Overwrite only the verification status
    pub async fn update_status(
        &self,
        id: i32,
        status: VerificationStatus,
    ) -> Result<Option<CustomerModel>, RepositoryError> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let previous = existing.verification_status;
        let mut customer: CustomerActiveModel = existing.into();
        customer.verification_status = Set(status);

        let updated = self.save(customer).await?;
        tracing::info!(
            customer_id = id,
            from = %previous,
            to = %status,
            "Customer verification status changed"
        );
        Ok(Some(updated))
    }

    /// Delete a customer, returning whether a row was removed
    pub async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        if !self.exists_by_id(id).await? {
            return Ok(false);
        }

        self.delete_by_id(id).await?;
        tracing::info!(customer_id = id, "Customer deleted");
        Ok(true)
    }
}
