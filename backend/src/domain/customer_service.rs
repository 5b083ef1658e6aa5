use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use super::errors::ServiceError;
use super::models::customer::{Customer, NewCustomer};
use super::transaction_scope::TransactionScope;
use crate::storage::traits::CustomerStorage;
use shared::{CreateCustomerRequest, CustomerResponse, UpdateCustomerRequest};

/// Service for managing customers
#[derive(Clone)]
pub struct CustomerService {
    repository: Arc<dyn CustomerStorage>,
    scope: TransactionScope,
}

impl CustomerService {
    pub fn new(repository: Arc<dyn CustomerStorage>, scope: TransactionScope) -> Self {
        Self { repository, scope }
    }

    /// List all customers
    pub async fn find_all(&self) -> Result<Vec<CustomerResponse>, ServiceError> {
        info!("Listing all customers");

        let repository = Arc::clone(&self.repository);
        let customers = self
            .scope
            .run(move |conn| {
                Box::pin(async move {
                    let customers = repository.find_all(conn).await?;
                    Ok::<_, ServiceError>(customers)
                })
            })
            .await?;

        info!("Found {} customers", customers.len());
        Ok(customers.into_iter().map(Customer::into_response).collect())
    }

    /// Validate and store a new customer
    pub async fn create(&self, request: CreateCustomerRequest) -> Result<CustomerResponse, ServiceError> {
        info!("Creating customer: name={}", request.name);

        request.validate()?;

        let new_customer = NewCustomer {
            name: request.name,
            email: request.email,
            phone: request.phone,
        };

        let repository = Arc::clone(&self.repository);
        let customer = self
            .scope
            .run_write(move |conn| {
                Box::pin(async move {
                    let customer = repository.save(conn, new_customer).await?;
                    Ok::<_, ServiceError>(customer)
                })
            })
            .await?;

        info!("Created customer {} with ID: {}", customer.name, customer.id);
        Ok(customer.into_response())
    }

    /// Get a customer by ID
    pub async fn find_by_id(&self, customer_id: i64) -> Result<CustomerResponse, ServiceError> {
        info!("Getting customer: {}", customer_id);

        let repository = Arc::clone(&self.repository);
        let customer = self
            .scope
            .run(move |conn| {
                Box::pin(async move {
                    let customer = repository.find_by_id(conn, customer_id).await?;
                    Ok::<_, ServiceError>(customer)
                })
            })
            .await
            .inspect_err(|e| log_not_found(e, customer_id))?;

        Ok(customer.into_response())
    }

    /// Overwrite name, email and phone of an existing customer
    pub async fn update(&self, request: UpdateCustomerRequest) -> Result<CustomerResponse, ServiceError> {
        info!("Updating customer: {}", request.id);

        request.validate()?;

        let customer_id = request.id;
        let repository = Arc::clone(&self.repository);
        let customer = self
            .scope
            .run_write(move |conn| {
                Box::pin(async move {
                    let mut customer = repository.find_by_id(conn, request.id).await?;
                    customer.apply_changes(request.name, request.email, request.phone);
                    let updated = repository.update(conn, &customer).await?;
                    Ok::<_, ServiceError>(updated)
                })
            })
            .await
            .inspect_err(|e| log_not_found(e, customer_id))?;

        info!("Updated customer {} with ID: {}", customer.name, customer.id);
        Ok(customer.into_response())
    }

    /// Delete an existing customer. Unlike the repository, a missing row is an error here.
    pub async fn delete(&self, customer_id: i64) -> Result<(), ServiceError> {
        info!("Deleting customer: {}", customer_id);

        let repository = Arc::clone(&self.repository);
        self.scope
            .run_write(move |conn| {
                Box::pin(async move {
                    let customer = repository.find_by_id(conn, customer_id).await?;
                    repository.delete(conn, &customer).await?;
                    Ok::<_, ServiceError>(())
                })
            })
            .await
            .inspect_err(|e| log_not_found(e, customer_id))?;

        info!("Deleted customer with ID: {}", customer_id);
        Ok(())
    }
}

fn log_not_found(err: &ServiceError, customer_id: i64) {
    if matches!(err, ServiceError::NotFound(_)) {
        warn!("Customer not found: {}", customer_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolSettings;
    use crate::storage::{
        DbConnection, SqliteCustomerRepository, StorageError, StorageResult,
    };
    use async_trait::async_trait;
    use sqlx::SqliteConnection;

    async fn setup_test() -> CustomerService {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        CustomerService::new(Arc::new(SqliteCustomerRepository::new()), TransactionScope::new(db))
    }

    fn create_request(name: &str) -> CreateCustomerRequest {
        CreateCustomerRequest {
            name: name.to_string(),
            email: format!("{}@x.com", name.to_lowercase()),
            phone: "+12025550123".to_string(),
        }
    }

    fn update_request(id: i64, name: &str) -> UpdateCustomerRequest {
        UpdateCustomerRequest {
            id,
            name: name.to_string(),
            email: format!("{}@y.com", name.to_lowercase()),
            phone: "+442071838750".to_string(),
        }
    }

    fn violated_fields(err: ServiceError) -> Vec<String> {
        match err {
            ServiceError::Validation(violations) => violations.into_iter().map(|v| v.field).collect(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    fn assert_not_found(result: Result<impl std::fmt::Debug, ServiceError>) {
        match result {
            Err(ServiceError::NotFound(message)) => assert_eq!(message, "Customer not found"),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    /// Delegates to SQLite but fails every update after it has been written
    struct FailingUpdateRepository {
        inner: SqliteCustomerRepository,
    }

    #[async_trait]
    impl CustomerStorage for FailingUpdateRepository {
        async fn find_all(&self, conn: &mut SqliteConnection) -> StorageResult<Vec<Customer>> {
            self.inner.find_all(conn).await
        }

        async fn save(&self, conn: &mut SqliteConnection, customer: NewCustomer) -> StorageResult<Customer> {
            self.inner.save(conn, customer).await
        }

        async fn find_by_id(&self, conn: &mut SqliteConnection, customer_id: i64) -> StorageResult<Customer> {
            self.inner.find_by_id(conn, customer_id).await
        }

        async fn update(&self, conn: &mut SqliteConnection, customer: &Customer) -> StorageResult<Customer> {
            self.inner.update(conn, customer).await?;
            Err(StorageError::Database(sqlx::Error::Protocol("injected failure".to_string())))
        }

        async fn delete(&self, conn: &mut SqliteConnection, customer: &Customer) -> StorageResult<()> {
            self.inner.delete(conn, customer).await
        }
    }

    #[tokio::test]
    async fn test_create_customer() {
        let service = setup_test().await;

        let response = service.create(create_request("Ann")).await.expect("Failed to create customer");

        assert!(response.id > 0);
        assert_eq!(response.name, "Ann");
        assert_eq!(response.email, "ann@x.com");
        assert_eq!(response.phone, "+12025550123");
        assert!(response.created_at.timestamp() > 0);
        assert_eq!(response.created_at, response.updated_at);
    }

    #[tokio::test]
    async fn test_create_then_find_round_trip() {
        let service = setup_test().await;

        let created = service.create(create_request("Ann")).await.expect("Failed to create customer");
        let found = service.find_by_id(created.id).await.expect("Failed to find customer");

        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_create_validation_rejects_without_writing() {
        let service = setup_test().await;

        let request = CreateCustomerRequest {
            name: "".to_string(),
            email: "ann-at-x.com".to_string(),
            phone: "+12025550123".to_string(),
        };
        let err = service.create(request).await.expect_err("request should be rejected");

        assert_eq!(violated_fields(err), vec!["email", "name"]);
        assert!(service.find_all().await.expect("Failed to list").is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_bad_phone_only() {
        let service = setup_test().await;

        let request = CreateCustomerRequest {
            phone: "555-0123".to_string(),
            ..create_request("Ann")
        };
        let err = service.create(request).await.expect_err("request should be rejected");

        assert_eq!(violated_fields(err), vec!["phone"]);
    }

    #[tokio::test]
    async fn test_find_all() {
        let service = setup_test().await;

        assert!(service.find_all().await.expect("Failed to list").is_empty());

        service.create(create_request("Ann")).await.expect("Failed to create customer");
        service.create(create_request("Bob")).await.expect("Failed to create customer");

        let customers = service.find_all().await.expect("Failed to list");
        assert_eq!(customers.len(), 2);
        assert_eq!(customers[0].name, "Ann");
        assert_eq!(customers[1].name, "Bob");
    }

    #[tokio::test]
    async fn test_missing_customer_is_not_found_everywhere() {
        let service = setup_test().await;
        service.create(create_request("Ann")).await.expect("Failed to create customer");

        assert_not_found(service.find_by_id(999).await);
        assert_not_found(service.update(update_request(999, "Zed")).await);
        assert_not_found(service.delete(999).await);

        let customers = service.find_all().await.expect("Failed to list");
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].name, "Ann");
    }

    #[tokio::test]
    async fn test_update_preserves_identity() {
        let service = setup_test().await;
        let created = service.create(create_request("Ann")).await.expect("Failed to create customer");

        let updated = service
            .update(update_request(created.id, "Anne"))
            .await
            .expect("Failed to update customer");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.name, "Anne");
        assert_eq!(updated.email, "anne@y.com");
        assert_eq!(updated.phone, "+442071838750");

        let found = service.find_by_id(created.id).await.expect("Failed to find customer");
        assert_eq!(found, updated);
    }

    #[tokio::test]
    async fn test_update_validation_runs_before_lookup() {
        let service = setup_test().await;

        let request = UpdateCustomerRequest {
            email: "".to_string(),
            ..update_request(999, "Zed")
        };
        let err = service.update(request).await.expect_err("request should be rejected");

        assert_eq!(violated_fields(err), vec!["email"]);
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let service = setup_test().await;
        let created = service.create(create_request("Ann")).await.expect("Failed to create customer");

        service.delete(created.id).await.expect("Failed to delete customer");

        assert_not_found(service.find_by_id(created.id).await);
        assert_not_found(service.delete(created.id).await);
    }

    #[tokio::test]
    async fn test_fault_mid_transaction_rolls_back() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let scope = TransactionScope::new(db);
        let healthy = CustomerService::new(Arc::new(SqliteCustomerRepository::new()), scope.clone());
        let failing = CustomerService::new(
            Arc::new(FailingUpdateRepository {
                inner: SqliteCustomerRepository::new(),
            }),
            scope,
        );

        let created = healthy.create(create_request("Ann")).await.expect("Failed to create customer");

        let err = failing
            .update(update_request(created.id, "Anne"))
            .await
            .expect_err("update should fail");
        match err {
            ServiceError::Fault(e) => assert_eq!(e.to_string(), "Database operation failed"),
            other => panic!("expected fault, got {:?}", other),
        }

        let found = healthy.find_by_id(created.id).await.expect("Failed to find customer");
        assert_eq!(found, created);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_to_one_customer_all_succeed() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let url = format!("sqlite:{}", dir.path().join("customers.db").display());
        let db = DbConnection::new(&url, &PoolSettings::default())
            .await
            .expect("Failed to open database");
        let service = CustomerService::new(Arc::new(SqliteCustomerRepository::new()), TransactionScope::new(db));

        let created = service.create(create_request("Ann")).await.expect("Failed to create customer");
        let id = created.id;

        let updates: Vec<_> = (0..20)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move { service.update(update_request(id, &format!("Ann{}", i))).await })
            })
            .collect();

        for update in updates {
            let result = update.await.expect("update task panicked");
            assert!(result.is_ok(), "concurrent update failed: {:?}", result.err());
        }

        let found = service.find_by_id(created.id).await.expect("Failed to find customer");
        assert!(found.name.starts_with("Ann"));
        assert_eq!(found.created_at, created.created_at);

        let deletes: Vec<_> = (0..2)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.delete(id).await })
            })
            .collect();

        let mut deleted = 0;
        for delete in deletes {
            match delete.await.expect("delete task panicked") {
                Ok(()) => deleted += 1,
                Err(ServiceError::NotFound(_)) => {}
                Err(other) => panic!("concurrent delete failed: {:?}", other),
            }
        }
        assert_eq!(deleted, 1);
    }
}
