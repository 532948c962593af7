//! API integration tests infrastructure
//!
//! In-memory repositories standing in for MySQL, so handler tests run
//! without a database or Redis.

pub mod http;

use async_trait::async_trait;
use bloodbank_core::config::JwtConfig;
use bloodbank_core::domain::{
    BloodGroup, BloodRequest, BloodType, Donor, DonorChanges, Inventory, InventoryChanges,
    NewBloodRequest, NewDonor, NewInventory, NewUser, User, STATUS_PENDING,
};
use bloodbank_core::error::{AppError, Result};
use bloodbank_core::jwt::JwtManager;
use bloodbank_core::repository::{
    BloodRequestRepository, BloodTypeRepository, DonorRepository, InventoryRepository,
    UserRepository,
};
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

// ============================================================================
// Test Configuration
// ============================================================================

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-key-for-api-testing-purposes".to_string(),
        issuer: "https://bloodbank.test".to_string(),
        access_token_ttl_secs: 3600,
        refresh_token_ttl_secs: 604800,
    }
}

pub fn create_test_jwt_manager() -> JwtManager {
    JwtManager::new(test_jwt_config())
}

/// Access token for an admin (`is_staff`) caller
pub fn create_admin_token() -> String {
    create_test_jwt_manager()
        .create_access_token(1, "admin", true)
        .expect("Failed to create admin token")
}

/// Access token for a regular (non-admin) caller
pub fn create_user_token(user_id: i64) -> String {
    create_test_jwt_manager()
        .create_access_token(user_id, &format!("user{}", user_id), false)
        .expect("Failed to create user token")
}

fn next(counter: &AtomicI64) -> i64 {
    counter.fetch_add(1, Ordering::SeqCst) + 1
}

fn contains_ci(haystack: &str, needle: &Option<String>) -> bool {
    match needle {
        Some(q) => haystack.to_lowercase().contains(&q.to_lowercase()),
        None => true,
    }
}

fn window<T>(items: Vec<T>, offset: i64, limit: i64) -> Vec<T> {
    items
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

// ============================================================================
// Test Repository Implementations
// ============================================================================

pub struct TestUserRepository {
    users: RwLock<Vec<User>>,
    next_id: AtomicI64,
}

impl TestUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(vec![]),
            next_id: AtomicI64::new(0),
        }
    }

    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserRepository for TestUserRepository {
    async fn create(&self, input: &NewUser) -> Result<User> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|u| u.username == input.username || u.email == input.email)
        {
            return Err(AppError::Conflict(
                "Username or email already exist".to_string(),
            ));
        }
        let user = User {
            id: next(&self.next_id),
            username: input.username.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            is_staff: input.is_staff,
            date_joined: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn exists_by_username_or_email(&self, username: &str, email: &str) -> Result<bool> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .any(|u| u.username == username || u.email == email))
    }
}

pub struct TestBloodTypeRepository {
    blood_types: RwLock<Vec<BloodType>>,
    next_id: AtomicI64,
}

impl TestBloodTypeRepository {
    pub fn new() -> Self {
        Self {
            blood_types: RwLock::new(vec![]),
            next_id: AtomicI64::new(0),
        }
    }

    /// Seed a blood type directly, bypassing the handler
    pub async fn add(&self, name: BloodGroup) -> BloodType {
        self.create(name).await.expect("blood type seeded twice")
    }

    /// Existing blood type row, seeding it on first use
    pub async fn find_or_add(&self, name: BloodGroup) -> BloodType {
        match self.find_by_name(name).await.unwrap() {
            Some(bt) => bt,
            None => self.add(name).await,
        }
    }

    async fn name_of(&self, id: i64) -> Result<BloodGroup> {
        self.blood_types
            .read()
            .await
            .iter()
            .find(|bt| bt.id == id)
            .map(|bt| bt.name)
            .ok_or_else(|| AppError::BadRequest(format!("No blood type {}", id)))
    }
}

#[async_trait]
impl BloodTypeRepository for TestBloodTypeRepository {
    async fn create(&self, name: BloodGroup) -> Result<BloodType> {
        let mut blood_types = self.blood_types.write().await;
        if blood_types.iter().any(|bt| bt.name == name) {
            return Err(AppError::Conflict(
                "blood type with this name already exists".to_string(),
            ));
        }
        let blood_type = BloodType {
            id: next(&self.next_id),
            name,
        };
        blood_types.push(blood_type.clone());
        Ok(blood_type)
    }

    async fn find_by_name(&self, name: BloodGroup) -> Result<Option<BloodType>> {
        Ok(self
            .blood_types
            .read()
            .await
            .iter()
            .find(|bt| bt.name == name)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<BloodType>> {
        let mut items = self.blood_types.read().await.clone();
        items.sort_by_key(|bt| bt.id);
        Ok(items)
    }
}

pub struct TestInventoryRepository {
    rows: RwLock<Vec<Inventory>>,
    blood_types: Arc<TestBloodTypeRepository>,
    next_id: AtomicI64,
}

impl TestInventoryRepository {
    pub fn new(blood_types: Arc<TestBloodTypeRepository>) -> Self {
        Self {
            rows: RwLock::new(vec![]),
            blood_types,
            next_id: AtomicI64::new(0),
        }
    }
}

#[async_trait]
impl InventoryRepository for TestInventoryRepository {
    async fn create(&self, input: &NewInventory) -> Result<Inventory> {
        let blood_type = self.blood_types.name_of(input.blood_type_id).await?;
        let mut rows = self.rows.write().await;
        if rows.iter().any(|r| r.blood_type_id == input.blood_type_id) {
            return Err(AppError::Conflict(
                "blood inventory with this blood type already exists".to_string(),
            ));
        }
        let row = Inventory {
            id: next(&self.next_id),
            blood_type,
            blood_type_id: input.blood_type_id,
            quantity: input.quantity,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Inventory>> {
        Ok(self.rows.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_blood_type(&self, blood_type_id: i64) -> Result<Option<Inventory>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|r| r.blood_type_id == blood_type_id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Inventory>> {
        Ok(self.rows.read().await.clone())
    }

    async fn update(&self, id: i64, changes: &InventoryChanges) -> Result<Inventory> {
        let blood_type = match changes.blood_type_id {
            Some(bt_id) => Some((bt_id, self.blood_types.name_of(bt_id).await?)),
            None => None,
        };
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Inventory {} not found", id)))?;
        if let Some((bt_id, name)) = blood_type {
            row.blood_type_id = bt_id;
            row.blood_type = name;
        }
        if let Some(quantity) = changes.quantity {
            row.quantity = quantity;
        }
        Ok(row.clone())
    }
}

pub struct TestDonorRepository {
    donors: RwLock<Vec<Donor>>,
    blood_types: Arc<TestBloodTypeRepository>,
    next_id: AtomicI64,
}

impl TestDonorRepository {
    pub fn new(blood_types: Arc<TestBloodTypeRepository>) -> Self {
        Self {
            donors: RwLock::new(vec![]),
            blood_types,
            next_id: AtomicI64::new(0),
        }
    }

    /// Seed a donor row as stored, including its donation date
    pub async fn add_donor(&self, donor: Donor) {
        self.next_id.fetch_max(donor.id, Ordering::SeqCst);
        self.donors.write().await.push(donor);
    }

    fn filtered(donors: &[Donor], query: &Option<String>) -> Vec<Donor> {
        donors
            .iter()
            .filter(|d| contains_ci(d.blood_type.code(), query))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl DonorRepository for TestDonorRepository {
    async fn create(&self, input: &NewDonor) -> Result<Donor> {
        let blood_type = self.blood_types.name_of(input.blood_type_id).await?;
        let mut donors = self.donors.write().await;
        if donors.iter().any(|d| d.donor_name == input.donor_name) {
            return Err(AppError::Conflict(
                "blood donor with this donor name already exists".to_string(),
            ));
        }
        let donor = Donor {
            id: next(&self.next_id),
            donor_name: input.donor_name.clone(),
            blood_type,
            blood_type_id: input.blood_type_id,
            units_donated: input.units_donated,
            last_donated: Some(input.last_donated),
        };
        donors.push(donor.clone());
        Ok(donor)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Donor>> {
        Ok(self.donors.read().await.iter().find(|d| d.id == id).cloned())
    }

    async fn find_by_name(&self, donor_name: &str) -> Result<Option<Donor>> {
        Ok(self
            .donors
            .read()
            .await
            .iter()
            .find(|d| d.donor_name == donor_name)
            .cloned())
    }

    async fn list(
        &self,
        blood_type_query: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Donor>> {
        let mut items = Self::filtered(&self.donors.read().await, &blood_type_query);
        // last_donated DESC with NULLs last, then id DESC
        items.sort_by(|a, b| {
            a.last_donated
                .is_none()
                .cmp(&b.last_donated.is_none())
                .then(b.last_donated.cmp(&a.last_donated))
                .then(b.id.cmp(&a.id))
        });
        Ok(window(items, offset, limit))
    }

    async fn count(&self, blood_type_query: Option<String>) -> Result<i64> {
        Ok(Self::filtered(&self.donors.read().await, &blood_type_query).len() as i64)
    }

    async fn update(&self, id: i64, changes: &DonorChanges) -> Result<Donor> {
        let blood_type = match changes.blood_type_id {
            Some(bt_id) => Some((bt_id, self.blood_types.name_of(bt_id).await?)),
            None => None,
        };
        let mut donors = self.donors.write().await;
        let donor = donors
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Donor {} not found", id)))?;
        if let Some(name) = &changes.donor_name {
            donor.donor_name = name.clone();
        }
        if let Some((bt_id, name)) = blood_type {
            donor.blood_type_id = bt_id;
            donor.blood_type = name;
        }
        if let Some(units) = changes.units_donated {
            donor.units_donated = units;
        }
        donor.last_donated = Some(changes.last_donated);
        Ok(donor.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut donors = self.donors.write().await;
        let before = donors.len();
        donors.retain(|d| d.id != id);
        if donors.len() == before {
            return Err(AppError::NotFound(format!("Donor {} not found", id)));
        }
        Ok(())
    }
}

pub struct TestBloodRequestRepository {
    requests: RwLock<Vec<BloodRequest>>,
    blood_types: Arc<TestBloodTypeRepository>,
    next_id: AtomicI64,
}

impl TestBloodRequestRepository {
    pub fn new(blood_types: Arc<TestBloodTypeRepository>) -> Self {
        Self {
            requests: RwLock::new(vec![]),
            blood_types,
            next_id: AtomicI64::new(0),
        }
    }

    pub async fn get(&self, id: i64) -> Option<BloodRequest> {
        self.find_by_id(id).await.ok().flatten()
    }

    fn filtered(requests: &[BloodRequest], query: &Option<String>) -> Vec<BloodRequest> {
        requests
            .iter()
            .filter(|r| contains_ci(&r.status, query))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl BloodRequestRepository for TestBloodRequestRepository {
    async fn create(&self, input: &NewBloodRequest) -> Result<BloodRequest> {
        let blood_type = self.blood_types.name_of(input.blood_type_id).await?;
        let request = BloodRequest {
            id: next(&self.next_id),
            user_id: input.user_id,
            blood_type,
            blood_type_id: input.blood_type_id,
            units_requested: input.units_requested,
            status: STATUS_PENDING.to_string(),
        };
        self.requests.write().await.push(request.clone());
        Ok(request)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<BloodRequest>> {
        Ok(self
            .requests
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn list(
        &self,
        status_query: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<BloodRequest>> {
        let mut items = Self::filtered(&self.requests.read().await, &status_query);
        items.sort_by_key(|r| r.id);
        Ok(window(items, offset, limit))
    }

    async fn count(&self, status_query: Option<String>) -> Result<i64> {
        Ok(Self::filtered(&self.requests.read().await, &status_query).len() as i64)
    }

    async fn update_status(&self, id: i64, status: &str) -> Result<BloodRequest> {
        let mut requests = self.requests.write().await;
        let request = requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Blood request {} not found", id)))?;
        request.status = status.to_string();
        Ok(request.clone())
    }
}
