use std::collections::HashMap;

use api::auth::{Actor, Claims, Role};
use api::config::AppConfig;
use api::gql::schema::AppSchema;
use api::AppState;
use async_graphql::{Request, Variables};
use chrono::NaiveDate;
use infra::models::{ActivityRow, UserRow, VendorRow};
use infra::repos::{CreateActivity, CreateUser, CreateVendor};
use infra::store::{BookingStore, MemoryStore, Store};

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-ludus";

/// Config as the binary would read it, minus anything tests don't need.
pub fn test_config(granularity: &str) -> AppConfig {
    let vars: HashMap<&str, String> = HashMap::from([
        ("DATABASE_URL", "postgres://unused/ludus".to_string()),
        ("JWT_SECRET", TEST_JWT_SECRET.to_string()),
        ("CAPACITY_GRANULARITY", granularity.to_string()),
    ]);

    AppConfig::from_lookup(|key| vars.get(key).cloned()).expect("Invalid test config")
}

pub struct TestApp {
    pub state: AppState,
    pub memory: MemoryStore,
}

pub fn setup_app() -> TestApp {
    setup_app_with("date")
}

pub fn setup_app_with(granularity: &str) -> TestApp {
    let memory = MemoryStore::new();
    let state = AppState::new(Store::Memory(memory.clone()), test_config(granularity));
    TestApp { state, memory }
}

/// Seed a user and return JWT claims for authentication
#[allow(dead_code)]
pub fn create_test_user(app: &TestApp, email: &str, role: Role) -> (UserRow, Claims) {
    let user = app.memory.insert_user(CreateUser {
        email: email.to_string(),
        first_name: "Test".to_string(),
        last_name: Some("User".to_string()),
        phone: Some("+966500000000".to_string()),
        role: role.as_str().to_string(),
    });

    let claims = Claims::new(user.id, user.email.clone(), role, 60);
    (user, claims)
}

#[allow(dead_code)]
pub async fn create_test_vendor(app: &TestApp, owner: &UserRow, name: &str) -> VendorRow {
    app.state
        .store
        .create_vendor(CreateVendor {
            owner_user_id: owner.id,
            business_name: name.to_string(),
            city: Some("Riyadh".to_string()),
        })
        .await
        .expect("Failed to create test vendor")
}

#[allow(dead_code)]
pub async fn create_test_activity(
    app: &TestApp,
    vendor: &VendorRow,
    title: &str,
    max_participants: i32,
) -> ActivityRow {
    app.state
        .store
        .create_activity(CreateActivity {
            vendor_id: vendor.id,
            title: title.to_string(),
            description: Some("Test activity".to_string()),
            city: Some("Riyadh".to_string()),
            price_cents: 15_000,
            currency: "SAR".to_string(),
            min_participants: 1,
            max_participants,
        })
        .await
        .expect("Failed to create test activity")
}

/// A customer, a vendor with one activity, and an admin.
#[allow(dead_code)]
pub struct Fixture {
    pub app: TestApp,
    pub customer: UserRow,
    pub customer_claims: Claims,
    pub vendor_owner: UserRow,
    pub vendor_claims: Claims,
    pub admin_claims: Claims,
    pub vendor: VendorRow,
    pub activity: ActivityRow,
}

#[allow(dead_code)]
pub async fn fixture(max_participants: i32) -> Fixture {
    fixture_with("date", max_participants).await
}

#[allow(dead_code)]
pub async fn fixture_with(granularity: &str, max_participants: i32) -> Fixture {
    let app = setup_app_with(granularity);
    let (customer, customer_claims) = create_test_user(&app, "customer@test.com", Role::User);
    let (vendor_owner, vendor_claims) = create_test_user(&app, "vendor@test.com", Role::Vendor);
    let (_, admin_claims) = create_test_user(&app, "admin@test.com", Role::Admin);
    let vendor = create_test_vendor(&app, &vendor_owner, "Desert Tours").await;
    let activity = create_test_activity(&app, &vendor, "Dune Bashing", max_participants).await;

    Fixture {
        app,
        customer,
        customer_claims,
        vendor_owner,
        vendor_claims,
        admin_claims,
        vendor,
        activity,
    }
}

#[allow(dead_code)]
pub fn actor(claims: &Claims) -> Actor {
    Actor::from_claims(claims).expect("Invalid test claims")
}

#[allow(dead_code)]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("Invalid test date")
}

/// Helper function to execute GraphQL queries and mutations
#[allow(dead_code)]
pub async fn execute_graphql(
    schema: &AppSchema,
    query: &str,
    variables: Option<Variables>,
    auth_claims: Option<Claims>,
) -> async_graphql::Response {
    let mut request = Request::new(query);

    if let Some(vars) = variables {
        request = request.variables(vars);
    }

    if let Some(claims) = auth_claims {
        request = request.data(claims);
    }

    schema.execute(request).await
}
