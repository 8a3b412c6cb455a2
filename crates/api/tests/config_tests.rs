use std::collections::HashMap;

use api::auth::{AuthConfig, JwtService, Role};
use api::config::{AppConfig, CapacityGranularity, ConfigError};
use api::error::AppError;
use uuid::Uuid;

fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(|key| vars.get(key).cloned())
}

const REQUIRED: [(&str, &str); 2] = [
    ("DATABASE_URL", "postgres://localhost/ludus"),
    ("JWT_SECRET", "secret"),
];

#[test]
fn test_defaults() {
    let config = load(&REQUIRED).expect("Required keys are enough");

    assert_eq!(config.database_max_connections, 30);
    assert_eq!(config.port, 8080);
    assert!(!config.skip_migrations);
    assert!(!config.gql_introspection);
    assert_eq!(config.capacity_granularity, CapacityGranularity::Date);
    assert_eq!(
        config.allowed_origins,
        vec!["http://localhost:3000", "http://localhost:3001"]
    );
    assert_eq!(config.auth.access_token_expiration_minutes, 15);
}

#[test]
fn test_overrides() {
    let mut vars = REQUIRED.to_vec();
    vars.extend([
        ("PORT", "9000"),
        ("SKIP_MIGRATIONS", "TRUE"),
        ("GQL_INTROSPECTION", "true"),
        ("CAPACITY_GRANULARITY", "date_slot"),
        ("ALLOWED_ORIGINS", "https://ludus.sa, ,https://admin.ludus.sa"),
    ]);

    let config = load(&vars).unwrap();
    assert_eq!(config.port, 9000);
    assert!(config.skip_migrations);
    assert!(config.gql_introspection);
    assert_eq!(config.capacity_granularity, CapacityGranularity::DateSlot);
    assert_eq!(
        config.allowed_origins,
        vec!["https://ludus.sa", "https://admin.ludus.sa"]
    );
}

#[test]
fn test_missing_required_keys() {
    let err = load(&[("JWT_SECRET", "secret")]).unwrap_err();
    assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));

    let err = load(&[("DATABASE_URL", "postgres://x"), ("JWT_SECRET", "")]).unwrap_err();
    assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
}

#[test]
fn test_invalid_values_are_errors() {
    let mut vars = REQUIRED.to_vec();
    vars.push(("CAPACITY_GRANULARITY", "hourly"));
    let err = load(&vars).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Invalid {
            key: "CAPACITY_GRANULARITY",
            ..
        }
    ));

    let mut vars = REQUIRED.to_vec();
    vars.push(("PORT", "eighty"));
    assert!(load(&vars).is_err());
}

#[test]
fn test_jwt_round_trip_and_tampering() {
    let service = JwtService::new(&AuthConfig {
        jwt_secret: "first-secret".to_string(),
        access_token_expiration_minutes: 15,
    });
    let user_id = Uuid::new_v4();

    let token = service
        .create_token(user_id, "vendor@test.com".to_string(), Role::Vendor)
        .unwrap();
    let claims = service.verify_token(&token).unwrap();
    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.role, "vendor");
    assert!(claims.exp > claims.iat);

    let other = JwtService::new(&AuthConfig {
        jwt_secret: "second-secret".to_string(),
        access_token_expiration_minutes: 15,
    });
    let err = other.verify_token(&token).unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}
