use fieldhash::{FieldHashError, HashFieldsOptions, PathKind, PathOptions, Schema, hash_fields};

#[test]
fn defaults_to_password_when_nothing_configured() {
    let mut schema = Schema::new();
    hash_fields(&mut schema, &HashFieldsOptions::new()).unwrap();

    let fields = schema.protected_fields();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].path.dotted(), "password");
    assert!(schema.accessors("Password").is_some());
    assert_eq!(schema.path("password").unwrap().kind, PathKind::String);
}

#[test]
fn explicit_fields_generate_capitalized_tokens() {
    let mut schema = Schema::new();
    let opts = HashFieldsOptions::new().with_fields(["password", "profile.pin"]);
    hash_fields(&mut schema, &opts).unwrap();

    let tokens: Vec<String> = schema.protected_fields().iter().map(|f| f.token()).collect();
    assert_eq!(tokens, vec!["Password".to_string(), "ProfilePin".to_string()]);
    assert!(schema.accessors("Password").is_some());
    assert!(schema.accessors("ProfilePin").is_some());
}

#[test]
fn missing_nested_path_is_added_to_schema() {
    let mut schema = Schema::new();
    let opts = HashFieldsOptions::new().with_field("profile.pin");
    hash_fields(&mut schema, &opts).unwrap();

    // intermediate segment becomes a nested placeholder, only the leaf is string-typed
    assert_eq!(schema.path("profile").unwrap().kind, PathKind::Document);
    assert_eq!(schema.path("profile.pin").unwrap().kind, PathKind::String);
}

#[test]
fn declared_path_is_not_redeclared() {
    let mut schema = Schema::new();
    schema.add_path("password", PathKind::String, PathOptions { hashed: false, rounds: Some(6) });
    hash_fields(&mut schema, &HashFieldsOptions::new()).unwrap();

    // original declaration survives, including its rounds override
    assert_eq!(schema.path("password").unwrap().options.rounds, Some(6));
    assert_eq!(schema.accessors("Password").unwrap().cost(), 6);
}

#[test]
fn marked_paths_join_after_configured_fields() {
    let mut schema = Schema::new();
    schema.add_path("apiKey", PathKind::String, PathOptions { hashed: true, rounds: None });
    let opts = HashFieldsOptions::new().with_field("password");
    hash_fields(&mut schema, &opts).unwrap();

    let paths: Vec<String> =
        schema.protected_fields().iter().map(|f| f.path.dotted()).collect();
    assert_eq!(paths, vec!["password".to_string(), "apiKey".to_string()]);
    assert!(schema.accessors("ApiKey").is_some());
}

#[test]
fn marker_on_configured_field_is_not_duplicated() {
    let mut schema = Schema::new();
    schema.add_path("password", PathKind::String, PathOptions { hashed: true, rounds: None });
    let opts = HashFieldsOptions::new().with_fields(["password"]);
    hash_fields(&mut schema, &opts).unwrap();

    assert_eq!(schema.protected_fields().len(), 1);
}

#[test]
fn invalid_field_path_fails_fast() {
    let mut schema = Schema::new();
    let opts = HashFieldsOptions::new().with_field("bad..path");
    let err = hash_fields(&mut schema, &opts).unwrap_err();
    assert!(matches!(err, FieldHashError::Configuration(_)));
}

#[test]
fn cost_resolution_prefers_field_override_over_schema_default() {
    let mut schema = Schema::new();
    schema.add_path("pin", PathKind::String, PathOptions { hashed: true, rounds: Some(6) });
    let opts = HashFieldsOptions::new().with_field("password").with_rounds(10);
    hash_fields(&mut schema, &opts).unwrap();

    assert_eq!(schema.accessors("Pin").unwrap().cost(), 6);
    assert_eq!(schema.accessors("Password").unwrap().cost(), 10);
}

#[test]
fn cost_falls_back_to_bcrypt_default() {
    let mut schema = Schema::new();
    hash_fields(&mut schema, &HashFieldsOptions::new()).unwrap();
    assert_eq!(schema.accessors("Password").unwrap().cost(), bcrypt::DEFAULT_COST);
}
