use bson::doc;
use fieldhash::{
    Collection, Document, FieldHashError, HashFieldsOptions, PathKind, PathOptions, Schema,
    hash_fields,
};
use std::sync::Arc;

// cost 4 keeps bcrypt fast enough for tests
fn users_collection(opts: HashFieldsOptions) -> Collection {
    let mut schema = Schema::new();
    schema.add_path("username", PathKind::String, PathOptions::default());
    hash_fields(&mut schema, &opts).unwrap();
    Collection::new("users".to_string(), Arc::new(schema))
}

#[tokio::test]
async fn save_hashes_modified_password() {
    let col = users_collection(HashFieldsOptions::new().with_rounds(4));
    let mut doc = Document::new(doc! { "username": "alice", "password": "hunter2" });
    let id = col.save(&mut doc).await.unwrap();

    let stored = col.find_document(&id).unwrap();
    let hashed = stored.get("password").unwrap().as_str().unwrap().to_string();
    assert_ne!(hashed, "hunter2");
    assert!(hashed.starts_with("$2"));

    let acc = col.schema().accessors("Password").unwrap();
    assert!(acc.verify(&stored, "hunter2").await.unwrap());
    assert!(!acc.verify(&stored, "wrong").await.unwrap());
    assert!(acc.verify_sync(&stored, "hunter2").unwrap());
}

#[tokio::test]
async fn second_save_without_change_keeps_hash() {
    let col = users_collection(HashFieldsOptions::new().with_rounds(4));
    let mut doc = Document::new(doc! { "password": "hunter2" });
    let id = col.save(&mut doc).await.unwrap();
    let first = col.find_document(&id).unwrap().get("password").unwrap().as_str().unwrap().to_string();

    col.save(&mut doc).await.unwrap();
    let second = col.find_document(&id).unwrap().get("password").unwrap().as_str().unwrap().to_string();
    assert_eq!(first, second);
}

#[tokio::test]
async fn resetting_a_field_rehashes_it() {
    let col = users_collection(HashFieldsOptions::new().with_rounds(4));
    let mut doc = Document::new(doc! { "password": "old" });
    let id = col.save(&mut doc).await.unwrap();

    doc.set("password", "new").unwrap();
    col.save(&mut doc).await.unwrap();

    let stored = col.find_document(&id).unwrap();
    let acc = col.schema().accessors("Password").unwrap();
    assert!(acc.verify(&stored, "new").await.unwrap());
    assert!(!acc.verify(&stored, "old").await.unwrap());
}

#[tokio::test]
async fn all_modified_fields_hash_before_save() {
    let opts = HashFieldsOptions::new()
        .with_fields(["password", "profile.pin", "apiKey"])
        .with_rounds(4);
    let col = users_collection(opts);
    let mut doc = Document::new(doc! {
        "password": "p0",
        "profile": { "pin": "p1" },
        "apiKey": "p2",
    });
    let id = col.save(&mut doc).await.unwrap();
    let stored = col.find_document(&id).unwrap();

    for (token, plain) in [("Password", "p0"), ("ProfilePin", "p1"), ("ApiKey", "p2")] {
        let acc = col.schema().accessors(token).unwrap();
        assert!(acc.verify(&stored, plain).await.unwrap(), "{token} did not verify");
        assert_ne!(stored.get(&acc.path().dotted()).unwrap().as_str().unwrap(), plain);
    }
}

#[tokio::test]
async fn failed_hash_aborts_the_whole_save() {
    let mut schema = Schema::new();
    // out-of-range cost forces this field's hash to fail
    schema.add_path("pin", PathKind::String, PathOptions { hashed: true, rounds: Some(2) });
    let opts = HashFieldsOptions::new().with_field("password").with_rounds(4);
    hash_fields(&mut schema, &opts).unwrap();
    let col = Collection::new("users".to_string(), Arc::new(schema));

    let mut doc = Document::new(doc! { "password": "a", "pin": "b" });
    let res = col.save(&mut doc).await;
    assert!(matches!(res, Err(FieldHashError::Hashing(_))));
    assert!(col.is_empty());
}

#[tokio::test]
async fn non_string_protected_value_aborts_save() {
    let col = users_collection(HashFieldsOptions::new().with_rounds(4));
    let mut doc = Document::new(doc! { "password": 42 });
    let res = col.save(&mut doc).await;
    assert!(matches!(res, Err(FieldHashError::NotAString(_))));
    assert!(col.is_empty());
}

#[tokio::test]
async fn absent_protected_field_is_left_alone() {
    let col = users_collection(HashFieldsOptions::new().with_rounds(4));
    let mut doc = Document::new(doc! { "username": "bob" });
    let id = col.save(&mut doc).await.unwrap();
    let stored = col.find_document(&id).unwrap();
    assert!(stored.get("password").is_none());
}
