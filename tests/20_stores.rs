mod common;

use anyhow::Result;
use jobly_api::database::models::{NewCompany, NewJob, NewUser};
use jobly_api::database::store::{CompanyStore, JobStore, UserStore};
use jobly_api::database::{ChangeSet, DatabaseError};
use jobly_api::filter::{CompanyFilter, JobFilter};

fn new_company(handle: &str) -> NewCompany {
    NewCompany {
        handle: handle.to_string(),
        name: format!("Name {}", handle),
        description: "New Description".to_string(),
        num_employees: Some(1),
        logo_url: None,
    }
}

#[tokio::test]
async fn company_create_and_duplicate() -> Result<()> {
    let Some(db) = common::test_db().await? else { return Ok(()) };
    let store = CompanyStore::new(db.pool.clone());

    let company = store.create(&new_company("new")).await?;
    assert_eq!(company.handle, "new");
    assert_eq!(store.get("new").await?, company);

    match store.create(&new_company("new")).await {
        Err(DatabaseError::BadRequest(msg)) => assert_eq!(msg, "Duplicate company: new"),
        other => panic!("expected duplicate error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn company_filters() -> Result<()> {
    let Some(db) = common::test_db().await? else { return Ok(()) };
    let store = CompanyStore::new(db.pool.clone());

    let all = store.find_all(&CompanyFilter::default()).await?;
    let handles: Vec<_> = all.iter().map(|c| c.handle.as_str()).collect();
    assert_eq!(handles, vec!["c1", "c2", "c3"]);

    let filter = CompanyFilter {
        name: Some("c".to_string()),
        min_employees: Some(2),
        max_employees: Some(2),
    };
    let found = store.find_all(&filter).await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].handle, "c2");
    Ok(())
}

#[tokio::test]
async fn company_partial_update() -> Result<()> {
    let Some(db) = common::test_db().await? else { return Ok(()) };
    let store = CompanyStore::new(db.pool.clone());

    let changes = ChangeSet::new()
        .with("name", "New")
        .with("numEmployees", jobly_api::database::SqlValue::Null)
        .with("logoUrl", jobly_api::database::SqlValue::Null);
    let company = store.update("c1", &changes).await?;
    assert_eq!(company.name, "New");
    assert_eq!(company.description, "Desc1");
    assert_eq!(company.num_employees, None);
    assert_eq!(company.logo_url, None);

    match store.update("nope", &ChangeSet::new().with("name", "x")).await {
        Err(DatabaseError::NotFound(msg)) => assert_eq!(msg, "No company: nope"),
        other => panic!("expected not found, got {:?}", other),
    }

    assert!(matches!(
        store.update("c1", &ChangeSet::new()).await,
        Err(DatabaseError::PartialUpdate(_))
    ));
    Ok(())
}

#[tokio::test]
async fn company_rename_onto_taken_name() -> Result<()> {
    let Some(db) = common::test_db().await? else { return Ok(()) };
    let store = CompanyStore::new(db.pool.clone());

    match store.update("c1", &ChangeSet::new().with("name", "C2")).await {
        Err(DatabaseError::BadRequest(msg)) => assert_eq!(msg, "Duplicate company: C2"),
        other => panic!("expected duplicate error, got {:?}", other),
    }
    assert_eq!(store.get("c1").await?.name, "C1");
    Ok(())
}

#[tokio::test]
async fn company_remove() -> Result<()> {
    let Some(db) = common::test_db().await? else { return Ok(()) };
    let store = CompanyStore::new(db.pool.clone());

    store.remove("c1").await?;
    assert!(matches!(store.get("c1").await, Err(DatabaseError::NotFound(_))));
    assert!(matches!(store.remove("c1").await, Err(DatabaseError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn job_crud() -> Result<()> {
    let Some(db) = common::test_db().await? else { return Ok(()) };
    let store = JobStore::new(db.pool.clone());

    let job = store
        .create(&NewJob {
            title: "Test".to_string(),
            salary: Some(100),
            equity: Some(0.1),
            company_handle: "c1".to_string(),
        })
        .await?;
    assert_eq!(job.equity.as_deref(), Some("0.1"));

    let orphan = store
        .create(&NewJob {
            title: "Orphan".to_string(),
            salary: None,
            equity: None,
            company_handle: "nope".to_string(),
        })
        .await;
    assert!(matches!(orphan, Err(DatabaseError::NotFound(msg)) if msg == "No company: nope"));

    let updated = store
        .update(job.id, &ChangeSet::new().with("salary", 500i64).with("equity", 0.5))
        .await?;
    assert_eq!(updated.salary, Some(500));
    assert_eq!(updated.equity.as_deref(), Some("0.5"));
    assert_eq!(updated.title, "Test");

    store.remove(job.id).await?;
    assert!(matches!(store.get(job.id).await, Err(DatabaseError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn job_filters() -> Result<()> {
    let Some(db) = common::test_db().await? else { return Ok(()) };
    let store = JobStore::new(db.pool.clone());

    let all = store.find_all(&JobFilter::default()).await?;
    assert_eq!(all.len(), 4);

    let with_equity = store
        .find_all(&JobFilter { has_equity: true, ..JobFilter::default() })
        .await?;
    let titles: Vec<_> = with_equity.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, vec!["J1", "J2"]);

    let filtered = store
        .find_all(&JobFilter {
            title: Some("j".to_string()),
            min_salary: Some(2),
            has_equity: false,
        })
        .await?;
    let titles: Vec<_> = filtered.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, vec!["J2", "J3"]);
    Ok(())
}

#[tokio::test]
async fn user_authenticate() -> Result<()> {
    let Some(db) = common::test_db().await? else { return Ok(()) };
    let store = UserStore::new(db.pool.clone(), 4);

    let user = store.authenticate("u1", "password-u1").await?;
    assert_eq!(user.username, "u1");
    assert!(!user.is_admin);

    assert!(matches!(
        store.authenticate("u1", "wrong").await,
        Err(DatabaseError::Unauthorized(_))
    ));
    assert!(matches!(
        store.authenticate("nope", "password").await,
        Err(DatabaseError::Unauthorized(_))
    ));
    Ok(())
}

#[tokio::test]
async fn user_register_and_update_password() -> Result<()> {
    let Some(db) = common::test_db().await? else { return Ok(()) };
    let store = UserStore::new(db.pool.clone(), 4);

    let new_user = NewUser {
        username: "new".to_string(),
        password: "password".to_string(),
        first_name: "Test".to_string(),
        last_name: "Tester".to_string(),
        email: "test@test.com".to_string(),
        is_admin: false,
    };
    store.register(&new_user).await?;
    assert!(matches!(
        store.register(&new_user).await,
        Err(DatabaseError::BadRequest(msg)) if msg == "Duplicate username: new"
    ));

    let stored: (String,) = sqlx::query_as("SELECT password FROM users WHERE username = 'new'")
        .fetch_one(&db.pool)
        .await?;
    assert_ne!(stored.0, "password");

    let changes = ChangeSet::new().with("firstName", "Renamed").with("password", "new-password");
    let user = store.update("new", &changes).await?;
    assert_eq!(user.first_name, "Renamed");
    store.authenticate("new", "new-password").await?;
    Ok(())
}

#[tokio::test]
async fn user_details_and_applications() -> Result<()> {
    let Some(db) = common::test_db().await? else { return Ok(()) };
    let store = UserStore::new(db.pool.clone(), 4);

    let u1 = store.get("u1").await?;
    assert_eq!(u1.jobs, vec![db.job_ids[0]]);
    let u2 = store.get("u2").await?;
    assert!(u2.jobs.is_empty());

    store.apply_for_job("u2", db.job_ids[1]).await?;
    assert_eq!(store.get("u2").await?.jobs, vec![db.job_ids[1]]);

    assert!(matches!(
        store.apply_for_job("u2", db.job_ids[1]).await,
        Err(DatabaseError::BadRequest(msg)) if msg == "Already applied"
    ));
    assert!(matches!(
        store.apply_for_job("u2", 0).await,
        Err(DatabaseError::NotFound(msg)) if msg == "No job: 0"
    ));
    assert!(matches!(
        store.apply_for_job("nope", db.job_ids[0]).await,
        Err(DatabaseError::NotFound(msg)) if msg == "No username: nope"
    ));

    let all = store.find_all().await?;
    let names: Vec<_> = all.iter().map(|u| u.user.username.as_str()).collect();
    assert_eq!(names, vec!["admin", "u1", "u2"]);

    store.remove("u1").await?;
    assert!(matches!(store.get("u1").await, Err(DatabaseError::NotFound(_))));
    Ok(())
}
