//! Integration tests for list persistence.
//!
//! Verifies that the database refuses role sets naming a role that does not
//! exist, so a restricted list can never be stored in a form the flow-control
//! layer would misread.
//!
//! Requires `DATABASE_URL`; run with `cargo test -- --ignored`.

use sqlx::PgPool;
use taskflow_db::models::project::CreateProject;
use taskflow_db::models::user::CreateUser;
use taskflow_db::repositories::{ListRepo, ProjectRepo, UserRepo};

async fn first_list(pool: &PgPool) -> i64 {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: "Owner".to_string(),
            email: "owner@test.com".to_string(),
            password_hash: "not-a-real-hash".to_string(),
        },
    )
    .await
    .unwrap();
    let project = ProjectRepo::create_with_defaults(
        pool,
        &CreateProject {
            name: "Board".to_string(),
            owner_id: user.id,
        },
    )
    .await
    .unwrap();
    ListRepo::list_by_project(pool, project.id).await.unwrap()[0].id
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn known_role_names_are_stored(pool: PgPool) {
    let id = first_list(&pool).await;

    let list = ListRepo::set_flow_control(&pool, id, &["ADMIN".to_string()], &[])
        .await
        .unwrap()
        .unwrap();

    assert_eq!(list.required_role_to_enter, vec!["ADMIN".to_string()]);
    assert!(list.flow_rules().is_ok());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn unknown_role_names_violate_the_check_constraint(pool: PgPool) {
    let id = first_list(&pool).await;

    for (enter, leave) in [
        (vec!["VIEWER".to_string()], vec![]),
        (vec![], vec!["ADMIN".to_string(), "admin".to_string()]),
    ] {
        let err = ListRepo::set_flow_control(&pool, id, &enter, &leave)
            .await
            .unwrap_err();
        let db_err = err.as_database_error().expect("database error");
        assert_eq!(db_err.code().as_deref(), Some("23514"));
    }

    let list = ListRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert!(list.required_role_to_enter.is_empty());
    assert!(list.required_role_to_leave.is_empty());
}
