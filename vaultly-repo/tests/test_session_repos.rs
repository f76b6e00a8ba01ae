mod utils;

use chrono::{Duration, Utc};
use rstest::rstest;
use utils::{RepoType, TestUser};
use uuid::Uuid;
use vaultly_repo::session_repo::{Session, SessionRepoError};

fn new_session(user_id: &str) -> Session {
    let now = Utc::now();
    Session::new(
        Uuid::new_v4().to_string(),
        user_id.to_owned(),
        now,
        now + Duration::days(30),
    )
}

#[rstest]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_create_and_get_session(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    let user = TestUser::new(&repos.users).await;

    let session = new_session(&user.id);
    repos.sessions.create_session(session.clone()).await.unwrap();

    let fetched = repos.sessions.get_session(&session.id).await.unwrap();
    assert_eq!(session, fetched);

    user.delete().await
}

#[rstest]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_get_unknown_session(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;

    let result = repos.sessions.get_session("unknown-token").await;
    assert!(matches!(result, Err(SessionRepoError::SessionNotFound)));
}

#[rstest]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_extend_session(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    let user = TestUser::new(&repos.users).await;

    let session = new_session(&user.id);
    repos.sessions.create_session(session.clone()).await.unwrap();

    let new_expiry = session.expires_at + Duration::days(10);
    repos
        .sessions
        .extend_session(&session.id, new_expiry)
        .await
        .unwrap();

    let fetched = repos.sessions.get_session(&session.id).await.unwrap();
    assert_eq!(new_expiry, fetched.expires_at);

    user.delete().await
}

#[rstest]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_delete_session(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    let user = TestUser::new(&repos.users).await;

    let session = new_session(&user.id);
    repos.sessions.create_session(session.clone()).await.unwrap();

    repos.sessions.delete_session(&session.id).await.unwrap();

    let result = repos.sessions.get_session(&session.id).await;
    assert!(matches!(result, Err(SessionRepoError::SessionNotFound)));

    user.delete().await
}

#[rstest]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_delete_user_sessions_keeps_current(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    let user = TestUser::new(&repos.users).await;

    let current = new_session(&user.id);
    let other = new_session(&user.id);
    repos.sessions.create_session(current.clone()).await.unwrap();
    repos.sessions.create_session(other.clone()).await.unwrap();

    repos
        .sessions
        .delete_user_sessions(&user.id, Some(&current.id))
        .await
        .unwrap();

    assert!(repos.sessions.get_session(&current.id).await.is_ok());
    let gone = repos.sessions.get_session(&other.id).await;
    assert!(matches!(gone, Err(SessionRepoError::SessionNotFound)));

    user.delete().await
}

#[rstest]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_delete_all_user_sessions(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    let alice = TestUser::new(&repos.users).await;
    let bob = TestUser::new(&repos.users).await;

    let alice_session = new_session(&alice.id);
    let bob_session = new_session(&bob.id);
    repos
        .sessions
        .create_session(alice_session.clone())
        .await
        .unwrap();
    repos
        .sessions
        .create_session(bob_session.clone())
        .await
        .unwrap();

    repos
        .sessions
        .delete_user_sessions(&alice.id, None)
        .await
        .unwrap();

    let gone = repos.sessions.get_session(&alice_session.id).await;
    assert!(matches!(gone, Err(SessionRepoError::SessionNotFound)));
    assert!(repos.sessions.get_session(&bob_session.id).await.is_ok());

    alice.delete().await;
    bob.delete().await
}
