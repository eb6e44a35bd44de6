mod common;

use library_catalog::database::DefaultAuthorRepository;
use library_catalog::models::Author;
use library_catalog::repositories::AuthorRepository;

#[tokio::test]
async fn save_assigns_id_and_find_returns_it() {
    let (_dir, pool) = common::setup().await;
    let repo = DefaultAuthorRepository::new(pool);

    let saved = repo.save_author(Author::new("Frank Herbert")).await.unwrap();
    let id = saved.id().expect("saved author should carry an id");

    let found = repo.find_author(id).await.unwrap();
    assert_eq!(found, Some(saved));
}

#[tokio::test]
async fn duplicate_name_is_skipped_without_error() {
    let (_dir, pool) = common::setup().await;
    let repo = DefaultAuthorRepository::new(pool);

    repo.save_author(Author::new("Frank Herbert")).await.unwrap();
    let duplicate = repo.save_author(Author::new("Frank Herbert")).await.unwrap();

    assert_eq!(duplicate, Author::new("Frank Herbert"));
    assert_eq!(repo.find_all_authors().await.unwrap().len(), 1);
}

#[tokio::test]
async fn uniqueness_check_is_case_sensitive() {
    let (_dir, pool) = common::setup().await;
    let repo = DefaultAuthorRepository::new(pool);

    repo.save_author(Author::new("Frank Herbert")).await.unwrap();
    let other = repo.save_author(Author::new("frank herbert")).await.unwrap();

    assert!(other.id().is_some());
    assert_eq!(repo.find_all_authors().await.unwrap().len(), 2);
}

#[tokio::test]
async fn find_missing_author_returns_none() {
    let (_dir, pool) = common::setup().await;
    let repo = DefaultAuthorRepository::new(pool);

    assert_eq!(repo.find_author(42).await.unwrap(), None);
}

#[tokio::test]
async fn find_all_returns_every_author() {
    let (_dir, pool) = common::setup().await;
    let repo = DefaultAuthorRepository::new(pool);

    let first = repo.save_author(Author::new("Iain M. Banks")).await.unwrap();
    let second = repo.save_author(Author::new("Ann Leckie")).await.unwrap();

    let all = repo.find_all_authors().await.unwrap();
    assert_eq!(all, vec![first, second]);
}

#[tokio::test]
async fn update_renames_author() {
    let (_dir, pool) = common::setup().await;
    let repo = DefaultAuthorRepository::new(pool);

    let mut author = repo.save_author(Author::new("Iain Banks")).await.unwrap();
    author.set_name("Iain M. Banks");
    repo.update_author(&author).await.unwrap();

    let found = repo.find_author(author.id().unwrap()).await.unwrap().unwrap();
    assert_eq!(found.name(), "Iain M. Banks");
}

#[tokio::test]
async fn update_without_id_fails() {
    let (_dir, pool) = common::setup().await;
    let repo = DefaultAuthorRepository::new(pool);

    let err = repo.update_author(&Author::new("Nobody")).await.unwrap_err();
    assert!(err.to_string().contains("has not been saved"));
}

#[tokio::test]
async fn delete_reports_whether_a_row_was_removed() {
    let (_dir, pool) = common::setup().await;
    let repo = DefaultAuthorRepository::new(pool);

    let author = repo.save_author(Author::new("Octavia Butler")).await.unwrap();
    let id = author.id().unwrap();

    assert!(repo.delete_author(id).await.unwrap());
    assert!(!repo.delete_author(id).await.unwrap());
    assert_eq!(repo.find_author(id).await.unwrap(), None);
}

#[tokio::test]
async fn find_on_transaction_sees_uncommitted_rows() {
    let (_dir, pool) = common::setup().await;
    let repo = DefaultAuthorRepository::new(pool.clone());

    let mut tx = pool.begin().await.unwrap();
    let id: i32 = sqlx::query_scalar("INSERT INTO author (author_name) VALUES (?) RETURNING id")
        .bind("Stanisław Lem")
        .fetch_one(&mut *tx)
        .await
        .unwrap();

    let inside = repo.find_author_on(id, &mut tx).await.unwrap();
    assert_eq!(inside, Some(Author::with_id(id, "Stanisław Lem".to_string())));

    tx.rollback().await.unwrap();
    assert_eq!(repo.find_author(id).await.unwrap(), None);
}
