use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};

use quill_core::RepoError;
use quill_core::domain::{NewPost, Post, PostPatch, PostQuery};
use quill_core::ports::{KeyValueStore, PostRepository, keys};

use super::{PostRepositoryConfig, StoredPostRepository};
use crate::id::{SequentialIdGenerator, UuidIdGenerator};
use crate::storage::InMemoryKvStore;

fn no_delay() -> PostRepositoryConfig {
    PostRepositoryConfig {
        load_delay: Duration::ZERO,
    }
}

fn new_post(title: &str, author_id: &str, category: &str) -> NewPost {
    NewPost {
        title: title.to_string(),
        content: format!("Body of {title}"),
        author: "X".to_string(),
        author_id: author_id.to_string(),
        category: category.to_string(),
        excerpt: "C".to_string(),
        image: None,
    }
}

fn seed_post(id: &str, category: &str) -> Post {
    Post::new(
        id.to_string(),
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        new_post(&format!("Seed {id}"), "1", category),
    )
}

async fn loaded_repo(
    store: Arc<InMemoryKvStore>,
    seed: Vec<Post>,
) -> StoredPostRepository {
    let repo = StoredPostRepository::new(store, Arc::new(UuidIdGenerator), seed, no_delay());
    repo.load().await;
    repo
}

#[tokio::test]
async fn test_create_then_fetch() {
    let repo = loaded_repo(Arc::new(InMemoryKvStore::new()), Vec::new()).await;

    let created = repo
        .create(NewPost {
            title: "A".to_string(),
            content: "B".to_string(),
            excerpt: "C".to_string(),
            author: "X".to_string(),
            author_id: "1".to_string(),
            category: "React".to_string(),
            image: None,
        })
        .await
        .unwrap();

    let fetched = repo.find_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(fetched.created_at, Utc::now().date_naive());
    assert_eq!(fetched.category, "React");
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_prepends_newest_first() {
    let repo = loaded_repo(Arc::new(InMemoryKvStore::new()), vec![seed_post("1", "CSS")]).await;

    let first = repo.create(new_post("first", "1", "React")).await.unwrap();
    let second = repo.create(new_post("second", "1", "React")).await.unwrap();

    let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![second.id, first.id, "1".to_string()]);
}

#[tokio::test]
async fn test_created_ids_are_pairwise_distinct() {
    let repo = loaded_repo(Arc::new(InMemoryKvStore::new()), Vec::new()).await;

    for i in 0..200 {
        repo.create(new_post(&format!("post {i}"), "1", "React"))
            .await
            .unwrap();
    }

    let posts = repo.list().await.unwrap();
    let ids: HashSet<&str> = posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids.len(), 200);
}

#[tokio::test]
async fn test_generated_ids_skip_seeded_ids() {
    let repo = StoredPostRepository::new(
        Arc::new(InMemoryKvStore::new()),
        Arc::new(SequentialIdGenerator::default()),
        vec![seed_post("1", "CSS"), seed_post("2", "CSS")],
        no_delay(),
    );
    repo.load().await;

    let created = repo.create(new_post("new", "1", "React")).await.unwrap();
    assert_eq!(created.id, "3");
}

#[tokio::test]
async fn test_update_absent_id_changes_nothing() {
    let store = Arc::new(InMemoryKvStore::new());
    let repo = loaded_repo(store.clone(), vec![seed_post("1", "CSS")]).await;
    let stored_before = store.get(keys::POSTS).await.unwrap();

    let result = repo
        .update(
            "nonexistent",
            PostPatch {
                title: Some("ghost".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(result.is_none());
    assert_eq!(repo.list().await.unwrap().len(), 1);
    assert_eq!(store.get(keys::POSTS).await.unwrap(), stored_before);
}

#[tokio::test]
async fn test_update_merges_in_place() {
    let repo = loaded_repo(
        Arc::new(InMemoryKvStore::new()),
        vec![seed_post("1", "CSS"), seed_post("2", "CSS"), seed_post("3", "CSS")],
    )
    .await;

    let updated = repo
        .update(
            "2",
            PostPatch {
                category: Some("TypeScript".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.category, "TypeScript");
    assert_eq!(updated.title, "Seed 2");

    let posts = repo.list().await.unwrap();
    assert_eq!(posts[1].id, "2");
    assert_eq!(posts[1].category, "TypeScript");
}

#[tokio::test]
async fn test_delete_reports_whether_removed() {
    let store = Arc::new(InMemoryKvStore::new());
    let repo = loaded_repo(store.clone(), vec![seed_post("1", "CSS"), seed_post("2", "CSS")]).await;

    assert!(!repo.delete("missing").await.unwrap());
    assert_eq!(repo.list().await.unwrap().len(), 2);

    assert!(repo.delete("1").await.unwrap());
    assert!(repo.find_by_id("1").await.unwrap().is_none());

    let stored: Vec<Post> =
        serde_json::from_str(&store.get(keys::POSTS).await.unwrap().unwrap()).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, "2");
}

#[tokio::test]
async fn test_filters_do_not_mutate_and_are_repeatable() {
    let repo = loaded_repo(
        Arc::new(InMemoryKvStore::new()),
        vec![seed_post("1", "CSS"), seed_post("2", "React")],
    )
    .await;
    repo.create(new_post("mine", "7", "React")).await.unwrap();

    let before = repo.list().await.unwrap();

    let react_once = repo.find_by_category("React").await.unwrap();
    let react_twice = repo.find_by_category("React").await.unwrap();
    assert_eq!(react_once, react_twice);
    assert_eq!(react_once.len(), 2);
    assert_eq!(react_once[0].title, "mine");

    let by_author = repo.find_by_author("7").await.unwrap();
    assert_eq!(by_author, repo.find_by_author("7").await.unwrap());
    assert_eq!(by_author.len(), 1);

    assert!(repo.find_by_category("react").await.unwrap().is_empty());
    assert_eq!(repo.list().await.unwrap(), before);
}

#[tokio::test]
async fn test_search_combines_category_and_text() {
    let repo = loaded_repo(
        Arc::new(InMemoryKvStore::new()),
        vec![seed_post("1", "CSS"), seed_post("2", "React")],
    )
    .await;

    let all = repo.search(&PostQuery::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    let query = PostQuery {
        category: Some("All".to_string()),
        text: Some("seed 2".to_string()),
    };
    let found = repo.search(&query).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "2");
}

#[tokio::test]
async fn test_load_seeds_and_persists_when_storage_empty() {
    let store = Arc::new(InMemoryKvStore::new());
    let repo = StoredPostRepository::new(
        store.clone(),
        Arc::new(UuidIdGenerator),
        vec![seed_post("1", "CSS")],
        no_delay(),
    );
    assert!(repo.is_loading());

    repo.load().await;

    assert!(!repo.is_loading());
    assert_eq!(repo.list().await.unwrap().len(), 1);
    assert!(store.contains(keys::POSTS).await.unwrap());
}

#[tokio::test]
async fn test_load_prefers_stored_collection_over_seed() {
    let store = Arc::new(InMemoryKvStore::new());
    let stored = vec![seed_post("9", "React")];
    store
        .set(keys::POSTS, &serde_json::to_string(&stored).unwrap())
        .await
        .unwrap();

    let repo = loaded_repo(store, vec![seed_post("1", "CSS")]).await;
    assert_eq!(repo.list().await.unwrap(), stored);
}

#[tokio::test]
async fn test_corrupt_storage_falls_back_to_seed() {
    let store = Arc::new(InMemoryKvStore::new());
    store.set(keys::POSTS, "{not json").await.unwrap();

    let repo = loaded_repo(store.clone(), vec![seed_post("1", "CSS")]).await;

    assert!(!repo.is_loading());
    assert_eq!(repo.list().await.unwrap(), vec![seed_post("1", "CSS")]);
    assert_eq!(
        store.get(keys::POSTS).await.unwrap(),
        Some("{not json".to_string())
    );
}

#[tokio::test]
async fn test_collection_round_trips_through_storage() {
    let store = Arc::new(InMemoryKvStore::new());
    let repo = loaded_repo(store.clone(), vec![seed_post("1", "CSS")]).await;
    let mut with_image = new_post("pic", "1", "CSS");
    with_image.image = Some("data:image/png;base64,iVBORw0KGgo=".to_string());
    repo.create(with_image).await.unwrap();
    repo.create(new_post("plain", "2", "React")).await.unwrap();

    let reloaded = loaded_repo(store, Vec::new()).await;
    assert_eq!(reloaded.list().await.unwrap(), repo.list().await.unwrap());
}

#[tokio::test]
async fn test_persist_failure_surfaces_and_keeps_mirror() {
    let seed = vec![seed_post("1", "CSS")];
    let seeded_size = serde_json::to_string(&seed).unwrap().len() + keys::POSTS.len();
    let store = Arc::new(InMemoryKvStore::with_quota(seeded_size + 16));
    let repo = loaded_repo(store, seed.clone()).await;

    let result = repo.create(new_post("too big", "1", "React")).await;

    assert!(matches!(result, Err(RepoError::Storage(_))));
    assert_eq!(repo.list().await.unwrap(), seed);
}

#[tokio::test]
async fn test_mutations_before_load_are_rejected() {
    let store = Arc::new(InMemoryKvStore::new());
    let repo = StoredPostRepository::new(
        store.clone(),
        Arc::new(UuidIdGenerator),
        vec![seed_post("1", "CSS")],
        no_delay(),
    );

    let created = repo.create(new_post("early", "1", "React")).await;
    assert!(matches!(created, Err(RepoError::NotLoaded)));
    assert!(matches!(
        repo.update("1", PostPatch::default()).await,
        Err(RepoError::NotLoaded)
    ));
    assert!(matches!(repo.delete("1").await, Err(RepoError::NotLoaded)));
    assert!(!store.contains(keys::POSTS).await.unwrap());

    repo.load().await;
    assert_eq!(repo.list().await.unwrap(), vec![seed_post("1", "CSS")]);
    repo.create(new_post("later", "1", "React")).await.unwrap();
    assert_eq!(repo.list().await.unwrap().len(), 2);
}
