use std::sync::Arc;

use async_trait::async_trait;

use super::BlogService;
use crate::caller::{AuthenticatedUser, Caller};
use crate::domain::{Comment, NewComment, NewPost, NewUser, Post, User};
use crate::error::RepoError;
use crate::forms::{CommentForm, PostForm};
use crate::ports::{BaseRepository, CommentRepository, PostRepository, UserRepository};
use crate::query::{CommentQuery, PostQuery};
use crate::view::{ABOUT_TEMPLATE, POST_FORM_TEMPLATE, PageContext, ViewOutcome};

/// Store whose every call fails, to prove a code path never touches it.
struct Unreachable;

fn unreachable() -> RepoError {
    RepoError::Connection("store must not be reached".into())
}

#[async_trait]
impl<T: Send + 'static> BaseRepository<T, i64> for Unreachable {
    async fn find_by_id(&self, _id: i64) -> Result<Option<T>, RepoError> {
        Err(unreachable())
    }

    async fn save(&self, _entity: T) -> Result<T, RepoError> {
        Err(unreachable())
    }

    async fn delete(&self, _id: i64) -> Result<(), RepoError> {
        Err(unreachable())
    }
}

#[async_trait]
impl UserRepository for Unreachable {
    async fn create(&self, _user: NewUser) -> Result<User, RepoError> {
        Err(unreachable())
    }

    async fn find_by_username(&self, _username: &str) -> Result<Option<User>, RepoError> {
        Err(unreachable())
    }
}

#[async_trait]
impl PostRepository for Unreachable {
    async fn create(&self, _post: NewPost) -> Result<Post, RepoError> {
        Err(unreachable())
    }

    async fn filter(&self, _query: PostQuery) -> Result<Vec<Post>, RepoError> {
        Err(unreachable())
    }
}

#[async_trait]
impl CommentRepository for Unreachable {
    async fn create(&self, _comment: NewComment) -> Result<Comment, RepoError> {
        Err(unreachable())
    }

    async fn filter(&self, _query: CommentQuery) -> Result<Vec<Comment>, RepoError> {
        Err(unreachable())
    }
}

fn service() -> BlogService {
    let store = Arc::new(Unreachable);
    BlogService::new(store.clone(), store.clone(), store)
}

fn user() -> Caller {
    Caller::from(AuthenticatedUser::new(1, "editor"))
}

#[tokio::test]
async fn guarded_operations_redirect_anonymous_callers_before_touching_the_store() {
    let blog = service();
    let anon = Caller::Anonymous;
    let form = PostForm {
        author: None,
        title: Some("t".into()),
        text: Some("x".into()),
    };

    let outcomes = vec![
        blog.draft_list(&anon).await,
        blog.new_post_form(&anon).await,
        blog.create_post(&anon, form.clone()).await,
        blog.edit_post_form(&anon, 1).await,
        blog.update_post(&anon, 1, form).await,
        blog.confirm_delete(&anon, 1).await,
        blog.delete_post(&anon, 1).await,
        blog.publish_post(&anon, 1).await,
        blog.approve_comment(&anon, 1).await,
        blog.remove_comment(&anon, 1).await,
    ];

    for outcome in outcomes {
        assert_eq!(outcome.unwrap(), ViewOutcome::LoginRequired);
    }
}

#[tokio::test]
async fn invalid_post_form_is_presented_again_without_store_access() {
    let form = PostForm {
        author: None,
        title: Some("  ".into()),
        text: Some("body".into()),
    };

    let outcome = service().create_post(&user(), form.clone()).await.unwrap();

    let ViewOutcome::Invalid(page) = outcome else {
        panic!("expected invalid form, got {outcome:?}");
    };
    assert_eq!(page.template, POST_FORM_TEMPLATE);
    let PageContext::PostForm {
        form: kept, errors, ..
    } = page.context
    else {
        panic!("expected post form context");
    };
    assert_eq!(kept, form);
    assert!(errors.has("title"));
}

#[tokio::test]
async fn new_post_form_is_empty() {
    let outcome = service().new_post_form(&user()).await.unwrap();
    let ViewOutcome::Render(page) = outcome else {
        panic!("expected render, got {outcome:?}");
    };
    assert_eq!(page.template, POST_FORM_TEMPLATE);
}

#[tokio::test]
async fn store_failures_propagate() {
    let err = service().post_list().await.unwrap_err();
    assert!(matches!(err, RepoError::Connection(_)));

    let err = service()
        .submit_comment(
            1,
            CommentForm {
                author: Some("a".into()),
                text: Some("b".into()),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Connection(_)));
}

#[test]
fn about_page_needs_no_store() {
    let ViewOutcome::Render(page) = service().about() else {
        panic!("expected render");
    };
    assert_eq!(page.template, ABOUT_TEMPLATE);
}
