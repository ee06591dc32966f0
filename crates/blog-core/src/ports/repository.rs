use async_trait::async_trait;

use crate::domain::{
    Comment, CommentId, NewComment, NewPost, NewUser, Post, PostId, User, UserId,
};
use crate::error::RepoError;
use crate::query::{CommentQuery, PostQuery};

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist changes to an existing entity.
    ///
    /// Returns [`RepoError::NotFound`] if the entity no longer exists.
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    ///
    /// Returns [`RepoError::NotFound`] if nothing was deleted.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, UserId> {
    /// Insert a new account. Usernames are unique.
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository. Deleting a post also deletes its comments.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, PostId> {
    /// Insert a new post and return it with its generated id.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Posts matching `query`, in the order the query defines.
    async fn filter(&self, query: PostQuery) -> Result<Vec<Post>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, CommentId> {
    /// Insert a new comment. Fails with [`RepoError::Constraint`] if the
    /// post does not exist.
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError>;

    /// Comments matching `query`, ascending by id.
    async fn filter(&self, query: CommentQuery) -> Result<Vec<Comment>, RepoError>;
}
