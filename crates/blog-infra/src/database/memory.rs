//! In-memory blog store - used when no database is configured, and in tests.
//!
//! Honours the same visibility rules and cascades as the SQL schema.
//! Data is lost on process restart.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use blog_core::domain::{
    Comment, CommentId, NewComment, NewPost, NewUser, Post, PostId, User, UserId,
};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, CommentRepository, PostRepository, UserRepository};
use blog_core::query::{CommentQuery, PostQuery};

#[derive(Default)]
struct State {
    users: BTreeMap<UserId, User>,
    posts: BTreeMap<PostId, Post>,
    comments: BTreeMap<CommentId, Comment>,
    last_user_id: UserId,
    last_post_id: PostId,
    last_comment_id: CommentId,
}

impl State {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn username_taken(&self, username: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|u| u.username == username && Some(u.id) != except)
    }

    fn remove_post(&mut self, id: PostId) -> Option<Post> {
        let post = self.posts.remove(&id)?;
        self.comments.retain(|_, c| c.post != id);
        Some(post)
    }
}

/// Users, posts and comments behind one async lock.
///
/// Cloning is cheap and every clone sees the same data.
#[derive(Clone, Default)]
pub struct InMemoryBlogStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, UserId> for InMemoryBlogStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepoError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        if state.username_taken(&user.username, Some(user.id)) {
            return Err(RepoError::Constraint("username already exists".into()));
        }
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Removes the user's posts and their comments too.
    async fn delete(&self, id: UserId) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        if state.users.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        let owned: Vec<PostId> = state
            .posts
            .values()
            .filter(|p| p.author == id)
            .map(|p| p.id)
            .collect();
        for post_id in owned {
            state.remove_post(post_id);
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryBlogStore {
    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        let mut state = self.state.write().await;
        if state.username_taken(&user.username, None) {
            return Err(RepoError::Constraint("username already exists".into()));
        }
        let id = State::next_id(&mut state.last_user_id);
        let user = user.into_user(id);
        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }
}

#[async_trait]
impl BaseRepository<Post, PostId> for InMemoryBlogStore {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        Ok(self.state.read().await.posts.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut state = self.state.write().await;
        if !state.posts.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        if !state.users.contains_key(&post.author) {
            return Err(RepoError::Constraint(format!("user {} does not exist", post.author)));
        }
        state.posts.insert(post.id, post.clone());
        Ok(post)
    }

    /// Removes the post's comments too.
    async fn delete(&self, id: PostId) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        match state.remove_post(id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&post.author) {
            return Err(RepoError::Constraint(format!("user {} does not exist", post.author)));
        }
        let id = State::next_id(&mut state.last_post_id);
        let post = post.into_post(id);
        state.posts.insert(id, post.clone());
        Ok(post)
    }

    async fn filter(&self, query: PostQuery) -> Result<Vec<Post>, RepoError> {
        let state = self.state.read().await;
        Ok(query.apply(state.posts.values().cloned()))
    }
}

#[async_trait]
impl BaseRepository<Comment, CommentId> for InMemoryBlogStore {
    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, RepoError> {
        Ok(self.state.read().await.comments.get(&id).cloned())
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut state = self.state.write().await;
        if !state.comments.contains_key(&comment.id) {
            return Err(RepoError::NotFound);
        }
        if !state.posts.contains_key(&comment.post) {
            return Err(RepoError::Constraint(format!("post {} does not exist", comment.post)));
        }
        state.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: CommentId) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        match state.comments.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlogStore {
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError> {
        let mut state = self.state.write().await;
        if !state.posts.contains_key(&comment.post) {
            return Err(RepoError::Constraint(format!("post {} does not exist", comment.post)));
        }
        let id = State::next_id(&mut state.last_comment_id);
        let comment = comment.into_comment(id);
        state.comments.insert(id, comment.clone());
        Ok(comment)
    }

    async fn filter(&self, query: CommentQuery) -> Result<Vec<Comment>, RepoError> {
        let state = self.state.read().await;
        Ok(state
            .comments
            .values()
            .filter(|c| query.matches(c))
            .cloned()
            .collect())
    }
}
