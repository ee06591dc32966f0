//! Submission forms and their validation rules.
//!
//! A form holds exactly the fields a submission may set. Unknown fields in
//! the request body are dropped during deserialization. Values are trimmed
//! before they are checked, and a form that fails validation is handed back
//! untouched together with its errors so the caller can re-present it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Comment, Post, UserId};

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors(BTreeMap<&'static str, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }
}

fn too_long(max: usize, actual: usize) -> String {
    format!("Ensure this value has at most {max} characters (it has {actual}).")
}

fn cleaned(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required<'a>(
    errors: &mut FormErrors,
    field: &'static str,
    value: &'a Option<String>,
    max_len: Option<usize>,
) -> &'a str {
    match cleaned(value) {
        None => {
            errors.add(field, REQUIRED);
            ""
        }
        Some(v) => {
            if let Some(max) = max_len {
                let len = v.chars().count();
                if len > max {
                    errors.add(field, too_long(max, len));
                }
            }
            v
        }
    }
}

/// Post submission: `{author, title, text}`.
///
/// `author` is a user id. When left empty the operation picks a default
/// (the caller on create, the current author on update).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostForm {
    pub author: Option<String>,
    pub title: Option<String>,
    pub text: Option<String>,
}

/// A post form that passed field-level validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanPost {
    pub author: Option<UserId>,
    pub title: String,
    pub text: String,
}

impl PostForm {
    /// Form pre-filled from a stored post, for editing.
    pub fn from_post(post: &Post) -> Self {
        Self {
            author: Some(post.author.to_string()),
            title: Some(post.title.clone()),
            text: Some(post.text.clone()),
        }
    }

    /// Field-level validation. Whether the author exists is checked by the
    /// caller against the user store.
    pub fn clean(&self) -> Result<CleanPost, FormErrors> {
        let mut errors = FormErrors::default();

        let author = match cleaned(&self.author) {
            None => None,
            Some(raw) => match raw.parse::<UserId>() {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.add("author", INVALID_CHOICE);
                    None
                }
            },
        };
        let title = required(&mut errors, "title", &self.title, Some(Post::TITLE_MAX_LEN));
        let text = required(&mut errors, "text", &self.text, None);

        if errors.is_empty() {
            Ok(CleanPost {
                author,
                title: title.to_string(),
                text: text.to_string(),
            })
        } else {
            Err(errors)
        }
    }
}

/// Comment submission: `{author, text}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentForm {
    pub author: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanComment {
    pub author: String,
    pub text: String,
}

impl CommentForm {
    pub fn clean(&self) -> Result<CleanComment, FormErrors> {
        let mut errors = FormErrors::default();
        let author = required(&mut errors, "author", &self.author, Some(Comment::AUTHOR_MAX_LEN));
        let text = required(&mut errors, "text", &self.text, None);

        if errors.is_empty() {
            Ok(CleanComment {
                author: author.to_string(),
                text: text.to_string(),
            })
        } else {
            Err(errors)
        }
    }
}
