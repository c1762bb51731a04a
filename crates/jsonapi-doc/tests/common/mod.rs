//! Shared fixtures: a small blog schema (articles, comments, images, users).
#![allow(dead_code)]

use jsonapi_doc::{
    Absent, IntoResourceObject, NullableToOne, Present, Resource, ResourceObject, Selector, ToMany,
    ToOne,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// USER
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: u64,
    pub avatar_id: Option<u64>,
    pub name: String,
}

impl Resource for User {
    const TYPE: &'static str = "user";
    type Id = u64;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAttributes {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRelationships {
    pub avatar: NullableToOne<Image>,
}

pub type UserObject = ResourceObject<User, Present<UserAttributes>, Present<UserRelationships>>;

impl IntoResourceObject for User {
    type Object = UserObject;

    fn into_resource_object(self) -> UserObject {
        ResourceObject::<User>::new(self.id)
            .with_attributes(UserAttributes { name: self.name })
            .with_relationships(UserRelationships {
                avatar: NullableToOne::new(self.avatar_id),
            })
    }
}

pub const USER_AVATAR: Selector<UserObject, NullableToOne<Image>> =
    Selector::new("avatar", |user| &user.relationships.avatar);

pub fn user(id: u64, avatar_id: Option<u64>, name: &str) -> User {
    User {
        id,
        avatar_id,
        name: name.to_string(),
    }
}

// =============================================================================
// IMAGE
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub id: u64,
    pub creator_id: u64,
}

impl Resource for Image {
    const TYPE: &'static str = "image";
    type Id = u64;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRelationships {
    pub creator: ToOne<User>,
}

pub type ImageObject = ResourceObject<Image, Absent, Present<ImageRelationships>>;

impl IntoResourceObject for Image {
    type Object = ImageObject;

    fn into_resource_object(self) -> ImageObject {
        ResourceObject::<Image>::new(self.id).with_relationships(ImageRelationships {
            creator: ToOne::new(self.creator_id),
        })
    }
}

pub const IMAGE_CREATOR: Selector<ImageObject, ToOne<User>> =
    Selector::new("creator", |image| &image.relationships.creator);

pub fn image(id: u64, creator_id: u64) -> Image {
    Image { id, creator_id }
}

// =============================================================================
// COMMENT
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: u64,
    pub text: String,
    pub user_id: u64,
}

impl Resource for Comment {
    const TYPE: &'static str = "comment";
    type Id = u64;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentAttributes {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRelationships {
    pub user: ToOne<User>,
}

pub type CommentObject =
    ResourceObject<Comment, Present<CommentAttributes>, Present<CommentRelationships>>;

impl IntoResourceObject for Comment {
    type Object = CommentObject;

    fn into_resource_object(self) -> CommentObject {
        ResourceObject::<Comment>::new(self.id)
            .with_attributes(CommentAttributes { text: self.text })
            .with_relationships(CommentRelationships {
                user: ToOne::new(self.user_id),
            })
    }
}

pub const COMMENT_USER: Selector<CommentObject, ToOne<User>> =
    Selector::new("user", |comment| &comment.relationships.user);

pub fn comment(id: u64, text: &str, user_id: u64) -> Comment {
    Comment {
        id,
        text: text.to_string(),
        user_id,
    }
}

// =============================================================================
// ARTICLE
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub id: u64,
    pub author_id: u64,
    pub cover_image_id: Option<u64>,
    pub title: String,
    pub body: String,
    pub attachment_ids: Vec<u64>,
    pub comment_ids: Vec<u64>,
}

impl Resource for Article {
    const TYPE: &'static str = "article";
    type Id = u64;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleAttributes {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRelationships {
    pub author: ToOne<User>,
    pub cover_image: NullableToOne<Image>,
    pub attachments: ToMany<Image>,
    pub comments: ToMany<Comment>,
}

pub type ArticleObject =
    ResourceObject<Article, Present<ArticleAttributes>, Present<ArticleRelationships>>;

impl IntoResourceObject for Article {
    type Object = ArticleObject;

    fn into_resource_object(self) -> ArticleObject {
        ResourceObject::<Article>::new(self.id)
            .with_attributes(ArticleAttributes {
                title: self.title,
                body: self.body,
            })
            .with_relationships(ArticleRelationships {
                author: ToOne::new(self.author_id),
                cover_image: NullableToOne::new(self.cover_image_id),
                attachments: ToMany::new(self.attachment_ids),
                comments: ToMany::new(self.comment_ids),
            })
    }
}

pub const ARTICLE_AUTHOR: Selector<ArticleObject, ToOne<User>> =
    Selector::new("author", |article| &article.relationships.author);
pub const ARTICLE_COVER_IMAGE: Selector<ArticleObject, NullableToOne<Image>> =
    Selector::new("coverImage", |article| &article.relationships.cover_image);
pub const ARTICLE_ATTACHMENTS: Selector<ArticleObject, ToMany<Image>> =
    Selector::new("attachments", |article| &article.relationships.attachments);
pub const ARTICLE_COMMENTS: Selector<ArticleObject, ToMany<Comment>> =
    Selector::new("comments", |article| &article.relationships.comments);

pub fn article(id: u64, author_id: u64) -> Article {
    Article {
        id,
        author_id,
        cover_image_id: None,
        title: format!("Article {id}"),
        body: String::new(),
        attachment_ids: Vec::new(),
        comment_ids: Vec::new(),
    }
}
