//! Benchmark for building, encoding, and decoding compound documents.
//!
//! Generates a synthetic blog graph (articles, comments, images, users),
//! builds one compound document over it, and times each stage.
//!
//! Usage: bench-blog [ARTICLES]

use std::collections::HashMap;
use std::time::{Duration, Instant};

use jsonapi_doc::{
    decode_document, decode_failable, encode_document, encode_document_with_options, Absent,
    Compound, Document, EncodeOptions, ErrorObject, FailableDocument, FailureResponse,
    IncludedIndex, NullableToOne, Present, Resource, ResourceObject, Scope, Selector, ToMany, ToOne,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// =============================================================================
// SCHEMA
// =============================================================================

struct Article;
impl Resource for Article {
    const TYPE: &'static str = "article";
    type Id = u64;
}

struct Comment;
impl Resource for Comment {
    const TYPE: &'static str = "comment";
    type Id = u64;
}

struct Image;
impl Resource for Image {
    const TYPE: &'static str = "image";
    type Id = u64;
}

struct User;
impl Resource for User {
    const TYPE: &'static str = "user";
    type Id = u64;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ArticleAttributes {
    title: String,
    body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArticleRelationships {
    author: ToOne<User>,
    cover_image: NullableToOne<Image>,
    comments: ToMany<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CommentAttributes {
    text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CommentRelationships {
    user: ToOne<User>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ImageRelationships {
    creator: ToOne<User>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct UserAttributes {
    name: String,
}

type ArticleObject =
    ResourceObject<Article, Present<ArticleAttributes>, Present<ArticleRelationships>>;
type CommentObject =
    ResourceObject<Comment, Present<CommentAttributes>, Present<CommentRelationships>>;
type ImageObject = ResourceObject<Image, Absent, Present<ImageRelationships>>;
type UserObject = ResourceObject<User, Present<UserAttributes>>;

const ARTICLE_AUTHOR: Selector<ArticleObject, ToOne<User>> =
    Selector::new("author", |article| &article.relationships.author);
const ARTICLE_COVER_IMAGE: Selector<ArticleObject, NullableToOne<Image>> =
    Selector::new("coverImage", |article| &article.relationships.cover_image);
const ARTICLE_COMMENTS: Selector<ArticleObject, ToMany<Comment>> =
    Selector::new("comments", |article| &article.relationships.comments);
const COMMENT_USER: Selector<CommentObject, ToOne<User>> =
    Selector::new("user", |comment| &comment.relationships.user);
const IMAGE_CREATOR: Selector<ImageObject, ToOne<User>> =
    Selector::new("creator", |image| &image.relationships.creator);

type ArticlesDocument =
    Document<Vec<ArticleObject>, Absent, Absent, Absent, Absent, IncludedIndex>;

type BenchError = ErrorObject<Present<Uuid>, Absent, Present<u16>, Absent, Present<String>>;

// =============================================================================
// DATA GENERATION
// =============================================================================

const USERS: u64 = 200;
const COMMENTS_PER_ARTICLE: u64 = 8;

/// In-memory store the resolvers read from.
struct Blog {
    articles: Vec<ArticleObject>,
    comments: HashMap<u64, CommentObject>,
    images: HashMap<u64, ImageObject>,
    users: HashMap<u64, UserObject>,
}

impl Blog {
    fn generate(article_count: u64) -> Self {
        let users = (0..USERS)
            .map(|id| {
                let object = ResourceObject::<User>::new(id).with_attributes(UserAttributes {
                    name: format!("User {id}"),
                });
                (id, object)
            })
            .collect();

        let images = (0..article_count / 2)
            .map(|id| {
                let creator = ToOne::new(id * 7 % USERS);
                let object = ResourceObject::<Image>::new(id)
                    .with_relationships(ImageRelationships { creator });
                (id, object)
            })
            .collect();

        let mut comments = HashMap::new();
        let mut articles = Vec::with_capacity(article_count as usize);
        for id in 0..article_count {
            let comment_ids: Vec<u64> = (0..COMMENTS_PER_ARTICLE)
                .map(|n| id * COMMENTS_PER_ARTICLE + n)
                .collect();
            for &comment_id in &comment_ids {
                let object = ResourceObject::<Comment>::new(comment_id)
                    .with_attributes(CommentAttributes {
                        text: format!("Comment {comment_id} on article {id}"),
                    })
                    .with_relationships(CommentRelationships {
                        user: ToOne::new(comment_id * 13 % USERS),
                    });
                comments.insert(comment_id, object);
            }

            let cover_image = (id % 3 != 0).then_some(id / 2);
            let object = ResourceObject::<Article>::new(id)
                .with_attributes(ArticleAttributes {
                    title: format!("Article {id}"),
                    body: "Lorem ipsum dolor sit amet. ".repeat(8),
                })
                .with_relationships(ArticleRelationships {
                    author: ToOne::new(id % USERS),
                    cover_image: NullableToOne::new(cover_image),
                    comments: ToMany::new(comment_ids),
                });
            articles.push(object);
        }

        Self {
            articles,
            comments,
            images,
            users,
        }
    }

    fn user(&self, id: &u64) -> Result<UserObject, String> {
        self.users.get(id).cloned().ok_or_else(|| format!("no user {id}"))
    }

    fn image(&self, id: &u64, scope: &Scope) -> Result<Compound<ImageObject>, String> {
        let image = self.images.get(id).cloned().ok_or_else(|| format!("no image {id}"))?;
        scope
            .compound(image)
            .including(&IMAGE_CREATOR, |user| self.user(user))
            .map_err(|e| e.to_string())
    }

    fn comment(&self, id: &u64, scope: &Scope) -> Result<Compound<CommentObject>, String> {
        let comment = self
            .comments
            .get(id)
            .cloned()
            .ok_or_else(|| format!("no comment {id}"))?;
        scope
            .compound(comment)
            .including(&COMMENT_USER, |user| self.user(user))
            .map_err(|e| e.to_string())
    }
}

// =============================================================================
// STAGES
// =============================================================================

fn time<T>(label: &str, f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let out = f();
    let elapsed = start.elapsed();
    info!(stage = label, ?elapsed, "stage finished");
    (out, elapsed)
}

fn throughput(bytes: usize, elapsed: Duration) -> f64 {
    (bytes as f64 / 1_000_000.0) / elapsed.as_secs_f64()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let article_count: u64 = std::env::args()
        .nth(1)
        .map(|arg| arg.parse().expect("ARTICLES must be a number"))
        .unwrap_or(1_000);

    let (blog, generate_time) = time("generate", || Blog::generate(article_count));
    println!(
        "Generated {} articles, {} comments, {} images, {} users in {:?}",
        blog.articles.len(),
        blog.comments.len(),
        blog.images.len(),
        blog.users.len(),
        generate_time
    );

    // Build
    let (compound, build_time) = time("build", || {
        Compound::new(blog.articles.clone())
            .including(&ARTICLE_AUTHOR, |id| blog.user(id))?
            .including_nested(&ARTICLE_COVER_IMAGE, |id, scope| blog.image(id, scope))?
            .including_nested(&ARTICLE_COMMENTS, |id, scope| blog.comment(id, scope))
    });
    let compound = compound.expect("Failed to build compound document");
    println!(
        "\nBuilt compound with {} included resources in {:?}",
        compound.included().len(),
        build_time
    );
    let document = Document::compound(compound);

    // Encode
    let (encoded, encode_time) =
        time("encode", || encode_document(&document).expect("Failed to encode"));
    println!(
        "\nEncoded (discovery order): {} bytes in {:?}",
        encoded.len(),
        encode_time
    );
    println!(
        "  Throughput: {:.2} MB/s",
        throughput(encoded.len(), encode_time)
    );

    let (sorted, sorted_time) = time("encode_sorted", || {
        encode_document_with_options(&document, &EncodeOptions::sorted())
            .expect("Failed to encode sorted")
    });
    println!(
        "Encoded (sorted): {} bytes in {:?}",
        sorted.len(),
        sorted_time
    );
    println!(
        "  Throughput: {:.2} MB/s",
        throughput(sorted.len(), sorted_time)
    );

    // Decode
    let (decoded, decode_time) = time("decode", || {
        decode_document::<ArticlesDocument>(&encoded).expect("Failed to decode")
    });
    println!(
        "\nDecoded {} articles and {} included in {:?}",
        decoded.data().len(),
        decoded.includes().len(),
        decode_time
    );
    println!(
        "  Throughput: {:.2} MB/s",
        throughput(encoded.len(), decode_time)
    );
    assert_eq!(decoded.data(), &blog.articles, "primary data changed in round trip");

    // Resolve
    let (resolved, resolve_time) = time("resolve", || {
        let authors: Vec<UserObject> = decoded
            .included_for_each(decoded.data().as_slice(), &ARTICLE_AUTHOR)
            .expect("Failed to resolve authors");
        let covers: Vec<Option<ImageObject>> = decoded
            .included_for_each(decoded.data().as_slice(), &ARTICLE_COVER_IMAGE)
            .expect("Failed to resolve cover images");
        let comments: Vec<Vec<CommentObject>> = decoded
            .included_for_each(decoded.data().as_slice(), &ARTICLE_COMMENTS)
            .expect("Failed to resolve comments");
        let commenters = comments
            .iter()
            .flatten()
            .map(|comment| decoded.included_for::<UserObject, _, _>(comment, &COMMENT_USER))
            .collect::<Result<Vec<_>, _>>()
            .expect("Failed to resolve commenters");
        authors.len() + covers.iter().flatten().count() + comments.len() + commenters.len()
    });
    println!("\nResolved {} relationships in {:?}", resolved, resolve_time);

    // Failure documents
    let failure = Document::errors(
        (0..64u16)
            .map(|n| {
                ErrorObject::new()
                    .with_id(Uuid::new_v4())
                    .with_status(400 + n % 30)
                    .with_title(format!("Invalid article {n}"))
            })
            .collect::<Vec<BenchError>>(),
    );
    let failure_json = encode_document(&failure).expect("Failed to encode failure document");
    let (failable, failure_time) = time("decode_failable", || {
        decode_failable::<ArticlesDocument, FailureResponse<BenchError>>(&failure_json)
            .expect("Failed to decode failure document")
    });
    match failable {
        FailableDocument::Failure(failure) => println!(
            "\nDecoded failure document with {} errors in {:?}",
            failure.error_list().len(),
            failure_time
        ),
        FailableDocument::Success(_) => panic!("failure document decoded as success"),
    }
}
