//! Compound document assembly, inclusion lookups and failable decoding.

mod common;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::convert::Infallible;

use jsonapi_doc::{
    decode_document, decode_document_value, decode_failable, encode_document,
    encode_document_value, encode_document_with_options, Absent, BuildError, Compound,
    DecodeError, Document, EncodeOptions, ErrorObject, FailableDocument, FailureResponse,
    Identity, IncludedIndex, IntoResourceObject, Present, RelationshipRef,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use common::*;

type ArticleDocument = Document<ArticleObject, Absent, Absent, Absent, Absent, IncludedIndex>;
type CommentsDocument =
    Document<Vec<CommentObject>, Absent, Absent, Absent, Absent, IncludedIndex>;

fn ok<T>(value: T) -> Result<T, Infallible> {
    Ok(value)
}

fn included_identities(value: &Value) -> Vec<String> {
    value["included"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| {
            format!("{}:{}", item["type"].as_str().unwrap(), item["id"].as_str().unwrap())
        })
        .collect()
}

/// Article 0 by user 1 (no avatar) with cover image 2 (by user 4, whose
/// avatar is image 7), no attachments, and comments 10 and 11 by user 8.
fn blog_article() -> Article {
    Article {
        id: 0,
        author_id: 1,
        cover_image_id: Some(2),
        title: "Article title".to_string(),
        body: "Article body".to_string(),
        attachment_ids: Vec::new(),
        comment_ids: vec![10, 11],
    }
}

fn build_blog_compound() -> Compound<ArticleObject> {
    Compound::single(blog_article())
        .including_nested(&ARTICLE_AUTHOR, |id, scope| {
            // Avatar is null, so nothing below the author gets included.
            scope
                .single(user(*id, None, "User name"))
                .including(&USER_AVATAR, |id| ok(image(*id, 3)))
        })
        .unwrap()
        .including_nested(&ARTICLE_COVER_IMAGE, |id, scope| {
            scope
                .single(image(*id, 4))
                .including_nested(&IMAGE_CREATOR, |id, scope| {
                    scope
                        .single(user(*id, Some(7), "Image 2 author"))
                        .including(&USER_AVATAR, |id| ok(image(*id, 10)))
                })
        })
        .unwrap()
        .including_nested(&ARTICLE_ATTACHMENTS, |id, scope| {
            scope
                .single(image(*id, 22))
                .including(&IMAGE_CREATOR, |id| ok(user(*id, None, "Unexisting")))
        })
        .unwrap()
        .including_nested(&ARTICLE_COMMENTS, |id, scope| {
            scope
                .single(comment(*id, "Comment text", 8))
                .including(&COMMENT_USER, |id| ok(user(*id, None, "Comment author")))
        })
        .unwrap()
}

#[test]
fn test_chained_inclusion_sorted() {
    let document = Document::compound(build_blog_compound());
    let encoded = encode_document_value(&document, &EncodeOptions::sorted()).unwrap();

    let expected = json!({
        "data": {
            "type": "article",
            "id": "0",
            "attributes": {"title": "Article title", "body": "Article body"},
            "relationships": {
                "author": {"data": {"type": "user", "id": "1"}},
                "coverImage": {"data": {"type": "image", "id": "2"}},
                "attachments": {"data": []},
                "comments": {"data": [
                    {"type": "comment", "id": "10"},
                    {"type": "comment", "id": "11"},
                ]},
            },
        },
        "included": [
            {
                "type": "comment",
                "id": "10",
                "attributes": {"text": "Comment text"},
                "relationships": {"user": {"data": {"type": "user", "id": "8"}}},
            },
            {
                "type": "comment",
                "id": "11",
                "attributes": {"text": "Comment text"},
                "relationships": {"user": {"data": {"type": "user", "id": "8"}}},
            },
            {
                "type": "image",
                "id": "2",
                "relationships": {"creator": {"data": {"type": "user", "id": "4"}}},
            },
            {
                "type": "image",
                "id": "7",
                "relationships": {"creator": {"data": {"type": "user", "id": "10"}}},
            },
            {
                "type": "user",
                "id": "1",
                "attributes": {"name": "User name"},
                "relationships": {"avatar": {"data": null}},
            },
            {
                "type": "user",
                "id": "4",
                "attributes": {"name": "Image 2 author"},
                "relationships": {"avatar": {"data": {"type": "image", "id": "7"}}},
            },
            {
                "type": "user",
                "id": "8",
                "attributes": {"name": "Comment author"},
                "relationships": {"avatar": {"data": null}},
            },
        ],
    });
    assert_eq!(encoded, expected);

    // Member order on the wire.
    let keys: Vec<_> = encoded.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, ["data", "included"]);
}

#[test]
fn test_chained_inclusion_discovery_order() {
    let document = Document::compound(build_blog_compound());
    let encoded = encode_document_value(&document, &EncodeOptions::new()).unwrap();
    assert_eq!(
        included_identities(&encoded),
        [
            "user:1",
            "image:2",
            "user:4",
            "image:7",
            "comment:10",
            "user:8",
            "comment:11",
        ]
    );
}

#[test]
fn test_chained_inclusion_decodes_and_resolves() {
    let json = encode_document(&Document::compound(build_blog_compound())).unwrap();
    let decoded: ArticleDocument = decode_document(&json).unwrap();
    assert_eq!(decoded.data(), &blog_article().into_resource_object());
    assert_eq!(decoded.includes().len(), 7);

    // Direct relationships.
    let author: UserObject = decoded.included(&ARTICLE_AUTHOR).unwrap();
    assert_eq!(author, user(1, None, "User name").into_resource_object());

    let cover: Option<ImageObject> = decoded.included(&ARTICLE_COVER_IMAGE).unwrap();
    assert_eq!(cover, Some(image(2, 4).into_resource_object()));

    let attachments: Vec<ImageObject> = decoded.included(&ARTICLE_ATTACHMENTS).unwrap();
    assert!(attachments.is_empty());

    let comments: Vec<CommentObject> = decoded.included(&ARTICLE_COMMENTS).unwrap();
    assert_eq!(
        comments,
        vec![
            comment(10, "Comment text", 8).into_resource_object(),
            comment(11, "Comment text", 8).into_resource_object(),
        ]
    );

    // Indirect relationships.
    let author_avatar: Option<ImageObject> =
        decoded.included_for(&author, &USER_AVATAR).unwrap();
    assert_eq!(author_avatar, None);

    let cover_creator: Option<UserObject> = decoded
        .included_for_optional(cover.as_ref(), &IMAGE_CREATOR)
        .unwrap();
    let cover_creator = cover_creator.unwrap();
    assert_eq!(cover_creator, user(4, Some(7), "Image 2 author").into_resource_object());

    let creator_avatar: Option<ImageObject> =
        decoded.included_for(&cover_creator, &USER_AVATAR).unwrap();
    assert_eq!(creator_avatar, Some(image(7, 10).into_resource_object()));

    let attachment_creators: Vec<UserObject> =
        decoded.included_for_each(&attachments, &IMAGE_CREATOR).unwrap();
    assert!(attachment_creators.is_empty());

    let comment_users: Vec<UserObject> =
        decoded.included_for_each(&comments, &COMMENT_USER).unwrap();
    let comment_author = user(8, None, "Comment author").into_resource_object();
    assert_eq!(comment_users, vec![comment_author.clone(), comment_author]);
}

#[test]
fn test_decoded_compound_reencodes() {
    let document = Document::compound(build_blog_compound());
    let original = encode_document_value(&document, &EncodeOptions::new()).unwrap();
    let decoded: ArticleDocument = decode_document_value(original.clone()).unwrap();

    let unsorted = encode_document_value(&decoded, &EncodeOptions::new()).unwrap();
    assert_eq!(unsorted, original);

    let sorted = encode_document_value(&decoded, &EncodeOptions::sorted()).unwrap();
    assert_eq!(
        included_identities(&sorted),
        [
            "comment:10",
            "comment:11",
            "image:2",
            "image:7",
            "user:1",
            "user:4",
            "user:8",
        ]
    );
}

#[test]
fn test_diamond_resolves_each_identity_once() {
    // Articles 1 and 2 share author 5; article 3 is by author 6. Every
    // author's avatar is image 9.
    let calls = RefCell::new(HashMap::<Identity, usize>::new());
    let count = |identity: Identity| *calls.borrow_mut().entry(identity).or_default() += 1;

    let compound = Compound::many(vec![article(1, 5), article(2, 5), article(3, 6)])
        .including_nested(&ARTICLE_AUTHOR, |id, scope| {
            count(Identity::new("user", id.to_string()));
            scope.single(user(*id, Some(9), "Author")).including(&USER_AVATAR, |id| {
                count(Identity::new("image", id.to_string()));
                ok(image(*id, 5))
            })
        })
        .unwrap();

    let identities: Vec<_> = compound.included().identities().map(ToString::to_string).collect();
    assert_eq!(identities, ["user:5", "image:9", "user:6"]);

    let calls = calls.into_inner();
    assert_eq!(calls[&Identity::new("user", "5")], 1);
    assert_eq!(calls[&Identity::new("user", "6")], 1);
    assert_eq!(calls[&Identity::new("image", "9")], 1);
}

#[test]
fn test_shared_resource_below_two_relationships() {
    // Author 1 and commenter 8 both use avatar image 9.
    let root = Article {
        comment_ids: vec![10],
        ..article(0, 1)
    };
    let avatar_calls = Cell::new(0);
    let avatar = |id: &u64| {
        avatar_calls.set(avatar_calls.get() + 1);
        ok(image(*id, 1))
    };

    let compound = Compound::single(root)
        .including_nested(&ARTICLE_AUTHOR, |id, scope| {
            scope
                .single(user(*id, Some(9), "Author"))
                .including(&USER_AVATAR, avatar)
        })
        .unwrap()
        .including_nested(&ARTICLE_COMMENTS, |id, scope| {
            scope
                .single(comment(*id, "Nice", 8))
                .including_nested(&COMMENT_USER, |id, scope| {
                    scope
                        .single(user(*id, Some(9), "Commenter"))
                        .including(&USER_AVATAR, avatar)
                })
        })
        .unwrap();

    let identities: Vec<_> = compound.included().identities().map(ToString::to_string).collect();
    assert_eq!(identities, ["user:1", "image:9", "comment:10", "user:8"]);
    assert_eq!(avatar_calls.get(), 1);
}

#[test]
fn test_sorted_inclusion_groups_by_type() {
    let comments = vec![comment(1, "a", 20), comment(2, "b", 3), comment(3, "c", 11)];
    let compound = Compound::many(comments)
        .including_nested(&COMMENT_USER, |id, scope| {
            scope
                .single(user(*id, Some(*id + 100), "Commenter"))
                .including(&USER_AVATAR, |id| ok(image(*id, 0)))
        })
        .unwrap();

    let document = Document::compound(compound);
    let json = encode_document_with_options(&document, &EncodeOptions::sorted()).unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        included_identities(&value),
        [
            "image:103",
            "image:111",
            "image:120",
            "user:11",
            "user:20",
            "user:3",
        ]
    );
}

#[test]
fn test_dangling_reference() {
    let input = json!({
        "data": {
            "type": "comment",
            "id": "1",
            "attributes": {"text": "hi"},
            "relationships": {"user": {"data": {"type": "user", "id": "42"}}},
        },
        "included": [
            {
                "type": "user",
                "id": "41",
                "attributes": {"name": "Someone else"},
                "relationships": {"avatar": {"data": null}},
            },
        ],
    });
    type CommentDocument = Document<CommentObject, Absent, Absent, Absent, Absent, IncludedIndex>;
    let decoded: CommentDocument = decode_document_value(input).unwrap();

    let err = decoded.included::<UserObject, _>(&COMMENT_USER).unwrap_err();
    assert_eq!(
        err,
        DecodeError::MissingIncludedResource {
            referencing: Identity::new("comment", "1"),
            relationship: "user",
            reference: RelationshipRef::ToOne(Identity::new("user", "42")),
            missing: Identity::new("user", "42"),
            path: "relationships.user".to_string(),
        }
    );
    assert_eq!(err.kind().code(), "E003");
}

#[test]
fn test_to_many_lookup_is_positional() {
    let input = json!({
        "data": [
            {
                "type": "comment",
                "id": "1",
                "attributes": {"text": "x"},
                "relationships": {"user": {"data": {"type": "user", "id": "2"}}},
            },
            {
                "type": "comment",
                "id": "2",
                "attributes": {"text": "y"},
                "relationships": {"user": {"data": {"type": "user", "id": "1"}}},
            },
        ],
        "included": [
            {
                "type": "user",
                "id": "1",
                "attributes": {"name": "One"},
                "relationships": {"avatar": {"data": null}},
            },
            {
                "type": "user",
                "id": "2",
                "attributes": {"name": "Two"},
                "relationships": {"avatar": {"data": null}},
            },
        ],
    });
    let decoded: CommentsDocument = decode_document_value(input).unwrap();
    let users: Vec<UserObject> = decoded.included(&COMMENT_USER).unwrap();
    let names: Vec<_> = users.iter().map(|u| u.attributes.name.as_str()).collect();
    assert_eq!(names, ["Two", "One"]);
}

#[test]
fn test_null_and_empty_primary_data() {
    type NullableUser = Document<Option<UserObject>>;
    type UserList = Document<Vec<UserObject>>;

    let none = encode_document(&NullableUser::new(None)).unwrap();
    assert_eq!(none, r#"{"data":null}"#);
    let empty = encode_document(&UserList::new(Vec::new())).unwrap();
    assert_eq!(empty, r#"{"data":[]}"#);

    let decoded: NullableUser = decode_document(&none).unwrap();
    assert_eq!(decoded.data(), &None);
    let decoded: UserList = decode_document(&empty).unwrap();
    assert!(decoded.data().is_empty());

    assert!(decode_document::<UserList>(&none).is_err());
    assert!(decode_document::<NullableUser>(&empty).is_err());
}

#[test]
fn test_compound_over_absent_nullable_data() {
    let compound = Compound::nullable(None::<User>)
        .including(&USER_AVATAR, |id| ok(image(*id, 0)))
        .unwrap();
    let json = encode_document(&Document::compound(compound)).unwrap();
    assert_eq!(json, r#"{"data":null,"included":[]}"#);
}

#[test]
fn test_resolver_failure_aborts_build() {
    let result = Compound::single(blog_article()).including(&ARTICLE_COMMENTS, |id| {
        if *id == 11 {
            Err(format!("comment {id} is gone"))
        } else {
            Ok(comment(*id, "ok", 1))
        }
    });

    let err = result.unwrap_err();
    assert_eq!(err.kind().code(), "E005");
    match err {
        BuildError::Resolver { relationship, identity, source } => {
            assert_eq!(relationship, "comments");
            assert_eq!(identity, Identity::new("comment", "11"));
            assert_eq!(source.to_string(), "comment 11 is gone");
        }
        other => panic!("unexpected error: {other}"),
    }
}

// =============================================================================
// FAILURE DOCUMENTS
// =============================================================================

type WhoopsError = ErrorObject<Present<Uuid>, Absent, Absent, Present<u32>, Present<String>>;
type UserResponse = FailableDocument<
    Document<UserObject, Absent, Absent, Absent, Absent, IncludedIndex>,
    FailureResponse<WhoopsError>,
>;

fn whoops() -> WhoopsError {
    ErrorObject::new()
        .with_id(Uuid::parse_str("AFA1C80F-0393-48A8-8A52-34B84A85B1CC").unwrap())
        .with_code(123)
        .with_title("Whoops!".to_string())
}

#[test]
fn test_failure_document_round_trip() {
    let document = Document::error(whoops());
    let encoded = encode_document_value(&document, &EncodeOptions::new()).unwrap();
    assert_eq!(
        encoded,
        json!({
            "errors": [{
                "id": "afa1c80f-0393-48a8-8a52-34b84a85b1cc",
                "code": "123",
                "title": "Whoops!",
            }]
        })
    );

    let decoded: UserResponse = decode_document_value(encoded).unwrap();
    match decoded {
        FailableDocument::Success(_) => panic!("decoded errors as success"),
        FailableDocument::Failure(failure) => assert_eq!(failure.error_list(), &vec![whoops()]),
    }
}

#[test]
fn test_failure_accepts_uppercase_uuid_and_ignores_data() {
    let input = r#"{
        "data": {"type": "nonsense"},
        "errors": [{
            "code": "123",
            "id": "AFA1C80F-0393-48A8-8A52-34B84A85B1CC",
            "title": "Whoops!"
        }]
    }"#;
    let decoded: UserResponse = decode_failable(input).unwrap();
    let failure = decoded.into_result().unwrap_err();
    assert_eq!(failure.error_list()[0], whoops());
    assert_eq!(failure.to_string(), "123 Whoops!");

    let as_error: Box<dyn std::error::Error> = Box::new(failure);
    assert_eq!(as_error.to_string(), "123 Whoops!");
}

#[test]
fn test_failable_success_branch() {
    let input = json!({
        "data": {
            "type": "user",
            "id": "3",
            "attributes": {"name": "Ok"},
            "relationships": {"avatar": {"data": null}},
        },
    });
    let decoded: UserResponse = decode_document_value(input).unwrap();
    let success = decoded.into_result().unwrap();
    assert_eq!(success.data(), &user(3, None, "Ok").into_resource_object());
    assert!(success.includes().is_empty());
}

#[test]
fn test_error_field_conversion_failure() {
    let input = r#"{"errors": [{"id": "not-a-uuid", "code": "123", "title": "x"}]}"#;
    let err = decode_failable::<
        Document<UserObject, Absent, Absent, Absent, Absent, IncludedIndex>,
        FailureResponse<WhoopsError>,
    >(input)
    .unwrap_err();
    assert_eq!(
        err,
        DecodeError::MalformedIdentifier {
            path: "errors[0].id".to_string(),
            field: "id",
            value: "not-a-uuid".to_string(),
        }
    );
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PageMeta {
    total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TraceMeta {
    trace: String,
}

type PagedUsers = Document<Vec<UserObject>, Absent, Present<PageMeta>>;
type TracedFailure = FailureResponse<WhoopsError, Present<TraceMeta>>;

#[test]
fn test_failure_meta_schema_differs_from_success() {
    let failure = r#"{
        "errors": [{
            "id": "afa1c80f-0393-48a8-8a52-34b84a85b1cc",
            "code": "123",
            "title": "Whoops!"
        }],
        "meta": {"trace": "abc"}
    }"#;
    let decoded = decode_failable::<PagedUsers, TracedFailure>(failure).unwrap();
    match decoded {
        FailableDocument::Failure(failure) => {
            assert_eq!(failure.meta().trace, "abc");
            assert_eq!(failure.error_list(), &vec![whoops()]);
        }
        FailableDocument::Success(_) => panic!("decoded errors as success"),
    }

    let success = r#"{"data": [], "meta": {"total": 0}}"#;
    let decoded = decode_failable::<PagedUsers, TracedFailure>(success).unwrap();
    let page = decoded.into_result().unwrap();
    assert_eq!(page.meta().total, 0);

    // A trace meta can never satisfy the page schema.
    let err = decode_document::<PagedUsers>(r#"{"data": [], "meta": {"trace": "abc"}}"#);
    assert!(err.is_err());
}
