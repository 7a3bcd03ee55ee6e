//! Thread projection: turns the flat comment rows of a post into nested
//! response trees.
//!
//! The forest is indexed by id in one grouping pass and then walked depth
//! first from the roots. Sibling order is `(created_date, id)`, so a fixed
//! snapshot always projects the same way.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Comment, CommentId, Like, LikeTarget, Post, PostId, User, UserId};

/// Display name used when an author or liker record is missing.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LikeSummary {
    pub user_id: UserId,
    pub user_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentView {
    pub id: CommentId,
    pub post_id: PostId,
    pub parent_comment_id: Option<CommentId>,
    pub content: String,
    pub user_id: Option<UserId>,
    pub user_name: String,
    pub created_date: DateTime<Utc>,
    pub likes: Vec<LikeSummary>,
    pub replies: Vec<CommentView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostView {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub photo_url: Option<String>,
    pub register_date: DateTime<Utc>,
    pub user_id: Option<UserId>,
    pub user_name: String,
    pub likes: Vec<LikeSummary>,
    pub comments: Vec<CommentView>,
}

/// Id-keyed index over one snapshot of comments, likes and users.
///
/// Comments written by a known but deactivated author are hidden: they are
/// never listed as roots or replies, and their replies go with them.
pub struct ThreadProjection<'a> {
    by_id: HashMap<CommentId, &'a Comment>,
    children: HashMap<CommentId, Vec<&'a Comment>>,
    roots: Vec<&'a Comment>,
    likes: HashMap<CommentId, Vec<&'a Like>>,
    users: HashMap<UserId, &'a User>,
}

impl<'a> ThreadProjection<'a> {
    pub fn new(comments: &'a [Comment], likes: &'a [Like], users: &'a [User]) -> Self {
        let users: HashMap<UserId, &User> = users.iter().map(|u| (u.id, u)).collect();

        let mut by_id = HashMap::with_capacity(comments.len());
        let mut children: HashMap<CommentId, Vec<&Comment>> = HashMap::new();
        let mut roots = Vec::new();

        for comment in comments {
            by_id.insert(comment.id, comment);
            if !is_visible(comment, &users) {
                continue;
            }
            match comment.parent_comment_id {
                Some(parent) => children.entry(parent).or_default().push(comment),
                None => roots.push(comment),
            }
        }

        for siblings in children.values_mut() {
            siblings.sort_by_key(|c| (c.created_date, c.id));
        }
        roots.sort_by_key(|c| (c.created_date, c.id));

        let mut by_comment: HashMap<CommentId, Vec<&Like>> = HashMap::new();
        for like in likes {
            if let LikeTarget::Comment(id) = like.target {
                by_comment.entry(id).or_default().push(like);
            }
        }

        Self {
            by_id,
            children,
            roots,
            likes: by_comment,
            users,
        }
    }

    /// Visible root comments with their full reply trees.
    pub fn roots(&self) -> Vec<CommentView> {
        let mut visited = HashSet::new();
        self.roots
            .iter()
            .filter_map(|c| self.project(c, &mut visited))
            .collect()
    }

    /// One comment and its visible replies. The requested comment itself is
    /// returned even when its author is deactivated.
    pub fn subtree(&self, id: CommentId) -> Option<CommentView> {
        let comment = self.by_id.get(&id)?;
        self.project(comment, &mut HashSet::new())
    }

    pub fn project_post(&self, post: &Post, post_likes: &[Like]) -> PostView {
        let likes = post_likes
            .iter()
            .filter(|l| l.target == LikeTarget::Post(post.id))
            .collect::<Vec<_>>();

        PostView {
            id: post.id,
            title: post.title.clone(),
            content: post.content.clone(),
            photo_url: post.photo_url.clone(),
            register_date: post.register_date,
            user_id: post.user_id,
            user_name: self.display_name(post.user_id),
            likes: self.summaries(likes),
            comments: self.roots(),
        }
    }

    fn project(&self, comment: &Comment, visited: &mut HashSet<CommentId>) -> Option<CommentView> {
        // Each comment is emitted once; a malformed parent cycle ends here.
        if !visited.insert(comment.id) {
            return None;
        }

        let replies = self
            .children
            .get(&comment.id)
            .map(|kids| {
                kids.iter()
                    .filter_map(|kid| self.project(kid, visited))
                    .collect()
            })
            .unwrap_or_default();

        let likes = self
            .likes
            .get(&comment.id)
            .map(|likes| self.summaries(likes.iter().copied()))
            .unwrap_or_default();

        Some(CommentView {
            id: comment.id,
            post_id: comment.post_id,
            parent_comment_id: comment.parent_comment_id,
            content: comment.content.clone(),
            user_id: comment.user_id,
            user_name: self.display_name(comment.user_id),
            created_date: comment.created_date,
            likes,
            replies,
        })
    }

    fn display_name(&self, user_id: Option<UserId>) -> String {
        display_name(&self.users, user_id)
    }

    fn summaries<'l>(&self, likes: impl IntoIterator<Item = &'l Like>) -> Vec<LikeSummary> {
        summarize(likes, &self.users)
    }
}

/// Like summaries for an arbitrary set of likes, ordered by like time.
pub fn summarize_likes(likes: &[Like], users: &[User]) -> Vec<LikeSummary> {
    let users: HashMap<UserId, &User> = users.iter().map(|u| (u.id, u)).collect();
    summarize(likes, &users)
}

fn summarize<'l>(
    likes: impl IntoIterator<Item = &'l Like>,
    users: &HashMap<UserId, &User>,
) -> Vec<LikeSummary> {
    let mut likes: Vec<&Like> = likes.into_iter().collect();
    likes.sort_by_key(|l| (l.created_at, l.user_id));
    likes
        .into_iter()
        .map(|l| LikeSummary {
            user_id: l.user_id,
            user_name: display_name(users, Some(l.user_id)),
        })
        .collect()
}

fn display_name(users: &HashMap<UserId, &User>, user_id: Option<UserId>) -> String {
    user_id
        .and_then(|id| users.get(&id))
        .map(|u| u.user_name.clone())
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
}

fn is_visible(comment: &Comment, users: &HashMap<UserId, &User>) -> bool {
    match comment.user_id.and_then(|id| users.get(&id)) {
        Some(author) => author.is_active(),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::minutes(minute)
    }

    fn user(name: &str) -> User {
        User::new(name.into(), format!("{name}@example.com"), String::new(), at(0))
    }

    fn comment(id: CommentId, parent: Option<CommentId>, author: &User, minute: i64) -> Comment {
        Comment {
            id,
            content: format!("c{id}"),
            user_id: Some(author.id),
            post_id: 1,
            parent_comment_id: parent,
            created_date: at(minute),
        }
    }

    fn shape(view: &CommentView) -> String {
        let replies: Vec<String> = view.replies.iter().map(shape).collect();
        format!("{}->[{}]", view.id, replies.join(","))
    }

    #[test]
    fn test_nested_chain_projects_as_tree() {
        let alice = user("alice");
        let comments = vec![
            comment(3, Some(2), &alice, 3),
            comment(1, None, &alice, 1),
            comment(2, Some(1), &alice, 2),
        ];
        let users = vec![alice];

        let roots = ThreadProjection::new(&comments, &[], &users).roots();

        assert_eq!(roots.len(), 1);
        assert_eq!(shape(&roots[0]), "1->[2->[3->[]]]");
        assert!(roots[0].replies[0].replies[0].replies.is_empty());
    }

    #[test]
    fn test_deep_threads_are_not_truncated() {
        let alice = user("alice");
        let comments: Vec<Comment> = (1..=8)
            .map(|id| comment(id, (id > 1).then(|| id - 1), &alice, id))
            .collect();
        let users = vec![alice];

        let roots = ThreadProjection::new(&comments, &[], &users).roots();

        let mut depth = 0;
        let mut node = &roots[0];
        while let Some(next) = node.replies.first() {
            depth += 1;
            node = next;
        }
        assert_eq!(depth, 7);
        assert_eq!(node.id, 8);
    }

    #[test]
    fn test_siblings_sorted_by_date_then_id() {
        let alice = user("alice");
        let comments = vec![
            comment(1, None, &alice, 0),
            comment(5, Some(1), &alice, 2),
            comment(4, Some(1), &alice, 2),
            comment(2, Some(1), &alice, 9),
            comment(9, None, &alice, 0),
        ];
        let users = vec![alice];

        let roots = ThreadProjection::new(&comments, &[], &users).roots();

        assert_eq!(roots.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 9]);
        let reply_ids: Vec<_> = roots[0].replies.iter().map(|r| r.id).collect();
        assert_eq!(reply_ids, vec![4, 5, 2]);
    }

    #[test]
    fn test_inactive_authors_are_hidden_with_their_replies() {
        let alice = user("alice");
        let mut bob = user("bob");
        bob.status = false;
        let comments = vec![
            comment(1, None, &alice, 1),
            comment(2, Some(1), &bob, 2),
            comment(3, Some(2), &alice, 3),
            comment(4, None, &bob, 4),
        ];
        let users = vec![alice, bob];
        let projection = ThreadProjection::new(&comments, &[], &users);

        let roots = projection.roots();
        assert_eq!(roots.len(), 1);
        assert_eq!(shape(&roots[0]), "1->[]");

        let direct = projection.subtree(2).unwrap();
        assert_eq!(shape(&direct), "2->[3->[]]");
    }

    #[test]
    fn test_missing_authors_fall_back_to_unknown() {
        let alice = user("alice");
        let mut orphan = comment(1, None, &alice, 1);
        orphan.user_id = None;
        let ghost = user("ghost");
        let comments = vec![orphan, comment(2, Some(1), &ghost, 2)];
        let likes = vec![Like {
            user_id: ghost.id,
            target: LikeTarget::Comment(1),
            created_at: at(5),
        }];

        let roots = ThreadProjection::new(&comments, &likes, &[]).roots();

        assert_eq!(roots[0].user_name, UNKNOWN_AUTHOR);
        assert_eq!(roots[0].replies[0].user_name, UNKNOWN_AUTHOR);
        assert_eq!(roots[0].likes[0].user_name, UNKNOWN_AUTHOR);
    }

    #[test]
    fn test_cycle_is_emitted_once() {
        let alice = user("alice");
        let comments = vec![comment(1, Some(2), &alice, 1), comment(2, Some(1), &alice, 2)];
        let users = vec![alice];

        let view = ThreadProjection::new(&comments, &[], &users).subtree(1).unwrap();

        assert_eq!(shape(&view), "1->[2->[]]");
    }

    #[test]
    fn test_project_post_collects_likes() {
        let alice = user("alice");
        let bob = user("bob");
        let post = Post {
            id: 1,
            title: "Hello".into(),
            content: "World".into(),
            photo_url: None,
            register_date: at(0),
            user_id: Some(alice.id),
        };
        let comments = vec![comment(1, None, &bob, 1)];
        let likes = vec![
            Like {
                user_id: bob.id,
                target: LikeTarget::Post(1),
                created_at: at(2),
            },
            Like {
                user_id: alice.id,
                target: LikeTarget::Comment(1),
                created_at: at(3),
            },
        ];
        let users = vec![alice.clone(), bob.clone()];

        let view = ThreadProjection::new(&comments, &likes, &users).project_post(&post, &likes);

        assert_eq!(view.user_name, "alice");
        assert_eq!(view.likes, vec![LikeSummary { user_id: bob.id, user_name: "bob".into() }]);
        assert_eq!(view.comments[0].likes[0].user_name, "alice");
    }
}
