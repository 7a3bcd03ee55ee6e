//! Deletion planning for the two cascade fan-outs.
//!
//! A plan is computed from a snapshot of the affected rows before anything is
//! deleted, then executed by a store in field order: comment likes, comments
//! (every reply before its parent), post likes, post. Stores run the whole
//! plan inside one transactional unit.

use std::collections::{HashMap, HashSet};

use crate::domain::{Comment, CommentId, Like, LikeTarget, PostId, UserId};

/// Ordered batch of rows removed by a cascade.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionPlan {
    pub comment_likes: Vec<(UserId, CommentId)>,
    /// Post-order: a reply always precedes the comment it answers.
    pub comments: Vec<CommentId>,
    pub post_likes: Vec<(UserId, PostId)>,
    pub post: Option<PostId>,
}

impl DeletionPlan {
    /// Plan the removal of a post.
    ///
    /// `comments` and `likes` may contain unrelated rows; only those belonging
    /// to `post_id` are planned.
    pub fn for_post(post_id: PostId, comments: &[Comment], likes: &[Like]) -> Self {
        let thread: Vec<&Comment> = comments.iter().filter(|c| c.post_id == post_id).collect();
        let index = ChildIndex::new(&thread);

        let mut order = index.post_order(&index.roots);
        // Comments with a broken parent chain still belong to the post.
        let reached: HashSet<CommentId> = order.iter().copied().collect();
        order.extend(
            thread
                .iter()
                .map(|c| c.id)
                .filter(|id| !reached.contains(id)),
        );

        let removed: HashSet<CommentId> = order.iter().copied().collect();
        let mut post_likes: Vec<(UserId, PostId)> = likes
            .iter()
            .filter(|l| l.target == LikeTarget::Post(post_id))
            .map(|l| (l.user_id, post_id))
            .collect();
        post_likes.sort();

        Self {
            comment_likes: comment_likes_within(likes, &removed),
            comments: order,
            post_likes,
            post: Some(post_id),
        }
    }

    /// Plan the removal of one comment and its reply subtree.
    ///
    /// `comments` should hold the whole thread of the comment's post.
    pub fn for_comment(comment_id: CommentId, comments: &[Comment], likes: &[Like]) -> Self {
        let thread: Vec<&Comment> = comments.iter().collect();
        let index = ChildIndex::new(&thread);
        let order = index.post_order(&[comment_id]);
        let removed: HashSet<CommentId> = order.iter().copied().collect();

        Self {
            comment_likes: comment_likes_within(likes, &removed),
            comments: order,
            post_likes: Vec::new(),
            post: None,
        }
    }

    pub fn removes_comment(&self, id: CommentId) -> bool {
        self.comments.contains(&id)
    }

    /// Total number of rows the plan deletes.
    pub fn row_count(&self) -> usize {
        self.comment_likes.len()
            + self.comments.len()
            + self.post_likes.len()
            + usize::from(self.post.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

fn comment_likes_within(likes: &[Like], removed: &HashSet<CommentId>) -> Vec<(UserId, CommentId)> {
    let mut out: Vec<(UserId, CommentId)> = likes
        .iter()
        .filter_map(|l| match l.target {
            LikeTarget::Comment(id) if removed.contains(&id) => Some((l.user_id, id)),
            _ => None,
        })
        .collect();
    out.sort_by_key(|&(user_id, comment_id)| (comment_id, user_id));
    out
}

/// Parent -> children adjacency built in one pass over a flat comment set.
struct ChildIndex {
    children: HashMap<CommentId, Vec<CommentId>>,
    roots: Vec<CommentId>,
}

impl ChildIndex {
    fn new(comments: &[&Comment]) -> Self {
        let ids: HashSet<CommentId> = comments.iter().map(|c| c.id).collect();
        let mut children: HashMap<CommentId, Vec<CommentId>> = HashMap::new();
        let mut roots = Vec::new();

        for comment in comments {
            match comment.parent_comment_id {
                Some(parent) if ids.contains(&parent) => {
                    children.entry(parent).or_default().push(comment.id)
                }
                _ => roots.push(comment.id),
            }
        }
        for siblings in children.values_mut() {
            siblings.sort_unstable();
        }
        roots.sort_unstable();

        Self { children, roots }
    }

    /// Iterative post-order walk; each id is emitted once even if the data
    /// contains a cycle.
    fn post_order(&self, starts: &[CommentId]) -> Vec<CommentId> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut stack: Vec<(CommentId, bool)> = starts.iter().rev().map(|&id| (id, false)).collect();

        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            if !visited.insert(id) {
                continue;
            }
            stack.push((id, true));
            if let Some(children) = self.children.get(&id) {
                stack.extend(
                    children
                        .iter()
                        .rev()
                        .filter(|child| !visited.contains(*child))
                        .map(|&child| (child, false)),
                );
            }
        }

        order
    }
}
