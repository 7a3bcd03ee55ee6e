//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod likes;
mod posts;
mod users;

use actix_web::web;

use inkwell_core::cascade::DeletionPlan;
use inkwell_shared::dto::DeletionSummary;

/// Configure all application routes.
///
/// Literal segments such as `/posts/user/{user_id}` are registered before
/// their `/{id}` siblings so they are matched first.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("", web::post().to(posts::create_post))
                    .route("/user/{user_id}", web::get().to(posts::list_posts_by_user))
                    .route("/{id}/likes", web::get().to(posts::list_post_likes))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}", web::put().to(posts::update_post))
                    .route("/{id}", web::delete().to(posts::delete_post)),
            )
            .service(
                web::scope("/comments")
                    .route("", web::get().to(comments::list_comments))
                    .route("", web::post().to(comments::create_comment))
                    .route("/post/{post_id}", web::get().to(comments::list_post_comments))
                    .route("/user/{user_id}", web::get().to(comments::list_user_comments))
                    .route("/{id}", web::get().to(comments::get_comment))
                    .route("/{id}", web::put().to(comments::update_comment))
                    .route("/{id}", web::delete().to(comments::delete_comment)),
            )
            .service(
                web::scope("/post-likes")
                    .route("", web::get().to(likes::list_post_likes))
                    .route("", web::post().to(likes::like_post))
                    .route("/user/{user_id}", web::get().to(likes::list_user_post_likes))
                    .route("/{post_id}", web::get().to(likes::get_post_like))
                    .route("/{post_id}", web::delete().to(likes::unlike_post)),
            )
            .service(
                web::scope("/comment-likes")
                    .route("", web::get().to(likes::list_comment_likes))
                    .route("", web::post().to(likes::like_comment))
                    .route(
                        "/user/{user_id}",
                        web::get().to(likes::list_user_comment_likes),
                    )
                    .route("/{comment_id}", web::get().to(likes::get_comment_like))
                    .route("/{comment_id}", web::delete().to(likes::unlike_comment)),
            )
            .service(
                web::scope("/users")
                    .route("", web::get().to(users::list_users))
                    .route("/{id}/reactivate", web::post().to(users::reactivate_user))
                    .route("/{id}/purge", web::delete().to(users::purge_user))
                    .route("/{id}", web::get().to(users::get_user))
                    .route("/{id}", web::put().to(users::update_user))
                    .route("/{id}", web::delete().to(users::deactivate_user)),
            ),
    );
}

fn deletion_summary(plan: &DeletionPlan) -> DeletionSummary {
    DeletionSummary {
        comments: plan.comments.len(),
        likes: plan.comment_likes.len() + plan.post_likes.len(),
    }
}

#[cfg(test)]
mod tests;
