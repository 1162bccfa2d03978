//! Screen context resolution for admin pages.

use serde::Deserialize;

use crate::notices::{ObjectType, Scope};

/// Query parameters describing which admin screen the client is on,
/// mirroring the host framework's screen/request variables: a single-post
/// editor carries `post`, a single-comment editor carries `c`, a term
/// editor carries `tag_id`. Archive screens carry no object id.
#[derive(Debug, Default, Deserialize)]
pub struct ScreenQuery {
    pub screen: Option<String>,
    pub post: Option<i64>,
    pub c: Option<i64>,
    pub tag_id: Option<i64>,
}

impl ScreenQuery {
    /// The object scope for this screen, if it is a single-object editor
    /// with a positive id. Everything else (archives, unknown screens,
    /// missing ids) gets global notices only.
    pub fn resolve_scope(&self) -> Option<Scope> {
        let (object_type, id) = match self.screen.as_deref() {
            Some("post") => (ObjectType::Post, self.post),
            Some("comment") => (ObjectType::Comment, self.c),
            Some("term") => (ObjectType::Term, self.tag_id),
            _ => return None,
        };

        match id {
            Some(id) if id > 0 => Some(Scope::Object {
                object_type,
                object_id: id,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(screen: &str) -> ScreenQuery {
        ScreenQuery {
            screen: Some(screen.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_single_post_screen() {
        let q = ScreenQuery {
            post: Some(42),
            ..query("post")
        };
        assert_eq!(
            q.resolve_scope(),
            Some(Scope::Object {
                object_type: ObjectType::Post,
                object_id: 42
            })
        );
    }

    #[test]
    fn test_single_comment_screen() {
        let q = ScreenQuery {
            c: Some(7),
            ..query("comment")
        };
        assert_eq!(
            q.resolve_scope(),
            Some(Scope::Object {
                object_type: ObjectType::Comment,
                object_id: 7
            })
        );
    }

    #[test]
    fn test_term_screen() {
        let q = ScreenQuery {
            tag_id: Some(3),
            ..query("term")
        };
        assert_eq!(
            q.resolve_scope(),
            Some(Scope::Object {
                object_type: ObjectType::Term,
                object_id: 3
            })
        );
    }

    #[test]
    fn test_archive_screens_resolve_to_no_scope() {
        assert_eq!(query("edit").resolve_scope(), None);
        assert_eq!(query("edit-comments").resolve_scope(), None);
        assert_eq!(query("edit-tags").resolve_scope(), None);
        assert_eq!(query("dashboard").resolve_scope(), None);
        assert_eq!(ScreenQuery::default().resolve_scope(), None);
    }

    #[test]
    fn test_missing_or_invalid_id_resolves_to_no_scope() {
        assert_eq!(query("post").resolve_scope(), None);

        let q = ScreenQuery {
            post: Some(0),
            ..query("post")
        };
        assert_eq!(q.resolve_scope(), None);

        let q = ScreenQuery {
            post: Some(-4),
            ..query("post")
        };
        assert_eq!(q.resolve_scope(), None);
    }

    #[test]
    fn test_id_from_wrong_parameter_is_ignored() {
        let q = ScreenQuery {
            c: Some(9),
            ..query("post")
        };
        assert_eq!(q.resolve_scope(), None);
    }
}
