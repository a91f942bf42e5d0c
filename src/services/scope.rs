use crate::models::account::Role;

/// A single visibility rule tested against a student record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Matches every stream of the named class.
    Class(String),
    /// Matches one (class, stream) pair exactly.
    ClassStream(String, String),
}

impl Matcher {
    pub fn matches(&self, class: &str, stream: &str) -> bool {
        match self {
            Matcher::Class(c) => c == class,
            Matcher::ClassStream(c, s) => c == class && s == stream,
        }
    }
}

/// The set of student records an authenticated actor may see.
///
/// `Restricted` holds matchers in assignment order and is a disjunction: a
/// record is visible if any matcher accepts it. An empty matcher list means
/// the actor sees nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Universal,
    Restricted(Vec<Matcher>),
}

impl Scope {
    pub fn is_empty(&self) -> bool {
        matches!(self, Scope::Restricted(matchers) if matchers.is_empty())
    }

    pub fn allows(&self, class: &str, stream: &str) -> bool {
        match self {
            Scope::Universal => true,
            Scope::Restricted(matchers) => matchers.iter().any(|m| m.matches(class, stream)),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// An assignment token held more than one '-' separator. The whole scope
    /// is rejected rather than guessing which parts were meant; the account's
    /// assignment string needs to be fixed.
    #[error("invalid class assignment token {token:?}")]
    InvalidAssignmentToken { token: String },
}

/// Resolves an actor's role and raw assignment string into a `Scope`.
///
/// Admins see everything regardless of assignment content. Teachers get one
/// matcher per non-empty trimmed token of the comma-separated assignment
/// string: a bare token matches a whole class, `class-stream` matches one
/// stream. Any other role resolves to the empty scope.
pub fn resolve_scope(role: Role, assignment: &str) -> Result<Scope, ScopeError> {
    match role {
        Role::Admin => Ok(Scope::Universal),
        Role::Teacher => {
            let mut matchers = Vec::new();
            for token in assignment.split(',') {
                let token = token.trim();
                if token.is_empty() {
                    continue;
                }
                matchers.push(parse_token(token)?);
            }
            Ok(Scope::Restricted(matchers))
        }
        Role::Other => Ok(Scope::Restricted(Vec::new())),
    }
}

fn parse_token(token: &str) -> Result<Matcher, ScopeError> {
    let mut parts = token.split('-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(class), None, _) => Ok(Matcher::Class(class.to_string())),
        (Some(class), Some(stream), None) => {
            Ok(Matcher::ClassStream(class.to_string(), stream.to_string()))
        }
        _ => Err(ScopeError::InvalidAssignmentToken {
            token: token.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_is_universal_regardless_of_assignment() {
        assert_eq!(resolve_scope(Role::Admin, "").unwrap(), Scope::Universal);
        assert_eq!(
            resolve_scope(Role::Admin, "Form1-A, garbage--token").unwrap(),
            Scope::Universal
        );
    }

    #[test]
    fn one_matcher_per_token_in_order() {
        let scope = resolve_scope(Role::Teacher, "Form1-A, Form2 ,Form3-B").unwrap();
        assert_eq!(
            scope,
            Scope::Restricted(vec![
                Matcher::ClassStream("Form1".to_string(), "A".to_string()),
                Matcher::Class("Form2".to_string()),
                Matcher::ClassStream("Form3".to_string(), "B".to_string()),
            ])
        );
    }

    #[test]
    fn blank_assignment_yields_empty_scope() {
        assert!(resolve_scope(Role::Teacher, "").unwrap().is_empty());
        assert!(resolve_scope(Role::Teacher, ",  ,").unwrap().is_empty());
    }

    #[test]
    fn unknown_role_fails_closed() {
        let scope = resolve_scope(Role::Other, "Form1-A").unwrap();
        assert!(scope.is_empty());
        assert!(!scope.allows("Form1", "A"));
    }

    #[test]
    fn malformed_token_rejects_whole_scope() {
        let err = resolve_scope(Role::Teacher, "Form1-A, Form2-A-B").unwrap_err();
        assert_eq!(
            err,
            ScopeError::InvalidAssignmentToken {
                token: "Form2-A-B".to_string()
            }
        );
    }

    #[test]
    fn bare_class_matcher_covers_all_streams() {
        let scope = resolve_scope(Role::Teacher, "Form1").unwrap();
        assert!(scope.allows("Form1", "A"));
        assert!(scope.allows("Form1", "B"));
        assert!(!scope.allows("Form2", "A"));
    }

    #[test]
    fn class_stream_matcher_is_exact() {
        let scope = resolve_scope(Role::Teacher, "Form1-A").unwrap();
        assert!(scope.allows("Form1", "A"));
        assert!(!scope.allows("Form1", "B"));
    }
}
