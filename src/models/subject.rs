use std::fmt::Display;

pub type UserId = i64;

/// Who recommendations are computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    Anonymous,
    User(UserId),
}

impl From<Option<UserId>> for Subject {
    fn from(user_id: Option<UserId>) -> Self {
        user_id.map_or(Subject::Anonymous, Subject::User)
    }
}

impl Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Subject::Anonymous => write!(f, "anon"),
            Subject::User(id) => write!(f, "u{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_display() {
        assert_eq!(Subject::Anonymous.to_string(), "anon");
        assert_eq!(Subject::User(42).to_string(), "u42");
    }

    #[test]
    fn test_subject_from_option() {
        assert_eq!(Subject::from(None), Subject::Anonymous);
        assert_eq!(Subject::from(Some(7)), Subject::User(7));
    }
}
