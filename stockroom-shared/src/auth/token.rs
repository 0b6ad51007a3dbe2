/// Opaque mock session token
///
/// The token returned by login and register is the literal string
/// `"mock-token-" + user id`. It is never validated on any subsequent call;
/// the actor identity is carried by query parameters instead. Replacing this
/// with a signed session value behind the same endpoint shapes is the planned
/// follow-up once the client stops sending `?username=`.

/// Issues the opaque token for a user
pub fn issue(user_id: i64) -> String {
    format!("mock-token-{}", user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_format() {
        assert_eq!(issue(42), "mock-token-42");
    }
}
